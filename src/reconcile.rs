use derive_new::new;
use itertools::Itertools;
use log::info;

use crate::{
    config::MissingPolicy,
    error::Result,
    profile::Profile,
    similarity::AlignedProfiles,
    utils::{exclude_indices, missing_indices, select_indices},
};

/// Outcome of a single directional reconciliation pass
#[derive(Debug, Clone, new)]
pub struct Reconciliation {
    pub reference: Profile,
    pub sample: Profile,
    /// Identifiers that were dropped or zero-filled by this pass
    pub affected: Vec<String>,
    pub policy: MissingPolicy,
}

/// Both passes applied and the pair brought into a common order
#[derive(Debug, Clone)]
pub struct ReconciledProfiles {
    pub profiles: AlignedProfiles,
    /// Reference genes the sample lacked
    pub missing_in_sample: Vec<String>,
    /// Sample genes the reference lacked
    pub missing_in_reference: Vec<String>,
}

/// Handles identifiers present in `reference` but absent from `sample`
///
/// `Drop` removes them from the reference, `ZeroFill` adds them to the sample
/// with an expression of 0.0.
pub fn reconcile_missing_in_sample(
    reference: Profile,
    sample: Profile,
    policy: MissingPolicy,
) -> Reconciliation {
    let (reference, sample, affected) = reconcile_direction(reference, sample, policy);
    log_pass(policy, &affected, "reference", "sample");
    Reconciliation::new(reference, sample, affected, policy)
}

/// Handles identifiers present in `sample` but absent from `reference`
///
/// `Drop` removes them from the sample, `ZeroFill` adds them to the reference
/// with an expression of 0.0.
pub fn reconcile_missing_in_reference(
    reference: Profile,
    sample: Profile,
    policy: MissingPolicy,
) -> Reconciliation {
    let (sample, reference, affected) = reconcile_direction(sample, reference, policy);
    log_pass(policy, &affected, "sample", "reference");
    Reconciliation::new(reference, sample, affected, policy)
}

/// Runs both passes, then sorts both profiles by identifier and checks alignment
pub fn reconcile(
    reference: Profile,
    sample: Profile,
    missing_in_sample: MissingPolicy,
    missing_in_reference: MissingPolicy,
) -> Result<ReconciledProfiles> {
    let first = reconcile_missing_in_sample(reference, sample, missing_in_sample);
    let second =
        reconcile_missing_in_reference(first.reference, first.sample, missing_in_reference);
    let profiles = AlignedProfiles::sorted(&second.reference, &second.sample)?;
    Ok(ReconciledProfiles {
        profiles,
        missing_in_sample: first.affected,
        missing_in_reference: second.affected,
    })
}

/// `holder` has identifiers that `lacker` does not
///
/// Returns the updated (holder, lacker) pair and the affected identifiers.
fn reconcile_direction(
    holder: Profile,
    lacker: Profile,
    policy: MissingPolicy,
) -> (Profile, Profile, Vec<String>) {
    let missing_idx = missing_indices(holder.identifiers(), &lacker.identifier_set());
    let missing = select_indices(&missing_idx, holder.identifiers());
    if missing.is_empty() {
        return (holder, lacker, missing);
    }

    match policy {
        MissingPolicy::Drop => {
            let identifiers = exclude_indices(&missing_idx, holder.identifiers());
            let values = exclude_indices(&missing_idx, holder.values());
            (Profile::from_columns(identifiers, values), lacker, missing)
        }
        MissingPolicy::ZeroFill => {
            let filled = lacker
                .into_pairs()
                .chain(missing.iter().map(|id| (id.clone(), 0.0)));
            (holder, Profile::from_pairs(filled), missing)
        }
    }
}

fn log_pass(policy: MissingPolicy, affected: &[String], holder: &str, lacker: &str) {
    if affected.is_empty() {
        return;
    }
    match policy {
        MissingPolicy::Drop => info!(
            "Dropped {} {holder} genes absent from the {lacker} profile: {}",
            affected.len(),
            affected.iter().join(", ")
        ),
        MissingPolicy::ZeroFill => info!(
            "Zero-filled {} {holder} genes into the {lacker} profile: {}",
            affected.len(),
            affected.iter().join(", ")
        ),
    }
}
