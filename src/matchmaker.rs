use std::path::Path;

use log::info;

use crate::{
    config::MatchConfig,
    error::Result,
    loader::load_profile_with,
    profile::Profile,
    reconcile::reconcile,
    results::MatchReport,
    similarity::{analyze_expression, compute_distance},
};

/// Matches a sample expression profile against a reference profile
///
/// Holds no state besides its configuration, so one instance can run any
/// number of comparisons.
#[derive(Debug, Clone, Default)]
pub struct Matchmaker {
    config: MatchConfig,
}

impl Matchmaker {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Loads both profiles from disk and runs the comparison
    pub fn run_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        reference: P,
        sample: Q,
    ) -> Result<MatchReport> {
        self.config.validate()?;
        let reference = load_profile_with(reference, &self.config.loader)?;
        let sample = load_profile_with(sample, &self.config.loader)?;
        self.compare(reference, sample)
    }

    /// Run the matching pipeline
    ///
    /// 1. Reconcile the genes missing from the sample, then those missing from the reference
    /// 2. Sort both profiles by gene and verify the alignment
    /// 3. Normalize each profile independently
    /// 4. Compute the correlation and the per-gene ratios
    pub fn run(&self, reference: Profile, sample: Profile) -> Result<MatchReport> {
        self.config.validate()?;
        self.compare(reference, sample)
    }

    fn compare(&self, reference: Profile, sample: Profile) -> Result<MatchReport> {
        let reconciled = reconcile(
            reference,
            sample,
            self.config.missing_in_sample,
            self.config.missing_in_reference,
        )?;
        info!(
            "Comparing {} shared genes ({} missing in sample, {} missing in reference)",
            reconciled.profiles.len(),
            reconciled.missing_in_sample.len(),
            reconciled.missing_in_reference.len()
        );

        let profiles = reconciled.profiles.normalized(self.config.method);
        let distance = compute_distance(&profiles)?;
        let analysis = analyze_expression(&profiles, self.config.sensitivity);
        info!(
            "Correlation {distance}; {} of {} genes similar at sensitivity {}",
            analysis.similar.len(),
            profiles.len(),
            self.config.sensitivity
        );

        Ok(MatchReport {
            profiles,
            missing_in_sample: reconciled.missing_in_sample,
            missing_in_reference: reconciled.missing_in_reference,
            distance,
            match_threshold: self.config.match_threshold,
            analysis,
        })
    }
}
