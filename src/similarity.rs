use itertools::Itertools;
use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    config::NormalizeMethod,
    error::{MatchError, Result},
    math::{pearson, round_to},
    profile::Profile,
    results::{ExpressionAnalysis, GeneRatio, RatioBin},
};

/// A reference/sample pair whose identifiers match position by position
///
/// Only constructible through [`align`] or [`AlignedProfiles::sorted`], both of
/// which verify the correspondence, so the similarity functions can compare the
/// value columns positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedProfiles {
    reference: Profile,
    sample: Profile,
}

/// Verifies that two profiles already share the same identifiers in the same order
///
/// Nothing is reordered; a mismatch is reported at the first offending position.
pub fn align(reference: Profile, sample: Profile) -> Result<AlignedProfiles> {
    if reference.len() != sample.len() {
        return Err(MatchError::LengthMismatch {
            reference_len: reference.len(),
            sample_len: sample.len(),
        });
    }
    if let Some((position, (r, s))) = reference
        .identifiers()
        .iter()
        .zip(sample.identifiers())
        .find_position(|(r, s)| r != s)
    {
        return Err(MatchError::Alignment {
            position,
            reference: r.clone(),
            sample: s.clone(),
        });
    }
    Ok(AlignedProfiles { reference, sample })
}

impl AlignedProfiles {
    /// Sorts both profiles by identifier and then aligns them
    pub fn sorted(reference: &Profile, sample: &Profile) -> Result<Self> {
        align(reference.sorted(), sample.sorted())
    }

    pub fn reference(&self) -> &Profile {
        &self.reference
    }

    pub fn sample(&self) -> &Profile {
        &self.sample
    }

    /// Shared identifiers, in order
    pub fn identifiers(&self) -> &[String] {
        self.reference.identifiers()
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Normalizes both sides independently; the order is untouched so alignment holds
    pub fn normalized(&self, method: NormalizeMethod) -> Self {
        Self {
            reference: self.reference.normalized(method),
            sample: self.sample.normalized(method),
        }
    }

    pub fn into_parts(self) -> (Profile, Profile) {
        (self.reference, self.sample)
    }
}

/// Pearson correlation between the reference and sample value columns,
/// rounded to 4 decimal places
///
/// Fails with [`MatchError::Computation`] when either profile is constant,
/// holds undefined values, or has fewer than two genes.
pub fn compute_distance(profiles: &AlignedProfiles) -> Result<f64> {
    let r = pearson(profiles.reference.values(), profiles.sample.values())?;
    let distance = round_to(r, 4);
    debug!("Correlation over {} genes: {distance}", profiles.len());
    Ok(distance)
}

/// Per-gene `reference / sample` ratios and the genes within `sensitivity` of 1.0
///
/// A ratio that is undefined (zero sample value, or NaN/infinite input) is
/// coerced to 0.0 and flagged on its [`GeneRatio`]. This is lossy: such a gene
/// lands in the same bin as a genuinely very different one.
pub fn analyze_expression(profiles: &AlignedProfiles, sensitivity: f64) -> ExpressionAnalysis {
    let genes = profiles
        .identifiers()
        .par_iter()
        .zip(profiles.reference.values().par_iter())
        .zip(profiles.sample.values().par_iter())
        .map(|((gene, reference), sample)| gene_ratio(gene, *reference, *sample, sensitivity))
        .collect::<Vec<_>>();

    let analysis = ExpressionAnalysis::from_vec(genes);
    let n_undefined = analysis.n_undefined();
    if n_undefined > 0 {
        warn!(
            "{} of {} gene ratios were undefined and set to 0.0",
            n_undefined,
            profiles.len()
        );
    }
    debug!(
        "{} of {} genes within {} of a 1.0 ratio",
        analysis.similar.len(),
        profiles.len(),
        sensitivity
    );
    analysis
}

fn gene_ratio(gene: &str, reference: f64, sample: f64, sensitivity: f64) -> GeneRatio {
    let quotient = reference / sample;
    let undefined = !quotient.is_finite();
    let ratio = if undefined { 0.0 } else { quotient };
    GeneRatio::builder()
        .gene(gene.to_string())
        .ratio(ratio)
        .bin(RatioBin::classify(ratio))
        .similar((ratio - 1.0).abs() <= sensitivity)
        .undefined(undefined)
        .build()
}
