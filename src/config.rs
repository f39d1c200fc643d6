use std::str::FromStr;

use bon::Builder;
use itertools::{Itertools, MinMaxResult};

use crate::{
    error::{MatchError, Result},
    math::{arithmetic_mean, standard_deviation},
};

/// How a reconciliation pass treats identifiers present on one side only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Remove the identifiers from the profile that has them
    #[default]
    Drop,
    /// Insert the identifiers into the profile that lacks them with value 0.0
    ZeroFill,
}

impl From<bool> for MissingPolicy {
    /// Maps an "add missing values" flag onto a policy
    fn from(add_missing: bool) -> Self {
        if add_missing {
            MissingPolicy::ZeroFill
        } else {
            MissingPolicy::Drop
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(MissingPolicy::Drop),
            "zero-fill" | "zerofill" | "zero_fill" => Ok(MissingPolicy::ZeroFill),
            other => Err(MatchError::Configuration(format!(
                "unknown missing-value policy '{other}' (use drop|zero-fill)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMethod {
    /// `(x - mean) / sd` with the population deviation
    ZScore,
    /// `(x - mean) / sd` with the sample deviation
    Mean,
    /// `(x - min) / (max - min)`
    MinMax,
    #[default]
    Raw,
}

impl NormalizeMethod {
    /// Rescales a value column
    ///
    /// Degenerate columns (constant values, too few points) are not special-cased
    /// and come back as NaN or infinite values.
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        match self {
            NormalizeMethod::Raw => values.to_vec(),
            NormalizeMethod::ZScore => standardize(values, 0),
            NormalizeMethod::Mean => standardize(values, 1),
            NormalizeMethod::MinMax => match values.iter().copied().minmax() {
                MinMaxResult::NoElements => Vec::new(),
                // max == min, so the quotient is 0 / 0
                MinMaxResult::OneElement(_) => vec![f64::NAN],
                MinMaxResult::MinMax(min, max) => {
                    values.iter().map(|x| (x - min) / (max - min)).collect()
                }
            },
        }
    }
}

fn standardize(values: &[f64], ddof: usize) -> Vec<f64> {
    let mean = arithmetic_mean(values);
    let sd = standard_deviation(values, ddof);
    values.iter().map(|x| (x - mean) / sd).collect()
}

impl FromStr for NormalizeMethod {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zscore" | "z-score" | "z_score" => Ok(NormalizeMethod::ZScore),
            "mean" => Ok(NormalizeMethod::Mean),
            "minmax" | "min-max" | "min_max" => Ok(NormalizeMethod::MinMax),
            "raw" | "none" => Ok(NormalizeMethod::Raw),
            other => Err(MatchError::Configuration(format!(
                "unknown normalization method '{other}' (use zscore|mean|minmax|raw)"
            ))),
        }
    }
}

/// Shape of the delimited text the loader reads
#[derive(Debug, Clone, Builder)]
pub struct LoaderConfig {
    #[builder(default = b';')]
    pub delimiter: u8,
    #[builder(default = true)]
    pub has_headers: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Parameters of a full matching run
#[derive(Debug, Clone, Builder)]
pub struct MatchConfig {
    /// Policy for reference genes the sample lacks
    #[builder(default)]
    pub missing_in_sample: MissingPolicy,
    /// Policy for sample genes the reference lacks
    #[builder(default)]
    pub missing_in_reference: MissingPolicy,
    #[builder(default)]
    pub method: NormalizeMethod,
    /// Maximum `|ratio - 1|` for a gene to count as similar
    #[builder(default = 0.05)]
    pub sensitivity: f64,
    /// Minimum correlation for the pair to count as a match
    #[builder(default = 0.8)]
    pub match_threshold: f64,
    #[builder(default)]
    pub loader: LoaderConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.sensitivity.is_finite() || self.sensitivity < 0.0 {
            return Err(MatchError::Configuration(format!(
                "sensitivity threshold must be a non-negative number, got {}",
                self.sensitivity
            )));
        }
        if !(-1.0..=1.0).contains(&self.match_threshold) {
            return Err(MatchError::Configuration(format!(
                "match threshold must lie in [-1, 1], got {}",
                self.match_threshold
            )));
        }
        Ok(())
    }
}
