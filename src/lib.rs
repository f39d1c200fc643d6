//! expr-matchmaker: Reference vs. Sample Gene Expression Matching
//!
//! This library compares a reference gene expression profile against a sample
//! (e.g. tumor) profile. The two profiles are reconciled onto a common gene set,
//! normalized, and then scored both as a whole (Pearson correlation) and gene by
//! gene (expression ratio against a sensitivity threshold).
//!
//! The main components of this library are:
//! - `Profile` and the loader functions: two-column tables collapsed to unique genes
//! - `reconcile_missing_in_sample` / `reconcile_missing_in_reference`: drop or zero-fill
//!   genes present on one side only
//! - `AlignedProfiles`: a profile pair proven to share gene order
//! - `compute_distance` and `analyze_expression`: the similarity measures
//! - `Matchmaker`: runs the whole pipeline from a `MatchConfig`
//!
//! Every stage is a plain function of its inputs; no state is kept between calls.

mod config;
mod error;
mod loader;
mod matchmaker;
mod math;
mod profile;
mod reconcile;
mod results;
mod similarity;
mod utils;

pub use config::{LoaderConfig, MatchConfig, MissingPolicy, NormalizeMethod};
pub use error::{MatchError, Result};
pub use loader::{load_profile, load_profile_with, read_profile};
pub use matchmaker::Matchmaker;
pub use profile::{normalize, Profile};
pub use reconcile::{
    reconcile, reconcile_missing_in_reference, reconcile_missing_in_sample, ReconciledProfiles,
    Reconciliation,
};
pub use results::{ExpressionAnalysis, GeneRatio, MatchReport, RatioBin};
pub use similarity::{align, analyze_expression, compute_distance, AlignedProfiles};
