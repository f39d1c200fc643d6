use std::fmt;

use bon::Builder;

use crate::similarity::AlignedProfiles;

/// Number of fixed-width ratio intervals between 0.0 and 2.0
pub const N_INTERVALS: usize = 10;

/// Reporting category of a per-gene ratio
///
/// Intervals are half-open, `[0.2 * k, 0.2 * (k + 1))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RatioBin {
    /// Ratio below zero, only reachable on normalized profiles
    Negative,
    Interval(usize),
    /// Ratio of 2.0 or more
    AtLeastMax,
}

impl RatioBin {
    pub fn classify(ratio: f64) -> Self {
        if ratio < 0.0 {
            return RatioBin::Negative;
        }
        // upper edges as k / 5 so 0.6 compares against the literal 0.6
        (0..N_INTERVALS)
            .find(|k| ratio < (k + 1) as f64 / 5.0)
            .map(RatioBin::Interval)
            .unwrap_or(RatioBin::AtLeastMax)
    }

    /// All bins in ascending order
    pub fn all() -> Vec<Self> {
        std::iter::once(RatioBin::Negative)
            .chain((0..N_INTERVALS).map(RatioBin::Interval))
            .chain(std::iter::once(RatioBin::AtLeastMax))
            .collect()
    }

    /// Lower (inclusive) and upper (exclusive) bounds
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            RatioBin::Negative => (f64::NEG_INFINITY, 0.0),
            RatioBin::Interval(k) => (*k as f64 / 5.0, (k + 1) as f64 / 5.0),
            RatioBin::AtLeastMax => (2.0, f64::INFINITY),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RatioBin::Negative => "<0.0".to_string(),
            RatioBin::AtLeastMax => ">2.0".to_string(),
            RatioBin::Interval(_) => {
                let (lo, hi) = self.bounds();
                format!("{lo:.1}-{hi:.1}")
            }
        }
    }
}

impl fmt::Display for RatioBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GeneRatio {
    pub gene: String,
    /// `reference / sample`, coerced to 0.0 when undefined
    pub ratio: f64,
    pub bin: RatioBin,
    pub similar: bool,
    /// Set when the quotient was undefined (zero or non-finite input)
    #[builder(default)]
    pub undefined: bool,
}

/// Per-gene ratio table of an aligned profile pair
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionAnalysis {
    pub genes: Vec<GeneRatio>,
    /// Genes whose ratio lies within the sensitivity threshold of 1.0, in profile order
    pub similar: Vec<String>,
}

impl ExpressionAnalysis {
    pub fn from_vec(genes: Vec<GeneRatio>) -> Self {
        let similar = genes
            .iter()
            .filter(|g| g.similar)
            .map(|g| g.gene.clone())
            .collect();
        Self { genes, similar }
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.genes.iter().map(|g| g.ratio).collect()
    }

    pub fn n_undefined(&self) -> usize {
        self.genes.iter().filter(|g| g.undefined).count()
    }

    /// Gene count per bin, every bin present, in ascending order
    pub fn bin_counts(&self) -> Vec<(RatioBin, usize)> {
        RatioBin::all()
            .into_iter()
            .map(|bin| (bin, self.genes.iter().filter(|g| g.bin == bin).count()))
            .collect()
    }
}

/// Everything a full matching run hands back to the caller
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Reconciled, aligned and normalized profiles
    pub profiles: AlignedProfiles,
    pub missing_in_sample: Vec<String>,
    pub missing_in_reference: Vec<String>,
    /// Pearson correlation of the two profiles, rounded to 4 decimals
    pub distance: f64,
    /// Correlation the distance must reach for [`MatchReport::is_match`]
    pub match_threshold: f64,
    pub analysis: ExpressionAnalysis,
}

impl MatchReport {
    /// True when the correlation is at least the match threshold
    ///
    /// Higher correlation means more similar profiles, so the threshold is a
    /// lower bound and a distance equal to it counts as a match.
    pub fn is_match(&self) -> bool {
        self.distance >= self.match_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_edges() {
        assert_eq!(RatioBin::classify(0.0), RatioBin::Interval(0));
        assert_eq!(RatioBin::classify(0.19), RatioBin::Interval(0));
        assert_eq!(RatioBin::classify(0.2), RatioBin::Interval(1));
        assert_eq!(RatioBin::classify(0.6), RatioBin::Interval(3));
        assert_eq!(RatioBin::classify(0.99), RatioBin::Interval(4));
        assert_eq!(RatioBin::classify(1.0), RatioBin::Interval(5));
        assert_eq!(RatioBin::classify(1.99), RatioBin::Interval(9));
        assert_eq!(RatioBin::classify(2.0), RatioBin::AtLeastMax);
        assert_eq!(RatioBin::classify(57.0), RatioBin::AtLeastMax);
        assert_eq!(RatioBin::classify(-0.5), RatioBin::Negative);
    }

    #[test]
    fn test_bins_are_ordered_and_contiguous() {
        let bins = RatioBin::all();
        assert_eq!(bins.len(), N_INTERVALS + 2);
        for pair in bins.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].bounds().1, pair[1].bounds().0);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(RatioBin::Interval(0).label(), "0.0-0.2");
        assert_eq!(RatioBin::Interval(4).label(), "0.8-1.0");
        assert_eq!(RatioBin::AtLeastMax.to_string(), ">2.0");
    }

    #[test]
    fn test_analysis_collects_similar_and_counts() {
        let genes = vec![
            GeneRatio::builder()
                .gene("g1".to_string())
                .ratio(1.0)
                .bin(RatioBin::classify(1.0))
                .similar(true)
                .build(),
            GeneRatio::builder()
                .gene("g2".to_string())
                .ratio(0.0)
                .bin(RatioBin::classify(0.0))
                .similar(false)
                .undefined(true)
                .build(),
            GeneRatio::builder()
                .gene("g3".to_string())
                .ratio(1.02)
                .bin(RatioBin::classify(1.02))
                .similar(true)
                .build(),
        ];
        let analysis = ExpressionAnalysis::from_vec(genes);
        assert_eq!(analysis.similar, vec!["g1", "g3"]);
        assert_eq!(analysis.n_undefined(), 1);
        assert_eq!(analysis.ratios(), vec![1.0, 0.0, 1.02]);

        let counts = analysis.bin_counts();
        assert_eq!(counts.len(), N_INTERVALS + 2);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 3);
        assert!(counts.contains(&(RatioBin::Interval(5), 2)));
        assert!(counts.contains(&(RatioBin::Interval(0), 1)));
    }
}
