//! Grade distribution histogram shared by course and instructor records

use serde::{Deserialize, Serialize};

/// Number of histogram buckets in every grade distribution
pub const BUCKET_COUNT: usize = 11;

/// Dataset keys of the histogram buckets, lowest grades first
pub const BUCKET_KEYS: [&str; BUCKET_COUNT] = [
    "<50", "50-54", "55-59", "60-63", "64-67", "68-71", "72-75", "76-79", "80-84", "85-89",
    "90-100",
];

/// Display labels of the histogram buckets, in the same order as [`BUCKET_KEYS`]
pub const BUCKET_LABELS: [&str; BUCKET_COUNT] = [
    "< 50", "50-54", "55-59", "60-63", "64-67", "68-71", "72-75", "76-79", "80-84", "85-89",
    "90-100",
];

/// Student counts per grade bucket.
///
/// Missing buckets in the source JSON count as zero. Field `from_N` holds the
/// bucket whose lower bound is `N`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution {
    #[serde(rename = "<50", default)]
    pub below_50: u32,
    #[serde(rename = "50-54", default)]
    pub from_50: u32,
    #[serde(rename = "55-59", default)]
    pub from_55: u32,
    #[serde(rename = "60-63", default)]
    pub from_60: u32,
    #[serde(rename = "64-67", default)]
    pub from_64: u32,
    #[serde(rename = "68-71", default)]
    pub from_68: u32,
    #[serde(rename = "72-75", default)]
    pub from_72: u32,
    #[serde(rename = "76-79", default)]
    pub from_76: u32,
    #[serde(rename = "80-84", default)]
    pub from_80: u32,
    #[serde(rename = "85-89", default)]
    pub from_85: u32,
    #[serde(rename = "90-100", default)]
    pub from_90: u32,
}

impl GradeDistribution {
    /// Build a distribution from counts ordered like [`BUCKET_KEYS`]
    #[must_use]
    pub const fn from_counts(counts: [u32; BUCKET_COUNT]) -> Self {
        Self {
            below_50: counts[0],
            from_50: counts[1],
            from_55: counts[2],
            from_60: counts[3],
            from_64: counts[4],
            from_68: counts[5],
            from_72: counts[6],
            from_76: counts[7],
            from_80: counts[8],
            from_85: counts[9],
            from_90: counts[10],
        }
    }

    /// Counts ordered like [`BUCKET_KEYS`]
    #[must_use]
    pub const fn counts(&self) -> [u32; BUCKET_COUNT] {
        [
            self.below_50,
            self.from_50,
            self.from_55,
            self.from_60,
            self.from_64,
            self.from_68,
            self.from_72,
            self.from_76,
            self.from_80,
            self.from_85,
            self.from_90,
        ]
    }

    /// Total students across all buckets
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts().iter().map(|&c| u64::from(c)).sum()
    }

    /// Largest single bucket count
    #[must_use]
    pub fn max_count(&self) -> u32 {
        self.counts().into_iter().max().unwrap_or(0)
    }

    /// Whether every bucket is zero
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The statistics a grades view needs, independent of where they came from
/// (a whole course or one instructor's offering of it).
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    /// Enrollment-weighted average
    pub average: f64,
    /// Number of students with a reported grade
    pub reported: u32,
    /// Enrollment-weighted median
    pub weighted_median: f64,
    /// Highest grade
    pub high: f64,
    /// Lowest grade
    pub low: f64,
    /// Histogram
    pub distribution: GradeDistribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_order_matches_keys() {
        let counts = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
        let dist = GradeDistribution::from_counts(counts);
        assert_eq!(dist.counts(), counts);
        assert_eq!(dist.total(), 66);
        assert_eq!(dist.max_count(), 11);
        assert!(!dist.is_empty());
    }

    #[test]
    fn test_missing_buckets_default_to_zero() {
        let dist: GradeDistribution =
            serde_json::from_str(r#"{"<50": 2, "90-100": 7}"#).unwrap();
        assert_eq!(dist.below_50, 2);
        assert_eq!(dist.from_90, 7);
        assert_eq!(dist.total(), 9);
    }

    #[test]
    fn test_empty_distribution() {
        let dist = GradeDistribution::default();
        assert!(dist.is_empty());
        assert_eq!(dist.max_count(), 0);
    }
}
