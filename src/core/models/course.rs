//! Course model

use super::distribution::{GradeDistribution, GradeSummary};
use serde::{Deserialize, Serialize};

/// Suffix the upstream data appends to the faculty of cross-credited courses
pub const CROSS_CREDIT_SUFFIX: &str = " (Honorary Science Credit)";

/// Faculty a cross-credited course also counts towards
pub const CROSS_CREDIT_FACULTY: &str = "Faculty of Science";

/// One course's grade record for a single campus and session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course code (e.g., "CPSC 110")
    #[serde(rename = "Code")]
    pub code: String,

    /// Course title (e.g., "Computation, Programs, and Programming")
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Subject title (e.g., "Computer Science")
    #[serde(rename = "Subject", default)]
    pub subject: String,

    /// Owning faculty, possibly carrying [`CROSS_CREDIT_SUFFIX`]
    #[serde(rename = "Faculty", default)]
    pub faculty: String,

    /// Enrollment-weighted average grade
    #[serde(rename = "Average", default)]
    pub average: f64,

    /// Number of students with a reported grade
    #[serde(rename = "Reported", default)]
    pub reported: u32,

    /// Enrollment-weighted median grade
    #[serde(rename = "WeightedMedian", default)]
    pub weighted_median: f64,

    /// Enrollment-weighted 25th percentile
    #[serde(rename = "Percentile25", default, skip_serializing_if = "Option::is_none")]
    pub percentile_25: Option<f64>,

    /// Enrollment-weighted 75th percentile
    #[serde(rename = "Percentile75", default, skip_serializing_if = "Option::is_none")]
    pub percentile_75: Option<f64>,

    /// Highest grade across sections
    #[serde(rename = "High", default)]
    pub high: f64,

    /// Lowest grade across sections
    #[serde(rename = "Low", default)]
    pub low: f64,

    /// Grade histogram
    #[serde(flatten)]
    pub distribution: GradeDistribution,

    /// Instructors who taught the course this session
    #[serde(rename = "Professors", default)]
    pub professors: Vec<String>,

    /// Credit count merged from the prerequisite dataset (`None` = unknown)
    #[serde(rename = "Credits", default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
}

impl Course {
    /// Create a new course with no grades recorded
    ///
    /// # Arguments
    /// * `code` - Course code, e.g. "CPSC 110"
    /// * `name` - Course title
    /// * `subject` - Subject title
    /// * `faculty` - Owning faculty
    #[must_use]
    pub fn new(code: String, name: String, subject: String, faculty: String) -> Self {
        Self {
            code,
            name,
            subject,
            faculty,
            average: 0.0,
            reported: 0,
            weighted_median: 0.0,
            percentile_25: None,
            percentile_75: None,
            high: 0.0,
            low: 0.0,
            distribution: GradeDistribution::default(),
            professors: Vec::new(),
            credits: None,
        }
    }

    /// Set average and enrollment
    #[must_use]
    pub fn with_grades(mut self, average: f64, reported: u32) -> Self {
        self.average = average;
        self.reported = reported;
        self
    }

    /// Faculty without the cross-credit suffix
    #[must_use]
    pub fn base_faculty(&self) -> &str {
        base_faculty(&self.faculty)
    }

    /// Whether the course is cross-credited to [`CROSS_CREDIT_FACULTY`]
    #[must_use]
    pub fn has_cross_credit(&self) -> bool {
        self.faculty.contains(CROSS_CREDIT_SUFFIX)
    }

    /// Year level derived from the code (e.g., "CPSC 310" → 300)
    #[must_use]
    pub fn year_level(&self) -> Option<u16> {
        year_level(&self.code)
    }

    /// Whether the record has data usable for aggregate statistics
    #[must_use]
    pub fn has_grades(&self) -> bool {
        self.average > 0.0 && self.reported > 0
    }

    /// Statistics for the grades view
    #[must_use]
    pub const fn grade_summary(&self) -> GradeSummary {
        GradeSummary {
            average: self.average,
            reported: self.reported,
            weighted_median: self.weighted_median,
            high: self.high,
            low: self.low,
            distribution: self.distribution,
        }
    }
}

/// Strip the cross-credit suffix from a faculty name
#[must_use]
pub fn base_faculty(faculty: &str) -> &str {
    faculty.strip_suffix(CROSS_CREDIT_SUFFIX).unwrap_or(faculty)
}

/// Shortened faculty name for filter labels
///
/// Drops the `Faculty of ` and `School of ` prefixes and applies a few fixed
/// renames for names that are still too long.
#[must_use]
pub fn short_faculty_label(faculty: &str) -> String {
    let short = faculty.replacen("Faculty of ", "", 1);
    match short.as_str() {
        "School of Architecture & Landscape Architecture" => "Architecture".to_string(),
        "Commerce and Business Administration" => "Commerce and Business".to_string(),
        "Faculty Graduate and Postdoctoral Studies" => "Postdoctoral Studies".to_string(),
        _ => short.replacen("School of ", "", 1),
    }
}

/// Year level of a course code: the first run of three digits, floored to
/// the hundred. Codes without three consecutive digits have no level.
#[must_use]
pub fn year_level(code: &str) -> Option<u16> {
    code.as_bytes()
        .windows(3)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .map(|w| {
            let number = w
                .iter()
                .fold(0u16, |acc, &d| acc * 10 + u16::from(d - b'0'));
            number / 100 * 100
        })
}
