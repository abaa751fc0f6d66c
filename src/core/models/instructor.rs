//! Instructor model

use super::distribution::{GradeDistribution, GradeSummary};
use serde::{Deserialize, Serialize};

/// One course an instructor taught in a session, with that offering's grades
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    /// Course code (e.g., "CPSC 110")
    pub code: String,
    /// Course title
    #[serde(default)]
    pub title: String,
    /// Enrollment-weighted average across the instructor's sections
    #[serde(default)]
    pub average: f64,
    /// Enrollment-weighted median
    #[serde(default)]
    pub median: f64,
    /// Highest grade
    #[serde(default)]
    pub high: f64,
    /// Lowest grade
    #[serde(default)]
    pub low: f64,
    /// Number of students with a reported grade
    #[serde(default)]
    pub reported: u32,
    /// Enrollment-weighted 25th percentile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile25: Option<f64>,
    /// Enrollment-weighted 75th percentile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile75: Option<f64>,
    /// Grade histogram
    #[serde(flatten)]
    pub distribution: GradeDistribution,
}

impl Offering {
    /// Statistics for the grades view
    #[must_use]
    pub const fn grade_summary(&self) -> GradeSummary {
        GradeSummary {
            average: self.average,
            reported: self.reported,
            weighted_median: self.median,
            high: self.high,
            low: self.low,
            distribution: self.distribution,
        }
    }
}

/// An instructor with every offering they taught in one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    /// Display name
    pub name: String,
    /// Faculties the instructor taught under
    #[serde(default)]
    pub faculties: Vec<String>,
    /// Offerings taught this session
    #[serde(default)]
    pub courses: Vec<Offering>,
}

impl Instructor {
    /// Simple (unweighted) mean of the offerings with a positive average.
    ///
    /// Returns 0 when no offering has grades.
    #[must_use]
    pub fn overall_average(&self) -> f64 {
        let graded: Vec<f64> = self
            .courses
            .iter()
            .map(|c| c.average)
            .filter(|&avg| avg > 0.0)
            .collect();
        if graded.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let count = graded.len() as f64;
            graded.iter().sum::<f64>() / count
        }
    }

    /// Students taught across all offerings
    #[must_use]
    pub fn total_students(&self) -> u64 {
        self.courses.iter().map(|c| u64::from(c.reported)).sum()
    }

    /// Number of offerings
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// The offering of a given course code, if the instructor taught it
    #[must_use]
    pub fn offering(&self, code: &str) -> Option<&Offering> {
        self.courses.iter().find(|c| c.code == code)
    }
}

/// An instructor paired with their offering of one course
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseInstructor<'a> {
    /// Instructor name
    pub name: &'a str,
    /// The instructor's offering of the course
    pub offering: &'a Offering,
}

/// Everyone who taught `code`, in dataset order
#[must_use]
pub fn instructors_for_course<'a>(instructors: &'a [Instructor], code: &str) -> Vec<CourseInstructor<'a>> {
    instructors
        .iter()
        .filter_map(|i| {
            i.offering(code).map(|offering| CourseInstructor {
                name: &i.name,
                offering,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offering(code: &str, average: f64, reported: u32) -> Offering {
        Offering {
            code: code.to_string(),
            title: String::new(),
            average,
            median: average,
            high: 100.0,
            low: 0.0,
            reported,
            percentile25: None,
            percentile75: None,
            distribution: GradeDistribution::default(),
        }
    }

    #[test]
    fn test_overall_average_skips_ungraded() {
        let instructor = Instructor {
            name: "Grace Hopper".to_string(),
            faculties: vec!["Faculty of Science".to_string()],
            courses: vec![
                offering("CPSC 110", 80.0, 100),
                offering("CPSC 210", 70.0, 300),
                offering("CPSC 221", 0.0, 0),
            ],
        };
        assert!((instructor.overall_average() - 75.0).abs() < 1e-9);
        assert_eq!(instructor.total_students(), 400);
        assert_eq!(instructor.course_count(), 3);
        assert!(instructor.offering("CPSC 210").is_some());
        assert!(instructor.offering("CPSC 999").is_none());
    }

    #[test]
    fn test_instructors_for_course() {
        let instructors = vec![
            Instructor {
                name: "A".to_string(),
                faculties: Vec::new(),
                courses: vec![offering("CPSC 110", 80.0, 10)],
            },
            Instructor {
                name: "B".to_string(),
                faculties: Vec::new(),
                courses: vec![offering("CPSC 210", 70.0, 10)],
            },
        ];
        let taught = instructors_for_course(&instructors, "CPSC 110");
        assert_eq!(taught.len(), 1);
        assert_eq!(taught[0].name, "A");
    }

    #[test]
    fn test_overall_average_without_grades_is_zero() {
        let instructor = Instructor {
            name: "Nobody".to_string(),
            faculties: Vec::new(),
            courses: Vec::new(),
        };
        assert!(instructor.overall_average().abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_instructor() {
        let json = r#"{
            "name": "Alan Turing",
            "faculties": ["Faculty of Science"],
            "courses": [{
                "code": "CPSC 121", "title": "Models of Computation", "section": "101, 102",
                "average": 72.31, "median": 74.0, "high": 98, "low": 12, "reported": 250,
                "percentile25": 65.0, "percentile75": 82.0,
                "<50": 10, "90-100": 20
            }]
        }"#;
        let instructor: Instructor = serde_json::from_str(json).unwrap();
        let course = &instructor.courses[0];
        assert_eq!(course.reported, 250);
        assert_eq!(course.distribution.total(), 30);
        assert!((course.grade_summary().weighted_median - 74.0).abs() < f64::EPSILON);
    }
}
