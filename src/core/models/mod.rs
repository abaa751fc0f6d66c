//! Data models for `GradeFinder`

pub mod context;
pub mod course;
pub mod distribution;
pub mod instructor;
pub mod prereq;
pub mod program;
pub mod subject;

pub use context::{Campus, Context, DetailQuery, Session};
pub use course::Course;
pub use distribution::{GradeDistribution, GradeSummary};
pub use instructor::{instructors_for_course, CourseInstructor, Instructor, Offering};
pub use prereq::{PrereqRecord, Requisite};
pub use program::Program;
pub use subject::Subject;

use serde::{Deserialize, Deserializer};

/// Upstream datasets are not consistent about quoting numeric-looking fields
/// (`"cred": "3"` vs `"cred": 3`), so text fields accept either.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(raw: TextOrNumber) -> Self {
        match raw {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Int(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TextOrNumber>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

/// Parse the leading integer of a string (`"3"` → 3, `"3-6"` → 3, `"n/a"` → `None`).
#[must_use]
pub fn leading_integer(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("3"), Some(3));
        assert_eq!(leading_integer("3-6"), Some(3));
        assert_eq!(leading_integer(" 12 credits"), Some(12));
        assert_eq!(leading_integer("n/a"), None);
        assert_eq!(leading_integer(""), None);
    }
}
