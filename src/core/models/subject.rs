//! Subject model and search suggestions

use serde::{Deserialize, Serialize};

/// A subject code with its title and owning faculty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject code (e.g., "CPSC")
    pub code: String,
    /// Subject title (e.g., "Computer Science")
    #[serde(default)]
    pub title: String,
    /// Faculty or school offering the subject
    #[serde(rename = "faculty_school", default)]
    pub faculty: String,
}

/// Subjects whose code equals the search input (case-insensitive).
///
/// Only exact matches are suggested ("view only CPSC courses"); prefix
/// matches are too noisy to be useful.
#[must_use]
pub fn suggest<'a>(subjects: &'a [Subject], input: &str) -> Vec<&'a Subject> {
    let wanted = input.trim().to_ascii_uppercase();
    if wanted.is_empty() {
        return Vec::new();
    }
    subjects
        .iter()
        .filter(|s| s.code.to_ascii_uppercase() == wanted)
        .collect()
}
