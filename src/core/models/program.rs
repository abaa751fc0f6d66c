//! Program model

use serde::{Deserialize, Serialize};

/// A degree program listing. Programs have no relationship to courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Program name
    pub name: String,
    /// Owning faculty
    #[serde(default)]
    pub faculty: String,
    /// Program length as published (e.g., "4 years")
    #[serde(default, deserialize_with = "super::text_or_number")]
    pub length: String,
    /// Program home page
    #[serde(rename = "program link", default)]
    pub program_link: String,
    /// Degree requirements page
    #[serde(rename = "requirements link", default)]
    pub requirements_link: String,
}
