//! Prerequisite/credit record

use serde::{Deserialize, Serialize};

/// Prerequisite, corequisite and credit information for one course code.
///
/// Requisites arrive either as free text (`prer`/`crer`) or as a list of
/// codes (`preq`/`creq`); text wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqRecord {
    /// Course code (e.g., "CPSC 210")
    pub code: String,
    /// Calendar description
    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Credit value as published (e.g., "3" or "3-6")
    #[serde(
        rename = "cred",
        default,
        deserialize_with = "super::optional_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub credits: Option<String>,
    /// Prerequisite description
    #[serde(rename = "prer", default, skip_serializing_if = "Option::is_none")]
    pub prerequisite_text: Option<String>,
    /// Prerequisite codes
    #[serde(rename = "preq", default, skip_serializing_if = "Option::is_none")]
    pub prerequisite_codes: Option<Vec<String>>,
    /// Corequisite description
    #[serde(rename = "crer", default, skip_serializing_if = "Option::is_none")]
    pub corequisite_text: Option<String>,
    /// Corequisite codes
    #[serde(rename = "creq", default, skip_serializing_if = "Option::is_none")]
    pub corequisite_codes: Option<Vec<String>>,
    /// Courses that list this one as a requisite
    #[serde(rename = "depn", default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<Vec<String>>,
}

/// A requisite in whichever form the dataset provided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requisite<'a> {
    /// Free text that may mention course codes
    Text(&'a str),
    /// A list of course codes
    Codes(&'a [String]),
    /// Explicitly no requisites
    Nothing,
    /// The field is absent from the record
    Unknown,
}

impl PrereqRecord {
    /// Parsed credit count; `None` when absent or not numeric
    #[must_use]
    pub fn credit_count(&self) -> Option<u32> {
        self.credits.as_deref().and_then(super::leading_integer)
    }

    /// Prerequisites, preferring the text form
    #[must_use]
    pub fn prerequisites(&self) -> Requisite<'_> {
        pick_requisite(
            self.prerequisite_text.as_deref(),
            self.prerequisite_codes.as_deref(),
        )
    }

    /// Corequisites, preferring the text form
    #[must_use]
    pub fn corequisites(&self) -> Requisite<'_> {
        pick_requisite(
            self.corequisite_text.as_deref(),
            self.corequisite_codes.as_deref(),
        )
    }

    /// Dependent courses
    #[must_use]
    pub fn dependents(&self) -> Requisite<'_> {
        match self.dependents.as_deref() {
            None => Requisite::Unknown,
            Some([]) => Requisite::Nothing,
            Some(codes) => Requisite::Codes(codes),
        }
    }
}

fn pick_requisite<'a>(text: Option<&'a str>, codes: Option<&'a [String]>) -> Requisite<'a> {
    match (text, codes) {
        (Some(text), _) if !text.trim().is_empty() => Requisite::Text(text),
        (_, Some(codes)) if !codes.is_empty() => Requisite::Codes(codes),
        _ => Requisite::Nothing,
    }
}
