//! Read-only filter panel shown above a listing

use super::escape_html;
use crate::core::filter::{
    AverageBand, EnrollmentBand, FacultyOption, FilterSelection, Selection, CREDIT_OPTIONS,
    YEAR_LEVELS,
};
use std::fmt::Write;

fn checkbox(html: &mut String, label: &str, checked: bool) {
    let mark = if checked { " checked" } else { "" };
    let _ = writeln!(
        html,
        "    <label><input type=\"checkbox\" disabled{mark}> {label}</label>"
    );
}

fn group<T: Ord>(
    html: &mut String,
    title: &str,
    selection: &Selection<T>,
    options: impl IntoIterator<Item = (T, String)>,
) {
    let _ = writeln!(html, "  <fieldset class=\"filter-group\">");
    let _ = writeln!(html, "    <legend>{title}</legend>");
    checkbox(html, "Select all", selection.is_all());
    for (value, label) in options {
        checkbox(html, &label, selection.matches(&value));
    }
    let _ = writeln!(html, "  </fieldset>");
}

/// Result count, search text and every checkbox with its state.
///
/// `faculties` are the options of the collection being listed, with record
/// counts.
#[must_use]
pub fn filter_panel_html(
    selection: &FilterSelection,
    faculties: &[FacultyOption],
    shown: usize,
    total: usize,
    noun: &str,
) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"filter-panel\">");
    let _ = writeln!(
        html,
        "  <p class=\"result-count\">Showing {shown} of {total} {noun}</p>"
    );
    if !selection.search.trim().is_empty() {
        let _ = writeln!(
            html,
            "  <p class=\"search-term\">Search: {}</p>",
            escape_html(selection.search.trim())
        );
    }

    group(
        &mut html,
        "Faculty",
        &selection.faculties,
        faculties.iter().map(|f| {
            (
                f.value.clone(),
                format!("{} ({})", escape_html(&f.label), f.count),
            )
        }),
    );
    group(
        &mut html,
        "Year Level",
        &selection.year_levels,
        YEAR_LEVELS.into_iter().map(|level| (level, level.to_string())),
    );
    group(
        &mut html,
        "Average",
        &selection.averages,
        AverageBand::ALL
            .into_iter()
            .map(|band| (band, escape_html(band.label()))),
    );
    group(
        &mut html,
        "Enrollment",
        &selection.enrollments,
        EnrollmentBand::ALL
            .into_iter()
            .map(|band| (band, escape_html(band.label()))),
    );
    group(
        &mut html,
        "Credits",
        &selection.credits,
        CREDIT_OPTIONS
            .into_iter()
            .map(|(credits, label)| (credits, label.to_string())),
    );
    let _ = writeln!(html, "</div>");
    html
}
