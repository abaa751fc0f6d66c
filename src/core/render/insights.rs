//! Insights page: summary cards and the per-faculty table

use super::{escape_html, group_thousands, AverageTier};
use crate::core::insights::{FacultyStats, Insights};
use crate::core::models::Context;
use crate::core::sort::FacultySort;
use std::fmt::Write;

/// An average as colored two-decimal percentage
fn colored_average(average: f64) -> String {
    format!(
        "<span class=\"monospace\" style=\"color: {};\">{average:.2}%</span>",
        AverageTier::of(average).color()
    )
}

fn stat_card(html: &mut String, title: &str, subtitle: &str, value: &str) {
    let _ = writeln!(html, "  <div class=\"stat-card\">");
    let _ = writeln!(html, "    <h3>{title}</h3>");
    let _ = writeln!(html, "    <p class=\"stat-value\">{value}</p>");
    let _ = writeln!(html, "    <p class=\"stat-subtitle\">{subtitle}</p>");
    let _ = writeln!(html, "  </div>");
}

/// The six summary cards
#[must_use]
pub fn stat_cards_html(insights: &Insights, context: &Context) -> String {
    const NONE: &str = "N/A";
    let campus = context.campus.name();
    let session = &context.session;
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"stats-grid\">");

    for (title, extremum) in [
        ("Highest Average Course", &insights.highest_average),
        ("Lowest Average Course", &insights.lowest_average),
    ] {
        match extremum {
            Some(e) => stat_card(&mut html, title, &escape_html(&e.title()), &colored_average(e.value)),
            None => stat_card(&mut html, title, NONE, NONE),
        }
    }
    match &insights.most_enrolled {
        Some(e) => stat_card(
            &mut html,
            "Most Enrolled Course",
            &escape_html(&e.title()),
            &format!("{} Students", e.value),
        ),
        None => stat_card(&mut html, "Most Enrolled Course", NONE, NONE),
    }
    stat_card(
        &mut html,
        "Overall Average",
        &format!("Average of every {campus} course during {session}"),
        &insights
            .overall_average
            .map_or_else(|| NONE.to_string(), colored_average),
    );
    stat_card(
        &mut html,
        "Total Courses",
        &format!("Total number of courses offered at {campus} during {session}"),
        &insights.total_courses.to_string(),
    );
    stat_card(
        &mut html,
        "Total Enrollments",
        &format!("Total course enrollments by {campus} students during {session}"),
        &group_thousands(insights.total_students),
    );

    let _ = writeln!(html, "</div>");
    html
}

/// Faculty table in the requested order
#[must_use]
pub fn faculty_table_html(faculties: &[FacultyStats], sort: FacultySort) -> String {
    let mut rows = faculties.to_vec();
    sort.sort(&mut rows);

    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"insights-section\">");
    let _ = writeln!(html, "<h3>Faculty Statistics</h3>");
    let _ = writeln!(html, "<p class=\"sort-container\">{}</p>", sort.label());
    let _ = writeln!(html, "<table class=\"insights-table\">");
    let _ = writeln!(
        html,
        "<thead><tr><th>Faculty</th><th>Courses</th><th>Course Enrollments</th><th>Average</th></tr></thead>"
    );
    let _ = writeln!(html, "<tbody>");
    for stats in &rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&stats.faculty),
            stats.courses,
            group_thousands(stats.students),
            colored_average(stats.average)
        );
    }
    let _ = writeln!(html, "</tbody>");
    let _ = writeln!(html, "</table>");
    let _ = writeln!(html, "</div>");
    html
}

/// Full insights page body
#[must_use]
pub fn insights_html(insights: &Insights, context: &Context, sort: FacultySort) -> String {
    let mut html = stat_cards_html(insights, context);
    html.push_str(&faculty_table_html(&insights.faculties, sort));
    html
}
