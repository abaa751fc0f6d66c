//! Insights command handler

use super::{load_failed, open_service, resolve_context, site_dir};
use crate::args::ContextArgs;
use grade_finder::config::Config;
use grade_finder::core::insights::calculate;
use grade_finder::core::render::insights::insights_html;
use grade_finder::core::render::{render_page, write_page, PageKind};
use grade_finder::core::sort::FacultySort;
use grade_finder::verbose;

/// Compute summary statistics for a campus and session and write
/// `data.html`.
///
/// # Errors
/// Returns a `✗` message when the course dataset cannot be loaded or the
/// page cannot be written.
pub async fn run(context: &ContextArgs, faculty_sort: FacultySort, config: &mut Config) -> Result<(), String> {
    let context = resolve_context(context, config);
    let service = open_service(config, &context)?;
    let courses = service
        .load_courses(&context)
        .await
        .map_err(|e| load_failed("courses", &context, &e))?;

    let insights = calculate(courses.iter());
    for faculty in &insights.faculties {
        verbose!(
            "  {:<40} {:>4} courses {:>7} students {:>6.2}",
            faculty.faculty,
            faculty.courses,
            faculty.students,
            faculty.average
        );
    }

    let body = insights_html(&insights, &context, faculty_sort);
    let kind = PageKind::Insights;
    let html = render_page(kind, kind.label(), &context, config.theme(), &body)
        .map_err(|e| format!("✗ Failed to render insights: {e}"))?;
    let path = write_page(&site_dir(config), kind.file_name(), &html)
        .map_err(|e| format!("✗ Failed to write {}: {e}", kind.file_name()))?;

    match insights.overall_average {
        Some(average) => println!(
            "✓ {} courses, {} students, overall average {average:.2}%",
            insights.total_courses, insights.total_students
        ),
        None => println!("✓ No graded courses in {} {}", context.campus.name(), context.session),
    }
    println!("  Written to {}", path.display());
    Ok(())
}
