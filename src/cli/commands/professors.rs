//! Professors command handler

use super::{load_failed, open_service, resolve_context, Listing};
use crate::args::{ContextArgs, InstructorFilterArgs};
use grade_finder::config::Config;
use grade_finder::core::filter::instructor_faculty_options;
use grade_finder::core::render::filters::filter_panel_html;
use grade_finder::core::render::table::PageSize;
use grade_finder::core::render::PageKind;
use grade_finder::core::sort::InstructorSort;
use grade_finder::{info, verbose};

/// Options of one `professors` run
pub struct ProfessorsRequest {
    /// Campus and session
    pub context: ContextArgs,
    /// Search, faculty, year-level and average flags
    pub filters: InstructorFilterArgs,
    /// Sort key
    pub sort: InstructorSort,
    /// Rows per page
    pub page_size: PageSize,
}

/// Filter, sort and write the instructor listing.
///
/// # Errors
/// Returns a `✗` message when the instructor dataset cannot be loaded or
/// the pages cannot be written.
pub async fn run(request: ProfessorsRequest, config: &mut Config) -> Result<(), String> {
    let context = resolve_context(&request.context, config);
    let service = open_service(config, &context)?;
    let instructors = service
        .load_instructors(&context)
        .await
        .map_err(|e| load_failed("instructors", &context, &e))?;

    let selection = request.filters.to_selection();
    let mut matched = selection.filter_instructors(&instructors);
    request.sort.sort(&mut matched);
    info!("{} of {} instructors match in {context}", matched.len(), instructors.len());

    let listing = Listing {
        kind: PageKind::Professors,
        title: "Professors",
        preamble: filter_panel_html(
            &selection,
            &instructor_faculty_options(&instructors),
            matched.len(),
            instructors.len(),
            "instructors",
        ),
        page_size: request.page_size,
    };
    let pages = listing.write(&matched, &context, config)?;

    for instructor in matched.iter().take(10) {
        verbose!(
            "  {:<30} {:>3} courses {:>6.2}",
            instructor.name,
            instructor.course_count(),
            instructor.overall_average()
        );
    }
    println!(
        "✓ {} of {} instructors match; wrote {pages} page(s)",
        matched.len(),
        instructors.len()
    );
    Ok(())
}
