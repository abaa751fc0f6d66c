//! Programs command handler

use super::{open_service, remember_campus, Listing};
use grade_finder::config::Config;
use grade_finder::core::filter::{faculty_options, FilterSelection, Selection};
use grade_finder::core::models::{Campus, Context};
use grade_finder::core::render::filters::filter_panel_html;
use grade_finder::core::render::table::PageSize;
use grade_finder::core::render::PageKind;
use grade_finder::info;

/// Options of one `programs` run
pub struct ProgramsRequest {
    /// Campus flag
    pub campus: Option<Campus>,
    /// Name search
    pub search: Option<String>,
    /// Faculty checkboxes
    pub faculties: Vec<String>,
    /// Rows per page
    pub page_size: PageSize,
}

/// Filter and write the program listing of a campus.
///
/// Programs are not session-scoped; the configured session only labels the
/// page.
///
/// # Errors
/// Returns a `✗` message when the program dataset cannot be loaded or the
/// pages cannot be written.
pub async fn run(request: ProgramsRequest, config: &mut Config) -> Result<(), String> {
    let campus = remember_campus(request.campus, config);
    let context = Context::new(campus, config.session());
    let service = open_service(config, &context)?;
    let programs = service.load_programs(campus).await.map_err(|e| {
        format!("✗ Failed to load programs for {}: {e}", campus.name())
    })?;

    let selection = FilterSelection {
        faculties: if request.faculties.is_empty() {
            Selection::All
        } else {
            Selection::only(request.faculties)
        },
        search: request.search.unwrap_or_default(),
        ..FilterSelection::default()
    };
    let matched = selection.filter_programs(&programs);
    info!("{} of {} programs match at {}", matched.len(), programs.len(), campus.name());

    let listing = Listing {
        kind: PageKind::Programs,
        title: "Programs",
        preamble: filter_panel_html(
            &selection,
            &faculty_options(programs.iter().map(|p| p.faculty.as_str())),
            matched.len(),
            programs.len(),
            "programs",
        ),
        page_size: request.page_size,
    };
    let pages = listing.write(&matched, &context, config)?;

    println!(
        "✓ {} of {} programs match; wrote {pages} page(s)",
        matched.len(),
        programs.len()
    );
    Ok(())
}
