//! Courses command handler

use super::{load_failed, open_service, resolve_context, site_dir, Listing};
use crate::args::{ContextArgs, FilterArgs};
use grade_finder::config::Config;
use grade_finder::core::filter::course_faculty_options;
use grade_finder::core::models::subject::suggest;
use grade_finder::core::render::filters::filter_panel_html;
use grade_finder::core::render::table::PageSize;
use grade_finder::core::render::{escape_html, PageKind};
use grade_finder::core::sort::CourseSort;
use grade_finder::core::state::SessionState;
use grade_finder::{info, verbose, warn};
use std::fmt::Write;
use std::path::PathBuf;

/// Options of one `courses` run
pub struct CoursesRequest {
    /// Campus and session
    pub context: ContextArgs,
    /// Filter flags
    pub filters: FilterArgs,
    /// Explicit sort key
    pub sort: Option<CourseSort>,
    /// Rows per page
    pub page_size: PageSize,
    /// Start from the saved state
    pub resume: bool,
}

/// Merge the command-line flags over `saved`
fn starting_state(request: &CoursesRequest, saved: SessionState) -> SessionState {
    SessionState {
        filters: request.filters.apply_to(saved.filters),
        sort: request.sort.unwrap_or(saved.sort),
    }
}

/// Filter, sort and write the course listing.
///
/// With `resume`, the saved filters and sort key are the starting point;
/// each filter dimension given on the command line replaces the saved one
/// and `--sort` replaces the saved key. The selection used is saved for the
/// next run.
///
/// # Errors
/// Returns a `✗` message when the datasets cannot be loaded or the pages
/// cannot be written.
pub async fn run(request: CoursesRequest, config: &mut Config) -> Result<(), String> {
    let context = resolve_context(&request.context, config);
    let state_file = PathBuf::from(&config.paths.state_file);

    let saved = if request.resume {
        SessionState::load(&state_file).unwrap_or_else(|| {
            info!("No saved filters at {}", state_file.display());
            SessionState::default()
        })
    } else {
        SessionState::default()
    };
    let state = starting_state(&request, saved);

    let service = open_service(config, &context)?;
    let courses = service
        .load_courses(&context)
        .await
        .map_err(|e| load_failed("courses", &context, &e))?;

    let mut matched = state.filters.filter_courses(&courses);
    state.sort.sort(&mut matched);
    info!(
        "{} of {} courses match in {context} (sorted by {})",
        matched.len(),
        courses.len(),
        state.sort
    );

    let mut preamble = String::new();
    if !state.filters.search.trim().is_empty() {
        match service.load_subjects(context.campus).await {
            Ok(subjects) => {
                for subject in suggest(&subjects, &state.filters.search) {
                    println!("  Subject {}: {} ({})", subject.code, subject.title, subject.faculty);
                    let _ = writeln!(
                        preamble,
                        "<p class=\"subject-suggestion\">{}: {}</p>",
                        escape_html(&subject.code),
                        escape_html(&subject.title)
                    );
                }
            }
            Err(e) => warn!("Subject suggestions unavailable: {e}"),
        }
    }
    preamble.push_str(&filter_panel_html(
        &state.filters,
        &course_faculty_options(&courses),
        matched.len(),
        courses.len(),
        "courses",
    ));

    let listing = Listing {
        kind: PageKind::Courses,
        title: "Courses",
        preamble,
        page_size: request.page_size,
    };
    let pages = listing.write(&matched, &context, config)?;

    for course in matched.iter().take(10) {
        verbose!("  {:<10} {:>6.2}  {:>5}  {}", course.code, course.average, course.reported, course.name);
    }

    if let Err(e) = state.save(&state_file) {
        warn!("Could not save filters to {}: {e}", state_file.display());
    }

    println!(
        "✓ {} of {} courses match; wrote {pages} page(s) to {}",
        matched.len(),
        courses.len(),
        site_dir(config).display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grade_finder::core::filter::{AverageBand, FilterSelection, Selection};
    use std::fs;
    use tempfile::TempDir;

    fn request(filters: FilterArgs, resume: bool) -> CoursesRequest {
        CoursesRequest {
            context: ContextArgs::default(),
            filters,
            sort: None,
            page_size: PageSize::default(),
            resume,
        }
    }

    fn arts_state() -> SessionState {
        SessionState {
            filters: FilterSelection {
                faculties: Selection::only(["Faculty of Arts".to_string()]),
                averages: Selection::only([AverageBand::From80]),
                search: "hist".to_string(),
                ..FilterSelection::default()
            },
            sort: CourseSort::AverageDesc,
        }
    }

    #[test]
    fn test_resume_keeps_dimensions_not_given() {
        let flags = FilterArgs {
            years: vec![100],
            ..FilterArgs::default()
        };
        let state = starting_state(&request(flags, true), arts_state());
        assert_eq!(state.filters.faculties, arts_state().filters.faculties);
        assert_eq!(state.filters.averages, arts_state().filters.averages);
        assert_eq!(state.filters.year_levels, Selection::only([100u16]));
        assert_eq!(state.filters.search, "hist");
        assert_eq!(state.sort, CourseSort::AverageDesc);
    }

    #[test]
    fn test_without_flags_saved_state_is_used_unchanged() {
        let state = starting_state(&request(FilterArgs::default(), true), arts_state());
        assert_eq!(state, arts_state());
    }

    #[tokio::test]
    async fn test_resume_run_saves_merged_filters() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let courses_file = data.join("course-data/post-processed/UBCV/2023W.json");
        let prereqs_file = data.join("course-data/subjects-prereqs/course-prereqs.json");
        fs::create_dir_all(courses_file.parent().unwrap()).unwrap();
        fs::create_dir_all(prereqs_file.parent().unwrap()).unwrap();
        fs::write(
            &courses_file,
            r#"[{"Code": "BIOL 112", "Name": "Biology of the Cell", "Subject": "Biology",
                 "Faculty": "Faculty of Science", "Average": 72.0, "Reported": 900}]"#,
        )
        .unwrap();
        fs::write(&prereqs_file, "[]").unwrap();

        let mut config = Config::from_defaults();
        config.data.root = data.to_string_lossy().to_string();
        config.data.main_campus_dir = "UBCV".to_string();
        config.preferences.session = "2023W".to_string();
        config.paths.site_dir = dir.path().join("site").to_string_lossy().to_string();
        config.paths.state_file = dir.path().join("state.json").to_string_lossy().to_string();
        let state_file = PathBuf::from(&config.paths.state_file);
        arts_state().save(&state_file).unwrap();

        let flags = FilterArgs {
            years: vec![100],
            ..FilterArgs::default()
        };
        run(request(flags, true), &mut config).await.unwrap();

        let saved = SessionState::load(&state_file).unwrap();
        assert_eq!(saved.filters.faculties, arts_state().filters.faculties);
        assert_eq!(saved.filters.year_levels, Selection::only([100u16]));
        assert!(dir.path().join("site/index.html").exists());
    }
}
