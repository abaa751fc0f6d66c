//! Course detail command handler

use super::{load_failed, open_service, remember_campus, site_dir};
use crate::args::ContextArgs;
use grade_finder::config::Config;
use grade_finder::core::data::{AnySource, DataService};
use grade_finder::core::models::{instructors_for_course, Context, Course, DetailQuery};
use grade_finder::core::render::detail::{not_found_html, CourseHeader, CoursePage};
use grade_finder::core::render::{render_page, write_page, PageKind};
use grade_finder::core::sort::OfferingSort;
use grade_finder::{info, verbose, warn};
use std::sync::Arc;

/// Options of one `course` run
pub struct CourseRequest {
    /// Course code given on the command line
    pub code: Option<String>,
    /// Deep link query string
    pub link: Option<String>,
    /// Campus and session flags
    pub context: ContextArgs,
    /// Instructor to focus the grades view on
    pub instructor: Option<String>,
    /// Instructor table order
    pub sort: OfferingSort,
}

/// Course codes are stored upper-case with a single space (`CPSC 110`)
fn normalize_code(code: &str) -> String {
    code.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Code and context a request resolves to.
///
/// A deep link carries its own campus and optional session; otherwise the
/// flags and configured defaults apply.
fn resolve(request: &CourseRequest, config: &mut Config) -> Result<(String, Context), String> {
    if let Some(link) = &request.link {
        let query = DetailQuery::parse(link).map_err(|e| format!("✗ Invalid course link: {e}"))?;
        let context = query.context(&config.session());
        return Ok((normalize_code(&query.code), context));
    }
    let code = request
        .code
        .as_deref()
        .ok_or("✗ A course code or --link is required")?;
    let campus = remember_campus(request.context.campus, config);
    let session = request
        .context
        .session
        .clone()
        .unwrap_or_else(|| config.session());
    Ok((normalize_code(code), Context::new(campus, session)))
}

/// Header data for a course missing from the viewed session: the record
/// from the configured session if it has one.
async fn fallback_courses(
    service: &DataService<AnySource>,
    context: &Context,
    config: &Config,
) -> Option<Arc<Vec<Course>>> {
    let default = context.with_session(config.session());
    if default == *context {
        return None;
    }
    service.load_courses(&default).await.ok()
}

/// Render the detail page of one course and write `course-details.html`.
///
/// A course that was not offered in the session still gets its header,
/// requisites and an empty professors view. If the session's course dataset
/// cannot be loaded at all, the not-found page is written instead.
///
/// # Errors
/// Returns a `✗` message for an invalid link or when the page cannot be
/// written.
pub async fn run(request: CourseRequest, config: &mut Config) -> Result<(), String> {
    let (code, context) = resolve(&request, config)?;
    let service = open_service(config, &context)?;
    let file_name = PageKind::Course.file_name();

    let courses = match service.load_courses(&context).await {
        Ok(courses) => courses,
        Err(e) => {
            eprintln!("{}", load_failed("courses", &context, &e));
            let html = render_page(PageKind::Course, "Course Not Found", &context, config.theme(), &not_found_html())
                .map_err(|e| format!("✗ Failed to render {code}: {e}"))?;
            let path = write_page(&site_dir(config), file_name, &html)
                .map_err(|e| format!("✗ Failed to write {file_name}: {e}"))?;
            println!("✗ {code}: data not available; wrote {}", path.display());
            return Ok(());
        }
    };
    let course = courses.iter().find(|c| c.code == code);

    let prereq = service.prerequisite_for(&code).await.unwrap_or_else(|e| {
        warn!("Prerequisites unavailable for {code}: {e}");
        None
    });

    let instructors = service.load_instructors(&context).await;
    let taught = match &instructors {
        Ok(instructors) => {
            let mut taught = instructors_for_course(instructors, &code);
            request.sort.sort(&mut taught);
            Some(taught)
        }
        Err(e) => {
            warn!("{}", load_failed("instructors", &context, e));
            None
        }
    };

    let fallback = if course.is_none() {
        info!("{code} was not offered in {}", context.session);
        fallback_courses(&service, &context, config).await
    } else {
        None
    };
    let header = course
        .or_else(|| fallback.as_ref().and_then(|all| all.iter().find(|c| c.code == code)))
        .map_or_else(|| CourseHeader::bare(&code), CourseHeader::of);

    if let Some(taught) = &taught {
        verbose!("{} instructor(s) taught {code} in {}", taught.len(), context.session);
    }

    let page = CoursePage {
        context: &context,
        header,
        course,
        prereq: prereq.as_ref(),
        taught,
        sort: request.sort,
        focus: request.instructor.as_deref(),
    };
    let title = match course {
        Some(course) if !course.name.is_empty() => format!("{code}: {}", course.name),
        _ => code.clone(),
    };
    let html = render_page(PageKind::Course, &title, &context, config.theme(), &page.render())
        .map_err(|e| format!("✗ Failed to render {code}: {e}"))?;
    let path = write_page(&site_dir(config), file_name, &html)
        .map_err(|e| format!("✗ Failed to write {file_name}: {e}"))?;

    println!("✓ {code} ({}) written to {}", context.session, path.display());
    Ok(())
}
