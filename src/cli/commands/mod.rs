//! CLI command handlers for `GradeFinder`.
//!
//! Each command is implemented in its own submodule. Handlers report
//! failures on stderr with a `✗` prefix and never panic.

pub mod config;
pub mod course;
pub mod courses;
pub mod insights;
pub mod professors;
pub mod programs;
pub mod reset;
pub mod subjects;

use crate::args::ContextArgs;
use grade_finder::config::Config;
use grade_finder::core::data::{AnySource, DataLayout, DataService, DatasetSource, LoadError};
use grade_finder::core::models::{Campus, Context};
use grade_finder::core::render::table::{page_file_name, render_table, PageSize, Paginator, TableRow};
use grade_finder::core::render::{render_page, write_page, PageKind};
use grade_finder::{info, verbose};
use std::path::PathBuf;

/// Resolve the campus and session of a run.
///
/// An explicit campus becomes the stored preference.
pub fn resolve_context(args: &ContextArgs, config: &mut Config) -> Context {
    let campus = remember_campus(args.campus, config);
    let session = args.session.clone().unwrap_or_else(|| config.session());
    Context::new(campus, session)
}

/// The campus to use, saving an explicitly chosen one as the preference.
///
/// Only the campus is written back; the stored file is reloaded so that
/// per-run overrides in `config` stay out of it.
pub fn remember_campus(campus: Option<Campus>, config: &mut Config) -> Campus {
    let Some(campus) = campus else {
        return config.campus();
    };
    if campus != config.campus() {
        let mut stored = Config::load();
        let saved = config
            .set("campus", campus.token())
            .and_then(|()| stored.set("campus", campus.token()))
            .and_then(|()| stored.save().map_err(|e| e.to_string()));
        if let Err(e) = saved {
            grade_finder::warn!("Could not remember campus preference: {e}");
        } else {
            info!("Campus preference set to {}", campus.name());
        }
    }
    campus
}

/// Data service for the configured dataset root
pub fn open_service(config: &Config, context: &Context) -> Result<DataService<AnySource>, String> {
    let source = AnySource::from_config(config)
        .map_err(|e| format!("✗ Cannot use dataset root '{}': {e}", config.data.root))?;
    let service = DataService::new(source, DataLayout::from_config(config), context.clone());
    verbose!("Reading datasets from {}", service.source().location());
    Ok(service)
}

/// User-facing message for a failed load
pub fn load_failed(what: &str, context: &Context, error: &LoadError) -> String {
    let message = format!(
        "✗ Failed to load {what} for {} {}: {error}",
        context.campus.name(),
        context.session
    );
    if error.is_not_found() {
        format!(
            "{message}\n  No {what} dataset for this session; \
             check --session or `gradefinder config get data_root`"
        )
    } else {
        message
    }
}

/// Directory generated pages go to
pub fn site_dir(config: &Config) -> PathBuf {
    PathBuf::from(&config.paths.site_dir)
}

/// Everything needed to write a paginated listing
pub struct Listing<'a> {
    /// Which listing
    pub kind: PageKind,
    /// Page title
    pub title: &'a str,
    /// Markup placed above the table
    pub preamble: String,
    /// Rows per page
    pub page_size: PageSize,
}

impl Listing<'_> {
    /// Render and write every page of `records`; returns how many files
    /// were written.
    pub fn write<T: TableRow>(
        &self,
        records: &[&T],
        context: &Context,
        config: &Config,
    ) -> Result<usize, String> {
        let dir = site_dir(config);
        let mut paginator = Paginator::new(self.page_size);
        let pages = paginator.total_pages(records.len()).max(1);

        for page in 1..=pages {
            paginator.go_to(page, records.len());
            let mut body = self.preamble.clone();
            body.push_str(&render_table(records, &paginator, context, |p| {
                page_file_name(self.kind, p)
            }));
            let html = render_page(self.kind, self.title, context, config.theme(), &body)
                .map_err(|e| format!("✗ Failed to render {}: {e}", self.title))?;
            let file = page_file_name(self.kind, page);
            write_page(&dir, &file, &html)
                .map_err(|e| format!("✗ Failed to write {}: {e}", dir.join(&file).display()))?;
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context::new(Campus::Main, "2019S".parse().unwrap())
    }

    #[test]
    fn test_load_failed_hints_on_missing_dataset() {
        let missing = LoadError::Missing {
            path: "course-data/post-processed/UBCV/2019S.json".to_string(),
        };
        let message = load_failed("courses", &context(), &missing);
        assert!(message.starts_with("✗ Failed to load courses for"));
        assert!(message.contains("No courses dataset for this session"));

        let other = load_failed("courses", &context(), &LoadError::Superseded);
        assert!(!other.contains("No courses dataset"));
    }
}
