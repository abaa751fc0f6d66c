//! Subject lookup command handler

use super::{open_service, remember_campus};
use grade_finder::config::Config;
use grade_finder::core::models::subject::suggest;
use grade_finder::core::models::{Campus, Context};

/// Print the subject whose code matches `query`.
///
/// # Errors
/// Returns a `✗` message when the subject dataset cannot be loaded.
pub async fn run(query: &str, campus: Option<Campus>, config: &mut Config) -> Result<(), String> {
    let campus = remember_campus(campus, config);
    let context = Context::new(campus, config.session());
    let service = open_service(config, &context)?;
    let subjects = service
        .load_subjects(campus)
        .await
        .map_err(|e| format!("✗ Failed to load subjects for {}: {e}", campus.name()))?;

    let hits = suggest(&subjects, query);
    if hits.is_empty() {
        println!("No subject matches '{}' at {}", query.trim(), campus.name());
        return Ok(());
    }
    for subject in hits {
        println!("{}: {}", subject.code, subject.title);
        if !subject.faculty.is_empty() {
            println!("  {}", subject.faculty);
        }
        println!("  Tip: gradefinder courses --search {}", subject.code);
    }
    Ok(())
}
