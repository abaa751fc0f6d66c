//! Reset command handler

use grade_finder::config::Config;
use grade_finder::core::state::SessionState;
use std::path::Path;

/// Delete the saved filters and sort key.
///
/// # Errors
/// Returns a `✗` message when the state file exists but cannot be removed.
pub fn run(config: &Config) -> Result<(), String> {
    let path = Path::new(&config.paths.state_file);
    SessionState::clear(path).map_err(|e| format!("✗ Failed to clear {}: {e}", path.display()))?;
    println!("✓ Cleared saved filters");
    Ok(())
}
