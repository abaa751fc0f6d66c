//! Saved listing state across runs

use grade_finder::core::filter::{AverageBand, FilterSelection, Selection};
use grade_finder::core::sort::CourseSort;
use grade_finder::core::state::SessionState;
use std::fs;
use tempfile::TempDir;

fn sample() -> SessionState {
    SessionState {
        filters: FilterSelection {
            faculties: Selection::only(["Faculty of Arts".to_string()]),
            year_levels: Selection::only([300, 400]),
            averages: Selection::only([AverageBand::From85, AverageBand::From90]),
            credits: Selection::None,
            search: "phil".to_string(),
            ..FilterSelection::default()
        },
        sort: CourseSort::StudentsDesc,
    }
}

#[test]
fn test_save_then_load_restores_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("session.json");

    sample().save(&path).expect("Failed to save state");
    let restored = SessionState::load(&path).expect("state should load");

    assert_eq!(restored, sample());
    assert!(restored.filters.enrollments.is_all());
}

#[test]
fn test_missing_and_corrupt_files_load_as_none() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    assert!(SessionState::load(&path).is_none());

    fs::write(&path, "{ not json").unwrap();
    assert!(SessionState::load(&path).is_none());
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, r#"{"sort": "average"}"#).unwrap();

    let state = SessionState::load(&path).unwrap();
    assert_eq!(state.sort, CourseSort::AverageDesc);
    assert_eq!(state.filters, FilterSelection::default());
}

#[test]
fn test_clear_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    sample().save(&path).unwrap();

    SessionState::clear(&path).unwrap();
    assert!(!path.exists());
    SessionState::clear(&path).unwrap();
}
