//! Core module: domain models, dataset access and the
//! filter → sort → paginate → render pipeline

pub mod config;
pub mod data;
pub mod filter;
pub mod insights;
pub mod models;
pub mod render;
pub mod sort;
pub mod state;

/// Returns the current version of the `GradeFinder` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
