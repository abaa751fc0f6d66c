//! Shared library for `GradeFinder`
//! Dataset access, filtering, aggregation and HTML rendering used by the CLI

pub mod core;
pub mod logger;

pub use self::core::config;
pub use self::core::get_version;
