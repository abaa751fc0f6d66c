//! Dataset access: where the JSON files live, how they are fetched, and the
//! memoizing service that merges them into records.

pub mod error;
pub mod service;
pub mod source;

pub use error::LoadError;
pub use service::{DataService, DatasetKey};
pub use source::{AnySource, DataLayout, DatasetSource, FsSource, HttpSource};
