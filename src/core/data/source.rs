//! Dataset sources and the conventional dataset layout

use super::error::LoadError;
use crate::config::Config;
use crate::core::models::{Campus, Context};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

const USER_AGENT: &str = concat!("gradefinder/", env!("CARGO_PKG_VERSION"));

/// Something that can hand out the raw bytes of a dataset by relative path
pub trait DatasetSource: Send + Sync {
    /// Fetch the dataset at `path` (relative to the data root)
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

/// Relative dataset paths for each kind of record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    main_dir: String,
    satellite_dir: String,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new("UBCV", "UBCO")
    }
}

impl DataLayout {
    /// Layout with the given per-campus directory names
    #[must_use]
    pub fn new(main_dir: &str, satellite_dir: &str) -> Self {
        Self {
            main_dir: main_dir.to_string(),
            satellite_dir: satellite_dir.to_string(),
        }
    }

    /// Layout from the `[data]` config section
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        let pick = |value: &str, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            main_dir: pick(&config.data.main_campus_dir, &defaults.main_dir),
            satellite_dir: pick(&config.data.satellite_campus_dir, &defaults.satellite_dir),
        }
    }

    /// Directory name of a campus
    #[must_use]
    pub fn campus_dir(&self, campus: Campus) -> &str {
        match campus {
            Campus::Main => &self.main_dir,
            Campus::Satellite => &self.satellite_dir,
        }
    }

    /// Course grades for one campus and session
    #[must_use]
    pub fn courses(&self, context: &Context) -> String {
        format!(
            "course-data/post-processed/{}/{}.json",
            self.campus_dir(context.campus),
            context.session
        )
    }

    /// Prerequisite and credit records (shared by both campuses)
    #[must_use]
    pub fn prerequisites(&self) -> String {
        "course-data/subjects-prereqs/course-prereqs.json".to_string()
    }

    /// Subject codes of a campus
    #[must_use]
    pub fn subjects(&self, campus: Campus) -> String {
        format!(
            "course-data/subjects-prereqs/{}-subjects.json",
            self.campus_dir(campus)
        )
    }

    /// Instructor records for one campus and session
    #[must_use]
    pub fn instructors(&self, context: &Context) -> String {
        format!(
            "instructor-data/{}/{}.json",
            self.campus_dir(context.campus),
            context.session
        )
    }

    /// Program listings of a campus
    #[must_use]
    pub fn programs(&self, campus: Campus) -> String {
        format!("program-data/{}.json", self.campus_dir(campus))
    }
}

/// Datasets served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a client rooted at `base_url`
    ///
    /// A `timeout_secs` of 0 disables the request timeout.
    ///
    /// # Errors
    /// Returns [`LoadError::Client`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, LoadError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| LoadError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl DatasetSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.url_for(path);
        crate::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| LoadError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Http {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| LoadError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(body.to_vec())
    }

    fn location(&self) -> String {
        self.base_url.clone()
    }
}

/// Datasets read from a local directory tree
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Source rooted at a directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let full = self.root.join(path);
        crate::debug!("Reading {}", full.display());

        tokio::fs::read(&full).await.map_err(|e| {
            let path = full.display().to_string();
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::Missing { path }
            } else {
                LoadError::Io {
                    path,
                    message: e.to_string(),
                }
            }
        })
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Either source, chosen from the configured data root
#[derive(Debug, Clone)]
pub enum AnySource {
    /// `http://` or `https://` root
    Http(HttpSource),
    /// Any other root is a directory
    Fs(FsSource),
}

impl AnySource {
    /// Pick the source kind from the root's scheme
    ///
    /// # Errors
    /// Returns [`LoadError::Client`] if an HTTP client cannot be built.
    pub fn from_root(root: &str, timeout_secs: u64) -> Result<Self, LoadError> {
        if root.starts_with("http://") || root.starts_with("https://") {
            HttpSource::new(root, timeout_secs).map(Self::Http)
        } else {
            Ok(Self::Fs(FsSource::new(root)))
        }
    }

    /// Source for the `[data]` config section
    ///
    /// # Errors
    /// Same as [`from_root`](Self::from_root).
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        Self::from_root(&config.data.root, config.data.timeout_secs)
    }
}

impl DatasetSource for AnySource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        match self {
            Self::Http(source) => source.fetch(path).await,
            Self::Fs(source) => source.fetch(path).await,
        }
    }

    fn location(&self) -> String {
        match self {
            Self::Http(source) => source.location(),
            Self::Fs(source) => source.location(),
        }
    }
}
