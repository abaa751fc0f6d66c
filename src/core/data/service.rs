//! Memoizing dataset service
//!
//! Every loader follows the same pattern: return the cached result for the
//! key if there is one, otherwise fetch, parse, cache and return. Failures
//! are cached as well; [`DataService::clear_cache`] is the only way to retry.
//!
//! A generation counter guards against stale writes. Each load remembers the
//! generation it started under; [`DataService::clear_cache`] and
//! [`DataService::set_context`] bump it, and a load that finishes under a
//! newer generation returns [`LoadError::Superseded`] without touching the
//! cache.

use super::error::LoadError;
use super::source::{DataLayout, DatasetSource};
use crate::core::models::{Campus, Context, Course, Instructor, PrereqRecord, Program, Subject};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cache key of campus- and session-scoped datasets
pub type DatasetKey = Context;

/// Shared result of a load
pub type Loaded<T> = Result<Arc<Vec<T>>, LoadError>;

/// One memo table. The lock is only held for map access, never across an
/// await.
struct Memo<K, V> {
    entries: Mutex<HashMap<K, Loaded<V>>>,
}

impl<K: Eq + Hash, V> Memo<K, V> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Loaded<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self, key: &K) -> Option<Loaded<V>> {
        self.lock().get(key).cloned()
    }

    /// Insert while `current()` holds, checked under the same lock that
    /// `clear` takes
    fn insert_if(&self, key: K, value: Loaded<V>, current: impl FnOnce() -> bool) -> bool {
        let mut entries = self.lock();
        if !current() {
            return false;
        }
        entries.insert(key, value);
        true
    }

    fn clear(&self) {
        self.lock().clear();
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Fetches, merges and memoizes datasets for the active [`Context`]
pub struct DataService<S> {
    source: S,
    layout: DataLayout,
    context: Mutex<Context>,
    generation: AtomicU64,
    courses: Memo<DatasetKey, Course>,
    instructors: Memo<DatasetKey, Instructor>,
    programs: Memo<Campus, Program>,
    subjects: Memo<Campus, Subject>,
    prerequisites: Memo<(), PrereqRecord>,
}

impl<S: DatasetSource> DataService<S> {
    /// Create a service with an empty cache
    #[must_use]
    pub fn new(source: S, layout: DataLayout, context: Context) -> Self {
        Self {
            source,
            layout,
            context: Mutex::new(context),
            generation: AtomicU64::new(0),
            courses: Memo::new(),
            instructors: Memo::new(),
            programs: Memo::new(),
            subjects: Memo::new(),
            prerequisites: Memo::new(),
        }
    }

    /// The underlying source
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The active context
    #[must_use]
    pub fn context(&self) -> Context {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switch the active context.
    ///
    /// A campus change drops every memoized dataset; any change invalidates
    /// loads already in flight.
    pub fn set_context(&self, context: Context) {
        let previous = {
            let mut current = self.context.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, context.clone())
        };
        if previous.campus == context.campus {
            self.bump_generation();
        } else {
            crate::debug!("Campus changed {} -> {}, clearing cache", previous.campus, context.campus);
            self.clear_cache();
        }
    }

    /// Drop all memoized entries and invalidate loads in flight
    pub fn clear_cache(&self) {
        self.bump_generation();
        self.courses.clear();
        self.instructors.clear();
        self.programs.clear();
        self.subjects.clear();
        self.prerequisites.clear();
    }

    /// Number of memoized entries across all datasets
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.courses.len()
            + self.instructors.len()
            + self.programs.len()
            + self.subjects.len()
            + self.prerequisites.len()
    }

    /// Current generation; changes whenever cached data is invalidated
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Course records for a campus and session, with credits merged in from
    /// the prerequisite dataset.
    ///
    /// A miss always fetches both datasets; either failing fails the load.
    ///
    /// # Errors
    /// The fetch or parse error of whichever dataset failed, or
    /// [`LoadError::Superseded`] if the cache was invalidated meanwhile.
    pub async fn load_courses(&self, key: &DatasetKey) -> Loaded<Course> {
        if let Some(hit) = self.courses.get(key) {
            crate::debug!("Courses {key}: cache hit");
            return hit;
        }
        let started = self.generation();
        crate::info!("Loading courses for {key} from {}", self.source.location());

        let result = async {
            let mut courses: Vec<Course> = self.fetch_json(&self.layout.courses(key)).await?;
            let prereqs: Vec<PrereqRecord> =
                self.fetch_json(&self.layout.prerequisites()).await?;
            merge_credits(&mut courses, &prereqs);
            Ok::<_, LoadError>(Arc::new(courses))
        }
        .await;

        self.finish(&self.courses, key.clone(), started, result)
    }

    /// Instructor records for a campus and session
    ///
    /// # Errors
    /// Fetch or parse failure, or [`LoadError::Superseded`].
    pub async fn load_instructors(&self, key: &DatasetKey) -> Loaded<Instructor> {
        if let Some(hit) = self.instructors.get(key) {
            return hit;
        }
        let started = self.generation();
        crate::info!("Loading instructors for {key}");
        let result = self
            .fetch_json(&self.layout.instructors(key))
            .await
            .map(Arc::new);
        self.finish(&self.instructors, key.clone(), started, result)
    }

    /// Program listings of a campus
    ///
    /// # Errors
    /// Fetch or parse failure, or [`LoadError::Superseded`].
    pub async fn load_programs(&self, campus: Campus) -> Loaded<Program> {
        if let Some(hit) = self.programs.get(&campus) {
            return hit;
        }
        let started = self.generation();
        let result = self
            .fetch_json(&self.layout.programs(campus))
            .await
            .map(Arc::new);
        self.finish(&self.programs, campus, started, result)
    }

    /// Subject codes of a campus
    ///
    /// # Errors
    /// Fetch or parse failure, or [`LoadError::Superseded`].
    pub async fn load_subjects(&self, campus: Campus) -> Loaded<Subject> {
        if let Some(hit) = self.subjects.get(&campus) {
            return hit;
        }
        let started = self.generation();
        let result = self
            .fetch_json(&self.layout.subjects(campus))
            .await
            .map(Arc::new);
        self.finish(&self.subjects, campus, started, result)
    }

    /// Prerequisite records (not campus-scoped)
    ///
    /// # Errors
    /// Fetch or parse failure, or [`LoadError::Superseded`].
    pub async fn load_prerequisites(&self) -> Loaded<PrereqRecord> {
        if let Some(hit) = self.prerequisites.get(&()) {
            return hit;
        }
        let started = self.generation();
        let result = self
            .fetch_json(&self.layout.prerequisites())
            .await
            .map(Arc::new);
        self.finish(&self.prerequisites, (), started, result)
    }

    /// The prerequisite record of one course code, if any
    ///
    /// # Errors
    /// Same as [`load_prerequisites`](Self::load_prerequisites).
    pub async fn prerequisite_for(&self, code: &str) -> Result<Option<PrereqRecord>, LoadError> {
        let records = self.load_prerequisites().await?;
        Ok(records.iter().find(|r| r.code == code).cloned())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LoadError> {
        let bytes = self.source.fetch(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn finish<K: Eq + Hash, V>(
        &self,
        memo: &Memo<K, V>,
        key: K,
        started: u64,
        result: Loaded<V>,
    ) -> Loaded<V> {
        // clear_cache bumps the generation before taking the memo lock
        if !memo.insert_if(key, result.clone(), || self.generation() == started) {
            crate::debug!("Discarding load started under generation {started}");
            return Err(LoadError::Superseded);
        }
        if let Err(e) = &result {
            crate::error!("{e}");
        }
        result
    }
}

/// Copy each prerequisite record's credit count onto the course with the
/// same code. Courses without a record, or with a non-numeric credit string,
/// keep an unknown credit count.
pub fn merge_credits(courses: &mut [Course], prereqs: &[PrereqRecord]) {
    let credits: HashMap<&str, Option<u32>> = prereqs
        .iter()
        .map(|p| (p.code.as_str(), p.credit_count()))
        .collect();
    for course in courses {
        course.credits = credits.get(course.code.as_str()).copied().flatten();
    }
}
