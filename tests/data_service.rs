//! Integration tests for the memoizing data service

use grade_finder::core::data::{DataLayout, DataService, DatasetSource, FsSource, LoadError};
use grade_finder::core::models::{Campus, Context, Session};
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Notify;

const COURSES_2023W: &str = r#"[
    {"Code": "CPSC 110", "Name": "Computation, Programs, and Programming", "Subject": "Computer Science",
     "Faculty": "Faculty of Science", "Average": 74.3, "Reported": 812, "WeightedMedian": 76.0,
     "High": 100, "Low": 12, "<50": 40, "50-54": 30, "90-100": 120, "Professors": ["Ada Lovelace"]},
    {"Code": "MATH 100", "Name": "Differential Calculus", "Subject": "Mathematics",
     "Faculty": "Faculty of Science", "Average": 68.9, "Reported": 1400}
]"#;

const PREREQS: &str = r#"[
    {"code": "CPSC 110", "cred": "4", "desc": "Fundamental program design.", "preq": [], "depn": ["CPSC 210"]},
    {"code": "MATH 100", "cred": 3, "prer": "High-school calculus."}
]"#;

const INSTRUCTORS_2023W: &str = r#"[
    {"name": "Ada Lovelace", "faculties": ["Faculty of Science"],
     "courses": [{"code": "CPSC 110", "title": "Computation", "average": 75.1, "reported": 300}]}
]"#;

fn context(session: &str) -> Context {
    Context::new(Campus::Main, session.parse::<Session>().unwrap())
}

/// In-memory datasets keyed by relative path, counting every fetch
#[derive(Default)]
struct CountingSource {
    files: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl CountingSource {
    fn with_datasets() -> Self {
        let layout = DataLayout::default();
        let mut files = HashMap::new();
        files.insert(layout.courses(&context("2023W")), COURSES_2023W.as_bytes().to_vec());
        files.insert(layout.prerequisites(), PREREQS.as_bytes().to_vec());
        files.insert(layout.instructors(&context("2023W")), INSTRUCTORS_2023W.as_bytes().to_vec());
        files.insert(layout.programs(Campus::Main), b"not json".to_vec());
        Self {
            files,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DatasetSource for CountingSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.files.get(path).cloned().ok_or_else(|| LoadError::Missing {
            path: path.to_string(),
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

fn service() -> DataService<CountingSource> {
    DataService::new(
        CountingSource::with_datasets(),
        DataLayout::default(),
        context("2023W"),
    )
}

#[tokio::test]
async fn test_courses_merge_credits_and_are_memoized() {
    let service = service();
    let key = context("2023W");

    let courses = service.load_courses(&key).await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].credits, Some(4));
    assert_eq!(courses[1].credits, Some(3));
    assert_eq!(courses[0].distribution.below_50, 40);
    assert_eq!(courses[0].distribution.from_55, 0);
    // course dataset plus the prerequisite dataset
    assert_eq!(service.source().fetches(), 2);

    let again = service.load_courses(&key).await.unwrap();
    assert!(Arc::ptr_eq(&courses, &again));
    assert_eq!(service.source().fetches(), 2);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let service = service();
    let key = context("2023W");

    service.load_instructors(&key).await.unwrap();
    assert_eq!(service.cached_entries(), 1);
    let before = service.generation();

    service.clear_cache();
    assert_eq!(service.cached_entries(), 0);
    assert!(service.generation() > before);

    service.load_instructors(&key).await.unwrap();
    assert_eq!(service.source().fetches(), 2);
}

#[tokio::test]
async fn test_failures_are_cached() {
    let service = service();
    let key = context("2019S");

    let first = service.load_courses(&key).await.unwrap_err();
    assert!(first.is_not_found());
    let fetches = service.source().fetches();

    let second = service.load_courses(&key).await.unwrap_err();
    assert_eq!(first, second);
    assert_eq!(service.source().fetches(), fetches);
}

#[tokio::test]
async fn test_parse_errors_name_the_dataset() {
    let service = service();
    match service.load_programs(Campus::Main).await {
        Err(LoadError::Parse { path, .. }) => assert_eq!(path, "program-data/UBCV.json"),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_prerequisite_lookup() {
    let service = service();

    let record = service.prerequisite_for("CPSC 110").await.unwrap().unwrap();
    assert_eq!(record.credits.as_deref(), Some("4"));
    assert!(service.prerequisite_for("CPSC 999").await.unwrap().is_none());
    // one fetch shared by both lookups
    assert_eq!(service.source().fetches(), 1);
}

#[tokio::test]
async fn test_set_context_session_keeps_cache_campus_clears_it() {
    let service = service();
    service.load_instructors(&context("2023W")).await.unwrap();
    let before = service.generation();

    service.set_context(context("2022W"));
    assert_eq!(service.context(), context("2022W"));
    assert_eq!(service.cached_entries(), 1);
    assert!(service.generation() > before);

    service.set_context(Context::new(Campus::Satellite, "2022W".parse().unwrap()));
    assert_eq!(service.cached_entries(), 0);
}

/// Blocks every fetch until released, announcing when a fetch has started
struct GatedSource {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl DatasetSource for GatedSource {
    async fn fetch(&self, _path: &str) -> Result<Vec<u8>, LoadError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(INSTRUCTORS_2023W.as_bytes().to_vec())
    }

    fn location(&self) -> String {
        "gated".to_string()
    }
}

#[tokio::test]
async fn test_load_finishing_after_invalidation_is_discarded() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let service = DataService::new(
        GatedSource {
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        },
        DataLayout::default(),
        context("2023W"),
    );
    let key = context("2023W");

    let (result, ()) = tokio::join!(service.load_instructors(&key), async {
        entered.notified().await;
        service.clear_cache();
        release.notify_one();
    });

    assert_eq!(result.unwrap_err(), LoadError::Superseded);
    assert_eq!(service.cached_entries(), 0);
}

#[tokio::test]
async fn test_fs_source_reads_layout() {
    let root = TempDir::new().unwrap();
    let layout = DataLayout::default();
    let key = context("2023W");

    for (path, body) in [
        (layout.courses(&key), COURSES_2023W),
        (layout.prerequisites(), PREREQS),
    ] {
        let full = root.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, body).unwrap();
    }

    let service = DataService::new(FsSource::new(root.path()), layout, key.clone());
    let courses = service.load_courses(&key).await.unwrap();
    assert_eq!(courses[1].code, "MATH 100");

    let missing = service.load_instructors(&key).await.unwrap_err();
    assert!(matches!(missing, LoadError::Missing { .. }));
}
