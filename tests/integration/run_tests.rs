//! Whole-run behaviour with scripted collaborators

use crate::support::{coordinator, form, ScriptedFeed, ScriptedLauncher};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use formscout::config::Config;
use formscout::crawler::Coordinator;
use formscout::renderer::{RenderResult, Renderer, RendererLauncher};
use formscout::state::{ScanState, ScanStateStore};
use formscout::storage::{MemoryStorage, Storage};
use formscout::FormRecord;
use std::path::Path;
use std::sync::{Arc, Mutex};

fn read_forms(storage: &MemoryStorage, name: &str) -> Vec<FormRecord> {
    let bytes = storage.read(&Path::new("results").join(name)).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn state_store(storage: &Arc<MemoryStorage>) -> ScanStateStore {
    ScanStateStore::new(storage.clone(), "state/scan_state.json")
}

#[tokio::test]
async fn test_end_to_end_second_domain_yields_forms() {
    let storage = Arc::new(MemoryStorage::new());
    let launcher = ScriptedLauncher::new(&[("a.com", 0), ("b.com", 2)]);
    let coordinator = coordinator(&["a.com", "b.com"], &launcher, &storage);

    let report = coordinator.run_once().await.unwrap();

    assert!(report.found_forms());
    assert_eq!(report.domains_attempted, 2);
    assert_eq!(report.attempted, vec!["a.com", "b.com"]);
    assert_eq!(report.forms_saved, 2);
    assert_eq!(
        report.shard.as_deref(),
        Some(Path::new("results/forms.json"))
    );

    let state = state_store(&storage).load();
    assert_eq!(state.scanned, vec!["a.com", "b.com"]);
    assert!(state.last_update.is_some());

    let saved = read_forms(&storage, "forms.json");
    assert_eq!(saved, vec![form("b.com", 0), form("b.com", 1)]);
}

#[tokio::test]
async fn test_first_success_wins() {
    let storage = Arc::new(MemoryStorage::new());
    let feed = [
        "d1.com", "d2.com", "d3.com", "d4.com", "d5.com", "d6.com", "d7.com",
    ];
    let launcher = ScriptedLauncher::new(&[
        ("d1.com", 0),
        ("d2.com", 0),
        ("d3.com", 0),
        ("d4.com", 3),
        ("d5.com", 5),
    ]);
    let coordinator = coordinator(&feed, &launcher, &storage);

    let report = coordinator.run_once().await.unwrap();

    assert_eq!(report.domains_attempted, 4);
    assert_eq!(report.forms_saved, 3);
    assert_eq!(
        state_store(&storage).load().scanned,
        vec!["d1.com", "d2.com", "d3.com", "d4.com"]
    );

    let saved = read_forms(&storage, "forms.json");
    assert_eq!(saved.len(), 3);
    assert!(saved.iter().all(|f| f.url == "https://d4.com"));

    // d5 was never touched.
    assert!(!launcher
        .navigations()
        .iter()
        .any(|u| u.contains("d5.com")));
    assert_eq!(launcher.launches(), 4);
    assert_eq!(launcher.closes(), 4);
}

#[tokio::test]
async fn test_next_run_resumes_after_scanned_domains() {
    let storage = Arc::new(MemoryStorage::new());
    let launcher = ScriptedLauncher::new(&[("a.com", 1), ("b.com", 1)]);
    let coordinator = coordinator(&["a.com", "b.com"], &launcher, &storage);

    let first = coordinator.run_once().await.unwrap();
    let second = coordinator.run_once().await.unwrap();

    assert_eq!(first.attempted, vec!["a.com"]);
    assert_eq!(second.attempted, vec!["b.com"]);
    assert_eq!(second.unscanned_before, 1);

    let saved = read_forms(&storage, "forms.json");
    assert_eq!(saved, vec![form("a.com", 0), form("b.com", 0)]);
}

#[tokio::test]
async fn test_full_reset_when_everything_scanned() {
    let storage = Arc::new(MemoryStorage::new());
    storage.create_dir_all(Path::new("state")).unwrap();
    let before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let prior = ScanState {
        scanned: vec!["a.com".to_string(), "b.com".to_string()],
        last_update: Some(before),
    };
    state_store(&storage).save(&prior).unwrap();

    let launcher = ScriptedLauncher::new(&[("a.com", 1), ("b.com", 1)]);
    let coordinator = coordinator(&["b.com", "a.com"], &launcher, &storage);

    let report = coordinator.run_once().await.unwrap();

    assert!(report.state_reset);
    assert_eq!(report.domains_attempted, 0);
    assert!(!report.found_forms());
    assert_eq!(launcher.launches(), 0);
    assert!(launcher.navigations().is_empty());

    let state = state_store(&storage).load();
    assert!(state.scanned.is_empty());
    assert!(state.last_update.unwrap() > before);
    assert!(storage.list_dir(Path::new("results")).unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_state_starts_over() {
    let storage = Arc::new(MemoryStorage::new());
    storage.create_dir_all(Path::new("state")).unwrap();
    storage
        .write(Path::new("state/scan_state.json"), b"{\"scanned\": [1, 2")
        .unwrap();

    let launcher = ScriptedLauncher::new(&[("a.com", 1)]);
    let coordinator = coordinator(&["a.com"], &launcher, &storage);

    let report = coordinator.run_once().await.unwrap();

    assert_eq!(report.unscanned_before, 1);
    assert_eq!(report.attempted, vec!["a.com"]);
    assert_eq!(state_store(&storage).load().scanned, vec!["a.com"]);
}

#[tokio::test]
async fn test_forms_append_to_existing_shard_series() {
    let storage = Arc::new(MemoryStorage::new());
    storage.create_dir_all(Path::new("results")).unwrap();
    storage
        .write(Path::new("results/forms.json"), b"[]")
        .unwrap();
    let existing = serde_json::to_vec(&vec![form("old.com", 0)]).unwrap();
    storage
        .write(Path::new("results/forms_1.json"), &existing)
        .unwrap();

    let launcher = ScriptedLauncher::new(&[("new.com", 2)]);
    let coordinator = coordinator(&["new.com"], &launcher, &storage);

    let report = coordinator.run_once().await.unwrap();

    assert_eq!(
        report.shard.as_deref(),
        Some(Path::new("results/forms_1.json"))
    );
    let saved = read_forms(&storage, "forms_1.json");
    assert_eq!(
        saved,
        vec![form("old.com", 0), form("new.com", 0), form("new.com", 1)]
    );
    assert!(read_forms(&storage, "forms.json").is_empty());
}

/// Records the persisted `scanned` list each time a domain crawl starts
struct StateSnapshotLauncher {
    inner: ScriptedLauncher,
    store: ScanStateStore,
    snapshots: Arc<Mutex<Vec<Vec<String>>>>,
}

#[async_trait]
impl RendererLauncher for StateSnapshotLauncher {
    async fn launch(&self) -> RenderResult<Box<dyn Renderer>> {
        self.snapshots
            .lock()
            .unwrap()
            .push(self.store.load().scanned);
        self.inner.launch().await
    }
}

#[tokio::test]
async fn test_state_persisted_before_each_next_attempt() {
    let storage = Arc::new(MemoryStorage::new());
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let launcher = StateSnapshotLauncher {
        inner: ScriptedLauncher::new(&[("a.com", 0), ("b.com", 0), ("c.com", 0), ("d.com", 1)]),
        store: state_store(&storage),
        snapshots: snapshots.clone(),
    };
    let coordinator = Coordinator::new(
        Config::default(),
        Box::new(ScriptedFeed::new(&["a.com", "b.com", "c.com", "d.com"])),
        Box::new(launcher),
        storage.clone(),
    );

    let report = coordinator.run_once().await.unwrap();
    assert_eq!(report.domains_attempted, 4);

    let expected: Vec<Vec<String>> = vec![
        vec![],
        vec!["a.com".to_string()],
        vec!["a.com".to_string(), "b.com".to_string()],
        vec![
            "a.com".to_string(),
            "b.com".to_string(),
            "c.com".to_string(),
        ],
    ];
    assert_eq!(*snapshots.lock().unwrap(), expected);
}
