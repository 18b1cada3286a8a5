//! Scanner + uploader tests with an in-memory store and forced failures.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;

use pgo_upload::{ArtifactStore, RunScope, StoreError, scan_profiles, upload_all};

/// Records every attempted key; fails keys whose file name is in `fail`.
struct MockStore {
    attempted: Mutex<Vec<String>>,
    fail: HashSet<String>,
}

impl MockStore {
    fn new<I: IntoIterator<Item = &'static str>>(fail: I) -> Self {
        Self {
            attempted: Mutex::new(Vec::new()),
            fail: fail.into_iter().map(str::to_string).collect(),
        }
    }
}

#[async_trait]
impl ArtifactStore for MockStore {
    async fn put(&self, key: &str, _body: Vec<u8>) -> Result<String, StoreError> {
        self.attempted.lock().await.push(key.to_string());
        let file_name = key.rsplit('/').next().unwrap_or(key);
        if self.fail.contains(file_name) {
            return Err(StoreError::Transport("connection reset by peer".into()));
        }
        Ok(format!("mem://{key}"))
    }
}

async fn write_file(dir: &Path, name: &str, bytes: &[u8]) {
    tokio::fs::write(dir.join(name), bytes).await.expect("write");
}

#[tokio::test]
async fn scan_filters_by_extension_and_is_non_recursive() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(dir.path(), "a.profraw", b"a").await;
    write_file(dir.path(), "b.profraw", b"bb").await;
    write_file(dir.path(), "notes.txt", b"x").await;
    let nested = dir.path().join("nested");
    tokio::fs::create_dir(&nested).await.expect("mkdir");
    write_file(&nested, "c.profraw", b"c").await;

    let artifacts = scan_profiles(dir.path(), "profraw").await.expect("scan");
    let names: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.profraw", "b.profraw"]);
    assert_eq!(artifacts[1].size, 2);
}

#[tokio::test]
async fn scan_of_missing_directory_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gone = dir.path().join("never-created");
    let artifacts = scan_profiles(&gone, "profraw").await.expect("scan");
    assert!(artifacts.is_empty());
}

#[tokio::test]
async fn every_artifact_is_attempted_despite_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["a.profraw", "b.profraw", "c.profraw", "d.profraw"] {
        write_file(dir.path(), name, b"data").await;
    }
    let artifacts = scan_profiles(dir.path(), "profraw").await.expect("scan");
    assert_eq!(artifacts.len(), 4);

    let store = MockStore::new(["b.profraw", "d.profraw"]);
    let scope = RunScope::with_parts("profiles", "host", "run");
    let report = upload_all(&store, &scope, &artifacts).await;

    assert_eq!(report.found, 4);
    assert_eq!(report.uploaded.len(), 2);
    assert_eq!(report.failed.len(), 2);
    assert!(!report.all_ok());

    let attempted = store.attempted.lock().await;
    assert_eq!(attempted.len(), 4, "all artifacts must be attempted");

    let failed: Vec<_> = report.failed.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(failed, vec!["b.profraw", "d.profraw"]);
}

#[tokio::test]
async fn unreadable_artifact_is_a_contained_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(dir.path(), "a.profraw", b"a").await;
    write_file(dir.path(), "b.profraw", b"b").await;

    let mut artifacts = scan_profiles(dir.path(), "profraw").await.expect("scan");
    // Remove one file between scan and upload; its read must fail in
    // isolation while the other still goes through.
    tokio::fs::remove_file(dir.path().join("a.profraw"))
        .await
        .expect("remove");
    artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let store = MockStore::new([]);
    let scope = RunScope::with_parts("profiles", "host", "run");
    let report = upload_all(&store, &scope, &artifacts).await;

    assert_eq!(report.uploaded.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file_name, "a.profraw");
}

#[tokio::test]
async fn remote_names_disambiguate_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(dir.path(), "a.profraw", b"a").await;
    let artifacts = scan_profiles(dir.path(), "profraw").await.expect("scan");

    let store = MockStore::new([]);
    let first = upload_all(&store, &RunScope::with_parts("p", "host", "run-1"), &artifacts).await;
    let second = upload_all(&store, &RunScope::with_parts("p", "host", "run-2"), &artifacts).await;

    assert_ne!(first.uploaded[0].location, second.uploaded[0].location);
}
