//! Integration test: real curl transport against a local HTTP server, with
//! downloads materialized by the directory host.

mod common;

use std::sync::Arc;

use common::http_server::{self, Route, ServerOptions};
use saveas_core::host::DirectoryHost;
use saveas_core::transport::{CurlTransport, Transport};
use saveas_core::{Blob, SaveOptions, Saver, Strategy};
use tempfile::tempdir;

fn directory_saver(dir: &std::path::Path) -> (Arc<DirectoryHost>, Saver) {
    let transport: Arc<dyn Transport> = Arc::new(CurlTransport::default());
    let host = Arc::new(DirectoryHost::new(dir, "null", Arc::clone(&transport)));
    let saver = Saver::new(host.clone(), transport);
    (host, saver)
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn reachable_url_is_fetched_and_saved_under_given_name() {
    let body: Vec<u8> = (0u8..100).cycle().take(64 * 1024).collect();
    let base = http_server::start(vec![("/export", Route::ok(&body, "text/csv"))]);
    let dir = tempdir().unwrap();
    let (host, saver) = directory_saver(dir.path());
    assert_eq!(saver.strategy(), Strategy::NativeLink);

    saver.save(format!("{}/export", base), Some("report.csv"), SaveOptions::default());
    saver.settle().await;

    let path = dir.path().join("report.csv");
    assert_eq!(std::fs::read(&path).unwrap(), body);
    assert_eq!(host.written(), vec![path]);
    assert_eq!(host.live_object_urls(), 1);

    saver.shutdown().await;
    assert_eq!(host.live_object_urls(), 0);
}

#[tokio::test]
async fn blocked_head_opens_link_and_names_from_url_path() {
    let base = http_server::start_with_options(
        vec![("/files/notes.txt", Route::ok(b"notes", "text/plain"))],
        ServerOptions { head_allowed: false },
    );
    let dir = tempdir().unwrap();
    let (host, saver) = directory_saver(dir.path());

    saver.save(format!("{}/files/notes.txt", base), Some("ignored.txt"), SaveOptions::default());
    saver.settle().await;

    assert_eq!(files_in(dir.path()), vec!["notes.txt"]);
    assert_eq!(std::fs::read(dir.path().join("notes.txt")).unwrap(), b"notes");
    assert_eq!(host.live_object_urls(), 0);
}

#[tokio::test]
async fn missing_url_saves_nothing() {
    let base = http_server::start(vec![]);
    let dir = tempdir().unwrap();
    let (host, saver) = directory_saver(dir.path());

    saver.save(format!("{}/gone.bin", base), None, SaveOptions::default());
    saver.shutdown().await;

    assert!(host.written().is_empty());
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn blobs_never_overwrite_existing_files() {
    let dir = tempdir().unwrap();
    let (host, saver) = directory_saver(dir.path());

    saver.save(Blob::new(b"one".to_vec(), "text/plain"), Some("same.txt"), SaveOptions::default());
    saver.save(Blob::new(b"two".to_vec(), "text/plain"), Some("same.txt"), SaveOptions::default());
    saver.shutdown().await;

    assert_eq!(files_in(dir.path()), vec!["same (1).txt", "same.txt"]);
    assert_eq!(std::fs::read(dir.path().join("same.txt")).unwrap(), b"one");
    assert_eq!(std::fs::read(dir.path().join("same (1).txt")).unwrap(), b"two");
    assert_eq!(host.live_object_urls(), 0);
}
