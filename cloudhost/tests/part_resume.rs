//! End-to-end coverage of spec.md §8 Scenario 6: a `.part` file present on
//! disk, resumed against a server that honors `Range` with `206 Partial
//! Content`, produces bytes identical to a single fresh download.
//!
//! As with `netio`'s ranged-download tests, every test here stays a
//! plain, non-async `#[test]` — the mock server runs on its own
//! dedicated `tokio::runtime::Runtime` so the blocking client under test
//! is never invoked from inside the runtime serving it.

use std::fs;

use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudhost::progress::AggregateProgress;
use cloudhost::{CancelFlag, FileRecord};
use status::StatusDocument;

fn progress(total: u64) -> (AggregateProgress, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let doc = StatusDocument::new_acquiring("Game", false, false, false, "1", "1 MB", "");
    (AggregateProgress::new(total, doc, dir.path().to_path_buf()), dir)
}

#[test]
fn resuming_a_part_file_produces_the_same_bytes_as_a_fresh_download() {
    let full: Vec<u8> = (0..(256 * 1024_usize)).map(|i| (i % 251) as u8).collect();
    let split_at = full.len() / 3;
    let (prefix, suffix) = full.split_at(split_at);

    let rt = Runtime::new().expect("failed to build test runtime");
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        // A resume request for the already-downloaded prefix's size gets
        // back exactly the remaining suffix, as `206 Partial Content`.
        Mock::given(method("GET"))
            .and(path("/file.bin"))
            .and(header("Range", format!("bytes={split_at}-").as_str()))
            .respond_with(
                ResponseTemplate::new(206)
                    .set_body_bytes(suffix.to_vec())
                    .append_header("Content-Length", suffix.len().to_string()),
            )
            .mount(&server)
            .await;
        server
    });

    let install_dir = tempfile::tempdir().unwrap();
    fs::write(install_dir.path().join("file.bin.part"), prefix).unwrap();

    let file = FileRecord {
        path: String::new(),
        filename: "file.bin".to_string(),
        link: format!("{}/file.bin", server.uri()),
    };

    let (agg, _progress_dir) = progress(full.len() as u64);
    let cancel = CancelFlag::new();

    let result_path = cloudhost::download::download_file(
        &file,
        install_dir.path(),
        "test-token",
        &cancel,
        &agg,
        "file.bin",
    )
    .expect("resumed download should succeed");

    assert_eq!(fs::read(&result_path).unwrap(), full);
    assert!(!install_dir.path().join("file.bin.part").exists());
}

#[test]
fn a_fresh_download_with_no_part_file_matches_the_same_final_bytes() {
    let full: Vec<u8> = (0..(64 * 1024_usize)).map(|i| (i % 191) as u8).collect();

    let rt = Runtime::new().expect("failed to build test runtime");
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file.bin"))
            .and(header("Range", "bytes=0-"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(full.clone())
                    .append_header("Content-Length", full.len().to_string()),
            )
            .mount(&server)
            .await;
        server
    });

    let install_dir = tempfile::tempdir().unwrap();
    let file = FileRecord {
        path: String::new(),
        filename: "file.bin".to_string(),
        link: format!("{}/file.bin", server.uri()),
    };

    let (agg, _progress_dir) = progress(full.len() as u64);
    let cancel = CancelFlag::new();

    let result_path = cloudhost::download::download_file(
        &file,
        install_dir.path(),
        "test-token",
        &cancel,
        &agg,
        "file.bin",
    )
    .expect("fresh download should succeed");

    assert_eq!(fs::read(&result_path).unwrap(), full);
}
