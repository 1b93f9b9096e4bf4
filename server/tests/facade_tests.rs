use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use server::docs::DocsSearch;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

fn write_docs_archive(path: &Path) {
    let file = File::create(path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    archive.start_file("fastmcp-main/README.md", options).unwrap();
    archive
        .write_all(b"FastMCP overview.\nGetting started with servers.")
        .unwrap();

    archive.start_file("fastmcp-main/tools.md", options).unwrap();
    archive
        .write_all(b"This page shows how to create a tool and register it.")
        .unwrap();

    archive
        .start_file("fastmcp-main/clients.md", options)
        .unwrap();
    archive
        .write_all(b"Clients connect to servers and list capabilities.")
        .unwrap();

    archive.finish().unwrap();
}

/// The archive file already exists locally, so the facade's first search
/// must build the index from it without any network access.
#[tokio::test]
async fn first_search_builds_from_the_cached_archive() {
    let dir = tempdir().unwrap();
    let archive_path = dir.path().join("fastmcp-main.zip");
    write_docs_archive(&archive_path);

    let docs = DocsSearch::new("http://unreachable.invalid/main.zip".into(), archive_path);
    let out = docs.search("how to create a tool").await.unwrap();

    assert!(out.starts_with("Result 1: tools.md"));
    assert!(out.contains("Preview: "));
}

#[tokio::test]
async fn concurrent_first_calls_share_one_index() {
    let dir = tempdir().unwrap();
    let archive_path = dir.path().join("fastmcp-main.zip");
    write_docs_archive(&archive_path);

    let docs = Arc::new(DocsSearch::new(
        "http://unreachable.invalid/main.zip".into(),
        archive_path,
    ));
    let (a, b) = tokio::join!(docs.search("create a tool"), docs.search("create a tool"));
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn unmatched_query_returns_empty_output() {
    let dir = tempdir().unwrap();
    let archive_path = dir.path().join("fastmcp-main.zip");
    write_docs_archive(&archive_path);

    let docs = DocsSearch::new("http://unreachable.invalid/main.zip".into(), archive_path);
    let out = docs.search("quasar").await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn missing_archive_with_unreachable_url_fails() {
    let dir = tempdir().unwrap();
    let archive_path = dir.path().join("absent.zip");

    let docs = DocsSearch::new("http://unreachable.invalid/main.zip".into(), archive_path);
    assert!(docs.search("anything").await.is_err());
}
