use std::path::PathBuf;

use anyhow::Result;
use docfetch::{download_archive, extract_documents};
use docindex::{SearchHit, SearchIndex};
use reqwest::Client;
use tokio::sync::OnceCell;

pub const DEFAULT_ARCHIVE_URL: &str =
    "https://github.com/jlowin/fastmcp/archive/refs/heads/main.zip";
pub const DEFAULT_ARCHIVE_PATH: &str = "fastmcp-main.zip";

const NUM_RESULTS: usize = 5;
const PREVIEW_CHARS: usize = 500;

/// Lazily-initialized documentation search.
///
/// The first `search` call runs the full download -> extract -> build
/// pipeline and keeps the resulting index for the rest of the process.
/// Initialization goes through a `OnceCell`, so concurrent first calls
/// build exactly once; a failed initialization is not cached and the next
/// call retries the pipeline. There is no refresh: stale results persist
/// until the process restarts.
pub struct DocsSearch {
    archive_url: String,
    archive_path: PathBuf,
    client: Client,
    index: OnceCell<SearchIndex>,
}

impl DocsSearch {
    pub fn new(archive_url: String, archive_path: PathBuf) -> Self {
        Self {
            archive_url,
            archive_path,
            client: Client::new(),
            index: OnceCell::new(),
        }
    }

    /// Search the documentation and render the top results as plain text.
    pub async fn search(&self, query: &str) -> Result<String> {
        let index = self.index.get_or_try_init(|| self.build_index()).await?;
        let hits = index.query(query, NUM_RESULTS);
        Ok(format_results(index, &hits))
    }

    async fn build_index(&self) -> Result<SearchIndex> {
        let path = download_archive(&self.client, &self.archive_url, &self.archive_path).await?;
        let documents = extract_documents(&path)?;
        tracing::info!(num_docs = documents.len(), "building documentation index");
        Ok(SearchIndex::build(documents))
    }
}

/// Number the hits from 1 and show each document's name with a one-line
/// preview: the first ~500 characters with newlines flattened to spaces.
fn format_results(index: &SearchIndex, hits: &[SearchHit]) -> String {
    let mut lines = Vec::with_capacity(hits.len() * 2);
    for (i, hit) in hits.iter().enumerate() {
        let Some(doc) = index.document(hit.doc_id) else {
            continue;
        };
        let preview: String = doc
            .content
            .chars()
            .take(PREVIEW_CHARS)
            .collect::<String>()
            .replace('\n', " ");
        lines.push(format!("Result {}: {}", i + 1, doc.filename));
        lines.push(format!("Preview: {preview}...\n"));
    }
    lines.join("\n")
}
