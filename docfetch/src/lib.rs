pub mod extract;
pub mod fetch;

pub use extract::extract_documents;
pub use fetch::download_archive;

/// Failures on the fetch/extract path. Lossy text decoding inside an
/// archive entry is not represented here: bad byte sequences are replaced
/// in place and extraction continues.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status} fetching {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
