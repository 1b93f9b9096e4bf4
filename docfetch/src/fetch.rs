use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::FetchError;

/// Download `url` to `dest` unless `dest` already exists.
///
/// The cache policy is existence only: no freshness check, no checksum.
/// A single GET is attempted; a transport failure or non-success status is
/// returned as-is and the body is only persisted on success, so a failed
/// download leaves nothing behind and the next call retries.
pub async fn download_archive(
    client: &Client,
    url: &str,
    dest: &Path,
) -> Result<PathBuf, FetchError> {
    if dest.exists() {
        tracing::info!(path = %dest.display(), "archive already present, skipping download");
        return Ok(dest.to_path_buf());
    }

    tracing::info!(url, "downloading archive");
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    let bytes = resp.bytes().await?;

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(dest, &bytes)?;
    tracing::info!(path = %dest.display(), bytes = bytes.len(), "archive downloaded");
    Ok(dest.to_path_buf())
}
