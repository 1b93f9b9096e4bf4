use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use docindex::Document;

use crate::FetchError;

/// Extensions treated as text documentation inside the archive.
const TEXT_EXTENSIONS: [&str; 2] = [".md", ".mdx"];

/// Read markdown documents out of a zip archive, in archive iteration order.
///
/// Directory entries are skipped, non-markdown files are skipped, and the
/// archive's top-level wrapper directory (GitHub's `repo-branch/` segment)
/// is stripped from each name. Entry bytes are decoded lossily so a single
/// badly-encoded file never fails the whole extraction.
pub fn extract_documents(archive_path: &Path) -> Result<Vec<Document>, FetchError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    let mut documents = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if !TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            continue;
        }

        let mut raw = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut raw)?;
        let content = String::from_utf8_lossy(&raw).into_owned();

        documents.push(Document {
            filename: strip_root_segment(&name),
            content,
        });
    }

    tracing::info!(count = documents.len(), path = %archive_path.display(), "extracted markdown documents");
    Ok(documents)
}

/// Remove exactly one leading path segment; a name with no separator is
/// passed through unchanged.
fn strip_root_segment(name: &str) -> String {
    match name.split_once('/') {
        Some((_, rest)) => rest.to_string(),
        None => name.to_string(),
    }
}
