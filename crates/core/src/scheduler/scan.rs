//! Eligible input enumeration.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::codec::SUPPORTED_EXTENSIONS;

use super::error::BatchError;

/// Whether a path has one of the accepted input extensions (any case).
pub fn is_eligible(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Lists the eligible regular files directly inside `directory`.
///
/// Subdirectories are not descended into. The result is sorted by path.
pub async fn scan_eligible_files(directory: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let meta = tokio::fs::metadata(directory)
        .await
        .map_err(|e| BatchError::unreadable(directory, e))?;
    if !meta.is_dir() {
        return Err(BatchError::NotADirectory {
            path: directory.to_path_buf(),
        });
    }

    let mut entries = tokio::fs::read_dir(directory)
        .await
        .map_err(|e| BatchError::unreadable(directory, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| BatchError::unreadable(directory, e))?
    {
        let path = entry.path();
        if !is_eligible(&path) {
            continue;
        }
        // Follows symlinks, so a link to a regular file counts
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!(path = %path.display(), error = %e, "Skipping unreadable entry"),
        }
    }

    files.sort();
    debug!(
        directory = %directory.display(),
        count = files.len(),
        "Scanned directory"
    );
    Ok(files)
}
