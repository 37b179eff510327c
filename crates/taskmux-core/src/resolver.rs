//! Task document discovery

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DocumentError;

/// Default task document file name.
pub const DEFAULT_DOCUMENT_NAME: &str = "taskmux.md";

/// Find `name` in `start` or the nearest ancestor directory.
///
/// Only regular files count, so a directory that happens to share the name
/// does not stop the walk.
pub fn find_document(start: &Path, name: &str) -> Option<PathBuf> {
    debug!(start = %start.display(), name, "searching for task document");
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "found task document");
            return Some(candidate);
        }
        if !current.pop() {
            break;
        }
    }

    debug!("no task document found");
    None
}

/// Like [`find_document`], but an absent document is an error.
pub fn resolve_document(start: &Path, name: &str) -> Result<PathBuf, DocumentError> {
    find_document(start, name).ok_or_else(|| DocumentError::NotFound {
        name: name.to_string(),
        start: start.to_path_buf(),
    })
}
