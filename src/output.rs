use std::path::{Path, PathBuf};

use tracing::info;

use crate::{Error, Result};

/// Replaces the document at `root/rel` with `contents`, creating parent
/// directories as needed. Returns the absolute path written.
pub fn write_document(root: &Path, rel: &Path, contents: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
    info!(path = %path.display(), bytes = contents.len(), "document written");
    Ok(path)
}
