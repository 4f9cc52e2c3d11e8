//! Directory listing inside the working root

use std::fs;

use serde::Serialize;
use tracing::info;

use crate::error::{GatewayError, Operation, Result};
use crate::security::WorkingRoot;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub size_bytes: u64,
    pub is_dir: bool,
}

/// List the immediate children of `directory`, relative to the working root.
///
/// Entries come back in filesystem iteration order. Sizes and directory flags
/// follow symlinks. If any entry cannot be read or stat'ed the whole listing
/// fails.
pub fn list_directory(root: &WorkingRoot, directory: &str) -> Result<Vec<DirectoryEntry>> {
    let resolved = root
        .resolve(directory)
        .map_err(|e| GatewayError::OutsideWorkingRoot {
            operation: Operation::List,
            path: e.requested,
        })?;

    let path = resolved.as_path();
    if !path.is_dir() {
        return Err(GatewayError::NotADirectory {
            path: directory.to_string(),
        });
    }

    let read_context = || format!("reading directory \"{}\"", directory);
    let mut entries = Vec::new();

    for entry in fs::read_dir(path).map_err(|e| GatewayError::io(read_context(), e))? {
        let entry = entry.map_err(|e| GatewayError::io(read_context(), e))?;
        let name = entry.file_name().to_string_lossy().to_string();

        let metadata = fs::metadata(entry.path())
            .map_err(|e| GatewayError::io(format!("reading metadata for \"{}\"", name), e))?;

        entries.push(DirectoryEntry {
            name,
            size_bytes: metadata.len(),
            is_dir: metadata.is_dir(),
        });
    }

    info!(directory, count = entries.len(), "listed directory");
    Ok(entries)
}
