//! Working-root confinement
//!
//! Every caller-supplied path goes through [`WorkingRoot::resolve`] before the
//! filesystem is touched. Resolution is purely lexical: `.` segments are
//! dropped, `..` pops one component, and the result must be the root itself or
//! one of its descendants. Paths do not need to exist.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// A requested path resolved outside the working root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\"{requested}\" is outside the permitted working directory")]
pub struct ContainmentError {
    pub requested: String,
}

/// The directory every gateway operation is confined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingRoot {
    path: PathBuf,
}

/// An absolute path proven to be inside a [`WorkingRoot`].
///
/// Only [`WorkingRoot::resolve`] constructs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
}

impl WorkingRoot {
    /// Create a working root, anchoring relative paths at the current directory.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        Ok(Self {
            path: normalize(&absolute),
        })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Resolve `input` against the root and prove containment.
    pub fn resolve(&self, input: &str) -> Result<ResolvedPath, ContainmentError> {
        let candidate = normalize(&self.path.join(input));

        // Path::starts_with compares whole components, so "/work-other" is
        // never treated as being inside "/work".
        if candidate.starts_with(&self.path) {
            debug!(input, resolved = %candidate.display(), "resolved path inside working root");
            Ok(ResolvedPath { path: candidate })
        } else {
            warn!(input, resolved = %candidate.display(), root = %self.path.display(), "path escapes working root");
            Err(ContainmentError {
                requested: input.to_string(),
            })
        }
    }
}

impl fmt::Display for WorkingRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Lexically normalize an absolute path.
///
/// `..` never climbs above the filesystem root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => continue,
            Component::ParentDir => {
                // pop() refuses to remove the root, which is what we want
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    normalized
}
