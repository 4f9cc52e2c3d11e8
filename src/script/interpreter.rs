//! Interpreter discovery for script execution

use std::path::{Path, PathBuf};

use crate::error::{GatewayError, Result};

/// Finds the program that scripts are handed to.
pub trait InterpreterLocator: Send + Sync + std::fmt::Debug {
    fn locate(&self) -> Result<PathBuf>;
}

/// Always use one specific interpreter.
#[derive(Debug, Clone)]
pub struct FixedInterpreter {
    path: PathBuf,
}

impl FixedInterpreter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InterpreterLocator for FixedInterpreter {
    fn locate(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }
}

/// Search `PATH` for the first of several program names.
#[derive(Debug, Clone)]
pub struct SearchPath {
    candidates: Vec<String>,
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::new(["python3", "python"])
    }
}

impl SearchPath {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    fn find_in(&self, search_path: &std::ffi::OsStr) -> Option<PathBuf> {
        self.candidates.iter().find_map(|name| {
            std::env::split_paths(search_path)
                .map(|dir| dir.join(name))
                .find(|candidate| is_executable(candidate))
        })
    }
}

impl InterpreterLocator for SearchPath {
    fn locate(&self) -> Result<PathBuf> {
        std::env::var_os("PATH")
            .and_then(|search_path| self.find_in(&search_path))
            .ok_or_else(|| GatewayError::InterpreterNotFound {
                candidates: self.candidates.clone(),
            })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
