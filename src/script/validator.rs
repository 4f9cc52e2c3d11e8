//! Script preconditions
//!
//! Checks run in a fixed order and the first failure wins: containment, then
//! "is a regular file", then the extension gate. Nothing is spawned until all
//! of them pass.

use crate::error::{GatewayError, Operation, Result};
use crate::security::{ResolvedPath, WorkingRoot};

/// What counts as a runnable script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptKind {
    /// File extension without the leading dot, e.g. `py`
    pub extension: String,
    /// Human name used in error messages, e.g. `Python`
    pub label: String,
}

impl Default for ScriptKind {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            label: "Python".to_string(),
        }
    }
}

/// Resolve `script_path` and check it is a runnable script of `kind`.
pub fn validate_script(
    root: &WorkingRoot,
    script_path: &str,
    kind: &ScriptKind,
) -> Result<ResolvedPath> {
    let resolved = root
        .resolve(script_path)
        .map_err(|e| GatewayError::OutsideWorkingRoot {
            operation: Operation::Execute,
            path: e.requested,
        })?;

    if !resolved.as_path().is_file() {
        return Err(GatewayError::NotAFile {
            path: script_path.to_string(),
        });
    }

    let has_extension = resolved
        .as_path()
        .file_name()
        .map(|name| {
            name.to_string_lossy()
                .ends_with(&format!(".{}", kind.extension))
        })
        .unwrap_or(false);

    if !has_extension {
        return Err(GatewayError::UnsupportedFileType {
            path: script_path.to_string(),
            label: kind.label.clone(),
        });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup() -> (TempDir, WorkingRoot) {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("main.py")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();
        fs::create_dir(temp_dir.path().join("pkg.py")).unwrap();
        let root = WorkingRoot::new(temp_dir.path()).unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_valid_script() {
        let (temp_dir, root) = setup();
        let resolved = validate_script(&root, "main.py", &ScriptKind::default()).unwrap();
        assert_eq!(resolved.as_path(), temp_dir.path().join("main.py"));
    }

    #[test]
    fn test_outside_root_wins_over_other_checks() {
        let (_temp_dir, root) = setup();
        let err = validate_script(&root, "../missing.txt", &ScriptKind::default()).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::OutsideWorkingRoot {
                operation: Operation::Execute,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let (_temp_dir, root) = setup();
        let err = validate_script(&root, "nope.py", &ScriptKind::default()).unwrap_err();
        assert!(matches!(err, GatewayError::NotAFile { ref path } if path == "nope.py"));
    }

    #[test]
    fn test_directory_is_not_a_file_even_with_extension() {
        let (_temp_dir, root) = setup();
        let err = validate_script(&root, "pkg.py", &ScriptKind::default()).unwrap_err();
        assert!(matches!(err, GatewayError::NotAFile { .. }));
    }

    #[test]
    fn test_wrong_extension() {
        let (_temp_dir, root) = setup();
        let err = validate_script(&root, "notes.txt", &ScriptKind::default()).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::UnsupportedFileType { ref path, ref label }
                if path == "notes.txt" && label == "Python"
        ));
        assert_eq!(err.to_string(), "\"notes.txt\" is not a Python file");
    }

    #[test]
    fn test_custom_kind() {
        let (temp_dir, root) = setup();
        File::create(temp_dir.path().join("build.sh")).unwrap();
        let kind = ScriptKind {
            extension: "sh".to_string(),
            label: "shell".to_string(),
        };
        assert!(validate_script(&root, "build.sh", &kind).is_ok());
        assert!(validate_script(&root, "main.py", &kind).is_err());
    }
}
