//! The gateway: both operations bound to one working root

use serde::Serialize;
use tracing::debug;

use crate::engine::files::{list_directory, DirectoryEntry};
use crate::error::Result;
use crate::output::human::format_human;
use crate::script::{ExecutionOutcome, ExecutionRequest, ScriptRunner};
use crate::security::WorkingRoot;
use crate::tools;

/// Successful result of a gateway operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultData {
    Listing(Vec<DirectoryEntry>),
    Execution(ExecutionOutcome),
}

/// Lists directories and runs scripts, never outside `root`.
///
/// The `String`-returning methods are the agent-facing surface: they never
/// fail, and errors come back as text starting with `Error: `.
#[derive(Debug, Clone)]
pub struct Gateway {
    root: WorkingRoot,
    runner: ScriptRunner,
}

impl Gateway {
    pub fn new(root: WorkingRoot, runner: ScriptRunner) -> Self {
        Self { root, runner }
    }

    /// List `directory` (default `.`) relative to the working root.
    pub fn list(&self, directory: Option<&str>) -> Result<ResultData> {
        let directory = directory.unwrap_or(".");
        debug!(directory, "list requested");
        list_directory(&self.root, directory).map(ResultData::Listing)
    }

    /// Run a script relative to the working root.
    pub fn run(&self, request: &ExecutionRequest) -> Result<ResultData> {
        debug!(script = %request.script_path, "run requested");
        self.runner.run(&self.root, request).map(ResultData::Execution)
    }

    pub fn get_files_info(&self, directory: Option<&str>) -> String {
        format_human(&self.list(directory))
    }

    pub fn run_python_file(&self, file_path: &str, args: &[String]) -> String {
        let request = ExecutionRequest::new(file_path).with_args(args.iter().cloned());
        format_human(&self.run(&request))
    }

    /// Dispatch a named tool call with JSON arguments.
    pub fn call_tool(&self, name: &str, arguments: &serde_json::Value) -> String {
        format_human(&tools::dispatch(self, name, arguments))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::script::FixedInterpreter;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Gateway) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "0123456789").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("hello.py"), "echo hello\n").unwrap();
        fs::write(temp_dir.path().join("fail.py"), "exit 1\n").unwrap();

        let root = WorkingRoot::new(temp_dir.path()).unwrap();
        let gateway = Gateway::new(root, ScriptRunner::new(FixedInterpreter::new("/bin/sh")));
        (temp_dir, gateway)
    }

    #[test]
    fn test_get_files_info_default_directory() {
        let (_temp_dir, gateway) = setup();
        let text = gateway.get_files_info(None);

        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("- a.txt: file_size=10 bytes, is_dir=False"));
        assert!(text.contains("- sub: file_size="));
        assert!(text.contains("is_dir=True"));
    }

    #[test]
    fn test_get_files_info_errors_are_strings() {
        let (_temp_dir, gateway) = setup();

        assert_eq!(
            gateway.get_files_info(Some("../../etc")),
            "Error: Cannot list \"../../etc\" as it is outside the permitted working directory"
        );
        assert_eq!(
            gateway.get_files_info(Some("a.txt")),
            "Error: \"a.txt\" is not a directory"
        );
    }

    #[test]
    fn test_run_python_file() {
        let (_temp_dir, gateway) = setup();

        let text = gateway.run_python_file("hello.py", &[]);
        assert!(text.contains("STDOUT: hello"));
        assert!(!text.contains("Process exited"));

        let text = gateway.run_python_file("fail.py", &[]);
        assert!(text.starts_with("Process exited with code 1"));
        assert!(text.ends_with("No output produced"));
    }

    #[test]
    fn test_run_python_file_errors_are_strings() {
        let (_temp_dir, gateway) = setup();

        assert_eq!(
            gateway.run_python_file("../evil.py", &[]),
            "Error: Cannot execute \"../evil.py\" as it is outside the permitted working directory"
        );
        assert_eq!(
            gateway.run_python_file("nope.py", &[]),
            "Error: \"nope.py\" does not exist or is not a regular file"
        );
        assert_eq!(
            gateway.run_python_file("a.txt", &[]),
            "Error: \"a.txt\" is not a Python file"
        );
    }
}
