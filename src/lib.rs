//! Sandgate - a sandboxed filesystem and script-execution gateway
//!
//! Sandgate lets an external caller, typically an automated agent, list
//! directories and run scripts while every path it supplies is confined to a
//! fixed working root.
//!
//! # Example
//!
//! ```no_run
//! use sandgate::{Gateway, ScriptRunner, SearchPath, WorkingRoot};
//!
//! let root = WorkingRoot::new("calculator").unwrap();
//! let gateway = Gateway::new(root, ScriptRunner::new(SearchPath::default()));
//! println!("{}", gateway.get_files_info(Some("pkg")));
//! println!("{}", gateway.run_python_file("main.py", &["3 + 5".to_string()]));
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod output;
pub mod script;
pub mod security;
pub mod tools;

pub use engine::{list_directory, DirectoryEntry, Gateway, ResultData};
pub use error::{GatewayError, Operation, Result};
pub use output::{format_output, OutputFormat};
pub use script::{
    ExecutionOutcome, ExecutionRequest, FixedInterpreter, InterpreterLocator, RunnerConfig,
    ScriptKind, ScriptRunner, SearchPath,
};
pub use security::{ContainmentError, ResolvedPath, WorkingRoot};
pub use tools::{declarations, ToolDeclaration};
