//! Script execution inside the working root

pub mod interpreter;
pub mod runner;
pub mod validator;

pub use interpreter::{FixedInterpreter, InterpreterLocator, SearchPath};
pub use runner::{ExecutionOutcome, ExecutionRequest, RunnerConfig, ScriptRunner};
pub use validator::{validate_script, ScriptKind};
