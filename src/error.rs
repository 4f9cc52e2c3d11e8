//! Error types for Sandgate

use std::fmt;
use thiserror::Error;

/// The gateway operation that rejected a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Execute,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::List => write!(f, "list"),
            Operation::Execute => write!(f, "execute"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Cannot {operation} \"{path}\" as it is outside the permitted working directory")]
    OutsideWorkingRoot { operation: Operation, path: String },

    #[error("\"{path}\" is not a directory")]
    NotADirectory { path: String },

    #[error("\"{path}\" does not exist or is not a regular file")]
    NotAFile { path: String },

    #[error("\"{path}\" is not a {label} file")]
    UnsupportedFileType { path: String, label: String },

    #[error("No interpreter found (tried: {})", .candidates.join(", "))]
    InterpreterNotFound { candidates: Vec<String> },

    #[error("Unknown function: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {detail}")]
    InvalidArguments { tool: String, detail: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// Wrap an OS-level failure with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        GatewayError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
