//! Tool declarations for calling agents
//!
//! Each gateway operation is advertised as a function with a JSON-Schema
//! parameter object, and calls come back in as a name plus JSON arguments.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::engine::gateway::{Gateway, ResultData};
use crate::error::{GatewayError, Result};
use crate::script::ExecutionRequest;

pub const GET_FILES_INFO: &str = "get_files_info";
pub const RUN_PYTHON_FILE: &str = "run_python_file";

/// A callable function as advertised to an agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

pub fn declarations() -> Vec<ToolDeclaration> {
    vec![
        ToolDeclaration {
            name: GET_FILES_INFO.to_string(),
            description: "Lists files in a specified directory relative to the working directory, \
                          providing file size and directory status"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Directory path to list files from, relative to the working \
                                        directory (default is the working directory itself)"
                    }
                }
            }),
        },
        ToolDeclaration {
            name: RUN_PYTHON_FILE.to_string(),
            description: "Executes a Python file relative to the working directory, with optional \
                          arguments, and reports its exit code and output"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path to the Python file to execute, relative to the working directory"
                    },
                    "args": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Arguments to pass to the Python file"
                    }
                },
                "required": ["file_path"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct GetFilesInfoArgs {
    directory: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunPythonFileArgs {
    file_path: String,
    args: Option<Vec<String>>,
}

/// Route a named call to the gateway operation it names.
pub fn dispatch(gateway: &Gateway, name: &str, arguments: &Value) -> Result<ResultData> {
    match name {
        GET_FILES_INFO => {
            let args: GetFilesInfoArgs = parse_arguments(name, arguments)?;
            gateway.list(args.directory.as_deref())
        }
        RUN_PYTHON_FILE => {
            let args: RunPythonFileArgs = parse_arguments(name, arguments)?;
            let request =
                ExecutionRequest::new(args.file_path).with_args(args.args.unwrap_or_default());
            gateway.run(&request)
        }
        _ => {
            warn!(name, "call to unknown tool");
            Err(GatewayError::UnknownTool {
                name: name.to_string(),
            })
        }
    }
}

fn parse_arguments<T: serde::de::DeserializeOwned>(tool: &str, arguments: &Value) -> Result<T> {
    // A call without arguments arrives as null
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments.clone()
    };

    serde_json::from_value(arguments).map_err(|e| GatewayError::InvalidArguments {
        tool: tool.to_string(),
        detail: e.to_string(),
    })
}
