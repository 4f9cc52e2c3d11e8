//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::output::OutputFormat;
use crate::script::runner::{RunnerConfig, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "sandgate")]
#[command(author, version, about = "List directories and run scripts, confined to a working root", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Working root every path is confined to
    #[arg(long, global = true, env = "SANDGATE_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Script timeout in seconds
    #[arg(long, global = true, env = "SANDGATE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Interpreter used to run scripts (default: python3 or python from PATH)
    #[arg(long, global = true, env = "SANDGATE_INTERPRETER")]
    pub interpreter: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Args {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::default().with_timeout(Duration::from_secs(self.timeout))
    }
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// List files in a directory under the working root
    Ls {
        /// Directory relative to the working root
        #[arg(default_value = ".")]
        directory: String,
    },

    /// Run a script under the working root
    Run {
        /// Script path relative to the working root
        file: String,

        /// Arguments passed to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the tool declarations as JSON
    Tools,

    /// Dispatch a tool call by name
    Call {
        /// Tool name, e.g. get_files_info
        name: String,

        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },
}
