//! Human-readable output formatting
//!
//! This is the text an agent sees. Failures always start with `Error: `.

use crate::engine::files::DirectoryEntry;
use crate::engine::gateway::ResultData;
use crate::error::{GatewayError, Result};
use crate::script::ExecutionOutcome;

pub fn format_human(result: &Result<ResultData>) -> String {
    match result {
        Ok(ResultData::Listing(entries)) => format_listing(entries),
        Ok(ResultData::Execution(outcome)) => format_execution(outcome),
        Err(e) => format_error(e),
    }
}

/// One `- name: file_size=N bytes, is_dir=True|False` line per entry, in order.
pub fn format_listing(entries: &[DirectoryEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "- {}: file_size={} bytes, is_dir={}",
                entry.name,
                entry.size_bytes,
                if entry.is_dir { "True" } else { "False" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_execution(outcome: &ExecutionOutcome) -> String {
    let mut lines = Vec::new();

    if outcome.timed_out {
        lines.push(format!(
            "Process timed out after {} seconds",
            format_seconds(outcome.timeout_ms)
        ));
    } else {
        match (outcome.exit_code, outcome.signal) {
            (Some(0), _) => {}
            (Some(code), _) => lines.push(format!("Process exited with code {}", code)),
            (None, Some(signal)) => lines.push(format!("Process terminated by signal {}", signal)),
            (None, None) => lines.push("Process terminated without an exit code".to_string()),
        }
    }

    if !outcome.stdout.is_empty() {
        lines.push(format!("STDOUT: {}", outcome.stdout));
    }
    if !outcome.stderr.is_empty() {
        lines.push(format!("STDERR: {}", outcome.stderr));
    }
    if outcome.stdout.is_empty() && outcome.stderr.is_empty() {
        lines.push("No output produced".to_string());
    }

    lines.join("\n")
}

/// Whole seconds print bare, anything else with one decimal.
fn format_seconds(ms: u64) -> String {
    if ms % 1000 == 0 {
        (ms / 1000).to_string()
    } else {
        format!("{:.1}", ms as f64 / 1000.0)
    }
}

pub fn format_error(error: &GatewayError) -> String {
    format!("Error: {}", error)
}
