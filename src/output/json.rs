//! JSON output formatting

use crate::engine::gateway::ResultData;
use crate::error::Result;
use serde_json::{json, Value};

pub fn format_json(result: &Result<ResultData>) -> String {
    let data: Value = match result {
        Ok(data) => json!({ "ok": serde_json::to_value(data).unwrap_or(json!(null)) }),
        Err(e) => json!({ "error": e.to_string() }),
    };

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}
