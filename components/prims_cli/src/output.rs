//! Scenario reports and their text/JSON rendering

use std::fmt;

use crate::cli::OutputFormat;
use crate::error::CliResult;
use async_runtime::{Promise, Settlement};
use core_types::Value;
use serde::Serialize;
use serde_json::json;

/// How a scenario finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The combinator's promise fulfilled
    Fulfilled,
    /// The combinator's promise rejected
    Rejected,
    /// A synchronous sequence utility returned
    Returned,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Status::Fulfilled => "fulfilled",
            Status::Rejected => "rejected",
            Status::Returned => "returned",
        })
    }
}

/// One line of output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Operation name, e.g. `Promise.race` or `map`
    pub name: String,
    /// Outcome
    pub status: Status,
    /// Result value, reason or return value
    pub value: serde_json::Value,
    /// Loop time at which a combinator settled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at_ms: Option<u64>,
}

impl Report {
    /// Report for a settled combinator.
    pub fn settled(name: &str, settlement: Settlement, at_ms: u64) -> Self {
        let status = if settlement.is_fulfilled() {
            Status::Fulfilled
        } else {
            Status::Rejected
        };
        Self {
            name: name.to_string(),
            status,
            value: to_json(&settlement.into_value()),
            settled_at_ms: Some(at_ms),
        }
    }

    /// Report for a sequence utility's return value.
    pub fn returned(name: &str, value: &Value) -> Self {
        Self {
            name: name.to_string(),
            status: Status::Returned,
            value: to_json(value),
            settled_at_ms: None,
        }
    }
}

/// Converts a runtime value to JSON.
///
/// Holes, `undefined` and non-finite numbers become `null`. BigInts are
/// written as decimal strings; functions and host objects as tags.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Undefined | Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => json!(b),
        Value::Smi(n) => json!(n),
        Value::Double(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => json!(s),
        Value::BigInt(n) => json!(n.to_string()),
        Value::Array(data) => serde_json::Value::Array(
            data.borrow()
                .elements
                .iter()
                .map(|slot| slot.as_ref().map_or(serde_json::Value::Null, to_json))
                .collect(),
        ),
        Value::Function(f) => json!(format!("[Function: {}]", f.name())),
        Value::NativeObject(_) => match Promise::from_value(value) {
            Some(promise) => json!(format!("[Promise #{}]", promise.id())),
            None => json!("[object]"),
        },
    }
}

/// Renders reports in the requested format.
pub fn render(reports: &[Report], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => Ok(reports
            .iter()
            .map(render_line)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn render_line(report: &Report) -> String {
    let mut line = format!("{:<22} {:<9} {}", report.name, report.status, report.value);
    if let Some(at) = report.settled_at_ms {
        line.push_str(&format!(" (after {} ms)", at));
    }
    line
}
