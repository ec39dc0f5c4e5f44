pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a serialized metric as its display string: a bare value with an
/// asterisk when estimated, or the N/A and NM sentinels. Returns None for
/// values that are not metrics.
pub(crate) fn metric_string(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    match map.get("status")?.as_str()? {
        "value" => {
            let v = map.get("value")?;
            let body = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if map.get("estimated").and_then(Value::as_bool) == Some(true) {
                Some(format!("{}*", body))
            } else {
                Some(body)
            }
        }
        "not_available" => Some("N/A".to_string()),
        "not_meaningful" => Some("NM".to_string()),
        _ => None,
    }
}

/// True when the result object is a comparison table.
pub(crate) fn is_comparison(result: &Value) -> bool {
    result
        .as_object()
        .map(|m| m.contains_key("columns") && m.contains_key("rows"))
        .unwrap_or(false)
}
