use serde_json::Value;

use super::metric_string;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "label",
        "rate",
        "net_margin",
        "gross_margin",
        "enterprise_value",
    ];

    if let Value::Object(map) = result_obj {
        // The headline of a deal analysis is what the buyer pays
        if let Some(consideration) = map
            .get("transaction")
            .and_then(|t| t.get("total_consideration"))
        {
            println!("{}", format_minimal(consideration));
            return;
        }

        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    if let Some(s) = metric_string(value) {
        return s;
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
