use serde_json::Value;
use std::io;

use super::{is_comparison, metric_string};

/// Write output as CSV to stdout.
///
/// Comparison results become one record per company with the cells'
/// display strings; other results flatten to field,value records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                if is_comparison(result) {
                    write_comparison_csv(&mut wtr, result);
                } else if let Value::Object(res_map) = result {
                    let _ = wtr.write_record(["field", "value"]);
                    write_object_records(&mut wtr, res_map, "");
                } else {
                    let _ = wtr.write_record([&format_csv_value(result)]);
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                write_object_records(&mut wtr, map, "");
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_comparison_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, result: &Value) {
    let columns = result["columns"].as_array().cloned().unwrap_or_default();
    let rows = result["rows"].as_array().cloned().unwrap_or_default();

    let mut headers = vec!["ticker".to_string(), "company".to_string()];
    headers.extend(
        columns
            .iter()
            .map(|c| c.as_str().unwrap_or_default().to_string()),
    );
    let _ = wtr.write_record(&headers);

    for row in &rows {
        let mut record = vec![
            row["ticker"].as_str().unwrap_or_default().to_string(),
            row["company"].as_str().unwrap_or_default().to_string(),
        ];
        if let Some(formatted) = row["formatted"].as_array() {
            record.extend(
                formatted
                    .iter()
                    .map(|c| c.as_str().unwrap_or_default().to_string()),
            );
        }
        let _ = wtr.write_record(&record);
    }
}

fn write_object_records(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
    prefix: &str,
) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(s) = metric_string(val) {
            let _ = wtr.write_record([label.as_str(), &s]);
        } else if let Value::Object(inner) = val {
            write_object_records(wtr, inner, &label);
        } else {
            let _ = wtr.write_record([label.as_str(), &format_csv_value(val)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
