use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{is_comparison, metric_string};

/// Format output as a table using the tabled crate.
///
/// Comparison results render as a company-per-row grid with the cells'
/// pre-formatted display strings; everything else falls back to a
/// field/value listing of the result object.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                if is_comparison(result) {
                    print_comparison_table(result);
                } else {
                    print_result_table(result);
                }
                print_envelope_footer(map);
            } else {
                print_flat_object(value, "");
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_comparison_table(result: &Value) {
    let columns = result["columns"].as_array().cloned().unwrap_or_default();
    let rows = result["rows"].as_array().cloned().unwrap_or_default();

    let mut builder = Builder::default();
    let mut headers = vec!["Ticker".to_string(), "Company".to_string()];
    headers.extend(
        columns
            .iter()
            .map(|c| c.as_str().unwrap_or_default().to_string()),
    );
    builder.push_record(headers);

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
        builder.push_record(record);
    }

    let table = Table::from(builder);
    println!("{}", table);
}

fn print_result_table(result: &Value) {
    if let Value::Object(_) = result {
        print_flat_object(result, "");
    } else {
        println!("{}", result);
    }
}

/// Field/value listing. Metrics render through their display strings and
/// nested objects flatten one level with a dotted prefix.
fn print_flat_object(value: &Value, prefix: &str) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        push_object_records(&mut builder, map, prefix);
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn push_object_records(builder: &mut Builder, map: &serde_json::Map<String, Value>, prefix: &str) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(s) = metric_string(val) {
            builder.push_record([label.as_str(), &s]);
        } else if let Value::Object(inner) = val {
            push_object_records(builder, inner, &label);
        } else {
            builder.push_record([label.as_str(), &format_value(val)]);
        }
    }
}

fn print_envelope_footer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
