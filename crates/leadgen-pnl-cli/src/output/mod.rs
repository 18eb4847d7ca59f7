pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` field of a computation envelope, or the value itself.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Grid payload of a matrix scan: `(columns, rows)`.
pub fn as_matrix(result: &Value) -> Option<(&Vec<Value>, &Vec<Value>)> {
    let map = result.as_object()?;
    match (map.get("columns"), map.get("rows"), map.get("break_even_cells")) {
        (Some(Value::Array(columns)), Some(Value::Array(rows)), Some(_)) => Some((columns, rows)),
        _ => None,
    }
}

/// An object whose every field is itself an object (one per business line
/// plus the total), as `(record names, field names in first-seen order)`.
pub fn as_record_set(result: &Value) -> Option<(&Map<String, Value>, Vec<String>)> {
    let map = result.as_object()?;
    if map.is_empty() || !map.values().all(Value::is_object) {
        return None;
    }
    let mut fields: Vec<String> = Vec::new();
    for record in map.values().filter_map(Value::as_object) {
        for key in record.keys() {
            if !fields.contains(key) {
                fields.push(key.clone());
            }
        }
    }
    Some((map, fields))
}

pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
