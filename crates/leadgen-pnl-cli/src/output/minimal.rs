use serde_json::Value;

use super::{format_scalar, result_of};

/// Key answer fields, in order of priority.
const PRIORITY_KEYS: [&str; 6] = [
    "gross_profit",
    "text",
    "message",
    "total_gross_profit",
    "break_even_cells",
    "cleared",
];

/// Print just the key answer value from the output.
///
/// Looks inside `total` for P&L results, then walks the priority list,
/// then falls back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result = result_of(value);
    let target = result.get("total").unwrap_or(result);

    if let Value::Object(map) = target {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
        {
            return format_minimal(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }
    format_minimal(target)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(|i| i.get("cost").is_some()) => items
            .iter()
            .map(|cell| {
                let get = |k: &str| cell.get(k).map(format_scalar).unwrap_or_default();
                format!("{}@{}", get("leads"), get("cost"))
            })
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => "null".to_string(),
        other => format_scalar(other),
    }
}
