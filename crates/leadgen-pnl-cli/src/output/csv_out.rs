use serde_json::Value;
use std::io::{self, Write};

use super::{as_matrix, as_record_set, format_scalar, result_of};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, result_of(value));
    let _ = wtr.flush();
}

fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, result: &Value) {
    if let Some((_, rows)) = as_matrix(result) {
        // Long format: one line per grid cell
        let _ = wtr.write_record(["leads", "cost", "profit", "roi"]);
        for cell in rows
            .iter()
            .filter_map(|r| r.get("cells"))
            .filter_map(Value::as_array)
            .flatten()
        {
            let field = |k: &str| cell.get(k).map(format_scalar).unwrap_or_default();
            let _ = wtr.write_record([field("leads"), field("cost"), field("profit"), field("roi")]);
        }
        return;
    }

    if let Some((records, fields)) = as_record_set(result) {
        let mut header = vec!["field".to_string()];
        header.extend(records.keys().cloned());
        let _ = wtr.write_record(&header);
        for field in &fields {
            let mut row = vec![field.clone()];
            row.extend(
                records
                    .values()
                    .map(|r| r.get(field).map(format_scalar).unwrap_or_default()),
            );
            let _ = wtr.write_record(&row);
        }
        return;
    }

    match result {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr),
        other => {
            let _ = wtr.write_record([&format_scalar(other)]);
        }
    }
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
