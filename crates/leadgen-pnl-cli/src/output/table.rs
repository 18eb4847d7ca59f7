use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{as_matrix, as_record_set, format_scalar, result_of};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    if let Some((columns, rows)) = as_matrix(result) {
        print_matrix(columns, rows);
        print_break_even(result);
    } else if let Some((records, fields)) = as_record_set(result) {
        print_records(records, &fields);
    } else {
        match result {
            Value::Object(map) => print_flat_object(map),
            Value::Array(arr) => print_array_table(arr),
            other => println!("{}", format_scalar(other)),
        }
    }

    if let Some(envelope) = value.as_object() {
        print_envelope_notes(envelope);
    }
}

/// One column per record (business line), one row per field.
fn print_records(records: &Map<String, Value>, fields: &[String]) {
    let mut builder = Builder::default();
    let mut header = vec!["Field".to_string()];
    header.extend(records.keys().cloned());
    builder.push_record(header);

    for field in fields {
        let mut row = vec![field.clone()];
        row.extend(
            records
                .values()
                .map(|r| r.get(field).map(format_scalar).unwrap_or_default()),
        );
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

/// Profit grid: lead volume down, cost per lead across.
fn print_matrix(columns: &[Value], rows: &[Value]) {
    if columns.is_empty() || rows.is_empty() {
        println!("(empty grid)");
        return;
    }
    let mut builder = Builder::default();
    let mut header = vec!["leads \\ cost".to_string()];
    header.extend(columns.iter().map(format_scalar));
    builder.push_record(header);

    for row in rows {
        let mut record = vec![row.get("leads").map(format_scalar).unwrap_or_default()];
        if let Some(Value::Array(cells)) = row.get("cells") {
            record.extend(
                cells
                    .iter()
                    .map(|c| c.get("profit").map(format_scalar).unwrap_or_default()),
            );
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_break_even(result: &Value) {
    if let Some(Value::Array(cells)) = result.get("break_even_cells") {
        if !cells.is_empty() {
            println!("\nBreak-even cells:");
            print_array_table(cells);
        }
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr.iter().filter_map(Value::as_object) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| item.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_scalar(item));
        }
    }
}
