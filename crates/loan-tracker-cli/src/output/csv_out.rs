use serde_json::Value;
use std::io;

use super::{cell, headers};

/// Write output as CSV to stdout.
///
/// Arrays (loan lists, payment histories, monthly totals) become one row per
/// item. Envelopes become `field,value` pairs of their result, except a
/// portfolio summary, whose per-loan rows are written instead.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match result.get("loans") {
                Some(Value::Array(loans)) => write_rows(&mut wtr, loans),
                _ => write_pairs(&mut wtr, result.iter()),
            },
            _ => write_pairs(&mut wtr, map.iter()),
        },
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => wtr.write_record([cell(value)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_pairs<'a, W: io::Write>(
    wtr: &mut csv::Writer<W>,
    fields: impl Iterator<Item = (&'a String, &'a Value)>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key.as_str(), &cell(val)])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(columns) = headers(arr) else {
        for item in arr {
            wtr.write_record([cell(item)])?;
        }
        return Ok(());
    };

    wtr.write_record(&columns)?;
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = columns
            .iter()
            .map(|h| map.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}
