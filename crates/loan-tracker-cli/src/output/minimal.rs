use serde_json::Value;

use super::cell;

/// Fields tried in order when printing a single answer.
const PRIORITY_KEYS: [&str; 6] = [
    "progress",
    "remaining_amount",
    "total_remaining",
    "deleted",
    "id",
    "total",
];

/// Print just the key answer value from the output.
///
/// Envelopes are unwrapped to their `result`; arrays print one key value per
/// line so monthly totals and payment lists stay scriptable.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(items) => {
            for item in items {
                println!("{}", key_answer(item));
            }
        }
        other => println!("{}", key_answer(other)),
    }
}

fn key_answer(value: &Value) -> String {
    let Value::Object(map) = value else {
        return cell(value);
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key) {
            if !val.is_null() {
                return cell(val);
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, cell(val)),
        None => String::new(),
    }
}
