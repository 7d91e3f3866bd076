pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Render a scalar for a single table or CSV cell. Nested values are
/// flattened so a loan's payments fit in one cell.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) if arr.iter().all(Value::is_object) => format!("{} item(s)", arr.len()),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Column names taken from the first object of an array.
pub(crate) fn headers(arr: &[Value]) -> Option<Vec<String>> {
    match arr.first() {
        Some(Value::Object(first)) => Some(first.keys().cloned().collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_flattens_payment_lists() {
        let payments = json!([{"id": "a"}, {"id": "b"}]);
        assert_eq!(cell(&payments), "2 item(s)");
        assert_eq!(cell(&json!(["x", 1])), "x, 1");
        assert_eq!(cell(&Value::Null), "");
        assert_eq!(cell(&json!("244000")), "244000");
    }

    #[test]
    fn test_headers_from_first_object() {
        let rows = vec![json!({"month": "2024-01-01", "total": "300"})];
        assert_eq!(
            headers(&rows),
            Some(vec!["month".to_string(), "total".to_string()])
        );
        assert_eq!(headers(&[json!(1)]), None);
    }
}
