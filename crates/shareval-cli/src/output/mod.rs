pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use colored::Colorize;
use serde_json::Value;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => {
            csv_out::print_csv(value);
            print_warnings(value);
        }
        OutputFormat::Minimal => {
            minimal::print_minimal(value);
            print_warnings(value);
        }
    }
}

/// CSV and minimal output carry only the result, so warnings such as an
/// undefined increase ratio go to stderr instead of being dropped.
fn print_warnings(value: &Value) {
    for w in warnings(value) {
        eprintln!("{}: {}", "warning".yellow().bold(), w);
    }
}

fn warnings(value: &Value) -> Vec<&str> {
    value
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
