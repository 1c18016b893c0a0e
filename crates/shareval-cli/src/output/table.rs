use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_fields(map);
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) if is_sweep(res_map) => {
            print_grid(res_map, "final_values", "Final value per share");
            println!();
            print_grid(res_map, "owned_values", "Owned stake value");
        }
        Value::Object(res_map) => {
            let (scalars, changes): (Map<String, Value>, Map<String, Value>) = res_map
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .partition(|(_, v)| !v.is_object());
            if !scalars.is_empty() {
                print_fields(&scalars);
            }
            if !changes.is_empty() {
                print_changes(&changes);
            }
        }
        _ => print_fields(envelope),
    }

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

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

/// One row per compared figure, one column per side of the comparison.
fn print_changes(changes: &Map<String, Value>) {
    let columns: Vec<String> = match changes.values().next() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => return,
    };

    let mut builder = Builder::default();
    let mut header = vec!["Figure".to_string()];
    header.extend(columns.iter().cloned());
    builder.push_record(header);

    for (name, change) in changes {
        let mut row = vec![name.clone()];
        row.extend(columns.iter().map(|c| {
            change
                .get(c.as_str())
                .map(format_value)
                .unwrap_or_default()
        }));
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn is_sweep(map: &Map<String, Value>) -> bool {
    map.contains_key("growth_rates") && map.contains_key("final_values")
}

/// Growth rates down the side, horizons across the top.
fn print_grid(map: &Map<String, Value>, key: &str, title: &str) {
    let years = map.get("years").and_then(Value::as_array);
    let rates = map.get("growth_rates").and_then(Value::as_array);
    let rows = map.get(key).and_then(Value::as_array);
    let (Some(years), Some(rates), Some(rows)) = (years, rates, rows) else {
        return;
    };

    let mut builder = Builder::default();
    let mut header = vec!["Growth %".to_string()];
    header.extend(years.iter().map(|y| format!("{}y", format_value(y))));
    builder.push_record(header);

    for (rate, row) in rates.iter().zip(rows) {
        let mut cells = vec![format_value(rate)];
        if let Value::Array(values) = row {
            cells.extend(values.iter().map(format_value));
        }
        builder.push_record(cells);
    }

    println!("{}", title);
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
