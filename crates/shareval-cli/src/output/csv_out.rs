use serde_json::{Map, Value};
use std::io;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if result.contains_key("final_values") => {
                write_grid(&mut wtr, result);
            }
            Some(Value::Object(result)) => write_fields(&mut wtr, result),
            _ => write_fields(&mut wtr, map),
        },
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// Two-column `field,value`; comparison entries expand to `figure.side`.
fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        match val {
            Value::Object(parts) => {
                for (side, v) in parts {
                    let _ = wtr.write_record([format!("{key}.{side}"), format_csv_value(v)]);
                }
            }
            _ => {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
    }
}

/// One row per growth rate and grid, one column per horizon.
fn write_grid(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let years: Vec<String> = map
        .get("years")
        .and_then(Value::as_array)
        .map(|ys| ys.iter().map(format_csv_value).collect())
        .unwrap_or_default();
    let rates = map
        .get("growth_rates")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut header = vec!["grid".to_string(), "growth_rate_pct".to_string()];
    header.extend(years);
    let _ = wtr.write_record(&header);

    for grid in ["final_values", "owned_values"] {
        let Some(rows) = map.get(grid).and_then(Value::as_array) else {
            continue;
        };
        for (rate, row) in rates.iter().zip(rows) {
            let mut record = vec![grid.to_string(), format_csv_value(rate)];
            if let Value::Array(values) = row {
                record.extend(values.iter().map(format_csv_value));
            }
            let _ = wtr.write_record(&record);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
