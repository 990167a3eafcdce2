use serde_json::Value;
use std::io;

use super::format_cell;

/// Write output as CSV to stdout. An analysis envelope is written as its
/// profit/loss curve, one row per grid price.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let curve = value
        .pointer("/result/risk_profile/profit_loss_curve")
        .and_then(Value::as_array);

    match (value, curve) {
        (_, Some(points)) => write_array_csv(&mut wtr, points),
        (Value::Array(arr), None) => write_array_csv(&mut wtr, arr),
        (Value::Object(map), None) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &csv_cell(val)]);
            }
        }
        (other, None) => {
            let _ = wtr.write_record([&csv_cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(first) = arr.first() else {
        return;
    };

    if let Value::Object(first) = first {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(csv_cell).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&csv_cell(item)]);
        }
    }
}

/// Empty cell for null, so spreadsheets read it as missing.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        _ => format_cell(value),
    }
}
