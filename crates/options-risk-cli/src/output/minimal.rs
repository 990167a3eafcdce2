use serde_json::Value;

use super::format_cell;

/// Print just the headline figure.
///
/// For a full analysis that is the probability of profit; otherwise the
/// first well-known field present, then the first field of the object.
pub fn print_minimal(value: &Value) {
    if let Some(p) = value.pointer("/result/risk_profile/profit_probability") {
        println!("{}", format_cell(p));
        return;
    }

    let priority_keys = ["valid", "net_delta_equivalent", "total_delta"];

    if let Value::Object(map) = value {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_cell(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_cell(val));
            return;
        }
    }

    if let Value::Array(arr) = value {
        println!("{} rows", arr.len());
        return;
    }

    println!("{}", format_cell(value));
}
