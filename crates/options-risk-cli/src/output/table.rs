use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_cell;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if result.contains_key("risk_profile") => {
                print_analysis(result, map)
            }
            _ => print_flat_object(map),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_analysis(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let profile = result.get("risk_profile").and_then(Value::as_object);
    let stats = result.get("statistics").and_then(Value::as_object);
    let pick = |obj: Option<&Map<String, Value>>, key: &str| {
        obj.and_then(|o| o.get(key)).map(format_cell).unwrap_or_default()
    };

    let mut summary = Builder::default();
    summary.push_record(["Field", "Value"]);
    let top = Some(result);
    let rows = [
        ("symbol", pick(top, "symbol")),
        ("strategy", pick(top, "strategy_name")),
        ("net_premium", pick(top, "net_premium")),
        ("max_profit", pick(profile, "max_profit")),
        ("max_loss", pick(profile, "max_loss")),
        ("break_even_points", pick(profile, "break_even_points")),
        ("margin_requirement", pick(profile, "margin_requirement")),
        ("return_on_risk_pct", pick(profile, "return_on_risk")),
        ("profit_probability", pick(profile, "profit_probability")),
        ("expected_value", pick(stats, "expected_value")),
        ("risk_reward_ratio", pick(stats, "risk_reward_ratio")),
        ("risk_level", pick(profile, "risk_level")),
        ("profit_potential", pick(profile, "profit_potential")),
    ];
    for (field, val) in rows {
        summary.push_record([field.to_string(), val]);
    }
    println!("{}", Table::from(summary));

    if let Some(Value::Object(greeks)) = result.get("greeks") {
        println!("\nGreeks:");
        print_flat_object(greeks);
    }

    if let Some(Value::Array(curve)) = profile.and_then(|p| p.get("profit_loss_curve")) {
        println!("\nProfit/loss at expiry:");
        print_array_table(curve);
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

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_cell(val)]);
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

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_cell(item));
        }
    }
}
