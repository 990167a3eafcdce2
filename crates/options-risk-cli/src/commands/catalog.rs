use serde_json::Value;

use options_risk_core::strategy::catalog::STRATEGY_CATALOG;

/// Every supported variant with its leg limit and classification.
pub fn run_catalog() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(&STRATEGY_CATALOG[..])?)
}
