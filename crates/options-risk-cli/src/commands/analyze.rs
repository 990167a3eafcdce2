use clap::Args;
use serde_json::Value;

use options_risk_core::analysis::{self, AnalysisInput};
use options_risk_core::curve;
use options_risk_core::greeks;
use options_risk_core::OptionsRiskError;

use super::GlobalOptions;
use crate::input;

/// Read an `AnalysisInput` from `--input` or piped stdin.
fn load_input(path: &Option<String>, what: &str) -> Result<AnalysisInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json(path)
    } else if let Some(doc) = input::stdin::read_stdin()? {
        Ok(doc)
    } else {
        Err(OptionsRiskError::InvalidInput {
            field: "--input".into(),
            reason: format!("a JSON file or piped stdin is required for {}", what),
        }
        .into())
    }
}

/// Arguments for a full strategy analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs, globals: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = load_input(&args.input, "strategy analysis")?;
    let clock = globals.clock();
    let result = analysis::analyze_with(&doc, &globals.config, clock.as_ref())?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for input validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_validate(args: ValidateArgs, globals: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = load_input(&args.input, "validation")?;
    let clock = globals.clock();
    analysis::check_input(&doc, &globals.config, clock.as_ref())?;
    Ok(serde_json::json!({ "valid": true, "symbol": doc.symbol }))
}

/// Arguments for the profit/loss curve
#[derive(Args)]
pub struct CurveArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_curve(args: CurveArgs, globals: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = load_input(&args.input, "profit/loss curve")?;
    let clock = globals.clock();
    analysis::check_input(&doc, &globals.config, clock.as_ref())?;
    let points = curve::curve_with(&doc.strategy, &doc.market, &globals.config);
    Ok(serde_json::to_value(points)?)
}

/// Arguments for Greeks aggregation
#[derive(Args)]
pub struct GreeksArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_greeks(args: GreeksArgs, globals: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = load_input(&args.input, "Greeks aggregation")?;
    let clock = globals.clock();
    analysis::check_input(&doc, &globals.config, clock.as_ref())?;
    let exposure = greeks::aggregate(&doc.strategy.legs);
    Ok(serde_json::to_value(exposure)?)
}
