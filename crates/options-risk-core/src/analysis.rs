use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cache::{cache_key, AnalysisCache, CacheKey};
use crate::clock::{Clock, SystemClock};
use crate::config::AnalysisConfig;
use crate::error::OptionsRiskError;
use crate::greeks::{self, GreeksExposure};
use crate::payoff;
use crate::risk_profile::{self, RiskProfile};
use crate::statistics::{self, StrategyStatistics};
use crate::strategy::{MarketData, Strategy, StrategyVariant};
use crate::types::*;
use crate::validation;
use crate::OptionsRiskResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// The document a caller submits for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub symbol: String,
    pub strategy: Strategy,
    pub market: MarketData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAnalysis {
    pub symbol: String,
    pub strategy_name: String,
    pub variant: StrategyVariant,
    /// Paid (positive) or received (negative) to open.
    pub net_premium: Money,
    pub greeks: GreeksExposure,
    pub statistics: StrategyStatistics,
    pub risk_profile: RiskProfile,
}

pub type AnalysisOutput = ComputationOutput<StrategyAnalysis>;

// ---------------------------------------------------------------------------
// Validation gate
// ---------------------------------------------------------------------------

/// Run every validation rule; any failure stops the analysis.
pub fn check_input(
    input: &AnalysisInput,
    config: &AnalysisConfig,
    clock: &dyn Clock,
) -> OptionsRiskResult<()> {
    let errors = validation::validate_with(
        config,
        clock,
        &input.symbol,
        input.market.underlying_price,
        &input.strategy,
        &input.market,
    );
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::warn!(
            symbol = %input.symbol,
            count = errors.len(),
            "strategy input rejected"
        );
        Err(OptionsRiskError::Validation(errors))
    }
}

// ---------------------------------------------------------------------------
// Main functions
// ---------------------------------------------------------------------------

pub fn analyze(input: &AnalysisInput) -> OptionsRiskResult<AnalysisOutput> {
    analyze_with(input, &AnalysisConfig::default(), &SystemClock)
}

pub fn analyze_with(
    input: &AnalysisInput,
    config: &AnalysisConfig,
    clock: &dyn Clock,
) -> OptionsRiskResult<AnalysisOutput> {
    let start = Instant::now();
    check_input(input, config, clock)?;

    let strategy = &input.strategy;
    let market = &input.market;
    tracing::debug!(
        symbol = %input.symbol,
        variant = %strategy.variant,
        legs = strategy.legs.len(),
        "analysing strategy"
    );

    let margin = risk_profile::margin_requirement(strategy, market)?;
    let stats = statistics::compute_statistics(strategy, market, margin, config)?;
    let profile = risk_profile::assemble(strategy, market, margin, &stats, config);

    let mut warnings: Vec<String> = Vec::new();
    if strategy.max_profit.is_none() {
        warnings.push("Profit potential is theoretically unlimited".to_string());
    }
    if strategy.max_loss.is_none() {
        warnings.push("Loss potential is theoretically unlimited".to_string());
    }
    if stats.probability_of_profit.is_none() {
        warnings.push(
            "Probability of profit unavailable: no break-even points or zero price dispersion"
                .to_string(),
        );
    }
    if let Some(supplied) = strategy.margin_requirement {
        let formula = strategy
            .config()
            .margin_requirement(&strategy.legs, market.underlying_price)
            .ok();
        if formula != Some(supplied) {
            warnings.push(format!(
                "Supplied margin requirement {supplied} used instead of the catalog formula"
            ));
        }
    }

    let output = StrategyAnalysis {
        symbol: input.symbol.clone(),
        strategy_name: strategy.variant.to_string(),
        variant: strategy.variant,
        net_premium: payoff::net_premium(&strategy.legs),
        greeks: greeks::aggregate(&strategy.legs),
        statistics: stats,
        risk_profile: profile,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    tracing::debug!(symbol = %input.symbol, elapsed_us = elapsed, "strategy analysed");

    Ok(with_metadata(
        "Multi-Leg Option Strategy Risk Profile — Expiry Payoff, Static Greeks, Normal Price Model",
        &serde_json::json!({
            "variant": strategy.variant,
            "underlying_price": market.underlying_price.to_string(),
            "volatility_pct": market.volatility.to_string(),
            "days_to_expiration": market.days_to_expiration,
            "num_legs": strategy.legs.len(),
            "curve_steps": config.curve_steps,
            "curve_std_devs": config.curve_std_devs.to_string(),
            "contract_multiplier": CONTRACT_MULTIPLIER.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[derive(Serialize)]
struct CacheKeyParts<'a> {
    input: &'a AnalysisInput,
    config: &'a AnalysisConfig,
    as_of: NaiveDate,
}

/// Analyse through `cache`. The key covers the input, the config and the
/// clock's date, since expiry checks depend on all three.
pub fn analyze_cached(
    cache: &AnalysisCache<CacheKey, AnalysisOutput>,
    input: &AnalysisInput,
    config: &AnalysisConfig,
    clock: &dyn Clock,
) -> OptionsRiskResult<AnalysisOutput> {
    let key = cache_key(&CacheKeyParts {
        input,
        config,
        as_of: clock.today(),
    })?;
    cache.get_or_try_insert_with(key, || analyze_with(input, config, clock))
}
