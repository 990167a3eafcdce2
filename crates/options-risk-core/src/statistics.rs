//! Probability of profit and return statistics.
//!
//! Price movement is modelled as normal with a standard deviation of
//! `S * sigma * sqrt(days / 365)`. Figures that cannot be computed from the
//! inputs are `None`, never NaN or infinity.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::OptionsRiskError;
use crate::strategy::{MarketData, Strategy};
use crate::types::*;
use crate::OptionsRiskResult;

// Zelen & Severo (1964) rational approximation to the normal CDF.
const INV_SQRT_2PI: f64 = 0.3989423;
const ZS_P: f64 = 0.2316419;
const ZS_B1: f64 = 0.3193815;
const ZS_B2: f64 = -0.3565638;
const ZS_B3: f64 = 1.781478;
const ZS_B4: f64 = -1.821256;
const ZS_B5: f64 = 1.330274;

/// Standard normal CDF, Zelen–Severo approximation (|error| < 7.5e-8).
pub fn norm_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + ZS_P * x.abs());
    let density = INV_SQRT_2PI * (-x * x / 2.0).exp();
    let poly = t * (ZS_B1 + t * (ZS_B2 + t * (ZS_B3 + t * (ZS_B4 + t * ZS_B5))));
    let upper_tail = density * poly;

    if x >= 0.0 {
        1.0 - upper_tail
    } else {
        upper_tail
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyStatistics {
    pub probability_of_profit: Option<Probability>,
    pub expected_value: Option<Money>,
    pub risk_reward_ratio: Option<Decimal>,
    /// Percent points.
    pub max_return_on_capital: Option<Percent>,
}

fn to_f64(value: Decimal, what: &str) -> OptionsRiskResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| OptionsRiskError::DegenerateInput(format!("{what} {value} is not representable")))
}

/// One standard deviation of the underlying price over the remaining term.
pub fn price_std_dev(market: &MarketData, days_per_year: f64) -> OptionsRiskResult<f64> {
    let vol = to_f64(market.volatility, "volatility")? / 100.0;
    let price = to_f64(market.underlying_price, "underlying price")?;
    let years = f64::from(market.days_to_expiration) / days_per_year;
    Ok(vol * years.sqrt() * price)
}

/// Probability that the underlying finishes beyond the nearest break-even,
/// `1 - 2 * N(-d / sd)`.
pub fn probability_of_profit(strategy: &Strategy, market: &MarketData) -> OptionsRiskResult<Probability> {
    probability_of_profit_with(strategy, market, &AnalysisConfig::default())
}

pub fn probability_of_profit_with(
    strategy: &Strategy,
    market: &MarketData,
    config: &AnalysisConfig,
) -> OptionsRiskResult<Probability> {
    let distance = strategy
        .break_even_points
        .iter()
        .map(|bp| (*bp - market.underlying_price).abs())
        .min()
        .ok_or_else(|| {
            OptionsRiskError::DegenerateInput(
                "no break-even points, probability of profit is unavailable".into(),
            )
        })?;

    let std_dev = price_std_dev(market, config.days_per_year)?;
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return Err(OptionsRiskError::DegenerateInput(
            "zero price standard deviation, probability of profit is unavailable".into(),
        ));
    }

    let z = to_f64(distance, "break-even distance")? / std_dev;
    let p = 1.0 - 2.0 * norm_cdf(-z);
    Ok(p.clamp(0.0, 1.0))
}

/// `max_profit * p + max_loss * (1 - p)`; unavailable for unlimited legs.
pub fn expected_value(
    max_profit: Option<Money>,
    max_loss: Option<Money>,
    probability: Option<Probability>,
) -> Option<Money> {
    let p = Decimal::from_f64(probability?)?;
    Some(max_profit? * p + max_loss? * (Decimal::ONE - p))
}

/// `|max_profit / max_loss|`; unavailable when either side is unlimited or
/// the loss is zero.
pub fn risk_reward_ratio(max_profit: Option<Money>, max_loss: Option<Money>) -> Option<Decimal> {
    let loss = max_loss?;
    if loss.is_zero() {
        return None;
    }
    Some((max_profit? / loss).abs())
}

/// `max_profit / margin * 100`. A zero or negative margin is an error; an
/// unlimited profit yields `None`.
pub fn max_return_on_capital(
    strategy: &Strategy,
    margin: Money,
) -> OptionsRiskResult<Option<Percent>> {
    if margin <= Decimal::ZERO {
        return Err(OptionsRiskError::DegenerateMargin {
            variant: strategy.variant.to_string(),
        });
    }
    Ok(strategy
        .max_profit
        .map(|profit| profit / margin * Decimal::ONE_HUNDRED))
}

pub fn compute_statistics(
    strategy: &Strategy,
    market: &MarketData,
    margin: Money,
    config: &AnalysisConfig,
) -> OptionsRiskResult<StrategyStatistics> {
    let probability = match probability_of_profit_with(strategy, market, config) {
        Ok(p) => Some(p),
        Err(OptionsRiskError::DegenerateInput(reason)) => {
            tracing::warn!(variant = %strategy.variant, %reason, "probability of profit unavailable");
            None
        }
        Err(e) => return Err(e),
    };

    Ok(StrategyStatistics {
        probability_of_profit: probability,
        expected_value: expected_value(strategy.max_profit, strategy.max_loss, probability),
        risk_reward_ratio: risk_reward_ratio(strategy.max_profit, strategy.max_loss),
        max_return_on_capital: max_return_on_capital(strategy, margin)?,
    })
}
