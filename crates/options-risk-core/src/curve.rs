//! Profit/loss curve across a price grid centred on the underlying.
//!
//! Greeks are carried as static per-leg inputs, so every point shows the
//! same net Delta/Gamma/Theta. The curve is an expiry payoff profile and
//! makes no attempt to re-price the legs at each grid price.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::greeks::{self, GreeksExposure};
use crate::payoff;
use crate::strategy::{MarketData, OptionLeg, Strategy};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLossPoint {
    pub price: Price,
    pub profit_loss: Money,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
}

/// Grid of `steps + 1` prices from `max(floor, S - k*sd)` to `S + k*sd`,
/// where `sd = S * volatility / 100`.
pub fn price_grid(market: &MarketData, config: &AnalysisConfig) -> Vec<Price> {
    let s = market.underlying_price;
    let std_dev = s * market.volatility / Decimal::ONE_HUNDRED;
    let half_width = config.curve_std_devs * std_dev;

    let high = s + half_width;
    let low = (s - half_width).max(config.curve_floor).min(high);
    let steps = config.curve_steps.max(1);
    let step_size = (high - low) / Decimal::from(steps);

    (0..=steps)
        .map(|i| {
            // Pin the last point so rounding in step_size never pulls it below high
            if i == steps {
                high
            } else {
                low + step_size * Decimal::from(i)
            }
        })
        .collect()
}

fn point_at(price: Price, legs: &[OptionLeg], exposure: &GreeksExposure) -> ProfitLossPoint {
    ProfitLossPoint {
        price,
        profit_loss: payoff::profit_loss(price, legs),
        delta: exposure.total_delta,
        gamma: exposure.total_gamma,
        theta: exposure.total_theta,
    }
}

/// Evaluate `legs` at every grid price. Points are independent; with the
/// `parallel` feature they are computed on the rayon pool and collected in
/// grid order.
pub fn curve_for_legs(
    legs: &[OptionLeg],
    market: &MarketData,
    config: &AnalysisConfig,
) -> Vec<ProfitLossPoint> {
    let grid = price_grid(market, config);
    let exposure = greeks::aggregate(legs);

    #[cfg(feature = "parallel")]
    let points = grid
        .par_iter()
        .map(|&price| point_at(price, legs, &exposure))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let points = grid
        .iter()
        .map(|&price| point_at(price, legs, &exposure))
        .collect();

    points
}

/// Profit/loss curve with the standard grid (100 steps, ±3 standard deviations).
pub fn curve(strategy: &Strategy, market: &MarketData) -> Vec<ProfitLossPoint> {
    curve_with(strategy, market, &AnalysisConfig::default())
}

pub fn curve_with(
    strategy: &Strategy,
    market: &MarketData,
    config: &AnalysisConfig,
) -> Vec<ProfitLossPoint> {
    curve_for_legs(&strategy.legs, market, config)
}
