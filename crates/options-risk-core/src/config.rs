//! Analysis limits and model constants.
//!
//! `AnalysisConfig::default()` carries the standard constants. Every field
//! is optional when deserialising, so an override file only needs the
//! values it changes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::OptionsRiskError;
use crate::strategy::ExpiryTerm;
use crate::OptionsRiskResult;

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Bounds {
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Inclusive window of calendar days to expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub min_days: i64,
    pub max_days: i64,
}

impl DayWindow {
    pub const fn new(min_days: i64, max_days: i64) -> Self {
        Self { min_days, max_days }
    }

    pub fn contains(&self, days: i64) -> bool {
        days >= self.min_days && days <= self.max_days
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiryWindows {
    pub weekly: DayWindow,
    pub monthly: DayWindow,
    pub quarterly: DayWindow,
    pub leaps: DayWindow,
}

impl Default for ExpiryWindows {
    fn default() -> Self {
        Self {
            weekly: DayWindow::new(1, 7),
            monthly: DayWindow::new(8, 45),
            quarterly: DayWindow::new(46, 180),
            leaps: DayWindow::new(181, 730),
        }
    }
}

impl ExpiryWindows {
    pub fn window(&self, term: ExpiryTerm) -> DayWindow {
        match term {
            ExpiryTerm::Weekly => self.weekly,
            ExpiryTerm::Monthly => self.monthly,
            ExpiryTerm::Quarterly => self.quarterly,
            ExpiryTerm::Leaps => self.leaps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub underlying_price: Bounds,
    pub strike: Bounds,
    pub premium: Bounds,
    pub quantity: Bounds,
    /// Percent points.
    pub volatility: Bounds,
    /// Percent points.
    pub risk_free_rate: Bounds,
    /// Percent points.
    pub dividend_yield: Bounds,
    pub expiry_windows: ExpiryWindows,
    /// Number of equal steps in the P&L grid; the curve has `steps + 1` points.
    pub curve_steps: u32,
    /// Half-width of the P&L grid in standard deviations of the underlying.
    pub curve_std_devs: Decimal,
    /// Lowest price the P&L grid may start at.
    pub curve_floor: Decimal,
    pub days_per_year: f64,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            underlying_price: Bounds::new(dec!(0.01), dec!(10000)),
            strike: Bounds::new(dec!(0.01), dec!(10000)),
            premium: Bounds::new(dec!(0.01), dec!(1000)),
            quantity: Bounds::new(dec!(1), dec!(100)),
            volatility: Bounds::new(dec!(1), dec!(200)),
            risk_free_rate: Bounds::new(dec!(0), dec!(20)),
            dividend_yield: Bounds::new(dec!(0), dec!(20)),
            expiry_windows: ExpiryWindows::default(),
            curve_steps: 100,
            curve_std_devs: dec!(3),
            curve_floor: dec!(0.01),
            days_per_year: 365.0,
            cache_capacity: 256,
            cache_ttl_secs: 300,
        }
    }
}

impl AnalysisConfig {
    /// Reject override files that would make the engine meaningless.
    pub fn check(&self) -> OptionsRiskResult<()> {
        let ranges = [
            ("underlying_price", self.underlying_price),
            ("strike", self.strike),
            ("premium", self.premium),
            ("quantity", self.quantity),
            ("volatility", self.volatility),
            ("risk_free_rate", self.risk_free_rate),
            ("dividend_yield", self.dividend_yield),
        ];
        for (name, bounds) in ranges {
            if bounds.min > bounds.max {
                return Err(OptionsRiskError::Configuration(format!(
                    "{name}: min {} exceeds max {}",
                    bounds.min, bounds.max
                )));
            }
        }

        for term in ExpiryTerm::ALL {
            let w = self.expiry_windows.window(term);
            if w.min_days > w.max_days {
                return Err(OptionsRiskError::Configuration(format!(
                    "expiry window {term}: {} days exceeds {} days",
                    w.min_days, w.max_days
                )));
            }
        }

        if self.curve_steps == 0 {
            return Err(OptionsRiskError::Configuration(
                "curve_steps must be at least 1".into(),
            ));
        }
        if self.curve_std_devs <= Decimal::ZERO || self.curve_floor <= Decimal::ZERO {
            return Err(OptionsRiskError::Configuration(
                "curve_std_devs and curve_floor must be positive".into(),
            ));
        }
        if self.days_per_year <= 0.0 {
            return Err(OptionsRiskError::Configuration(
                "days_per_year must be positive".into(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(OptionsRiskError::Configuration(
                "cache_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
