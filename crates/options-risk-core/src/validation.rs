//! Input validation.
//!
//! Every rule is evaluated and the failures accumulate, so a caller sees all
//! problems with a form at once. A non-empty result must stop analysis.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clock::{days_to_expiry, Clock, SystemClock};
use crate::config::{AnalysisConfig, Bounds};
use crate::strategy::{MarketData, Strategy};
use crate::types::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input field an error refers to. Serialised in the caller's naming,
/// e.g. `underlyingPrice` or `legs[1].strike`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    Symbol,
    UnderlyingPrice,
    Legs,
    Strike(usize),
    Premium(usize),
    Quantity(usize),
    Expiry(usize),
    MarginRequirement,
    MaxLoss,
    BreakEven(usize),
    Volatility,
    RiskFreeRate,
    DividendYield,
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTag::Symbol => f.write_str("symbol"),
            FieldTag::UnderlyingPrice => f.write_str("underlyingPrice"),
            FieldTag::Legs => f.write_str("legs"),
            FieldTag::Strike(i) => write!(f, "legs[{i}].strike"),
            FieldTag::Premium(i) => write!(f, "legs[{i}].premium"),
            FieldTag::Quantity(i) => write!(f, "legs[{i}].quantity"),
            FieldTag::Expiry(i) => write!(f, "legs[{i}].expiry"),
            FieldTag::MarginRequirement => f.write_str("marginRequirement"),
            FieldTag::MaxLoss => f.write_str("maxLoss"),
            FieldTag::BreakEven(i) => write!(f, "breakEvenPoints[{i}]"),
            FieldTag::Volatility => f.write_str("volatility"),
            FieldTag::RiskFreeRate => f.write_str("riskFreeRate"),
            FieldTag::DividendYield => f.write_str("dividendYield"),
        }
    }
}

impl FromStr for FieldTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol" => return Ok(FieldTag::Symbol),
            "underlyingPrice" => return Ok(FieldTag::UnderlyingPrice),
            "legs" => return Ok(FieldTag::Legs),
            "volatility" => return Ok(FieldTag::Volatility),
            "riskFreeRate" => return Ok(FieldTag::RiskFreeRate),
            "dividendYield" => return Ok(FieldTag::DividendYield),
            "marginRequirement" => return Ok(FieldTag::MarginRequirement),
            "maxLoss" => return Ok(FieldTag::MaxLoss),
            _ => {}
        }

        if let Some(idx) = s
            .strip_prefix("breakEvenPoints[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let idx: usize = idx
                .parse()
                .map_err(|_| format!("malformed break-even index in '{s}'"))?;
            return Ok(FieldTag::BreakEven(idx));
        }

        let rest = s
            .strip_prefix("legs[")
            .ok_or_else(|| format!("unknown field tag '{s}'"))?;
        let (idx, attr) = rest
            .split_once("].")
            .ok_or_else(|| format!("malformed leg field tag '{s}'"))?;
        let idx: usize = idx
            .parse()
            .map_err(|_| format!("malformed leg index in '{s}'"))?;
        match attr {
            "strike" => Ok(FieldTag::Strike(idx)),
            "premium" => Ok(FieldTag::Premium(idx)),
            "quantity" => Ok(FieldTag::Quantity(idx)),
            "expiry" => Ok(FieldTag::Expiry(idx)),
            _ => Err(format!("unknown leg attribute in '{s}'")),
        }
    }
}

impl Serialize for FieldTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: FieldTag,
    pub message: String,
}

impl ValidationError {
    fn new(field: FieldTag, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn check_range(
    errors: &mut Vec<ValidationError>,
    field: FieldTag,
    label: &str,
    value: Decimal,
    bounds: Bounds,
) {
    if !bounds.contains(value) {
        errors.push(ValidationError::new(
            field,
            format!(
                "{label} must be between {} and {}, got {value}",
                bounds.min, bounds.max
            ),
        ));
    }
}

fn check_symbol(errors: &mut Vec<ValidationError>, symbol: &str) {
    if symbol.is_empty() {
        errors.push(ValidationError::new(FieldTag::Symbol, "Symbol is required"));
    } else if !symbol.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::new(
            FieldTag::Symbol,
            format!("Symbol must contain upper-case letters only, got '{symbol}'"),
        ));
    }
}

fn check_legs(
    errors: &mut Vec<ValidationError>,
    strategy: &Strategy,
    config: &AnalysisConfig,
    today: chrono::NaiveDate,
) {
    let max_legs = strategy.config().max_legs;
    if strategy.legs.is_empty() {
        errors.push(ValidationError::new(
            FieldTag::Legs,
            "Strategy must have at least one leg",
        ));
    } else if strategy.legs.len() > max_legs {
        errors.push(ValidationError::new(
            FieldTag::Legs,
            format!(
                "{} allows at most {max_legs} legs, got {}",
                strategy.variant,
                strategy.legs.len()
            ),
        ));
    }

    for (i, leg) in strategy.legs.iter().enumerate() {
        check_range(errors, FieldTag::Strike(i), "Strike", leg.strike, config.strike);
        check_range(errors, FieldTag::Premium(i), "Premium", leg.premium, config.premium);
        check_range(
            errors,
            FieldTag::Quantity(i),
            "Quantity",
            leg.quantity_decimal(),
            config.quantity,
        );

        let days = days_to_expiry(leg.expiry, today);
        let window = config.expiry_windows.window(leg.term);
        if !window.contains(days) {
            errors.push(ValidationError::new(
                FieldTag::Expiry(i),
                format!(
                    "A {} expiry must be {} to {} days out, got {days}",
                    leg.term, window.min_days, window.max_days
                ),
            ));
        }
    }
}

/// Figures a caller may supply on the strategy itself.
fn check_strategy_figures(
    errors: &mut Vec<ValidationError>,
    strategy: &Strategy,
    config: &AnalysisConfig,
) {
    if let Some(margin) = strategy.margin_requirement {
        if margin < Decimal::ZERO {
            errors.push(ValidationError::new(
                FieldTag::MarginRequirement,
                format!("Margin requirement cannot be negative, got {margin}"),
            ));
        }
    }

    if let Some(max_loss) = strategy.max_loss {
        if max_loss > Decimal::ZERO {
            errors.push(ValidationError::new(
                FieldTag::MaxLoss,
                format!("Max loss is signed and must be zero or negative, got {max_loss}"),
            ));
        }
    }

    for (i, bp) in strategy.break_even_points.iter().enumerate() {
        check_range(
            errors,
            FieldTag::BreakEven(i),
            "Break-even point",
            *bp,
            config.underlying_price,
        );
    }
}

fn check_market(errors: &mut Vec<ValidationError>, market: &MarketData, config: &AnalysisConfig) {
    check_range(
        errors,
        FieldTag::Volatility,
        "Volatility",
        market.volatility,
        config.volatility,
    );
    check_range(
        errors,
        FieldTag::RiskFreeRate,
        "Risk-free rate",
        market.risk_free_rate,
        config.risk_free_rate,
    );
    check_range(
        errors,
        FieldTag::DividendYield,
        "Dividend yield",
        market.dividend_yield,
        config.dividend_yield,
    );
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate with the standard limits against today's UTC date.
pub fn validate(
    symbol: &str,
    underlying_price: Price,
    strategy: &Strategy,
    market: &MarketData,
) -> Vec<ValidationError> {
    validate_with(
        &AnalysisConfig::default(),
        &SystemClock,
        symbol,
        underlying_price,
        strategy,
        market,
    )
}

pub fn validate_with(
    config: &AnalysisConfig,
    clock: &dyn Clock,
    symbol: &str,
    underlying_price: Price,
    strategy: &Strategy,
    market: &MarketData,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_symbol(&mut errors, symbol);
    check_range(
        &mut errors,
        FieldTag::UnderlyingPrice,
        "Underlying price",
        underlying_price,
        config.underlying_price,
    );
    check_legs(&mut errors, strategy, config, clock.today());
    check_strategy_figures(&mut errors, strategy, config);
    check_market(&mut errors, market, config);

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
