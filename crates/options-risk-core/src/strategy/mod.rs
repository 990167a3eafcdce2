pub mod catalog;
pub mod derive;

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

pub use catalog::{ProfitPotential, RiskLevel, StrategyConfig};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Long,
    Short,
}

impl Position {
    /// +1 for long, -1 for short.
    pub fn sign(self) -> Decimal {
        match self {
            Position::Long => Decimal::ONE,
            Position::Short => Decimal::NEGATIVE_ONE,
        }
    }

    pub fn sign_f64(self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Position::Long => Position::Short,
            Position::Short => Position::Long,
        }
    }
}

/// Listing cycle of a contract; each term has its own days-to-expiry window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryTerm {
    Weekly,
    Monthly,
    Quarterly,
    Leaps,
}

impl ExpiryTerm {
    pub const ALL: [ExpiryTerm; 4] = [
        ExpiryTerm::Weekly,
        ExpiryTerm::Monthly,
        ExpiryTerm::Quarterly,
        ExpiryTerm::Leaps,
    ];
}

impl fmt::Display for ExpiryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpiryTerm::Weekly => "weekly",
            ExpiryTerm::Monthly => "monthly",
            ExpiryTerm::Quarterly => "quarterly",
            ExpiryTerm::Leaps => "leaps",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyVariant {
    Single,
    Vertical,
    IronCondor,
    Butterfly,
    Straddle,
    Strangle,
    CoveredCall,
    ProtectivePut,
}

impl StrategyVariant {
    pub const ALL: [StrategyVariant; 8] = [
        StrategyVariant::Single,
        StrategyVariant::Vertical,
        StrategyVariant::IronCondor,
        StrategyVariant::Butterfly,
        StrategyVariant::Straddle,
        StrategyVariant::Strangle,
        StrategyVariant::CoveredCall,
        StrategyVariant::ProtectivePut,
    ];

    /// Catalog entry for this variant.
    pub fn config(self) -> &'static StrategyConfig {
        catalog::config(self)
    }
}

impl fmt::Display for StrategyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().name)
    }
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One option contract line of a strategy.
///
/// Greeks are supplied per contract by the caller; nothing in this crate
/// derives them from a pricing model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    pub kind: OptionKind,
    pub position: Position,
    pub strike: Price,
    pub premium: Money,
    pub quantity: u32,
    pub expiry: NaiveDate,
    pub term: ExpiryTerm,
    /// Percent points.
    #[serde(default)]
    pub implied_volatility: Percent,
    #[serde(default)]
    pub delta: f64,
    #[serde(default)]
    pub gamma: f64,
    #[serde(default)]
    pub theta: f64,
    #[serde(default)]
    pub vega: f64,
    #[serde(default)]
    pub rho: f64,
}

impl OptionLeg {
    pub fn quantity_decimal(&self) -> Decimal {
        Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub variant: StrategyVariant,
    pub legs: Vec<OptionLeg>,
    /// Worst outcome at expiry, signed (zero or negative). `None` means the
    /// loss is unlimited.
    pub max_loss: Option<Money>,
    /// Best outcome at expiry. `None` means the profit is unlimited.
    pub max_profit: Option<Money>,
    #[serde(default)]
    pub break_even_points: Vec<Price>,
    /// Overrides the catalog margin formula when present.
    #[serde(default)]
    pub margin_requirement: Option<Money>,
    /// Percent points, informational.
    #[serde(default)]
    pub return_on_risk: Option<Percent>,
}

impl Strategy {
    pub fn config(&self) -> &'static StrategyConfig {
        self.variant.config()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub underlying_price: Price,
    /// Annualised, percent points.
    pub volatility: Percent,
    /// Percent points.
    pub risk_free_rate: Percent,
    pub days_to_expiration: u32,
    /// Percent points.
    #[serde(default)]
    pub dividend_yield: Percent,
}
