//! Static registry of supported strategy variants.
//!
//! Each entry carries the leg-count limit, qualitative classification and
//! the margin formula for its variant. Margin formulas assume the legs are
//! supplied in the variant's canonical order (ascending strike, puts before
//! calls) and report a configuration error when the shape does not match.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{OptionKind, OptionLeg, Position, StrategyVariant};
use crate::error::OptionsRiskError;
use crate::types::*;
use crate::OptionsRiskResult;

/// Fraction of the underlying held against an uncovered short option.
const NAKED_MARGIN_RATE: Decimal = dec!(0.20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitPotential {
    Limited,
    Unlimited,
}

type MarginFormula = fn(&[OptionLeg], Price) -> OptionsRiskResult<Money>;

#[derive(Serialize)]
pub struct StrategyConfig {
    pub variant: StrategyVariant,
    pub name: &'static str,
    pub description: &'static str,
    pub max_legs: usize,
    pub risk_level: RiskLevel,
    pub profit_potential: ProfitPotential,
    #[serde(skip)]
    margin_formula: MarginFormula,
}

impl std::fmt::Debug for StrategyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyConfig")
            .field("variant", &self.variant)
            .field("name", &self.name)
            .field("max_legs", &self.max_legs)
            .field("risk_level", &self.risk_level)
            .field("profit_potential", &self.profit_potential)
            .finish_non_exhaustive()
    }
}

impl StrategyConfig {
    /// Capital required to hold `legs` with the underlying at `underlying_price`.
    pub fn margin_requirement(
        &self,
        legs: &[OptionLeg],
        underlying_price: Price,
    ) -> OptionsRiskResult<Money> {
        (self.margin_formula)(legs, underlying_price)
    }
}

pub static STRATEGY_CATALOG: [StrategyConfig; 8] = [
    StrategyConfig {
        variant: StrategyVariant::Single,
        name: "Single Option",
        description: "One long or short call or put",
        max_legs: 1,
        risk_level: RiskLevel::High,
        profit_potential: ProfitPotential::Unlimited,
        margin_formula: single_margin,
    },
    StrategyConfig {
        variant: StrategyVariant::Vertical,
        name: "Vertical Spread",
        description: "Long and short option of the same type at different strikes",
        max_legs: 2,
        risk_level: RiskLevel::Medium,
        profit_potential: ProfitPotential::Limited,
        margin_formula: vertical_margin,
    },
    StrategyConfig {
        variant: StrategyVariant::IronCondor,
        name: "Iron Condor",
        description: "Put spread below and call spread above the underlying",
        max_legs: 4,
        risk_level: RiskLevel::Medium,
        profit_potential: ProfitPotential::Limited,
        margin_formula: iron_condor_margin,
    },
    StrategyConfig {
        variant: StrategyVariant::Butterfly,
        name: "Butterfly Spread",
        description: "Lower wing, body and upper wing of the same option type",
        max_legs: 3,
        risk_level: RiskLevel::Low,
        profit_potential: ProfitPotential::Limited,
        margin_formula: butterfly_margin,
    },
    StrategyConfig {
        variant: StrategyVariant::Straddle,
        name: "Straddle",
        description: "Call and put at the same strike",
        max_legs: 2,
        risk_level: RiskLevel::High,
        profit_potential: ProfitPotential::Unlimited,
        margin_formula: combination_margin,
    },
    StrategyConfig {
        variant: StrategyVariant::Strangle,
        name: "Strangle",
        description: "Out-of-the-money put and out-of-the-money call",
        max_legs: 2,
        risk_level: RiskLevel::High,
        profit_potential: ProfitPotential::Unlimited,
        margin_formula: combination_margin,
    },
    StrategyConfig {
        variant: StrategyVariant::CoveredCall,
        name: "Covered Call",
        description: "Short call written against 100 shares per contract",
        max_legs: 1,
        risk_level: RiskLevel::Low,
        profit_potential: ProfitPotential::Limited,
        margin_formula: covered_call_margin,
    },
    StrategyConfig {
        variant: StrategyVariant::ProtectivePut,
        name: "Protective Put",
        description: "Long put held against 100 shares per contract",
        max_legs: 1,
        risk_level: RiskLevel::Low,
        profit_potential: ProfitPotential::Unlimited,
        margin_formula: protective_put_margin,
    },
];

/// Catalog lookup. Every variant has exactly one entry.
pub fn config(variant: StrategyVariant) -> &'static StrategyConfig {
    let idx = match variant {
        StrategyVariant::Single => 0,
        StrategyVariant::Vertical => 1,
        StrategyVariant::IronCondor => 2,
        StrategyVariant::Butterfly => 3,
        StrategyVariant::Straddle => 4,
        StrategyVariant::Strangle => 5,
        StrategyVariant::CoveredCall => 6,
        StrategyVariant::ProtectivePut => 7,
    };
    &STRATEGY_CATALOG[idx]
}

// ---------------------------------------------------------------------------
// Margin formulas
// ---------------------------------------------------------------------------

fn expect_legs(name: &str, legs: &[OptionLeg], count: usize) -> OptionsRiskResult<()> {
    if legs.len() != count {
        return Err(OptionsRiskError::Configuration(format!(
            "{name} requires {count} legs, got {}",
            legs.len()
        )));
    }
    Ok(())
}

fn expect_kinds(name: &str, legs: &[OptionLeg], kinds: &[OptionKind]) -> OptionsRiskResult<()> {
    expect_legs(name, legs, kinds.len())?;
    for (i, (leg, kind)) in legs.iter().zip(kinds).enumerate() {
        if leg.kind != *kind {
            return Err(OptionsRiskError::Configuration(format!(
                "{name} leg {i} must be a {kind:?}, got {:?}",
                leg.kind
            )));
        }
    }
    Ok(())
}

/// Premium paid for a leg, per contract size.
fn debit(leg: &OptionLeg) -> Money {
    leg.premium * leg.quantity_decimal() * CONTRACT_MULTIPLIER
}

/// Long legs cost their premium; short legs hold a share of the underlying
/// plus the premium received.
fn leg_requirement(leg: &OptionLeg, underlying_price: Price) -> Money {
    match leg.position {
        Position::Long => debit(leg),
        Position::Short => {
            (NAKED_MARGIN_RATE * underlying_price + leg.premium)
                * leg.quantity_decimal()
                * CONTRACT_MULTIPLIER
        }
    }
}

fn single_margin(legs: &[OptionLeg], underlying_price: Price) -> OptionsRiskResult<Money> {
    expect_legs("Single Option", legs, 1)?;
    Ok(leg_requirement(&legs[0], underlying_price))
}

fn vertical_margin(legs: &[OptionLeg], _underlying_price: Price) -> OptionsRiskResult<Money> {
    expect_legs("Vertical Spread", legs, 2)?;
    if legs[0].kind != legs[1].kind {
        return Err(OptionsRiskError::Configuration(
            "Vertical Spread legs must share one option type".into(),
        ));
    }
    let width = (legs[0].strike - legs[1].strike).abs();
    Ok(width * legs[0].quantity_decimal() * CONTRACT_MULTIPLIER)
}

fn iron_condor_margin(legs: &[OptionLeg], _underlying_price: Price) -> OptionsRiskResult<Money> {
    expect_kinds(
        "Iron Condor",
        legs,
        &[
            OptionKind::Put,
            OptionKind::Put,
            OptionKind::Call,
            OptionKind::Call,
        ],
    )?;
    let put_width = (legs[1].strike - legs[0].strike).abs();
    let call_width = (legs[3].strike - legs[2].strike).abs();
    Ok(put_width.max(call_width) * legs[0].quantity_decimal() * CONTRACT_MULTIPLIER)
}

fn butterfly_margin(legs: &[OptionLeg], _underlying_price: Price) -> OptionsRiskResult<Money> {
    expect_legs("Butterfly Spread", legs, 3)?;
    if legs.iter().any(|l| l.kind != legs[0].kind) {
        return Err(OptionsRiskError::Configuration(
            "Butterfly Spread legs must share one option type".into(),
        ));
    }
    let lower_wing = (legs[1].strike - legs[0].strike).abs();
    let upper_wing = (legs[2].strike - legs[1].strike).abs();
    Ok(lower_wing.max(upper_wing) * legs[0].quantity_decimal() * CONTRACT_MULTIPLIER)
}

/// Straddles and strangles: a long pair costs both premiums; with a short
/// side, the larger leg requirement plus the other leg's premium.
fn combination_margin(legs: &[OptionLeg], underlying_price: Price) -> OptionsRiskResult<Money> {
    expect_legs("Straddle/Strangle", legs, 2)?;
    let (a, b) = (&legs[0], &legs[1]);
    if a.kind == b.kind {
        return Err(OptionsRiskError::Configuration(
            "Straddle/Strangle requires one call and one put".into(),
        ));
    }

    if a.position == Position::Long && b.position == Position::Long {
        return Ok(debit(a) + debit(b));
    }

    let req_a = leg_requirement(a, underlying_price);
    let req_b = leg_requirement(b, underlying_price);
    if req_a >= req_b {
        Ok(req_a + debit(b))
    } else {
        Ok(req_b + debit(a))
    }
}

fn covered_call_margin(legs: &[OptionLeg], underlying_price: Price) -> OptionsRiskResult<Money> {
    expect_kinds("Covered Call", legs, &[OptionKind::Call])?;
    Ok(underlying_price * legs[0].quantity_decimal() * CONTRACT_MULTIPLIER)
}

fn protective_put_margin(legs: &[OptionLeg], underlying_price: Price) -> OptionsRiskResult<Money> {
    expect_kinds("Protective Put", legs, &[OptionKind::Put])?;
    Ok((underlying_price + legs[0].premium) * legs[0].quantity_decimal() * CONTRACT_MULTIPLIER)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
