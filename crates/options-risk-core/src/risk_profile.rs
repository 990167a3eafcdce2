use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::curve::{self, ProfitLossPoint};
use crate::statistics::{self, StrategyStatistics};
use crate::strategy::{MarketData, ProfitPotential, RiskLevel, Strategy};
use crate::types::*;
use crate::OptionsRiskResult;

/// Read-only risk/reward snapshot of one strategy under one market state.
/// Built fresh per analysis; a change of inputs means a new profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub max_loss: Option<Money>,
    pub max_profit: Option<Money>,
    pub break_even_points: Vec<Price>,
    pub profit_probability: Option<Probability>,
    pub risk_level: RiskLevel,
    pub profit_potential: ProfitPotential,
    pub margin_requirement: Money,
    /// Percent points.
    pub return_on_risk: Option<Percent>,
    pub profit_loss_curve: Vec<ProfitLossPoint>,
}

/// Margin for `strategy`: the supplied figure when present, otherwise the
/// catalog formula.
pub fn margin_requirement(strategy: &Strategy, market: &MarketData) -> OptionsRiskResult<Money> {
    match strategy.margin_requirement {
        Some(margin) => Ok(margin),
        None => strategy
            .config()
            .margin_requirement(&strategy.legs, market.underlying_price),
    }
}

pub fn build(strategy: &Strategy, market: &MarketData) -> OptionsRiskResult<RiskProfile> {
    build_with(strategy, market, &AnalysisConfig::default())
}

pub fn build_with(
    strategy: &Strategy,
    market: &MarketData,
    config: &AnalysisConfig,
) -> OptionsRiskResult<RiskProfile> {
    let margin = margin_requirement(strategy, market)?;
    let stats = statistics::compute_statistics(strategy, market, margin, config)?;
    Ok(assemble(strategy, market, margin, &stats, config))
}

/// Compose a profile from already computed margin and statistics.
pub(crate) fn assemble(
    strategy: &Strategy,
    market: &MarketData,
    margin: Money,
    stats: &StrategyStatistics,
    config: &AnalysisConfig,
) -> RiskProfile {
    let catalog = strategy.config();
    RiskProfile {
        max_loss: strategy.max_loss,
        max_profit: strategy.max_profit,
        break_even_points: strategy.break_even_points.clone(),
        profit_probability: stats.probability_of_profit,
        risk_level: catalog.risk_level,
        profit_potential: catalog.profit_potential,
        margin_requirement: margin,
        return_on_risk: stats.max_return_on_capital,
        profit_loss_curve: curve::curve_with(strategy, market, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptionsRiskError;
    use crate::strategy::{ExpiryTerm, OptionKind, OptionLeg, Position, StrategyVariant};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn call(position: Position, strike: Decimal, premium: Decimal) -> OptionLeg {
        OptionLeg {
            kind: OptionKind::Call,
            position,
            strike,
            premium,
            quantity: 1,
            expiry: NaiveDate::from_ymd_opt(2025, 2, 21).unwrap(),
            term: ExpiryTerm::Monthly,
            implied_volatility: dec!(25),
            delta: 0.5,
            gamma: 0.03,
            theta: -0.05,
            vega: 0.1,
            rho: 0.02,
        }
    }

    fn market() -> MarketData {
        MarketData {
            underlying_price: dec!(105),
            volatility: dec!(25),
            risk_free_rate: dec!(4),
            days_to_expiration: 30,
            dividend_yield: dec!(1),
        }
    }

    fn bull_call_spread() -> Strategy {
        Strategy {
            variant: StrategyVariant::Vertical,
            legs: vec![
                call(Position::Long, dec!(100), dec!(7)),
                call(Position::Short, dec!(110), dec!(2)),
            ],
            max_loss: Some(dec!(-500)),
            max_profit: Some(dec!(500)),
            break_even_points: vec![dec!(105)],
            margin_requirement: None,
            return_on_risk: None,
        }
    }

    #[test]
    fn test_build_vertical_spread() {
        let profile = build(&bull_call_spread(), &market()).unwrap();
        assert_eq!(profile.margin_requirement, dec!(1000));
        assert_eq!(profile.return_on_risk, Some(dec!(50)));
        assert_eq!(profile.risk_level, RiskLevel::Medium);
        assert_eq!(profile.profit_potential, ProfitPotential::Limited);
        assert_eq!(profile.profit_loss_curve.len(), 101);
        // Break-even sits on the underlying, so the estimate is ~0
        assert!(profile.profit_probability.unwrap() < 1e-6);
    }

    #[test]
    fn test_supplied_margin_overrides_catalog() {
        let mut strategy = bull_call_spread();
        strategy.margin_requirement = Some(dec!(2000));
        let profile = build(&strategy, &market()).unwrap();
        assert_eq!(profile.margin_requirement, dec!(2000));
        assert_eq!(profile.return_on_risk, Some(dec!(25)));
    }

    #[test]
    fn test_equal_strikes_is_degenerate_margin() {
        let mut strategy = bull_call_spread();
        strategy.legs[1].strike = dec!(100);
        let err = build(&strategy, &market()).unwrap_err();
        assert!(matches!(err, OptionsRiskError::DegenerateMargin { .. }));
    }
}
