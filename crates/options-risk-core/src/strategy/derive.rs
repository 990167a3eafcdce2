//! Build a complete `Strategy` from its legs.
//!
//! The expiry payoff is piecewise linear with kinks only at strikes, so it
//! is evaluated exactly at zero and at every strike. Break-evens are solved
//! inside each linear segment, and the slope above the highest strike (net
//! long minus short calls) decides whether profit or loss is unlimited.

use rust_decimal::Decimal;

use super::{MarketData, OptionKind, OptionLeg, Strategy, StrategyVariant};
use crate::error::OptionsRiskError;
use crate::payoff;
use crate::types::*;
use crate::OptionsRiskResult;

/// Break-even prices are reported to this many decimal places.
const BREAK_EVEN_DP: u32 = 4;

/// Zero and every strike, ascending and distinct.
fn knots(legs: &[OptionLeg]) -> Vec<Price> {
    let mut prices: Vec<Price> = legs.iter().map(|l| l.strike).collect();
    prices.push(Decimal::ZERO);
    prices.sort();
    prices.dedup();
    prices
}

/// Change in profit/loss per unit rise of the underlying above the
/// highest strike. Only calls move there.
pub fn upside_slope(legs: &[OptionLeg]) -> Money {
    legs.iter()
        .filter(|l| l.kind == OptionKind::Call)
        .map(|l| l.position.sign() * l.quantity_decimal() * CONTRACT_MULTIPLIER)
        .sum()
}

/// Prices where the expiry profit/loss is zero, ascending.
pub fn find_break_evens(legs: &[OptionLeg]) -> Vec<Price> {
    let mut break_evens: Vec<Price> = Vec::new();
    let mut push = |price: Price| {
        let price = price.round_dp(BREAK_EVEN_DP);
        if !break_evens.contains(&price) {
            break_evens.push(price);
        }
    };

    let prices = knots(legs);
    let values: Vec<Money> = prices.iter().map(|&p| payoff::profit_loss(p, legs)).collect();

    for i in 0..prices.len() {
        if values[i].is_zero() {
            push(prices[i]);
            continue;
        }
        let Some(&next) = values.get(i + 1) else {
            continue;
        };
        if !next.is_zero() && values[i].is_sign_positive() != next.is_sign_positive() {
            let t = -values[i] / (next - values[i]);
            push(prices[i] + t * (prices[i + 1] - prices[i]));
        }
    }

    // Beyond the last strike the payoff is a ray with the upside slope
    if let (Some(&last_price), Some(&last_value)) = (prices.last(), values.last()) {
        let slope = upside_slope(legs);
        if !slope.is_zero() && !last_value.is_zero() && last_value.is_sign_positive() != slope.is_sign_positive() {
            push(last_price - last_value / slope);
        }
    }

    break_evens.sort();
    break_evens
}

/// `(max_profit, max_loss)` at expiry. `None` means unlimited.
pub fn find_extremes(legs: &[OptionLeg]) -> (Option<Money>, Option<Money>) {
    let values: Vec<Money> = knots(legs)
        .into_iter()
        .map(|p| payoff::profit_loss(p, legs))
        .collect();
    let max = values.iter().copied().max().unwrap_or(Decimal::ZERO);
    let min = values.iter().copied().min().unwrap_or(Decimal::ZERO);

    let slope = upside_slope(legs);
    let max_profit = if slope > Decimal::ZERO { None } else { Some(max) };
    let max_loss = if slope < Decimal::ZERO { None } else { Some(min) };
    (max_profit, max_loss)
}

/// Assemble a strategy whose extremes, break-evens, margin and return on
/// risk are derived from `legs` under `market`.
pub fn derive_strategy(
    variant: StrategyVariant,
    legs: Vec<OptionLeg>,
    market: &MarketData,
) -> OptionsRiskResult<Strategy> {
    if legs.is_empty() {
        return Err(OptionsRiskError::InvalidInput {
            field: "legs".into(),
            reason: "at least one leg is required to derive a strategy".into(),
        });
    }

    let break_even_points = find_break_evens(&legs);
    let (max_profit, max_loss) = find_extremes(&legs);
    let margin = variant
        .config()
        .margin_requirement(&legs, market.underlying_price)?;

    let return_on_risk = match max_profit {
        Some(profit) if margin > Decimal::ZERO => Some(profit / margin * Decimal::ONE_HUNDRED),
        _ => None,
    };

    Ok(Strategy {
        variant,
        legs,
        max_loss,
        max_profit,
        break_even_points,
        margin_requirement: Some(margin),
        return_on_risk,
    })
}

impl Strategy {
    /// See [`derive_strategy`].
    pub fn derived(
        variant: StrategyVariant,
        legs: Vec<OptionLeg>,
        market: &MarketData,
    ) -> OptionsRiskResult<Strategy> {
        derive_strategy(variant, legs, market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{ExpiryTerm, Position};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn leg(kind: OptionKind, position: Position, strike: Decimal, premium: Decimal) -> OptionLeg {
        OptionLeg {
            kind,
            position,
            strike,
            premium,
            quantity: 1,
            expiry: NaiveDate::from_ymd_opt(2025, 2, 21).unwrap(),
            term: ExpiryTerm::Monthly,
            implied_volatility: dec!(20),
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            rho: 0.0,
        }
    }

    fn market(underlying_price: Decimal) -> MarketData {
        MarketData {
            underlying_price,
            volatility: dec!(20),
            risk_free_rate: dec!(5),
            days_to_expiration: 30,
            dividend_yield: dec!(0),
        }
    }

    fn single(l: OptionLeg) -> Strategy {
        derive_strategy(StrategyVariant::Single, vec![l], &market(dec!(100))).unwrap()
    }

    #[test]
    fn test_long_call_derived() {
        let s = single(leg(OptionKind::Call, Position::Long, dec!(100), dec!(5)));
        assert_eq!(s.max_profit, None);
        assert_eq!(s.max_loss, Some(dec!(-500)));
        assert_eq!(s.break_even_points, vec![dec!(105)]);
        assert_eq!(s.margin_requirement, Some(dec!(500)));
        assert_eq!(s.return_on_risk, None);
    }

    #[test]
    fn test_break_even_between_grid_prices_is_exact() {
        let l = leg(OptionKind::Call, Position::Long, dec!(100.5), dec!(0.01));
        let s = single(l.clone());
        assert_eq!(s.break_even_points, vec![dec!(100.51)]);
        assert_eq!(payoff::profit_loss(dec!(100.51), &[l]), Decimal::ZERO);
    }

    #[test]
    fn test_long_put_profit_runs_to_zero_price() {
        let s = single(leg(OptionKind::Put, Position::Long, dec!(100), dec!(5)));
        // Underlying at 0: (100 - 5) * 100
        assert_eq!(s.max_profit, Some(dec!(9500)));
        assert_eq!(s.max_loss, Some(dec!(-500)));
        assert_eq!(s.break_even_points, vec![dec!(95)]);
    }

    #[test]
    fn test_far_out_of_the_money_call_is_unlimited() {
        let s = single(leg(OptionKind::Call, Position::Long, dec!(200), dec!(1)));
        assert_eq!(s.max_profit, None);
        assert_eq!(s.max_loss, Some(dec!(-100)));
        assert_eq!(s.break_even_points, vec![dec!(201)]);
    }

    #[test]
    fn test_short_call_loss_unlimited() {
        let s = single(leg(OptionKind::Call, Position::Short, dec!(100), dec!(5)));
        assert_eq!(s.max_profit, Some(dec!(500)));
        assert_eq!(s.max_loss, None);
        assert_eq!(s.break_even_points, vec![dec!(105)]);
    }

    #[test]
    fn test_butterfly_peak_at_body_strike() {
        let mut body = leg(OptionKind::Call, Position::Short, dec!(100), dec!(4));
        body.quantity = 2;
        let legs = vec![
            leg(OptionKind::Call, Position::Long, dec!(95), dec!(7)),
            body,
            leg(OptionKind::Call, Position::Long, dec!(105), dec!(2)),
        ];
        let s = derive_strategy(StrategyVariant::Butterfly, legs, &market(dec!(101))).unwrap();
        // Net debit 1: peak (5 - 1) * 100 at the body strike
        assert_eq!(s.max_profit, Some(dec!(400)));
        assert_eq!(s.max_loss, Some(dec!(-100)));
        assert_eq!(s.break_even_points, vec![dec!(96), dec!(104)]);
    }

    #[test]
    fn test_iron_condor_derived() {
        let legs = vec![
            leg(OptionKind::Put, Position::Long, dec!(90), dec!(1)),
            leg(OptionKind::Put, Position::Short, dec!(95), dec!(2)),
            leg(OptionKind::Call, Position::Short, dec!(105), dec!(2)),
            leg(OptionKind::Call, Position::Long, dec!(110), dec!(1)),
        ];
        let s = derive_strategy(StrategyVariant::IronCondor, legs, &market(dec!(100))).unwrap();
        assert_eq!(s.max_profit, Some(dec!(200)));
        assert_eq!(s.max_loss, Some(dec!(-300)));
        assert_eq!(s.break_even_points, vec![dec!(93), dec!(107)]);
        assert_eq!(s.margin_requirement, Some(dec!(500)));
        assert_eq!(s.return_on_risk, Some(dec!(40)));
    }

    #[test]
    fn test_upside_slope_nets_calls_only() {
        let legs = vec![
            leg(OptionKind::Call, Position::Long, dec!(100), dec!(5)),
            leg(OptionKind::Call, Position::Short, dec!(110), dec!(2)),
            leg(OptionKind::Put, Position::Long, dec!(90), dec!(2)),
        ];
        assert_eq!(upside_slope(&legs), Decimal::ZERO);
    }

    #[test]
    fn test_derive_rejects_misshapen_legs() {
        let legs = vec![leg(OptionKind::Call, Position::Long, dec!(100), dec!(5))];
        assert!(derive_strategy(StrategyVariant::IronCondor, legs, &market(dec!(100))).is_err());
    }

    #[test]
    fn test_derive_rejects_empty_legs() {
        let err = derive_strategy(StrategyVariant::Single, vec![], &market(dec!(100))).unwrap_err();
        assert!(matches!(err, OptionsRiskError::InvalidInput { .. }));
    }
}
