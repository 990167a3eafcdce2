//! Property-based tests for the pricing-free invariants of the engine.

use chrono::NaiveDate;
use options_risk_core::curve;
use options_risk_core::greeks::aggregate;
use options_risk_core::payoff::{intrinsic_value, profit_loss};
use options_risk_core::strategy::derive::{find_break_evens, find_extremes};
use options_risk_core::statistics::probability_of_profit;
use options_risk_core::strategy::{
    ExpiryTerm, MarketData, OptionKind, OptionLeg, Position, Strategy as OptionStrategy,
    StrategyVariant,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Prices from 0.01 to 10,000.00 in cents.
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind() -> impl Strategy<Value = OptionKind> {
    prop_oneof![Just(OptionKind::Call), Just(OptionKind::Put)]
}

fn position() -> impl Strategy<Value = Position> {
    prop_oneof![Just(Position::Long), Just(Position::Short)]
}

fn leg() -> impl Strategy<Value = OptionLeg> {
    (
        kind(),
        position(),
        price(),
        1u32..=100,
        -1.0f64..1.0,
        0.0f64..0.2,
        -1.0f64..0.0,
        0.0f64..1.0,
        -0.5f64..0.5,
    )
        .prop_map(|(kind, position, strike, quantity, delta, gamma, theta, vega, rho)| OptionLeg {
            kind,
            position,
            strike,
            premium: Decimal::new(250, 2),
            quantity,
            expiry: NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            term: ExpiryTerm::Quarterly,
            implied_volatility: Decimal::new(30, 0),
            delta,
            gamma,
            theta,
            vega,
            rho,
        })
}

fn market() -> impl Strategy<Value = MarketData> {
    (price(), 1i64..=200, 1u32..=730).prop_map(|(underlying_price, vol, days)| MarketData {
        underlying_price,
        volatility: Decimal::new(vol, 0),
        risk_free_rate: Decimal::new(5, 0),
        days_to_expiration: days,
        dividend_yield: Decimal::ZERO,
    })
}

fn single(leg: OptionLeg, break_even_points: Vec<Decimal>) -> OptionStrategy {
    OptionStrategy {
        variant: StrategyVariant::Single,
        legs: vec![leg],
        max_loss: None,
        max_profit: None,
        break_even_points,
        margin_requirement: None,
        return_on_risk: None,
    }
}

proptest! {
    #[test]
    fn intrinsic_value_is_never_negative(s in price(), k in price()) {
        prop_assert!(intrinsic_value(OptionKind::Call, s, k) >= Decimal::ZERO);
        prop_assert!(intrinsic_value(OptionKind::Put, s, k) >= Decimal::ZERO);
    }

    #[test]
    fn greeks_ignore_leg_order(
        (legs, shuffled) in prop::collection::vec(leg(), 1..6)
            .prop_flat_map(|legs| (Just(legs.clone()), Just(legs).prop_shuffle()))
    ) {
        prop_assert_eq!(aggregate(&legs), aggregate(&shuffled));
    }

    #[test]
    fn short_leg_negates_long_leg(l in leg()) {
        let mut long = l.clone();
        long.position = Position::Long;
        let short = OptionLeg { position: long.position.flipped(), ..long.clone() };

        let g_long = aggregate(&[long]);
        let g_short = aggregate(&[short]);
        prop_assert_eq!(g_short.total_delta, -g_long.total_delta);
        prop_assert_eq!(g_short.total_gamma, -g_long.total_gamma);
        prop_assert_eq!(g_short.total_theta, -g_long.total_theta);
        prop_assert_eq!(g_short.total_vega, -g_long.total_vega);
        prop_assert_eq!(g_short.total_rho, -g_long.total_rho);
        prop_assert_eq!(g_short.net_delta_equivalent, -g_long.net_delta_equivalent);
    }

    #[test]
    fn curve_brackets_underlying(l in leg(), m in market()) {
        let points = curve::curve(&single(l, vec![]), &m);
        prop_assert_eq!(points.len(), 101);
        prop_assert!(points[0].price <= m.underlying_price);
        prop_assert!(m.underlying_price <= points[100].price);
        prop_assert!(points.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn probability_stays_in_unit_interval(
        l in leg(),
        m in market(),
        break_evens in prop::collection::vec(price(), 1..4),
    ) {
        let p = probability_of_profit(&single(l, break_evens), &m).unwrap();
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn break_evens_are_zeros_of_the_payoff(legs in prop::collection::vec(leg(), 1..5)) {
        // Break-evens are rounded to 4 dp; the payoff moves at most
        // total quantity * 100 per unit of price.
        let total_qty: u32 = legs.iter().map(|l| l.quantity).sum();
        let tolerance = Decimal::from(total_qty) * Decimal::new(100, 0) * Decimal::new(1, 4);
        for be in find_break_evens(&legs) {
            prop_assert!(profit_loss(be, &legs).abs() <= tolerance);
        }
    }

    #[test]
    fn finite_extremes_bound_every_strike(legs in prop::collection::vec(leg(), 1..5)) {
        let (max_profit, max_loss) = find_extremes(&legs);
        for l in &legs {
            let pl = profit_loss(l.strike, &legs);
            if let Some(max) = max_profit {
                prop_assert!(pl <= max);
            }
            if let Some(min) = max_loss {
                prop_assert!(pl >= min);
            }
        }
    }
}
