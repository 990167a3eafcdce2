//! Expiry payoff of option legs.
//!
//! Only intrinsic value is modelled: every figure here is the outcome if
//! the underlying settles at the given price on expiry. No time value, no
//! mark-to-market before expiry.

use rust_decimal::Decimal;

use crate::strategy::{OptionKind, OptionLeg};
use crate::types::*;

/// `max(0, S - K)` for a call, `max(0, K - S)` for a put.
pub fn intrinsic_value(kind: OptionKind, price: Price, strike: Price) -> Money {
    let raw = match kind {
        OptionKind::Call => price - strike,
        OptionKind::Put => strike - price,
    };
    raw.max(Decimal::ZERO)
}

/// Value of one contract of `leg` at expiry, per share.
pub fn value_at_expiry(price: Price, leg: &OptionLeg) -> Money {
    intrinsic_value(leg.kind, price, leg.strike)
}

/// Profit or loss of a single leg at expiry, in currency.
pub fn leg_profit_loss(price: Price, leg: &OptionLeg) -> Money {
    leg.position.sign()
        * (value_at_expiry(price, leg) - leg.premium)
        * leg.quantity_decimal()
        * CONTRACT_MULTIPLIER
}

/// Profit or loss of the whole strategy at expiry, in currency.
pub fn profit_loss(price: Price, legs: &[OptionLeg]) -> Money {
    legs.iter().map(|leg| leg_profit_loss(price, leg)).sum()
}

/// Premium paid (positive) or received (negative) to open the position.
pub fn net_premium(legs: &[OptionLeg]) -> Money {
    legs.iter()
        .map(|leg| leg.position.sign() * leg.premium * leg.quantity_decimal() * CONTRACT_MULTIPLIER)
        .sum()
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

    #[test]
    fn test_intrinsic_value() {
        assert_eq!(intrinsic_value(OptionKind::Call, dec!(120), dec!(100)), dec!(20));
        assert_eq!(intrinsic_value(OptionKind::Call, dec!(80), dec!(100)), dec!(0));
        assert_eq!(intrinsic_value(OptionKind::Put, dec!(80), dec!(100)), dec!(20));
        assert_eq!(intrinsic_value(OptionKind::Put, dec!(120), dec!(100)), dec!(0));
        assert_eq!(intrinsic_value(OptionKind::Put, dec!(100), dec!(100)), dec!(0));
    }

    #[test]
    fn test_long_call_profit_at_120() {
        let legs = vec![leg(OptionKind::Call, Position::Long, dec!(100), dec!(5))];
        // (max(0, 120 - 100) - 5) * 1 * 100
        assert_eq!(profit_loss(dec!(120), &legs), dec!(1500));
    }

    #[test]
    fn test_long_call_loss_capped_at_premium() {
        let legs = vec![leg(OptionKind::Call, Position::Long, dec!(100), dec!(5))];
        assert_eq!(profit_loss(dec!(50), &legs), dec!(-500));
        assert_eq!(profit_loss(dec!(100), &legs), dec!(-500));
    }

    #[test]
    fn test_short_put() {
        let legs = vec![leg(OptionKind::Put, Position::Short, dec!(95), dec!(2))];
        // Above strike: keep the premium
        assert_eq!(profit_loss(dec!(110), &legs), dec!(200));
        // At 80: -(15 - 2) * 100
        assert_eq!(profit_loss(dec!(80), &legs), dec!(-1300));
    }

    #[test]
    fn test_bull_call_spread() {
        let legs = vec![
            leg(OptionKind::Call, Position::Long, dec!(95), dec!(7)),
            leg(OptionKind::Call, Position::Short, dec!(105), dec!(2)),
        ];
        // Below both strikes: net debit lost
        assert_eq!(profit_loss(dec!(80), &legs), dec!(-500));
        // Above both strikes: width - debit
        assert_eq!(profit_loss(dec!(120), &legs), dec!(500));
    }

    #[test]
    fn test_iron_condor_body_keeps_credit() {
        let legs = vec![
            leg(OptionKind::Put, Position::Long, dec!(90), dec!(1)),
            leg(OptionKind::Put, Position::Short, dec!(95), dec!(2)),
            leg(OptionKind::Call, Position::Short, dec!(105), dec!(2)),
            leg(OptionKind::Call, Position::Long, dec!(110), dec!(1)),
        ];
        assert_eq!(profit_loss(dec!(100), &legs), dec!(200));
        // Beyond a wing: width 5 less credit 2
        assert_eq!(profit_loss(dec!(120), &legs), dec!(-300));
        assert_eq!(profit_loss(dec!(80), &legs), dec!(-300));
    }

    #[test]
    fn test_net_premium_debit_and_credit() {
        let debit = vec![
            leg(OptionKind::Call, Position::Long, dec!(95), dec!(7)),
            leg(OptionKind::Call, Position::Short, dec!(105), dec!(2)),
        ];
        assert_eq!(net_premium(&debit), dec!(500));

        let credit = vec![leg(OptionKind::Put, Position::Short, dec!(95), dec!(2))];
        assert_eq!(net_premium(&credit), dec!(-200));
    }
}
