use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::strategy::OptionLeg;
use crate::types::CONTRACT_MULTIPLIER;

/// Net Greeks of a set of legs. Recomputed on demand, never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GreeksExposure {
    pub total_delta: f64,
    pub total_gamma: f64,
    pub total_theta: f64,
    pub total_vega: f64,
    pub total_rho: f64,
    /// Share-equivalent delta: `total_delta` times the contract multiplier.
    pub net_delta_equivalent: f64,
}

/// Sum after sorting so the result does not depend on leg order, even in
/// floating point.
fn order_independent_sum(mut terms: Vec<f64>) -> f64 {
    terms.sort_by(f64::total_cmp);
    terms.into_iter().sum()
}

fn net(legs: &[OptionLeg], greek: impl Fn(&OptionLeg) -> f64) -> f64 {
    order_independent_sum(
        legs.iter()
            .map(|leg| leg.position.sign_f64() * f64::from(leg.quantity) * greek(leg))
            .collect(),
    )
}

/// Aggregate per-contract Greeks, flipping the sign of short legs and
/// scaling by quantity.
pub fn aggregate(legs: &[OptionLeg]) -> GreeksExposure {
    let total_delta = net(legs, |l| l.delta);
    let multiplier = CONTRACT_MULTIPLIER.to_f64().unwrap_or(100.0);

    GreeksExposure {
        total_delta,
        total_gamma: net(legs, |l| l.gamma),
        total_theta: net(legs, |l| l.theta),
        total_vega: net(legs, |l| l.vega),
        total_rho: net(legs, |l| l.rho),
        net_delta_equivalent: total_delta * multiplier,
    }
}
