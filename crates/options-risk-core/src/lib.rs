//! Risk/reward analytics for multi-leg option strategies.
//!
//! Given option legs and a market snapshot, computes the expiry payoff
//! curve, aggregated Greeks, probability of profit and margin-based return
//! figures. Money is `rust_decimal::Decimal`; Greeks and probabilities are
//! plain `f64`.

pub mod analysis;
pub mod cache;
pub mod clock;
pub mod config;
pub mod curve;
pub mod error;
pub mod greeks;
pub mod payoff;
pub mod risk_profile;
pub mod statistics;
pub mod strategy;
pub mod types;
pub mod validation;

pub use error::OptionsRiskError;
pub use types::*;

/// Standard result type for all options-risk operations
pub type OptionsRiskResult<T> = Result<T, OptionsRiskError>;
