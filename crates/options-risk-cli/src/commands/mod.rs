pub mod analyze;
pub mod catalog;

use chrono::NaiveDate;
use options_risk_core::clock::{Clock, FixedClock, SystemClock};
use options_risk_core::config::AnalysisConfig;
use options_risk_core::OptionsRiskError;

use crate::input;

/// Options shared by every subcommand.
pub struct GlobalOptions {
    pub config: AnalysisConfig,
    pub as_of: Option<NaiveDate>,
}

impl GlobalOptions {
    pub fn load(
        config_path: Option<&str>,
        as_of: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match config_path {
            Some(path) => input::file::read_config(path)?,
            None => AnalysisConfig::default(),
        };
        config.check()?;

        let as_of = as_of
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| OptionsRiskError::InvalidInput {
                    field: "--as-of".into(),
                    reason: format!("'{}' is not a YYYY-MM-DD date: {}", s, e),
                })
            })
            .transpose()?;

        tracing::debug!(config = ?config_path, as_of = ?as_of, "options loaded");
        Ok(Self { config, as_of })
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match self.as_of {
            Some(date) => Box::new(FixedClock(date)),
            None => Box::new(SystemClock),
        }
    }
}
