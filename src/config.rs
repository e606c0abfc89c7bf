use std::str::FromStr;

use crate::errors::{AnalyticsError, Result};
use crate::models::{ConsensusThresholds, MonthNames};
use crate::services::analyst_service::{
    AnalystEngine, DEFAULT_LONG_WINDOW_DAYS, DEFAULT_SHORT_WINDOW_DAYS,
};
use crate::services::seasonality_service::SeasonalityEngine;

/// Longest accepted revision window (one hundred years).
pub const MAX_REVISION_WINDOW_DAYS: i64 = 36_500;

/// Engine settings read from the environment (`.env` is loaded by the binary).
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub month_locale: String,
    pub consensus_thresholds: ConsensusThresholds,
    pub revision_short_window_days: i64,
    pub revision_long_window_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            month_locale: "de".to_string(),
            consensus_thresholds: ConsensusThresholds::default(),
            revision_short_window_days: DEFAULT_SHORT_WINDOW_DAYS,
            revision_long_window_days: DEFAULT_LONG_WINDOW_DAYS,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            month_locale: std::env::var("MONTH_LOCALE").unwrap_or(defaults.month_locale),
            consensus_thresholds: ConsensusThresholds {
                strong_below_pct: env_or(
                    "CONSENSUS_STRONG_RANGE_PCT",
                    defaults.consensus_thresholds.strong_below_pct,
                )?,
                moderate_below_pct: env_or(
                    "CONSENSUS_MODERATE_RANGE_PCT",
                    defaults.consensus_thresholds.moderate_below_pct,
                )?,
            },
            revision_short_window_days: env_or(
                "REVISION_SHORT_WINDOW_DAYS",
                defaults.revision_short_window_days,
            )?,
            revision_long_window_days: env_or(
                "REVISION_LONG_WINDOW_DAYS",
                defaults.revision_long_window_days,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.consensus_thresholds;
        if !(t.strong_below_pct > 0.0 && t.strong_below_pct < t.moderate_below_pct) {
            return Err(AnalyticsError::Config(format!(
                "consensus thresholds must satisfy 0 < strong ({}) < moderate ({})",
                t.strong_below_pct, t.moderate_below_pct
            )));
        }

        if self.revision_short_window_days <= 0
            || self.revision_long_window_days < self.revision_short_window_days
            || self.revision_long_window_days > MAX_REVISION_WINDOW_DAYS
        {
            return Err(AnalyticsError::Config(format!(
                "revision windows must satisfy 0 < short ({}) <= long ({}) <= {}",
                self.revision_short_window_days,
                self.revision_long_window_days,
                MAX_REVISION_WINDOW_DAYS
            )));
        }

        self.month_names().map(|_| ())
    }

    pub fn month_names(&self) -> Result<MonthNames> {
        MonthNames::from_locale(&self.month_locale).ok_or_else(|| {
            AnalyticsError::Config(format!("unsupported MONTH_LOCALE: {}", self.month_locale))
        })
    }

    pub fn seasonality_engine(&self) -> Result<SeasonalityEngine> {
        Ok(SeasonalityEngine::new(self.month_names()?))
    }

    pub fn analyst_engine(&self) -> AnalystEngine {
        AnalystEngine::new(
            self.consensus_thresholds,
            self.revision_short_window_days,
            self.revision_long_window_days,
        )
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AnalyticsError::Config(format!("invalid value for {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.month_names().unwrap().name(1), "Januar");
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = AnalyticsConfig {
            consensus_thresholds: ConsensusThresholds {
                strong_below_pct: 50.0,
                moderate_below_pct: 40.0,
            },
            ..AnalyticsConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalyticsError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_locale() {
        let config = AnalyticsConfig {
            month_locale: "xx".to_string(),
            ..AnalyticsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_revision_window() {
        let config = AnalyticsConfig {
            revision_long_window_days: 10_000_000_000_000,
            ..AnalyticsConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalyticsError::Config(_))));

        let century = AnalyticsConfig {
            revision_long_window_days: MAX_REVISION_WINDOW_DAYS,
            ..AnalyticsConfig::default()
        };
        assert!(century.validate().is_ok());
    }

    #[test]
    fn test_env_or_parses_and_defaults() {
        assert_eq!(env_or("STOCKWATCH_TEST_UNSET_VAR", 7i64).unwrap(), 7);
    }
}
