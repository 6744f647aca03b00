//! Terminal configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid
//! configuration. Validation accumulates every problem instead of stopping
//! at the first one.

use crate::error::{AtmError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

pub const DEFAULT_CHECKING_WITHDRAW_LIMIT: u64 = 5000;
pub const DEFAULT_SAVINGS_WITHDRAW_LIMIT: u64 = 1000;
pub const DEFAULT_CASH_RESERVE: u64 = 100_000;
pub const DEFAULT_SERVICE_HZ: u32 = 5;
/// Ceiling on the ticker rate; faster drains would spin on the terminal lock.
pub const MAX_SERVICE_HZ: u32 = 100;

/// Problems found while validating a [`TerminalConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("service_hz must be at least 1")]
    ZeroServiceRate,

    #[error("service_hz {hz} exceeds the maximum of {max}")]
    ServiceRateTooHigh { hz: u32, max: u32 },

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("Malformed configuration: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Per-withdrawal ceiling for checking accounts
    pub checking_withdraw_limit: u64,
    /// Per-withdrawal ceiling for savings accounts
    pub savings_withdraw_limit: u64,
    /// Cash loaded into the terminal at startup
    pub initial_cash_reserve: u64,
    /// How often the ticker drains transition requests
    pub service_hz: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            checking_withdraw_limit: DEFAULT_CHECKING_WITHDRAW_LIMIT,
            savings_withdraw_limit: DEFAULT_SAVINGS_WITHDRAW_LIMIT,
            initial_cash_reserve: DEFAULT_CASH_RESERVE,
            service_hz: DEFAULT_SERVICE_HZ,
        }
    }
}

impl TerminalConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AtmError::Config(vec![ConfigError::Malformed(e.to_string())]))?;
        config.validated()
    }

    /// Check every field, collecting all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let checks = vec![
            Self::positive_limit("checking_withdraw_limit", self.checking_withdraw_limit),
            Self::positive_limit("savings_withdraw_limit", self.savings_withdraw_limit),
            Self::service_rate(self.service_hz),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Consume the config, returning it only if it validates.
    pub fn validated(self) -> Result<Self> {
        match self.validate() {
            Validation::Success(()) => Ok(self),
            Validation::Failure(errors) => Err(AtmError::Config(errors.iter().cloned().collect())),
        }
    }

    /// Period between two `service()` calls of the background ticker.
    ///
    /// The rate is clamped to `1..=MAX_SERVICE_HZ`, so an unvalidated config
    /// still yields a non-zero period.
    pub fn service_interval(&self) -> Duration {
        Duration::from_secs(1) / self.service_hz.clamp(1, MAX_SERVICE_HZ)
    }

    fn service_rate(hz: u32) -> Validation<(), NonEmptyVec<ConfigError>> {
        match hz {
            0 => Validation::fail(ConfigError::ZeroServiceRate),
            hz if hz > MAX_SERVICE_HZ => Validation::fail(ConfigError::ServiceRateTooHigh {
                hz,
                max: MAX_SERVICE_HZ,
            }),
            _ => Validation::success(()),
        }
    }

    fn positive_limit(
        field: &'static str,
        value: u64,
    ) -> Validation<(), NonEmptyVec<ConfigError>> {
        if value == 0 {
            Validation::fail(ConfigError::ZeroLimit { field })
        } else {
            Validation::success(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_terminal_limits() {
        let config = TerminalConfig::default();
        assert_eq!(config.checking_withdraw_limit, 5000);
        assert_eq!(config.savings_withdraw_limit, 1000);
        assert_eq!(config.service_interval(), Duration::from_millis(200));
        assert!(config.validate().is_success());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config = TerminalConfig::from_json("{}").unwrap();
        assert_eq!(config, TerminalConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config =
            TerminalConfig::from_json(r#"{"savings_withdraw_limit": 250, "service_hz": 10}"#)
                .unwrap();
        assert_eq!(config.savings_withdraw_limit, 250);
        assert_eq!(config.checking_withdraw_limit, 5000);
        assert_eq!(config.service_interval(), Duration::from_millis(100));
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let config = TerminalConfig {
            checking_withdraw_limit: 0,
            savings_withdraw_limit: 0,
            initial_cash_reserve: 0,
            service_hz: 0,
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigError::ZeroServiceRate)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn invalid_json_reports_config_error() {
        let result = TerminalConfig::from_json(r#"{"service_hz": 0}"#);
        assert_eq!(
            result,
            Err(AtmError::Config(vec![ConfigError::ZeroServiceRate]))
        );

        let malformed = TerminalConfig::from_json("not json");
        assert!(matches!(malformed, Err(AtmError::Config(_))));
    }

    #[test]
    fn service_rate_above_ceiling_is_rejected() {
        let result = TerminalConfig::from_json(r#"{"service_hz": 5000}"#);
        assert_eq!(
            result,
            Err(AtmError::Config(vec![ConfigError::ServiceRateTooHigh {
                hz: 5000,
                max: MAX_SERVICE_HZ
            }]))
        );

        let at_ceiling = TerminalConfig::from_json(r#"{"service_hz": 100}"#).unwrap();
        assert_eq!(at_ceiling.service_interval(), Duration::from_millis(10));
    }

    #[test]
    fn unvalidated_rate_never_yields_zero_interval() {
        let config = TerminalConfig {
            service_hz: 5000,
            ..TerminalConfig::default()
        };
        assert_eq!(config.service_interval(), Duration::from_millis(10));

        let stopped = TerminalConfig {
            service_hz: 0,
            ..TerminalConfig::default()
        };
        assert_eq!(stopped.service_interval(), Duration::from_secs(1));
    }
}
