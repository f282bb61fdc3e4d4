//! Runtime configuration
//!
//! Read once at startup from environment variables.

use thiserror::Error;

use crate::calc::transfection::DEFAULT_MIN_PIPETTE_UL;
use crate::grading::DEFAULT_TOLERANCE;

pub const TOLERANCE_ENV: &str = "LABTUTOR_TOLERANCE";
pub const MIN_PIPETTE_ENV: &str = "LABTUTOR_MIN_PIPETTE_UL";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    NotANumber { var: &'static str, value: String },

    #[error("{var} {requirement}, got {value}")]
    OutOfRange {
        var: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Default absolute tolerance for numeric answers
    pub tolerance: f64,
    /// Volumes below this many µL get a pipetting warning
    pub min_pipette_ul: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_pipette_ul: DEFAULT_MIN_PIPETTE_UL,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let tolerance = match lookup(TOLERANCE_ENV) {
            Some(raw) => {
                let value = parse_number(TOLERANCE_ENV, &raw)?;
                if value < 0.0 {
                    return Err(ConfigError::OutOfRange {
                        var: TOLERANCE_ENV,
                        requirement: "must not be negative",
                        value,
                    });
                }
                value
            }
            None => defaults.tolerance,
        };

        let min_pipette_ul = match lookup(MIN_PIPETTE_ENV) {
            Some(raw) => {
                let value = parse_number(MIN_PIPETTE_ENV, &raw)?;
                if value <= 0.0 {
                    return Err(ConfigError::OutOfRange {
                        var: MIN_PIPETTE_ENV,
                        requirement: "must be greater than zero",
                        value,
                    });
                }
                value
            }
            None => defaults.min_pipette_ul,
        };

        Ok(Self {
            tolerance,
            min_pipette_ul,
        })
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::NotANumber {
            var,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |var| {
            pairs
                .iter()
                .find(|(k, _)| *k == var)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tolerance, 0.011);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (TOLERANCE_ENV, "0.5"),
            (MIN_PIPETTE_ENV, " 0.2 "),
        ]))
        .unwrap();
        assert_eq!(config.tolerance, 0.5);
        assert_eq!(config.min_pipette_ul, 0.2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(TOLERANCE_ENV, "tight")])),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(TOLERANCE_ENV, "-0.1")])),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(MIN_PIPETTE_ENV, "0")])),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(TOLERANCE_ENV, "NaN")])),
            Err(ConfigError::NotANumber { .. })
        ));
    }
}
