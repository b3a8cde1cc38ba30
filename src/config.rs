//! Deployment configuration.
//!
//! ## Environment
//!
//! | Variable                 | Default     | Meaning                               |
//! |--------------------------|-------------|---------------------------------------|
//! | `LOTTO_RESULT_CAP`       | `20`        | Max rows returned per check           |
//! | `LOTTO_THRESHOLD_POLICY` | `any_match` | What an absent threshold means        |
//! | `LOTTO_SQL_DIALECT`      | `postgres`  | Query dialect for the SQL draw store  |

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::store::SqlDialect;

/// Default row cap
pub const DEFAULT_RESULT_CAP: usize = 20;

pub const ENV_RESULT_CAP: &str = "LOTTO_RESULT_CAP";
pub const ENV_THRESHOLD_POLICY: &str = "LOTTO_THRESHOLD_POLICY";
pub const ENV_SQL_DIALECT: &str = "LOTTO_SQL_DIALECT";

/// What a check without a threshold counts as a win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Any non-empty intersection qualifies
    #[default]
    AnyMatch,
    /// A threshold must be supplied; its absence is a validation failure
    Required,
}

impl FromStr for ThresholdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any_match" => Ok(ThresholdPolicy::AnyMatch),
            "required" => Ok(ThresholdPolicy::Required),
            other => Err(format!("expected `any_match` or `required`, got `{other}`")),
        }
    }
}

// ============================================================================
// EngineConfig
// ============================================================================

/// Match engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Max rows per result; never applied to the win count
    pub result_cap: usize,

    pub threshold_policy: ThresholdPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            result_cap: DEFAULT_RESULT_CAP,
            threshold_policy: ThresholdPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset
    /// variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_RESULT_CAP) {
            config.result_cap = parse_var(ENV_RESULT_CAP, &value)?;
        }
        if let Some(value) = lookup(ENV_THRESHOLD_POLICY) {
            config.threshold_policy = parse_var(ENV_THRESHOLD_POLICY, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_cap == 0 {
            return Err(ConfigError::ZeroResultCap);
        }
        Ok(())
    }
}

// ============================================================================
// StoreConfig
// ============================================================================

/// Draw store adapter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub dialect: SqlDialect,
}

impl StoreConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_SQL_DIALECT) {
            config.dialect = parse_var(ENV_SQL_DIALECT, &value)?;
        }
        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
