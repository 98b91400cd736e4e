//! Engine configuration
//!
//! Defaults reproduce the console's stored schedules. Environment variables
//! (all optional):
//!   DEPRECIATION_USAGE_FACTOR  positive decimal, default 1
//!   DEPRECIATION_ROUNDING      `per-field` | `at-output`, default per-field
//!   DEPRECIATION_CLAMPING      `silent` | `strict`, default silent

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// Standard working hours in a year: 300 days x 8 hours
pub const STANDARD_ANNUAL_HOURS: u32 = 2400;

pub const ENV_USAGE_FACTOR: &str = "DEPRECIATION_USAGE_FACTOR";
pub const ENV_ROUNDING: &str = "DEPRECIATION_ROUNDING";
pub const ENV_CLAMPING: &str = "DEPRECIATION_CLAMPING";

/// When monetary values are rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// Round every computed value as soon as it is produced (legacy behaviour,
    /// small drift accumulates over long schedules)
    #[default]
    PerField,
    /// Carry full precision through the loop and round once when packaging
    AtOutput,
}

impl FromStr for RoundingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "per-field" => Ok(RoundingPolicy::PerField),
            "at-output" => Ok(RoundingPolicy::AtOutput),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_ROUNDING,
                value: s.to_string(),
            }),
        }
    }
}

/// What happens when the generator has to clamp a charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClampingPolicy {
    /// Clamp, record a warning on the schedule and carry on
    #[default]
    Silent,
    /// Reject the schedule at the first clamp
    Strict,
}

impl FromStr for ClampingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(ClampingPolicy::Silent),
            "strict" => Ok(ClampingPolicy::Strict),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_CLAMPING,
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for a `ScheduleEngine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Divisor applied on top of the standard annual hours when computing
    /// the effective hourly cost of the hourly method
    pub usage_factor: Decimal,

    pub rounding: RoundingPolicy,

    pub clamping: ClampingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            usage_factor: Decimal::ONE,
            rounding: RoundingPolicy::PerField,
            clamping: ClampingPolicy::Silent,
        }
    }
}

impl EngineConfig {
    /// Load from process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, map, CLI layer)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_USAGE_FACTOR) {
            let factor = Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidValue {
                key: ENV_USAGE_FACTOR,
                value: raw.clone(),
            })?;
            config = config.with_usage_factor(factor)?;
        }
        if let Some(raw) = lookup(ENV_ROUNDING) {
            config.rounding = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_CLAMPING) {
            config.clamping = raw.parse()?;
        }

        Ok(config)
    }

    pub fn with_usage_factor(mut self, usage_factor: Decimal) -> Result<Self, ConfigError> {
        if usage_factor <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveUsageFactor(usage_factor.to_string()));
        }
        self.usage_factor = usage_factor;
        Ok(self)
    }

    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_clamping(mut self, clamping: ClampingPolicy) -> Self {
        self.clamping = clamping;
        self
    }

    /// Hours the ending book value is spread over for the effective hourly cost
    pub fn effective_annual_hours(&self) -> Decimal {
        Decimal::from(STANDARD_ANNUAL_HOURS) * self.usage_factor
    }
}
