//! Error types for validation, generation, configuration and storage

use thiserror::Error;

use crate::schedule::ClampWarning;

/// Input problems detected before any computation starts
///
/// Rules are checked in a fixed order and the first failure wins, so each
/// variant corresponds to exactly one missing or malformed input group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cost is missing or not a positive amount")]
    MissingOrInvalidCost,

    #[error("purchase date is missing or not a valid calendar date")]
    InvalidPurchaseDate,

    #[error("useful life (years) is missing or not positive")]
    MissingUsefulLife,

    #[error("declining method requires a coefficient in (0, 1]")]
    MissingCoefficient,

    #[error("hourly method requires index values, hours in period and an hourly rate")]
    MissingIndexationInputs,
}

/// Errors surfaced by the schedule engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid asset: {0}")]
    Validation(#[from] ValidationError),

    /// Only raised under `ClampingPolicy::Strict`
    #[error("strict clamping policy rejected the schedule: {0}")]
    Clamped(ClampWarning),
}

/// Invalid engine configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("usage factor must be positive, got {0}")]
    NonPositiveUsageFactor(String),
}

/// Failures reported by a schedule gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("no stored schedule {schedule_id} for asset {asset_id}")]
    NotFound { asset_id: String, schedule_id: u64 },

    #[error("schedule {schedule_id} belongs to asset {stored}, not {requested}")]
    AssetMismatch {
        schedule_id: u64,
        stored: String,
        requested: String,
    },
}

/// Failures while reading a fleet register
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
