//! Fleet Depreciation - deterministic depreciation schedules for fleet assets
//!
//! This library provides:
//! - Validation and normalization of raw asset input
//! - Free-text method label resolution
//! - Straight-line, declining-coefficient and indexed hours-of-use schedules
//! - Explicit rounding and clamping policies
//! - A storage contract for computed schedules (latest wins)

pub mod asset;
pub mod config;
pub mod error;
pub mod method;
pub mod money;
pub mod persistence;
pub mod schedule;

// Re-export commonly used types
pub use asset::{validate, AssetDescriptor, RawAsset};
pub use config::{ClampingPolicy, EngineConfig, RoundingPolicy};
pub use error::{EngineError, ValidationError};
pub use method::{resolve_method, MethodKind};
pub use schedule::{generate_schedule, PeriodRecord, Schedule, ScheduleEngine};
