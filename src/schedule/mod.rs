//! Depreciation schedule generation and packaging

mod assembler;
mod clamping;
mod engine;
mod generator;
mod records;

pub use clamping::{ClampKind, ClampWarning};
pub use engine::{generate_schedule, ScheduleEngine};
pub use records::{
    HourlyPeriodRecord, PeriodRecord, Schedule, ScheduleBody, ScheduleRow, ScheduleSummary,
};
