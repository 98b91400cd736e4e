//! Clamp reporting for the schedule generator
//!
//! The generator never fails on arithmetically inconsistent input under the
//! default policy: it clamps the offending charge and keeps going. Each clamp
//! is recorded here so callers can see what was corrected, and the strict
//! policy turns the first one into an error.

use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::config::ClampingPolicy;
use crate::error::{EngineError, Result};
use crate::money::non_negative;

/// What was corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampKind {
    /// A negative charge was raised to zero (residual above cost)
    NegativeCharge,
    /// A non-final charge would have taken book value below the residual
    ResidualFloor,
    /// Hourly ending book value is below the residual; reported, not altered
    BookBelowResidual,
}

/// One correction applied (or reported) during generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClampWarning {
    pub year: i32,
    /// 1-based period index within the schedule
    pub period: u32,
    pub kind: ClampKind,
    /// Value the formula produced
    pub requested: Decimal,
    /// Value written to the record
    pub applied: Decimal,
}

impl fmt::Display for ClampWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} in period {} ({}): requested {}, applied {}",
            self.kind, self.period, self.year, self.requested, self.applied
        )
    }
}

/// Collects warnings for one generation run and enforces the policy
#[derive(Debug)]
pub(crate) struct ClampLog {
    policy: ClampingPolicy,
    warnings: Vec<ClampWarning>,
}

impl ClampLog {
    pub(crate) fn new(policy: ClampingPolicy) -> Self {
        Self {
            policy,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, warning: ClampWarning) -> Result<()> {
        match self.policy {
            ClampingPolicy::Strict => Err(EngineError::Clamped(warning)),
            ClampingPolicy::Silent => {
                warn!("clamped schedule value: {}", warning);
                self.warnings.push(warning);
                Ok(())
            }
        }
    }

    pub(crate) fn into_warnings(self) -> Vec<ClampWarning> {
        self.warnings
    }
}

/// Settle the charge for one multi-period row
///
/// Non-final charges that would cross the residual are floored to it;
/// negative charges are raised to zero. Final-period truncation to
/// `book - residual` is done by the caller before this and is not a clamp.
pub(crate) fn settle_charge(
    requested: Decimal,
    book_value: Decimal,
    residual_value: Decimal,
    is_last: bool,
    year: i32,
    period: u32,
    log: &mut ClampLog,
) -> Result<Decimal> {
    if requested < Decimal::ZERO {
        log.record(ClampWarning {
            year,
            period,
            kind: ClampKind::NegativeCharge,
            requested,
            applied: Decimal::ZERO,
        })?;
        return Ok(Decimal::ZERO);
    }

    if !is_last && requested > Decimal::ZERO && book_value - requested < residual_value {
        let floored = non_negative(book_value - residual_value);
        log.record(ClampWarning {
            year,
            period,
            kind: ClampKind::ResidualFloor,
            requested,
            applied: floored,
        })?;
        return Ok(floored);
    }

    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_passthrough() {
        let mut log = ClampLog::new(ClampingPolicy::Silent);
        let charge = settle_charge(dec!(100), dec!(500), dec!(0), false, 2020, 1, &mut log).unwrap();
        assert_eq!(charge, dec!(100));
        assert!(log.into_warnings().is_empty());
    }

    #[test]
    fn test_residual_floor() {
        let mut log = ClampLog::new(ClampingPolicy::Silent);
        let charge = settle_charge(dec!(0.02), dec!(0.05), dec!(0.04), false, 2024, 5, &mut log).unwrap();
        assert_eq!(charge, dec!(0.01));

        let warnings = log.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, ClampKind::ResidualFloor);
        assert_eq!(warnings[0].requested, dec!(0.02));
        assert_eq!(warnings[0].applied, dec!(0.01));
    }

    #[test]
    fn test_last_period_not_floored() {
        let mut log = ClampLog::new(ClampingPolicy::Silent);
        let charge = settle_charge(dec!(30), dec!(130), dec!(100), true, 2022, 3, &mut log).unwrap();
        assert_eq!(charge, dec!(30));
        assert!(log.into_warnings().is_empty());
    }

    #[test]
    fn test_negative_charge_single_warning() {
        let mut log = ClampLog::new(ClampingPolicy::Silent);
        let charge = settle_charge(dec!(-50), dec!(1000), dec!(1200), false, 2020, 1, &mut log).unwrap();
        assert_eq!(charge, Decimal::ZERO);

        let warnings = log.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, ClampKind::NegativeCharge);
    }

    #[test]
    fn test_strict_policy_errors() {
        let mut log = ClampLog::new(ClampingPolicy::Strict);
        let err = settle_charge(dec!(-1), dec!(10), dec!(20), true, 2021, 2, &mut log).unwrap_err();
        match err {
            EngineError::Clamped(w) => {
                assert_eq!(w.kind, ClampKind::NegativeCharge);
                assert_eq!(w.period, 2);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
