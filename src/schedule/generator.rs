//! Per-method schedule generation
//!
//! Each procedure is a pure function of the descriptor and the rounding /
//! clamping policies. Under `RoundingPolicy::PerField` every value is rounded
//! to cents as soon as it is computed; under `AtOutput` the multi-period
//! loops carry full precision and the assembler rounds once.

use rust_decimal::Decimal;

use super::clamping::{settle_charge, ClampKind, ClampLog, ClampWarning};
use super::records::{HourlyPeriodRecord, PeriodRecord, ScheduleBody};
use crate::asset::{AssetDescriptor, HourlyInputs, MethodParams};
use crate::config::{EngineConfig, RoundingPolicy};
use crate::error::{EngineError, Result, ValidationError};
use crate::money::round_money;

/// Raw generator output, before assembly
#[derive(Debug, Clone)]
pub(crate) struct Generated {
    pub body: ScheduleBody,
    pub warnings: Vec<ClampWarning>,
}

/// Dispatch on the descriptor's method
pub(crate) fn generate(
    descriptor: &AssetDescriptor,
    config: &EngineConfig,
) -> Result<Generated> {
    let mut log = ClampLog::new(config.clamping);

    let body = match descriptor.params() {
        MethodParams::StraightLine { useful_life_years } => ScheduleBody::MultiPeriod {
            records: straight_line(descriptor, *useful_life_years, config.rounding, &mut log)?,
        },
        MethodParams::DecliningCoefficient {
            useful_life_years,
            coefficient,
        } => ScheduleBody::MultiPeriod {
            records: declining_coefficient(
                descriptor,
                *useful_life_years,
                *coefficient,
                config.rounding,
                &mut log,
            )?,
        },
        MethodParams::HourlyUsage(inputs) => ScheduleBody::SinglePeriod {
            record: hourly_usage(descriptor, inputs, config, &mut log)?,
        },
    };

    Ok(Generated {
        body,
        warnings: log.into_warnings(),
    })
}

/// Calendar year of the zero-based period `index`
fn period_year(start_year: i32, index: u32) -> Result<i32> {
    i32::try_from(index)
        .ok()
        .and_then(|offset| start_year.checked_add(offset))
        .ok_or(EngineError::Validation(ValidationError::MissingUsefulLife))
}

fn apply(rounding: RoundingPolicy, value: Decimal) -> Decimal {
    match rounding {
        RoundingPolicy::PerField => round_money(value),
        RoundingPolicy::AtOutput => value,
    }
}

/// Even charge `(cost - residual) / life` per year, last year truncated to
/// land exactly on the residual
pub(crate) fn straight_line(
    descriptor: &AssetDescriptor,
    useful_life_years: u32,
    rounding: RoundingPolicy,
    log: &mut ClampLog,
) -> Result<Vec<PeriodRecord>> {
    let cost = descriptor.cost();
    let residual = descriptor.residual_value();
    let start_year = descriptor.purchase_year();

    let per_period = apply(rounding, (cost - residual) / Decimal::from(useful_life_years));

    let mut records = Vec::with_capacity(useful_life_years as usize);
    let mut book_value = cost;
    let mut accumulated = Decimal::ZERO;

    for i in 0..useful_life_years {
        let is_last = i + 1 == useful_life_years;
        let year = period_year(start_year, i)?;

        let requested = if is_last {
            book_value - residual
        } else {
            per_period
        };
        let annual = settle_charge(requested, book_value, residual, is_last, year, i + 1, log)?;

        book_value = apply(rounding, book_value - annual);
        accumulated = apply(rounding, accumulated + annual);

        records.push(PeriodRecord {
            year,
            annual_depreciation: annual,
            accumulated_depreciation: accumulated,
            book_value,
        });
    }

    Ok(records)
}

/// Fixed coefficient applied to a shrinking base
///
/// The base starts at `max(cost - residual, 0)` and shrinks by exactly the
/// amount charged, so it stays equal to `book - residual` throughout.
pub(crate) fn declining_coefficient(
    descriptor: &AssetDescriptor,
    useful_life_years: u32,
    coefficient: Decimal,
    rounding: RoundingPolicy,
    log: &mut ClampLog,
) -> Result<Vec<PeriodRecord>> {
    let cost = descriptor.cost();
    let residual = descriptor.residual_value();
    let start_year = descriptor.purchase_year();

    let mut records = Vec::with_capacity(useful_life_years as usize);
    let mut base = descriptor.depreciable_amount();
    let mut book_value = cost;
    let mut accumulated = Decimal::ZERO;

    for i in 0..useful_life_years {
        let is_last = i + 1 == useful_life_years;
        let year = period_year(start_year, i)?;

        let requested = if is_last {
            book_value - residual
        } else {
            apply(rounding, base * coefficient)
        };
        let annual = settle_charge(requested, book_value, residual, is_last, year, i + 1, log)?;

        book_value = apply(rounding, book_value - annual);
        base = apply(rounding, base - annual);
        accumulated = apply(rounding, accumulated + annual);

        records.push(PeriodRecord {
            year,
            annual_depreciation: annual,
            accumulated_depreciation: accumulated,
            book_value,
        });
    }

    Ok(records)
}

/// One evaluation period restated by the index ratio
///
/// Always rounds per field: there is a single period, so no drift builds
/// up, and `ending == updated - total` holds exactly.
pub(crate) fn hourly_usage(
    descriptor: &AssetDescriptor,
    inputs: &HourlyInputs,
    config: &EngineConfig,
    log: &mut ClampLog,
) -> Result<HourlyPeriodRecord> {
    let figures = inputs.restate(descriptor.cost())?;
    let ending_book_value = figures.ending_book_value;
    // Zero when the configured hours cannot divide the ending value
    let effective_hourly_cost = ending_book_value
        .checked_div(config.effective_annual_hours())
        .map(round_money)
        .unwrap_or(Decimal::ZERO);

    if ending_book_value < descriptor.residual_value() {
        log.record(ClampWarning {
            year: inputs.evaluation_year,
            period: 1,
            kind: ClampKind::BookBelowResidual,
            requested: ending_book_value,
            applied: ending_book_value,
        })?;
    }

    Ok(HourlyPeriodRecord {
        period: PeriodRecord {
            year: inputs.evaluation_year,
            annual_depreciation: figures.period_depreciation,
            accumulated_depreciation: figures.total_accumulated,
            book_value: ending_book_value,
        },
        index_ratio: figures.index_ratio,
        updated_asset_value: figures.updated_asset_value,
        asset_value_increment: figures.asset_value_increment,
        accumulated_depreciation_indexed: figures.accumulated_indexed,
        effective_hourly_cost,
    })
}
