//! Packaging generator output into a `Schedule`

use log::warn;
use rust_decimal::Decimal;

use super::generator::Generated;
use super::records::{HourlyPeriodRecord, PeriodRecord, Schedule, ScheduleBody};
use crate::asset::{AssetDescriptor, MethodParams};
use crate::config::RoundingPolicy;
use crate::money::round_money;

/// Build the final schedule from generator output
///
/// The displayed accumulated depreciation is re-derived from the charges
/// rather than trusted from the generator. Under `AtOutput` rounding this is
/// also where values are rounded to cents; under `PerField` nothing is
/// rounded again.
pub(crate) fn assemble(
    descriptor: &AssetDescriptor,
    generated: Generated,
    rounding: RoundingPolicy,
) -> Schedule {
    let body = match generated.body {
        ScheduleBody::MultiPeriod { records } => ScheduleBody::MultiPeriod {
            records: assemble_periods(records, rounding),
        },
        ScheduleBody::SinglePeriod { record } => ScheduleBody::SinglePeriod {
            record: assemble_hourly(descriptor, record),
        },
    };

    Schedule {
        method: descriptor.method(),
        descriptor: descriptor.clone(),
        body,
        warnings: generated.warnings,
    }
}

fn assemble_periods(mut records: Vec<PeriodRecord>, rounding: RoundingPolicy) -> Vec<PeriodRecord> {
    records.sort_by_key(|r| r.year);

    let mut running = Decimal::ZERO;
    for record in records.iter_mut() {
        running += record.annual_depreciation;
        if running != record.accumulated_depreciation {
            warn!(
                "accumulated depreciation for {} re-derived as {} (generator had {})",
                record.year, running, record.accumulated_depreciation
            );
        }
        record.accumulated_depreciation = running;
    }

    if rounding == RoundingPolicy::AtOutput {
        for record in records.iter_mut() {
            record.annual_depreciation = round_money(record.annual_depreciation);
            record.accumulated_depreciation = round_money(record.accumulated_depreciation);
            record.book_value = round_money(record.book_value);
        }
    }

    records
}

fn assemble_hourly(descriptor: &AssetDescriptor, mut record: HourlyPeriodRecord) -> HourlyPeriodRecord {
    let prior = match descriptor.params() {
        MethodParams::HourlyUsage(inputs) => inputs.prior_accumulated_depreciation,
        _ => Decimal::ZERO,
    };

    let derived = record.period.annual_depreciation + record.accumulated_depreciation_indexed + prior;
    if derived != record.period.accumulated_depreciation {
        warn!(
            "hourly accumulated depreciation re-derived as {} (generator had {})",
            derived, record.period.accumulated_depreciation
        );
        record.period.accumulated_depreciation = derived;
        record.period.book_value = record.updated_asset_value - derived;
    }

    record
}
