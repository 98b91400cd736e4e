//! Schedule output structures

use rust_decimal::Decimal;
use serde::Serialize;

use super::clamping::ClampWarning;
use crate::asset::AssetDescriptor;
use crate::method::MethodKind;

/// One row of a depreciation schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodRecord {
    pub year: i32,
    pub annual_depreciation: Decimal,
    pub accumulated_depreciation: Decimal,
    pub book_value: Decimal,
}

/// The single evaluation period of the hourly method
///
/// `period.annual_depreciation` is the hours x rate charge,
/// `period.accumulated_depreciation` the restated total and
/// `period.book_value` the ending book value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyPeriodRecord {
    #[serde(flatten)]
    pub period: PeriodRecord,

    /// `index_final / index_initial`, unrounded
    pub index_ratio: Decimal,

    /// Cost restated to current monetary terms
    pub updated_asset_value: Decimal,

    /// `updated_asset_value - cost`
    pub asset_value_increment: Decimal,

    /// Prior accumulated depreciation restated by the index ratio
    pub accumulated_depreciation_indexed: Decimal,

    /// Ending book value spread over the standard working hours
    pub effective_hourly_cost: Decimal,
}

impl HourlyPeriodRecord {
    pub fn period_depreciation(&self) -> Decimal {
        self.period.annual_depreciation
    }

    pub fn total_accumulated_depreciation(&self) -> Decimal {
        self.period.accumulated_depreciation
    }

    pub fn ending_book_value(&self) -> Decimal {
        self.period.book_value
    }
}

/// Shape of a schedule depends on the method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ScheduleBody {
    /// Yearly table (straight-line, declining coefficient)
    MultiPeriod { records: Vec<PeriodRecord> },
    /// One evaluation period (hourly usage)
    SinglePeriod { record: HourlyPeriodRecord },
}

/// A computed depreciation schedule
///
/// Schedules are values: they are never modified after assembly. A new
/// computation with new inputs produces a new schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub(crate) method: MethodKind,
    pub(crate) descriptor: AssetDescriptor,
    pub(crate) body: ScheduleBody,
    pub(crate) warnings: Vec<ClampWarning>,
}

impl Schedule {
    pub fn method(&self) -> MethodKind {
        self.method
    }

    pub fn descriptor(&self) -> &AssetDescriptor {
        &self.descriptor
    }

    pub fn body(&self) -> &ScheduleBody {
        &self.body
    }

    /// Clamps applied during generation (empty for consistent input)
    pub fn warnings(&self) -> &[ClampWarning] {
        &self.warnings
    }

    /// Base columns of every period, whatever the shape
    pub fn records(&self) -> &[PeriodRecord] {
        match &self.body {
            ScheduleBody::MultiPeriod { records } => records,
            ScheduleBody::SinglePeriod { record } => std::slice::from_ref(&record.period),
        }
    }

    /// Hourly detail, if this is an hourly schedule
    pub fn hourly(&self) -> Option<&HourlyPeriodRecord> {
        match &self.body {
            ScheduleBody::SinglePeriod { record } => Some(record),
            ScheduleBody::MultiPeriod { .. } => None,
        }
    }

    pub fn final_record(&self) -> Option<&PeriodRecord> {
        self.records().last()
    }

    pub fn summary(&self) -> ScheduleSummary {
        let records = self.records();
        let total_depreciation: Decimal = records.iter().map(|r| r.annual_depreciation).sum();

        ScheduleSummary {
            method: self.method,
            periods: records.len() as u32,
            first_year: records.first().map(|r| r.year),
            last_year: records.last().map(|r| r.year),
            total_depreciation,
            final_accumulated_depreciation: records
                .last()
                .map(|r| r.accumulated_depreciation)
                .unwrap_or(Decimal::ZERO),
            final_book_value: records
                .last()
                .map(|r| r.book_value)
                .unwrap_or(self.descriptor.cost()),
            warning_count: self.warnings.len() as u32,
        }
    }

    /// Flatten into one row per period for tabular output
    pub fn to_rows(&self) -> Vec<ScheduleRow> {
        let asset_id = self.descriptor.asset_id().unwrap_or("").to_string();
        let hourly = self.hourly();

        self.records()
            .iter()
            .map(|r| ScheduleRow {
                asset_id: asset_id.clone(),
                method: self.method,
                year: r.year,
                annual_depreciation: r.annual_depreciation,
                accumulated_depreciation: r.accumulated_depreciation,
                book_value: r.book_value,
                updated_asset_value: hourly.map(|h| h.updated_asset_value),
                asset_value_increment: hourly.map(|h| h.asset_value_increment),
                accumulated_depreciation_indexed: hourly.map(|h| h.accumulated_depreciation_indexed),
                effective_hourly_cost: hourly.map(|h| h.effective_hourly_cost),
            })
            .collect()
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub method: MethodKind,
    pub periods: u32,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub total_depreciation: Decimal,
    pub final_accumulated_depreciation: Decimal,
    pub final_book_value: Decimal,
    pub warning_count: u32,
}

/// Flat row used for CSV/JSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub asset_id: String,
    pub method: MethodKind,
    pub year: i32,
    pub annual_depreciation: Decimal,
    pub accumulated_depreciation: Decimal,
    pub book_value: Decimal,
    pub updated_asset_value: Option<Decimal>,
    pub asset_value_increment: Option<Decimal>,
    pub accumulated_depreciation_indexed: Option<Decimal>,
    pub effective_hourly_cost: Option<Decimal>,
}
