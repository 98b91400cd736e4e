//! Asset input records: raw form/register input and the validated descriptor

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::method::MethodKind;
use crate::money::{non_negative, round_money};

/// Unvalidated asset input as it arrives from a form or register row
///
/// Every field is optional; `validate` decides what is required for the
/// selected method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAsset {
    /// Identity used by the persistence gateway (not needed by the engine)
    pub asset_id: Option<String>,

    /// Acquisition value
    pub cost: Option<Decimal>,

    /// Purchase date as entered (`YYYY-MM-DD`, `DD/MM/YYYY` or `YYYY/MM/DD`)
    pub purchase_date: Option<String>,

    /// Number of yearly periods (straight-line and declining only)
    pub useful_life_years: Option<i64>,

    /// Floor for book value, defaults to zero
    pub residual_value: Option<Decimal>,

    /// Explicit method selection; takes precedence over `method_label`
    pub method: Option<MethodKind>,

    /// Free-text method label from the console
    pub method_label: Option<String>,

    /// Declining coefficient in (0, 1]
    pub coefficient: Option<Decimal>,

    /// Restatement index reading at acquisition / prior period
    pub index_initial: Option<Decimal>,

    /// Restatement index reading at the evaluation date
    pub index_final: Option<Decimal>,

    /// Hours worked in the evaluation period
    pub hours_in_period: Option<Decimal>,

    /// Depreciation charged per hour worked
    pub hourly_rate: Option<Decimal>,

    /// Accumulated depreciation carried in from previous periods
    pub prior_accumulated_depreciation: Option<Decimal>,

    /// Year label for the hourly evaluation period
    pub evaluation_year: Option<i32>,
}

impl RawAsset {
    /// Straight-line input with the three required fields set
    pub fn straight_line(cost: Decimal, purchase_date: &str, useful_life_years: i64) -> Self {
        Self {
            cost: Some(cost),
            purchase_date: Some(purchase_date.to_string()),
            useful_life_years: Some(useful_life_years),
            method: Some(MethodKind::StraightLine),
            ..Default::default()
        }
    }

    /// Declining-coefficient input
    pub fn declining(
        cost: Decimal,
        purchase_date: &str,
        useful_life_years: i64,
        coefficient: Decimal,
    ) -> Self {
        Self {
            cost: Some(cost),
            purchase_date: Some(purchase_date.to_string()),
            useful_life_years: Some(useful_life_years),
            method: Some(MethodKind::DecliningCoefficient),
            coefficient: Some(coefficient),
            ..Default::default()
        }
    }

    /// Hours-of-use input
    pub fn hourly(
        cost: Decimal,
        purchase_date: &str,
        index_initial: Decimal,
        index_final: Decimal,
        hours_in_period: Decimal,
        hourly_rate: Decimal,
    ) -> Self {
        Self {
            cost: Some(cost),
            purchase_date: Some(purchase_date.to_string()),
            method: Some(MethodKind::HourlyUsage),
            index_initial: Some(index_initial),
            index_final: Some(index_final),
            hours_in_period: Some(hours_in_period),
            hourly_rate: Some(hourly_rate),
            ..Default::default()
        }
    }

    pub fn with_residual(mut self, residual_value: Decimal) -> Self {
        self.residual_value = Some(residual_value);
        self
    }

    pub fn with_prior_accumulated(mut self, prior: Decimal) -> Self {
        self.prior_accumulated_depreciation = Some(prior);
        self
    }

    pub fn with_asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }
}

/// Inputs specific to the hours-of-use method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyInputs {
    pub index_initial: Decimal,
    pub index_final: Decimal,
    pub hours_in_period: Decimal,
    pub hourly_rate: Decimal,
    pub prior_accumulated_depreciation: Decimal,
    pub evaluation_year: i32,
}

impl HourlyInputs {
    /// Restatement ratio `index_final / index_initial`, `None` on overflow
    pub fn index_ratio(&self) -> Option<Decimal> {
        self.index_final.checked_div(self.index_initial)
    }

    /// Restate `cost` and the prior depreciation and charge the period
    ///
    /// Every value is rounded to cents. Overflow of the restated cost is a
    /// cost error; any other overflow is an indexation input error.
    pub(crate) fn restate(&self, cost: Decimal) -> Result<HourlyFigures, ValidationError> {
        let inputs_error = || ValidationError::MissingIndexationInputs;
        let prior = self.prior_accumulated_depreciation;

        let index_ratio = self.index_ratio().ok_or_else(inputs_error)?;
        let updated_asset_value = cost
            .checked_mul(index_ratio)
            .map(round_money)
            .ok_or(ValidationError::MissingOrInvalidCost)?;
        let accumulated_indexed = prior
            .checked_mul(index_ratio)
            .map(round_money)
            .ok_or_else(inputs_error)?;
        let period_depreciation = self
            .hours_in_period
            .checked_mul(self.hourly_rate)
            .map(round_money)
            .ok_or_else(inputs_error)?;
        // Prior is counted both restated and as carried in
        let total_accumulated = period_depreciation
            .checked_add(accumulated_indexed)
            .and_then(|t| t.checked_add(prior))
            .map(round_money)
            .ok_or_else(inputs_error)?;
        let ending_book_value = updated_asset_value
            .checked_sub(total_accumulated)
            .map(round_money)
            .ok_or_else(inputs_error)?;

        Ok(HourlyFigures {
            index_ratio,
            updated_asset_value,
            asset_value_increment: round_money(updated_asset_value - cost),
            accumulated_indexed,
            period_depreciation,
            total_accumulated,
            ending_book_value,
        })
    }
}

/// Rounded results of one hourly restatement
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HourlyFigures {
    pub index_ratio: Decimal,
    pub updated_asset_value: Decimal,
    pub asset_value_increment: Decimal,
    pub accumulated_indexed: Decimal,
    pub period_depreciation: Decimal,
    pub total_accumulated: Decimal,
    pub ending_book_value: Decimal,
}

/// Method selection together with the inputs it needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MethodParams {
    StraightLine { useful_life_years: u32 },
    DecliningCoefficient { useful_life_years: u32, coefficient: Decimal },
    HourlyUsage(HourlyInputs),
}

impl MethodParams {
    pub fn kind(&self) -> MethodKind {
        match self {
            MethodParams::StraightLine { .. } => MethodKind::StraightLine,
            MethodParams::DecliningCoefficient { .. } => MethodKind::DecliningCoefficient,
            MethodParams::HourlyUsage(_) => MethodKind::HourlyUsage,
        }
    }
}

/// A validated asset, immutable for the duration of one computation
///
/// Only `validate` constructs descriptors, so every descriptor satisfies the
/// validation rules (positive cost, positive life for yearly methods, etc.).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDescriptor {
    pub(crate) asset_id: Option<String>,
    pub(crate) cost: Decimal,
    pub(crate) purchase_date: NaiveDate,
    pub(crate) residual_value: Decimal,
    pub(crate) params: MethodParams,
}

impl AssetDescriptor {
    pub fn asset_id(&self) -> Option<&str> {
        self.asset_id.as_deref()
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    /// First schedule year
    pub fn purchase_year(&self) -> i32 {
        self.purchase_date.year()
    }

    pub fn residual_value(&self) -> Decimal {
        self.residual_value
    }

    pub fn params(&self) -> &MethodParams {
        &self.params
    }

    pub fn method(&self) -> MethodKind {
        self.params.kind()
    }

    /// Number of yearly periods; `None` for the hourly method
    pub fn useful_life_years(&self) -> Option<u32> {
        match self.params {
            MethodParams::StraightLine { useful_life_years }
            | MethodParams::DecliningCoefficient { useful_life_years, .. } => Some(useful_life_years),
            MethodParams::HourlyUsage(_) => None,
        }
    }

    /// Amount to be written off over the schedule, never negative
    pub fn depreciable_amount(&self) -> Decimal {
        non_negative(self.cost - self.residual_value)
    }
}
