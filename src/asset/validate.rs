//! Validation and normalization of raw asset input

use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use super::data::{AssetDescriptor, HourlyInputs, MethodParams, RawAsset};
use crate::error::ValidationError;
use crate::method::{LabelResolver, MethodKind, MethodResolver};
use crate::money::round_money;

/// Accepted purchase date layouts, tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Longest useful life accepted for the yearly methods
pub const MAX_USEFUL_LIFE_YEARS: u32 = 1000;

/// Validate raw input using the console's label heuristic for method detection
pub fn validate(raw: &RawAsset) -> Result<AssetDescriptor, ValidationError> {
    validate_with(raw, &LabelResolver)
}

/// Validate raw input with a caller-supplied label resolver
///
/// Rules are applied in order and the first failure is returned:
/// cost, purchase date, useful life, coefficient, indexation inputs.
pub fn validate_with(
    raw: &RawAsset,
    resolver: &dyn MethodResolver,
) -> Result<AssetDescriptor, ValidationError> {
    let cost = match raw.cost {
        Some(c) if c > Decimal::ZERO => round_money(c),
        _ => return Err(ValidationError::MissingOrInvalidCost),
    };

    let purchase_date = raw
        .purchase_date
        .as_deref()
        .and_then(parse_date)
        .ok_or(ValidationError::InvalidPurchaseDate)?;

    let purchase_year = purchase_date.year();

    let method = raw
        .method
        .unwrap_or_else(|| resolver.resolve(raw.method_label.as_deref().unwrap_or("")));

    let params = match method {
        MethodKind::StraightLine => MethodParams::StraightLine {
            useful_life_years: useful_life(raw, purchase_year)?,
        },
        MethodKind::DecliningCoefficient => {
            let useful_life_years = useful_life(raw, purchase_year)?;
            let coefficient = match raw.coefficient {
                Some(c) if c > Decimal::ZERO && c <= Decimal::ONE => c,
                _ => return Err(ValidationError::MissingCoefficient),
            };
            MethodParams::DecliningCoefficient {
                useful_life_years,
                coefficient,
            }
        }
        MethodKind::HourlyUsage => {
            MethodParams::HourlyUsage(hourly_inputs(raw, cost, purchase_year)?)
        }
    };

    let residual_value = normalize_floor_zero("residual_value", raw.residual_value);

    Ok(AssetDescriptor {
        asset_id: raw.asset_id.clone(),
        cost,
        purchase_date,
        residual_value,
        params,
    })
}

/// Parse a purchase date in any accepted layout
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

fn useful_life(raw: &RawAsset, purchase_year: i32) -> Result<u32, ValidationError> {
    let years = raw
        .useful_life_years
        .and_then(|y| u32::try_from(y).ok())
        .filter(|y| (1..=MAX_USEFUL_LIFE_YEARS).contains(y))
        .ok_or(ValidationError::MissingUsefulLife)?;

    // The last period's year label must be representable
    i32::try_from(years - 1)
        .ok()
        .and_then(|offset| purchase_year.checked_add(offset))
        .ok_or(ValidationError::MissingUsefulLife)?;

    Ok(years)
}

fn hourly_inputs(
    raw: &RawAsset,
    cost: Decimal,
    purchase_year: i32,
) -> Result<HourlyInputs, ValidationError> {
    let positive = |v: Option<Decimal>| v.filter(|x| *x > Decimal::ZERO);

    let index_initial = positive(raw.index_initial);
    let index_final = positive(raw.index_final);
    let hours_in_period = raw.hours_in_period.filter(|h| *h >= Decimal::ZERO);
    let hourly_rate = positive(raw.hourly_rate);

    match (index_initial, index_final, hours_in_period, hourly_rate) {
        (Some(index_initial), Some(index_final), Some(hours_in_period), Some(hourly_rate)) => {
            let inputs = HourlyInputs {
                index_initial,
                index_final,
                hours_in_period,
                hourly_rate,
                prior_accumulated_depreciation: normalize_floor_zero(
                    "prior_accumulated_depreciation",
                    raw.prior_accumulated_depreciation,
                ),
                evaluation_year: raw.evaluation_year.unwrap_or(purchase_year),
            };
            inputs.restate(cost)?;
            Ok(inputs)
        }
        _ => Err(ValidationError::MissingIndexationInputs),
    }
}

/// Optional non-negative amount: missing means zero, negatives are floored
fn normalize_floor_zero(field: &str, value: Option<Decimal>) -> Decimal {
    match value {
        Some(v) if v < Decimal::ZERO => {
            debug!("{} {} is negative, using 0", field, v);
            Decimal::ZERO
        }
        Some(v) => round_money(v),
        None => Decimal::ZERO,
    }
}
