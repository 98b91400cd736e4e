//! Load raw assets from a fleet register CSV
//!
//! Expected header (column order is free, empty cells mean "not provided"):
//! AssetId,Cost,PurchaseDate,UsefulLifeYears,ResidualValue,Method,MethodLabel,
//! Coefficient,IndexInitial,IndexFinal,HoursInPeriod,HourlyRate,
//! PriorAccumulatedDepreciation,EvaluationYear

use csv::Reader;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::RawAsset;
use crate::error::LoaderError;
use crate::method::MethodKind;

/// Raw CSV row; every cell is kept as text until conversion
#[derive(Debug, Default, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "AssetId", default)]
    asset_id: Option<String>,
    #[serde(rename = "Cost", default)]
    cost: Option<String>,
    #[serde(rename = "PurchaseDate", default)]
    purchase_date: Option<String>,
    #[serde(rename = "UsefulLifeYears", default)]
    useful_life_years: Option<String>,
    #[serde(rename = "ResidualValue", default)]
    residual_value: Option<String>,
    #[serde(rename = "Method", default)]
    method: Option<String>,
    #[serde(rename = "MethodLabel", default)]
    method_label: Option<String>,
    #[serde(rename = "Coefficient", default)]
    coefficient: Option<String>,
    #[serde(rename = "IndexInitial", default)]
    index_initial: Option<String>,
    #[serde(rename = "IndexFinal", default)]
    index_final: Option<String>,
    #[serde(rename = "HoursInPeriod", default)]
    hours_in_period: Option<String>,
    #[serde(rename = "HourlyRate", default)]
    hourly_rate: Option<String>,
    #[serde(rename = "PriorAccumulatedDepreciation", default)]
    prior_accumulated_depreciation: Option<String>,
    #[serde(rename = "EvaluationYear", default)]
    evaluation_year: Option<String>,
}

impl CsvRow {
    fn to_raw_asset(self, row: usize) -> Result<RawAsset, LoaderError> {
        let decimal = |name: &str, cell: Option<String>| -> Result<Option<Decimal>, LoaderError> {
            match non_empty(cell) {
                Some(text) => Decimal::from_str(&text).map(Some).map_err(|_| LoaderError::Row {
                    row,
                    message: format!("{} is not a number: {}", name, text),
                }),
                None => Ok(None),
            }
        };

        let method = match non_empty(self.method) {
            Some(text) => Some(MethodKind::from_str(&text).map_err(|e| LoaderError::Row {
                row,
                message: e.to_string(),
            })?),
            None => None,
        };

        let useful_life_years = match non_empty(self.useful_life_years) {
            Some(text) => Some(text.parse::<i64>().map_err(|_| LoaderError::Row {
                row,
                message: format!("UsefulLifeYears is not an integer: {}", text),
            })?),
            None => None,
        };

        let evaluation_year = match non_empty(self.evaluation_year) {
            Some(text) => Some(text.parse::<i32>().map_err(|_| LoaderError::Row {
                row,
                message: format!("EvaluationYear is not a year: {}", text),
            })?),
            None => None,
        };

        Ok(RawAsset {
            asset_id: non_empty(self.asset_id),
            cost: decimal("Cost", self.cost)?,
            purchase_date: non_empty(self.purchase_date),
            useful_life_years,
            residual_value: decimal("ResidualValue", self.residual_value)?,
            method,
            method_label: non_empty(self.method_label),
            coefficient: decimal("Coefficient", self.coefficient)?,
            index_initial: decimal("IndexInitial", self.index_initial)?,
            index_final: decimal("IndexFinal", self.index_final)?,
            hours_in_period: decimal("HoursInPeriod", self.hours_in_period)?,
            hourly_rate: decimal("HourlyRate", self.hourly_rate)?,
            prior_accumulated_depreciation: decimal(
                "PriorAccumulatedDepreciation",
                self.prior_accumulated_depreciation,
            )?,
            evaluation_year,
        })
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Load all assets from a register file
pub fn load_assets<P: AsRef<Path>>(path: P) -> Result<Vec<RawAsset>, LoaderError> {
    let reader = Reader::from_path(path)?;
    collect_rows(reader)
}

/// Load assets from any reader (string buffer, upload stream)
pub fn load_assets_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<RawAsset>, LoaderError> {
    collect_rows(Reader::from_reader(reader))
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<RawAsset>, LoaderError> {
    let mut assets = Vec::new();

    // Data rows are numbered from 1, header excluded
    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        assets.push(row.to_raw_asset(idx + 1)?);
    }

    Ok(assets)
}
