//! Asset input: raw records, validated descriptors and register loading

mod data;
mod validate;
pub mod loader;

pub use data::{AssetDescriptor, HourlyInputs, MethodParams, RawAsset};
pub use validate::{parse_date, validate, validate_with, MAX_USEFUL_LIFE_YEARS};
pub use loader::{load_assets, load_assets_from_reader};
