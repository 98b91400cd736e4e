//! Depreciation method kinds and the free-text label resolver
//!
//! Asset records coming from the console carry a free-text method label
//! (e.g. "LINEA RECTA", "DEPRECIACION POR HRS. DE USO"). The resolver turns
//! that label into a `MethodKind` at the input boundary; nothing past the
//! validator ever looks at the label again.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Token that marks an hours-of-use label
pub const HOURLY_LABEL_TOKEN: &str = "HRS.";

/// Canonical computation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Even charge per year down to the residual value
    StraightLine,
    /// Fixed percentage of the remaining base (regulatory coefficient table)
    DecliningCoefficient,
    /// Single-period hours-of-use charge with index restatement
    HourlyUsage,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::StraightLine => "straight_line",
            MethodKind::DecliningCoefficient => "declining_coefficient",
            MethodKind::HourlyUsage => "hourly_usage",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = ConfigError;

    /// Parse a canonical method name (`straight_line`, `declining_coefficient`,
    /// `hourly_usage`); dashes are accepted in place of underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "straight_line" => Ok(MethodKind::StraightLine),
            "declining_coefficient" => Ok(MethodKind::DecliningCoefficient),
            "hourly_usage" => Ok(MethodKind::HourlyUsage),
            _ => Err(ConfigError::InvalidValue {
                key: "method",
                value: s.to_string(),
            }),
        }
    }
}

/// Maps a free-text method label to a `MethodKind`
pub trait MethodResolver: Send + Sync {
    fn resolve(&self, label: &str) -> MethodKind;
}

/// Substring heuristic used by the asset console
///
/// `"HRS."` anywhere in the label (any case) selects hourly usage; everything
/// else, including empty or unknown labels, falls back to straight-line.
/// Declining coefficient is never selected from free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelResolver;

impl MethodResolver for LabelResolver {
    fn resolve(&self, label: &str) -> MethodKind {
        if label.to_uppercase().contains(HOURLY_LABEL_TOKEN) {
            MethodKind::HourlyUsage
        } else {
            MethodKind::StraightLine
        }
    }
}

/// Resolve a label with the default `LabelResolver`
pub fn resolve_method(label: &str) -> MethodKind {
    LabelResolver.resolve(label)
}
