// Optional JSON configuration for the engine.
//
// ```json
// {
//   "horizon_year": 2030,
//   "currency_symbol": "$",
//   "polarity_overrides": { "Retention Ratio": "higher_is_better" },
//   "format_overrides": { "Learners Reached": "count" }
// }
// ```

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::format::{ValueFormatter, ValueKind};
use crate::polarity::{Polarity, PolarityClassifier};
use crate::projection::DEFAULT_HORIZON_YEAR;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub horizon_year: i32,
    pub currency_symbol: String,
    pub polarity_overrides: BTreeMap<String, Polarity>,
    pub format_overrides: BTreeMap<String, ValueKind>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            horizon_year: DEFAULT_HORIZON_YEAR,
            currency_symbol: "$".to_string(),
            polarity_overrides: BTreeMap::new(),
            format_overrides: BTreeMap::new(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(s: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(s).map_err(|source| DashboardError::Json {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read a config file. Unlike datasets, a missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text, path)?;
        info!(
            "loaded config from {} ({} polarity / {} format overrides)",
            path.display(),
            config.polarity_overrides.len(),
            config.format_overrides.len()
        );
        Ok(config)
    }

    pub fn engine(&self) -> Engine {
        let polarity = PolarityClassifier::with_overrides(
            self.polarity_overrides.iter().map(|(k, v)| (k.as_str(), *v)),
        );
        let mut formatter = ValueFormatter::new(self.currency_symbol.clone());
        for (name, kind) in &self.format_overrides {
            formatter.set_override(name, *kind);
        }
        Engine {
            polarity,
            formatter,
            horizon_year: self.horizon_year,
        }
    }
}

/// Everything the report builders need besides the data itself.
#[derive(Debug, Clone)]
pub struct Engine {
    pub polarity: PolarityClassifier,
    pub formatter: ValueFormatter,
    pub horizon_year: i32,
}

impl Default for Engine {
    fn default() -> Self {
        DashboardConfig::default().engine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = DashboardConfig::from_json_str("{}", Path::new("cfg.json"));
        let cfg = match cfg {
            Ok(c) => c,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(cfg.horizon_year, 2030);
        assert_eq!(cfg.currency_symbol, "$");
    }

    #[test]
    fn overrides_flow_into_engine() {
        let json = r#"{
            "horizon_year": 2035,
            "currency_symbol": "£",
            "polarity_overrides": { "Retention Ratio": "higher_is_better" },
            "format_overrides": { "Retention Ratio": "percentage" }
        }"#;
        let engine = match DashboardConfig::from_json_str(json, Path::new("cfg.json")) {
            Ok(c) => c.engine(),
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(engine.horizon_year, 2035);
        assert_eq!(engine.polarity.classify("Retention Ratio"), Polarity::HigherIsBetter);
        assert_eq!(engine.formatter.format(Some(81.0), "Retention Ratio"), "81.0%");
        assert_eq!(engine.formatter.format(Some(5.0), "Budget"), "£5");
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        assert!(DashboardConfig::from_json_str(r#"{"horizon": 1}"#, Path::new("c")).is_err());
        let bad = r#"{"polarity_overrides": {"X": "sideways"}}"#;
        assert!(matches!(
            DashboardConfig::from_json_str(bad, Path::new("c")),
            Err(DashboardError::Json { .. })
        ));
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = DashboardConfig::load(Path::new("/nonexistent/dashboard.json"));
        assert_eq!(cfg.map(|c| c.horizon_year).ok(), Some(2030));
    }
}
