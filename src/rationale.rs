// Per-metric rationale text shown next to cards and on the methodology
// listing. Read-only reference data; the engine never consults it.

use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const NO_RATIONALE: &str = "No rationale available.";
pub const NO_TARGET_RATIONALE: &str = "No target rationale available.";
pub const NO_DATA_AVAILABILITY: &str = "Data availability information not specified.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rationale {
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub target_rationale: Option<String>,
    #[serde(default)]
    pub data_availability: Option<String>,
}

impl Rationale {
    fn placeholder() -> Self {
        Self {
            rationale: Some(NO_RATIONALE.to_string()),
            target_rationale: Some(NO_TARGET_RATIONALE.to_string()),
            data_availability: Some(NO_DATA_AVAILABILITY.to_string()),
        }
    }

    /// Whether this entry has a real rationale worth showing on a card.
    pub fn is_documented(&self) -> bool {
        self.rationale.as_deref().is_some_and(|r| r != NO_RATIONALE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RationaleBook {
    entries: BTreeMap<String, Rationale>,
}

impl RationaleBook {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        let entries = serde_json::from_str(s)?;
        Ok(Self { entries })
    }

    /// Never fails: an absent or unreadable file yields an empty book.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                warn!("metric rationale unavailable ({}): {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json_str(&text) {
            Ok(book) => {
                info!("loaded rationale for {} metrics", book.entries.len());
                book
            }
            Err(e) => {
                warn!("ignoring malformed rationale file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Entry for a metric, or the placeholder entry.
    pub fn get(&self, metric_name: &str) -> Rationale {
        self.entries
            .get(metric_name)
            .cloned()
            .unwrap_or_else(Rationale::placeholder)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Rationale)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_metric_gets_placeholders() {
        let book = RationaleBook::default();
        let r = book.get("Completion Rate");
        assert_eq!(r.rationale.as_deref(), Some(NO_RATIONALE));
        assert_eq!(r.target_rationale.as_deref(), Some(NO_TARGET_RATIONALE));
        assert_eq!(r.data_availability.as_deref(), Some(NO_DATA_AVAILABILITY));
        assert!(!r.is_documented());
    }

    #[test]
    fn partial_entries_keep_missing_fields_empty() {
        let json = r#"{"Completion Rate": {"rationale": "Tracks persistence."}}"#;
        let book = match RationaleBook::from_json_str(json) {
            Ok(b) => b,
            Err(e) => panic!("parse failed: {e}"),
        };
        let r = book.get("Completion Rate");
        assert!(r.is_documented());
        assert_eq!(r.target_rationale, None);
    }

    #[test]
    fn missing_file_is_empty_book() {
        assert!(RationaleBook::load(Path::new("/nonexistent/metric_rationale.json")).is_empty());
    }
}
