// Display formatting driven by the metric name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::polarity::override_key;
use crate::util::format_number;

const CURRENCY_KEYWORDS: &[&str] = &["cost", "salary", "price", "revenue", "budget"];
const PERCENT_KEYWORDS: &[&str] = &["rate", "percent", "%"];
const SCORE_KEYWORDS: &[&str] = &["score"];

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Currency,
    Percentage,
    Score,
    Count,
}

impl ValueKind {
    /// Keyword heuristic, checked in currency, percentage, score order.
    pub fn infer(metric_name: &str) -> Self {
        let lower = metric_name.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));
        if has(CURRENCY_KEYWORDS) {
            Self::Currency
        } else if has(PERCENT_KEYWORDS) {
            Self::Percentage
        } else if has(SCORE_KEYWORDS) {
            Self::Score
        } else {
            Self::Count
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValueFormatter {
    currency_symbol: String,
    overrides: HashMap<String, ValueKind>,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl ValueFormatter {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn set_override(&mut self, metric_name: &str, kind: ValueKind) {
        self.overrides.insert(override_key(metric_name), kind);
    }

    pub fn kind_for(&self, metric_name: &str) -> ValueKind {
        self.overrides
            .get(&override_key(metric_name))
            .copied()
            .unwrap_or_else(|| ValueKind::infer(metric_name))
    }

    /// Render `value` for display. Rounding here never touches the stored
    /// number.
    pub fn format(&self, value: Option<f64>, metric_name: &str) -> String {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return NOT_AVAILABLE.to_string();
        };
        match self.kind_for(metric_name) {
            ValueKind::Currency => format!("{}{}", self.currency_symbol, format_number(v, 0)),
            ValueKind::Percentage => format!("{:.1}%", v),
            ValueKind::Score => format!("{:.1}", v),
            ValueKind::Count => format_number(v, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_nan_render_as_na() {
        let f = ValueFormatter::default();
        assert_eq!(f.format(None, "Enrollment"), "N/A");
        assert_eq!(f.format(Some(f64::NAN), "Enrollment"), "N/A");
    }

    #[test]
    fn currency_wins_over_percentage() {
        let f = ValueFormatter::default();
        assert_eq!(f.format(Some(1234567.4), "Cost Growth Rate"), "$1,234,567");
        assert_eq!(f.format(Some(52000.0), "Median Salary"), "$52,000");
    }

    #[test]
    fn percentage_score_and_count() {
        let f = ValueFormatter::default();
        assert_eq!(f.format(Some(45.26), "Course Completion Rate"), "45.3%");
        assert_eq!(f.format(Some(12.0), "Percent Enrolled"), "12.0%");
        assert_eq!(f.format(Some(3.456), "Satisfaction Score"), "3.5");
        assert_eq!(f.format(Some(12345.6), "Active Learners"), "12,346");
    }

    #[test]
    fn override_replaces_heuristic() {
        let mut f = ValueFormatter::new("€");
        f.set_override("Learners Reached", ValueKind::Score);
        assert_eq!(f.format(Some(10.0), "learners reached"), "10.0");
        assert_eq!(f.format(Some(10.0), "Budget"), "€10");
    }

    #[test]
    fn huge_values_keep_every_digit() {
        let f = ValueFormatter::default();
        assert_eq!(f.format(Some(1e20), "Learners"), "100,000,000,000,000,000,000");
        assert_eq!(f.format(Some(2e19), "Budget"), "$20,000,000,000,000,000,000");
    }
}
