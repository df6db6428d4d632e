// Direction of improvement for a metric.
//
// The default is a keyword heuristic over the metric name. It is coupled to
// English naming and is easy to fool: "Retention Ratio" reads as
// lower-is-better because it contains "ratio". Explicit overrides, keyed by
// metric name, win over the heuristic and are the way to correct it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Substrings that mark a metric as lower-is-better.
pub const LOWER_IS_BETTER_KEYWORDS: &[&str] = &["gap", "cost", "ratio", "debt", "time to", "wait"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl Polarity {
    pub fn is_lower_better(self) -> bool {
        matches!(self, Self::LowerIsBetter)
    }
}

#[derive(Debug, Clone)]
pub struct PolarityClassifier {
    keywords: Vec<String>,
    overrides: HashMap<String, Polarity>,
}

impl Default for PolarityClassifier {
    fn default() -> Self {
        Self {
            keywords: LOWER_IS_BETTER_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            overrides: HashMap::new(),
        }
    }
}

impl PolarityClassifier {
    pub fn with_overrides<I, K>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, Polarity)>,
        K: AsRef<str>,
    {
        let mut classifier = Self::default();
        for (name, polarity) in overrides {
            classifier.set_override(name.as_ref(), polarity);
        }
        classifier
    }

    pub fn set_override(&mut self, metric_name: &str, polarity: Polarity) {
        self.overrides.insert(override_key(metric_name), polarity);
    }

    pub fn classify(&self, metric_name: &str) -> Polarity {
        if let Some(p) = self.overrides.get(&override_key(metric_name)) {
            return *p;
        }
        let lower = metric_name.to_lowercase();
        if self.keywords.iter().any(|k| lower.contains(k.as_str())) {
            Polarity::LowerIsBetter
        } else {
            Polarity::HigherIsBetter
        }
    }
}

/// Override tables match names case-insensitively, ignoring outer spaces.
pub(crate) fn override_key(metric_name: &str) -> String {
    metric_name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_mark_lower_is_better() {
        let c = PolarityClassifier::default();
        assert_eq!(c.classify("Equity GAP (pp)"), Polarity::LowerIsBetter);
        assert_eq!(c.classify("Cost per Learner"), Polarity::LowerIsBetter);
        assert_eq!(c.classify("Time to Degree"), Polarity::LowerIsBetter);
        assert_eq!(c.classify("Average Wait (days)"), Polarity::LowerIsBetter);
        assert_eq!(c.classify("Student Debt"), Polarity::LowerIsBetter);
    }

    #[test]
    fn unmatched_names_default_to_higher_is_better() {
        let c = PolarityClassifier::default();
        assert_eq!(c.classify("Course Completion Rate"), Polarity::HigherIsBetter);
        assert_eq!(c.classify(""), Polarity::HigherIsBetter);
    }

    #[test]
    fn heuristic_misreads_ratio_metrics() {
        let c = PolarityClassifier::default();
        assert_eq!(c.classify("Retention Ratio"), Polarity::LowerIsBetter);
    }

    #[test]
    fn override_corrects_misclassification() {
        let c = PolarityClassifier::with_overrides([("retention ratio", Polarity::HigherIsBetter)]);
        assert_eq!(c.classify("  Retention Ratio "), Polarity::HigherIsBetter);
        assert_eq!(c.classify("Cost Ratio"), Polarity::LowerIsBetter);
    }
}
