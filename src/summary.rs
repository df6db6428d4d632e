// Status counts across a set of expectations.

use serde::Serialize;

use crate::polarity::PolarityClassifier;
use crate::progress::{compute, Status};
use crate::series::latest;
use crate::types::{Expectation, Observation};

/// Status counts for a filtered set of expectations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    /// Rows that had at least one observation, computable or not.
    pub with_data: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub off_track: usize,
}

impl StatusSummary {
    /// Rows that landed in no status bucket.
    pub fn no_data(&self) -> usize {
        self.total - self.on_track - self.at_risk - self.off_track
    }

    fn record(&mut self, status: Status) {
        match status {
            Status::OnTrack => self.on_track += 1,
            Status::AtRisk => self.at_risk += 1,
            Status::OffTrack => self.off_track += 1,
        }
    }
}

/// Rows without an observation, or whose progress cannot be computed, only
/// count toward `total`.
pub fn summarize<'a, I>(
    expectations: I,
    performance: &[Observation],
    classifier: &PolarityClassifier,
) -> StatusSummary
where
    I: IntoIterator<Item = &'a Expectation>,
{
    let mut summary = StatusSummary::default();
    for exp in expectations {
        summary.total += 1;
        let Some(obs) = latest(performance, &exp.initiative_id, &exp.metric_name) else {
            continue;
        };
        summary.with_data += 1;
        let Some(actual) = obs.actual_value else {
            continue;
        };
        let polarity = classifier.classify(&exp.metric_name);
        if let Some(p) = compute(exp.baseline, actual, exp.target_horizon_a, polarity) {
            summary.record(p.status);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{expectation, obs};

    #[test]
    fn missing_observation_counts_only_toward_total() {
        let expectations = vec![
            expectation("I1", "Enrollment", Some(0.0), Some(100.0)),
            expectation("I1", "Completion Rate", Some(0.0), Some(100.0)),
            expectation("I1", "Learners Served", Some(0.0), Some(100.0)),
        ];
        let performance = vec![
            obs("I1", "Completion Rate", 2022, 90.0),
            obs("I1", "Learners Served", 2022, 60.0),
        ];
        let s = summarize(&expectations, &performance, &PolarityClassifier::default());
        assert_eq!(
            s,
            StatusSummary {
                total: 3,
                with_data: 2,
                on_track: 1,
                at_risk: 1,
                off_track: 0,
            }
        );
        assert_eq!(s.no_data(), 1);
    }

    #[test]
    fn uncomputable_progress_is_excluded_from_buckets() {
        let expectations = vec![
            expectation("I1", "Enrollment", None, Some(100.0)),
            expectation("I1", "Retention", Some(50.0), Some(50.0)),
            expectation("I1", "Cost per Learner", Some(100.0), Some(20.0)),
        ];
        let performance = vec![
            obs("I1", "Enrollment", 2022, 90.0),
            obs("I1", "Retention", 2022, 60.0),
            obs("I1", "Cost per Learner", 2022, 90.0),
        ];
        let s = summarize(&expectations, &performance, &PolarityClassifier::default());
        assert_eq!((s.total, s.with_data, s.off_track), (3, 3, 1));
        assert_eq!(s.no_data(), 2);
    }

    #[test]
    fn summary_is_repeatable() {
        let expectations = vec![expectation("I1", "Enrollment", Some(0.0), Some(10.0))];
        let performance = vec![obs("I1", "Enrollment", 2022, 9.0)];
        let c = PolarityClassifier::default();
        assert_eq!(summarize(&expectations, &performance, &c), summarize(&expectations, &performance, &c));
    }
}
