// Normalised progress from baseline toward target, and its status tier.

use serde::Serialize;

use crate::format::ValueFormatter;
use crate::polarity::Polarity;

pub const ON_TRACK_THRESHOLD: f64 = 80.0;
pub const AT_RISK_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    OnTrack,
    AtRisk,
    OffTrack,
}

impl Status {
    /// Thresholds are inclusive lower bounds.
    pub fn from_progress(progress: f64) -> Self {
        if progress >= ON_TRACK_THRESHOLD {
            Self::OnTrack
        } else if progress >= AT_RISK_THRESHOLD {
            Self::AtRisk
        } else {
            Self::OffTrack
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::OffTrack => "Off Track",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::OnTrack => "green",
            Self::AtRisk => "orange",
            Self::OffTrack => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Always within `[0, 100]`.
    pub percent: f64,
    pub status: Status,
}

/// Progress of `actual` from `baseline` toward `target`.
///
/// `None` means "unable to compute": a missing baseline or target, a
/// non-finite actual, or a zero-width range between baseline and target.
pub fn compute(
    baseline: Option<f64>,
    actual: f64,
    target: Option<f64>,
    polarity: Polarity,
) -> Option<Progress> {
    let (baseline, target) = (baseline?, target?);
    if !actual.is_finite() {
        return None;
    }
    let percent = match polarity {
        Polarity::LowerIsBetter => {
            if actual <= target {
                100.0
            } else {
                let denominator = baseline - target;
                if denominator == 0.0 {
                    return None;
                }
                ((baseline - actual) / denominator * 100.0).clamp(0.0, 100.0)
            }
        }
        Polarity::HigherIsBetter => {
            let denominator = target - baseline;
            if denominator == 0.0 {
                return None;
            }
            ((actual - baseline) / denominator * 100.0).clamp(0.0, 100.0)
        }
    };
    if percent.is_nan() {
        return None;
    }
    Some(Progress {
        percent,
        status: Status::from_progress(percent),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    /// `actual - target`.
    pub delta: f64,
    pub favorable: bool,
    pub text: String,
}

/// Distance between the latest actual and the target, phrased for display.
pub fn gap_to_target(
    actual: f64,
    target: Option<f64>,
    polarity: Polarity,
    metric_name: &str,
    formatter: &ValueFormatter,
) -> Option<Gap> {
    let target = target?;
    let delta = actual - target;
    if !delta.is_finite() {
        return None;
    }
    let fmt = |v: f64| formatter.format(Some(v), metric_name);
    let (favorable, text) = match polarity {
        Polarity::LowerIsBetter if delta <= 0.0 => (true, format!("{} below target", fmt(delta.abs()))),
        Polarity::LowerIsBetter => (false, format!("{} above target", fmt(delta))),
        Polarity::HigherIsBetter if delta >= 0.0 => (true, format!("+{} above target", fmt(delta))),
        Polarity::HigherIsBetter => (false, format!("{} below target", fmt(delta.abs()))),
    };
    Some(Gap {
        delta,
        favorable,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pct(p: Option<Progress>) -> (Option<f64>, Option<Status>) {
        (p.map(|p| p.percent), p.map(|p| p.status))
    }

    #[test]
    fn higher_is_better_tiers() {
        let hib = Polarity::HigherIsBetter;
        assert_eq!(pct(compute(Some(0.0), 80.0, Some(100.0), hib)), (Some(80.0), Some(Status::OnTrack)));
        assert_eq!(pct(compute(Some(0.0), 60.0, Some(100.0), hib)), (Some(60.0), Some(Status::AtRisk)));
        assert_eq!(pct(compute(Some(0.0), 30.0, Some(100.0), hib)), (Some(30.0), Some(Status::OffTrack)));
        assert_eq!(pct(compute(Some(0.0), 40.0, Some(100.0), hib)), (Some(40.0), Some(Status::OffTrack)));
    }

    #[test]
    fn status_boundaries_are_inclusive() {
        assert_eq!(Status::from_progress(80.0), Status::OnTrack);
        assert_eq!(Status::from_progress(79.999), Status::AtRisk);
        assert_eq!(Status::from_progress(50.0), Status::AtRisk);
        assert_eq!(Status::from_progress(49.999), Status::OffTrack);
    }

    #[test]
    fn lower_is_better_cases() {
        let lib = Polarity::LowerIsBetter;
        assert_eq!(pct(compute(Some(100.0), 100.0, Some(20.0), lib)), (Some(0.0), Some(Status::OffTrack)));
        assert_eq!(pct(compute(Some(100.0), 20.0, Some(20.0), lib)), (Some(100.0), Some(Status::OnTrack)));
        assert_eq!(pct(compute(Some(100.0), 60.0, Some(20.0), lib)), (Some(50.0), Some(Status::AtRisk)));
        // Worse than baseline clamps to zero.
        assert_eq!(pct(compute(Some(100.0), 140.0, Some(20.0), lib)), (Some(0.0), Some(Status::OffTrack)));
    }

    #[test]
    fn lower_is_better_beats_target_even_with_flat_range() {
        let p = compute(Some(20.0), 10.0, Some(20.0), Polarity::LowerIsBetter);
        assert_eq!(pct(p), (Some(100.0), Some(Status::OnTrack)));
        assert_eq!(compute(Some(20.0), 30.0, Some(20.0), Polarity::LowerIsBetter), None);
    }

    #[test]
    fn zero_range_and_nulls_are_unavailable() {
        assert_eq!(compute(Some(50.0), 70.0, Some(50.0), Polarity::HigherIsBetter), None);
        assert_eq!(compute(None, 5.0, Some(10.0), Polarity::HigherIsBetter), None);
        assert_eq!(compute(None, 5.0, Some(10.0), Polarity::LowerIsBetter), None);
        assert_eq!(compute(Some(1.0), 5.0, None, Polarity::HigherIsBetter), None);
        assert_eq!(compute(Some(0.0), f64::NAN, Some(10.0), Polarity::HigherIsBetter), None);
    }

    #[test]
    fn overshoot_clamps_to_hundred() {
        let p = compute(Some(0.0), 250.0, Some(100.0), Polarity::HigherIsBetter);
        assert_eq!(p.map(|p| p.percent), Some(100.0));
    }

    #[test]
    fn gap_text_follows_polarity() {
        let f = ValueFormatter::default();
        let g = gap_to_target(55.0, Some(60.0), Polarity::HigherIsBetter, "Completion Rate", &f);
        assert_eq!(g.map(|g| (g.favorable, g.text)), Some((false, "5.0% below target".to_string())));

        let g = gap_to_target(70.0, Some(60.0), Polarity::HigherIsBetter, "Completion Rate", &f);
        assert_eq!(g.map(|g| g.text), Some("+10.0% above target".to_string()));

        let g = gap_to_target(900.0, Some(1000.0), Polarity::LowerIsBetter, "Cost per Credential", &f);
        assert_eq!(g.map(|g| (g.favorable, g.text)), Some((true, "$100 below target".to_string())));

        let g = gap_to_target(1200.0, Some(1000.0), Polarity::LowerIsBetter, "Cost per Credential", &f);
        assert_eq!(g.map(|g| (g.favorable, g.text)), Some((false, "$200 above target".to_string())));

        assert_eq!(gap_to_target(1.0, None, Polarity::LowerIsBetter, "Gap", &f), None);
    }

    fn polarity() -> impl Strategy<Value = Polarity> {
        prop_oneof![Just(Polarity::HigherIsBetter), Just(Polarity::LowerIsBetter)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_hitting_target_is_full_progress(
            b in -1.0e6f64..1.0e6,
            t in -1.0e6f64..1.0e6,
            pol in polarity(),
        ) {
            prop_assume!(b != t);
            let p = compute(Some(b), t, Some(t), pol);
            prop_assert_eq!(p.map(|p| p.percent), Some(100.0));
            prop_assert_eq!(p.map(|p| p.status), Some(Status::OnTrack));
        }

        #[test]
        fn prop_progress_stays_in_range_and_is_repeatable(
            b in -1.0e6f64..1.0e6,
            a in -1.0e6f64..1.0e6,
            t in -1.0e6f64..1.0e6,
            pol in polarity(),
        ) {
            let first = compute(Some(b), a, Some(t), pol);
            let second = compute(Some(b), a, Some(t), pol);
            prop_assert_eq!(first, second);
            if let Some(p) = first {
                prop_assert!((0.0..=100.0).contains(&p.percent));
                prop_assert_eq!(p.status, Status::from_progress(p.percent));
            }
        }
    }
}
