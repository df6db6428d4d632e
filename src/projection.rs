// Trend chart data: the actual series, reference lines, and a
// business-as-usual projection.
//
// The projection extends the slope between the two most recent observations
// out to the horizon year. It is the "no intervention" counterfactual the
// actual trend is compared against, not a fitted model.

use serde::Serialize;

use crate::types::Observation;

pub const DEFAULT_HORIZON_YEAR: i32 = 2030;

/// Longest span, in years, a projection will be extended over.
pub const MAX_PROJECTION_YEARS: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub points: Vec<ChartPoint>,
    pub baseline_line: Option<f64>,
    pub target_line: Option<f64>,
    /// Starts at the latest actual point so the line joins the series.
    pub projection: Option<Vec<ChartPoint>>,
}

/// Build chart data from an oldest-first series.
///
/// Returns `None` when there is nothing to plot. Observations without a
/// value are left off the chart. When the most recent observation has no
/// value the chart has no projection, rather than one anchored on an older
/// year.
pub fn project(
    ordered_series: &[&Observation],
    baseline: Option<f64>,
    target: Option<f64>,
    horizon_year: i32,
) -> Option<TrendChart> {
    let points: Vec<ChartPoint> = ordered_series
        .iter()
        .filter_map(|o| {
            o.actual_value
                .filter(|v| v.is_finite())
                .map(|value| ChartPoint { year: o.year, value })
        })
        .collect();
    if points.is_empty() {
        return None;
    }
    let latest_has_value = ordered_series
        .last()
        .is_some_and(|o| o.actual_value.is_some_and(f64::is_finite));
    let projection = match target {
        Some(_) if latest_has_value => linear_projection(&points, horizon_year),
        _ => None,
    };
    Some(TrendChart {
        points,
        baseline_line: baseline,
        target_line: target,
        projection,
    })
}

/// Two-point extrapolation from the last two entries of `points`.
///
/// No projection when there are fewer than two points, when the two most
/// recent points share a year, when the latest year already reaches the
/// horizon, or when the horizon is more than `MAX_PROJECTION_YEARS` away.
pub fn linear_projection(points: &[ChartPoint], horizon_year: i32) -> Option<Vec<ChartPoint>> {
    let [.., prev, latest] = points else {
        return None;
    };
    let year_gap = latest.year.checked_sub(prev.year).filter(|gap| *gap != 0)?;
    let span = horizon_year
        .checked_sub(latest.year)
        .filter(|span| (1..=MAX_PROJECTION_YEARS).contains(span))?;
    let slope = (latest.value - prev.value) / f64::from(year_gap);
    let mut out = Vec::with_capacity(span as usize + 1);
    out.push(*latest);
    out.extend((latest.year + 1..=horizon_year).map(|year| ChartPoint {
        year,
        value: latest.value + slope * f64::from(year - latest.year),
    }));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::obs;

    fn pts(chart: &[ChartPoint]) -> Vec<(i32, f64)> {
        chart.iter().map(|p| (p.year, p.value)).collect()
    }

    #[test]
    fn two_point_slope_projects_to_horizon() {
        let a = obs("I1", "Enrollment", 2020, 100.0);
        let b = obs("I1", "Enrollment", 2021, 120.0);
        let chart = project(&[&a, &b], Some(90.0), Some(200.0), 2023);
        let projection = chart.as_ref().and_then(|c| c.projection.clone());
        assert_eq!(
            projection.as_deref().map(pts),
            Some(vec![(2021, 120.0), (2022, 140.0), (2023, 160.0)])
        );
        assert_eq!(chart.as_ref().and_then(|c| c.baseline_line), Some(90.0));
        assert_eq!(chart.as_ref().and_then(|c| c.target_line), Some(200.0));
    }

    #[test]
    fn empty_series_has_no_chart() {
        assert_eq!(project(&[], Some(1.0), Some(2.0), 2030), None);
    }

    #[test]
    fn projection_needs_target_and_two_points() {
        let a = obs("I1", "Enrollment", 2020, 100.0);
        let b = obs("I1", "Enrollment", 2021, 120.0);
        let no_target = project(&[&a, &b], Some(100.0), None, 2030);
        assert_eq!(no_target.as_ref().map(|c| c.projection.is_none()), Some(true));
        assert_eq!(no_target.and_then(|c| c.target_line), None);

        let single = project(&[&a], None, Some(200.0), 2030);
        assert_eq!(single.as_ref().map(|c| c.points.len()), Some(1));
        assert_eq!(single.and_then(|c| c.projection), None);
    }

    #[test]
    fn shared_latest_year_blocks_projection() {
        let a = obs("I1", "Enrollment", 2020, 100.0);
        let b = obs("I1", "Enrollment", 2021, 120.0);
        let c = obs("I1", "Enrollment", 2021, 125.0);
        let chart = project(&[&a, &b, &c], None, Some(200.0), 2030);
        assert_eq!(chart.and_then(|c| c.projection), None);
    }

    #[test]
    fn latest_at_or_past_horizon_has_no_projection() {
        let a = obs("I1", "Enrollment", 2029, 100.0);
        let b = obs("I1", "Enrollment", 2030, 120.0);
        assert_eq!(project(&[&a, &b], None, Some(200.0), 2030).and_then(|c| c.projection), None);
    }

    #[test]
    fn slope_uses_year_gap_and_can_fall() {
        let a = obs("I1", "Equity Gap", 2018, 20.0);
        let b = obs("I1", "Equity Gap", 2022, 12.0);
        let chart = project(&[&a, &b], Some(20.0), Some(5.0), 2025);
        let projection = chart.and_then(|c| c.projection);
        assert_eq!(
            projection.as_deref().map(pts),
            Some(vec![(2022, 12.0), (2023, 10.0), (2024, 8.0), (2025, 6.0)])
        );
    }

    #[test]
    fn valueless_observations_are_skipped() {
        let a = obs("I1", "Enrollment", 2020, 100.0);
        let mut b = obs("I1", "Enrollment", 2021, 0.0);
        b.actual_value = None;
        let chart = project(&[&a, &b], None, Some(200.0), 2030);
        assert_eq!(chart.as_ref().map(|c| c.points.len()), Some(1));
        assert_eq!(chart.and_then(|c| c.projection), None);
    }

    #[test]
    fn blank_latest_actual_blocks_projection() {
        let a = obs("I1", "Enrollment", 2020, 100.0);
        let b = obs("I1", "Enrollment", 2021, 120.0);
        let mut c = obs("I1", "Enrollment", 2022, 0.0);
        c.actual_value = None;
        let chart = project(&[&a, &b, &c], None, Some(200.0), 2030);
        assert_eq!(chart.as_ref().map(|c| pts(&c.points)), Some(vec![(2020, 100.0), (2021, 120.0)]));
        assert_eq!(chart.and_then(|c| c.projection), None);
    }

    #[test]
    fn extreme_years_do_not_project() {
        let far_apart = [
            ChartPoint { year: i32::MIN, value: 1.0 },
            ChartPoint { year: i32::MAX, value: 2.0 },
        ];
        assert_eq!(linear_projection(&far_apart, i32::MAX), None);

        let recent = [
            ChartPoint { year: 2020, value: 1.0 },
            ChartPoint { year: 2021, value: 2.0 },
        ];
        assert_eq!(linear_projection(&recent, i32::MAX), None);
        assert_eq!(linear_projection(&recent, i32::MIN), None);
        let bounded = linear_projection(&recent, 2021 + MAX_PROJECTION_YEARS);
        assert_eq!(bounded.map(|p| p.len()), Some(MAX_PROJECTION_YEARS as usize + 1));
    }
}
