// Presentation-ready views built from the engine: metric cards grouped by
// category, the evidence panel, the performance table, and chart rows.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::Engine;
use crate::evidence::{grade, is_link, EvidenceGrade};
use crate::format::NOT_AVAILABLE;
use crate::polarity::Polarity;
use crate::progress::{compute, gap_to_target, Gap, Progress};
use crate::projection::{project, TrendChart};
use crate::series::{latest, ordered};
use crate::summary::{summarize, StatusSummary};
use crate::types::{
    Datasets, EvidenceRow, Expectation, MetricCardRow, Observation, PerformanceRow, ProjectionRow,
};

pub const NO_PERFORMANCE_DATA: &str = "No performance data available";
pub const NO_PROGRESS: &str = "Unable to calculate progress (missing baseline or target)";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Buckets shown first, in this order, with their descriptions.
pub const KNOWN_BUCKETS: &[(&str, &str)] = &[
    ("Adoption", "Platform reach and user adoption metrics"),
    (
        "Continuity",
        "Course completion, success rates, and equity outcomes",
    ),
    (
        "Social ROI",
        "Efficacy, satisfaction, and cost-effectiveness metrics",
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub initiative_id: String,
    pub metric_name: String,
    pub category: Option<String>,
    pub polarity: Polarity,
    pub baseline: Option<f64>,
    pub target_2030: Option<f64>,
    pub target_2045: Option<f64>,
    pub latest_year: Option<i32>,
    pub actual: Option<f64>,
    pub progress: Option<Progress>,
    pub gap: Option<Gap>,
    /// Why progress is missing, when it is.
    pub message: Option<&'static str>,
}

impl MetricCard {
    pub fn build(exp: &Expectation, performance: &[Observation], engine: &Engine) -> Self {
        let polarity = engine.polarity.classify(&exp.metric_name);
        let obs = latest(performance, &exp.initiative_id, &exp.metric_name);
        let actual = obs.and_then(|o| o.actual_value);
        let progress =
            actual.and_then(|a| compute(exp.baseline, a, exp.target_horizon_a, polarity));
        let gap = match progress {
            Some(_) => actual.and_then(|a| {
                gap_to_target(
                    a,
                    exp.target_horizon_a,
                    polarity,
                    &exp.metric_name,
                    &engine.formatter,
                )
            }),
            None => None,
        };
        let message = match (obs, progress) {
            (None, _) => Some(NO_PERFORMANCE_DATA),
            (Some(_), None) => Some(NO_PROGRESS),
            _ => None,
        };
        Self {
            initiative_id: exp.initiative_id.clone(),
            metric_name: exp.metric_name.clone(),
            category: exp.category.clone(),
            polarity,
            baseline: exp.baseline,
            target_2030: exp.target_horizon_a,
            target_2045: exp.target_horizon_b,
            latest_year: obs.map(|o| o.year),
            actual,
            progress,
            gap,
            message,
        }
    }

    pub fn to_row(&self, engine: &Engine) -> MetricCardRow {
        let fmt = |v: Option<f64>| engine.formatter.format(v, &self.metric_name);
        MetricCardRow {
            category: self
                .category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            initiative_id: self.initiative_id.clone(),
            metric: self.metric_name.clone(),
            baseline: fmt(self.baseline),
            actual: fmt(self.actual),
            year: self
                .latest_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string()),
            target_2030: fmt(self.target_2030),
            target_2045: fmt(self.target_2045),
            progress: self
                .progress
                .map(|p| format!("{:.1}%", p.percent))
                .unwrap_or_else(|| "-".to_string()),
            status: match (self.progress, self.message) {
                (Some(p), _) => p.status.label().to_string(),
                (None, Some(msg)) => msg.to_string(),
                (None, None) => "-".to_string(),
            },
            gap: self
                .gap
                .as_ref()
                .map(|g| g.text.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub description: Option<&'static str>,
    pub cards: Vec<MetricCard>,
}

/// Known buckets first in fixed order, then other categories as first seen,
/// then rows with no category.
pub fn group_by_category<'a>(expectations: &[&'a Expectation]) -> Vec<(String, Vec<&'a Expectation>)> {
    let mut order: Vec<String> = KNOWN_BUCKETS
        .iter()
        .map(|(name, _)| name.to_string())
        .filter(|name| {
            expectations
                .iter()
                .any(|e| e.category.as_deref() == Some(name.as_str()))
        })
        .collect();
    for e in expectations {
        if let Some(c) = &e.category {
            if !order.contains(c) {
                order.push(c.clone());
            }
        }
    }
    let mut groups: Vec<(String, Vec<&Expectation>)> = order
        .into_iter()
        .map(|name| {
            let members = expectations
                .iter()
                .copied()
                .filter(|e| e.category.as_deref() == Some(name.as_str()))
                .collect();
            (name, members)
        })
        .collect();
    let loose: Vec<&Expectation> = expectations
        .iter()
        .copied()
        .filter(|e| e.category.is_none())
        .collect();
    if !loose.is_empty() {
        groups.push((UNCATEGORIZED.to_string(), loose));
    }
    groups
}

pub fn bucket_description(category: &str) -> Option<&'static str> {
    KNOWN_BUCKETS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, d)| *d)
}

/// KPI overview: one card per expectation, grouped by category.
pub fn build_kpi_overview(
    expectations: &[&Expectation],
    performance: &[Observation],
    engine: &Engine,
) -> Vec<CategoryGroup> {
    group_by_category(expectations)
        .into_iter()
        .map(|(name, rows)| CategoryGroup {
            description: bucket_description(&name),
            cards: rows
                .into_iter()
                .map(|e| MetricCard::build(e, performance, engine))
                .collect(),
            name,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidencePanel {
    pub grade: String,
    pub avg_confidence: String,
    pub items: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceItem {
    pub evidence_type: String,
    pub confidence_score: Option<f64>,
    pub summary: String,
    pub is_link: bool,
}

impl EvidencePanel {
    pub fn from_grade(g: &EvidenceGrade<'_>) -> Self {
        Self {
            grade: g.grade.as_str().to_string(),
            avg_confidence: format!("{:.1}/3.0", g.avg_confidence),
            items: g
                .records
                .iter()
                .map(|r| EvidenceItem {
                    evidence_type: r.evidence_type.clone(),
                    confidence_score: r.confidence_score,
                    summary: r.summary_or_link.clone(),
                    is_link: is_link(&r.summary_or_link),
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> Vec<EvidenceRow> {
        self.items
            .iter()
            .map(|i| EvidenceRow {
                evidence_type: i.evidence_type.clone(),
                confidence: match i.confidence_score {
                    Some(score) => format!("{}/3", score),
                    None => NOT_AVAILABLE.to_string(),
                },
                summary: i.summary.clone(),
            })
            .collect()
    }
}

pub fn evidence_panel(data: &Datasets, initiative_id: &str, metric_name: &str) -> Option<EvidencePanel> {
    grade(&data.evidence, initiative_id, Some(metric_name)).map(|g| EvidencePanel::from_grade(&g))
}

/// Chronological rows for the detail table.
pub fn performance_table(
    performance: &[Observation],
    initiative_id: &str,
    metric_name: &str,
    engine: &Engine,
) -> Vec<PerformanceRow> {
    ordered(performance, initiative_id, metric_name)
        .into_iter()
        .map(|o| PerformanceRow {
            year: o.year,
            actual_value: engine.formatter.format(o.actual_value, metric_name),
            data_source: o.data_source.clone(),
            quality: o.quality.clone(),
        })
        .collect()
}

/// Trend chart for the first expectation matching the pair.
pub fn trend_chart(data: &Datasets, exp: &Expectation, engine: &Engine) -> Option<TrendChart> {
    let series = ordered(&data.performance, &exp.initiative_id, &exp.metric_name);
    project(
        &series,
        exp.baseline,
        exp.target_horizon_a,
        engine.horizon_year,
    )
}

/// Flatten a chart into table rows: actuals, then the projection past the
/// anchor point, then the reference lines at the last plotted year.
pub fn chart_rows(chart: &TrendChart, metric_name: &str, engine: &Engine) -> Vec<ProjectionRow> {
    let fmt = |v: f64| engine.formatter.format(Some(v), metric_name);
    let mut rows: Vec<ProjectionRow> = chart
        .points
        .iter()
        .map(|p| ProjectionRow {
            year: p.year,
            series: "Actual".to_string(),
            value: fmt(p.value),
        })
        .collect();
    if let Some(projection) = &chart.projection {
        rows.extend(projection.iter().skip(1).map(|p| ProjectionRow {
            year: p.year,
            series: "Projected (No Intervention)".to_string(),
            value: fmt(p.value),
        }));
    }
    let last_year = rows.last().map(|r| r.year).unwrap_or_default();
    for (label, line) in [("Baseline", chart.baseline_line), ("Target", chart.target_line)] {
        if let Some(v) = line {
            rows.push(ProjectionRow {
                year: last_year,
                series: label.to_string(),
                value: fmt(v),
            });
        }
    }
    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub generated_at: String,
    pub initiative: String,
    pub total_metrics: usize,
    pub metrics_with_data: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub off_track: usize,
    pub no_data: usize,
}

pub fn summary_report(
    expectations: &[&Expectation],
    performance: &[Observation],
    initiative: Option<&str>,
    engine: &Engine,
) -> SummaryReport {
    let s: StatusSummary = summarize(expectations.iter().copied(), performance, &engine.polarity);
    SummaryReport {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        initiative: initiative.unwrap_or("All").to_string(),
        total_metrics: s.total,
        metrics_with_data: s.with_data,
        on_track: s.on_track,
        at_risk: s.at_risk,
        off_track: s.off_track,
        no_data: s.no_data(),
    }
}
