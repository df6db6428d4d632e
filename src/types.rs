use serde::{Deserialize, Serialize};
use tabled::Tabled;

// Raw rows mirror the CSV headers exactly; every cell is read as text so the
// loader can tell a blank (null) apart from a malformed value.

#[derive(Debug, Deserialize)]
pub struct RawExpectationRow {
    #[serde(rename = "Initiative ID")]
    pub initiative_id: Option<String>,
    #[serde(rename = "Metric")]
    pub metric: Option<String>,
    #[serde(rename = "Baseline")]
    pub baseline: Option<String>,
    #[serde(rename = "Target 2030")]
    pub target_2030: Option<String>,
    #[serde(rename = "Target 2045", default)]
    pub target_2045: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Expectation Type", default)]
    pub expectation_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawObservationRow {
    #[serde(rename = "Initiative ID")]
    pub initiative_id: Option<String>,
    #[serde(rename = "Metric")]
    pub metric: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Actual Value")]
    pub actual_value: Option<String>,
    #[serde(rename = "Data Source", default)]
    pub data_source: Option<String>,
    #[serde(rename = "Quality", default)]
    pub quality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEvidenceRow {
    #[serde(rename = "Initiative ID")]
    pub initiative_id: Option<String>,
    #[serde(rename = "Evidence Type", default)]
    pub evidence_type: Option<String>,
    #[serde(rename = "Confidence Score")]
    pub confidence_score: Option<String>,
    #[serde(rename = "Link / Summary", default)]
    pub summary_or_link: Option<String>,
    #[serde(rename = "Metric", default)]
    pub metric: Option<String>,
}

/// Baseline and target expectation for one (initiative, metric).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expectation {
    pub initiative_id: String,
    pub metric_name: String,
    pub category: Option<String>,
    pub baseline: Option<f64>,
    /// "Target 2030", the target all progress math runs against.
    pub target_horizon_a: Option<f64>,
    /// "Target 2045", shown but never used for progress.
    pub target_horizon_b: Option<f64>,
    pub expectation_type: Option<String>,
}

/// One yearly measurement. A blank `Actual Value` cell loads as `None` and
/// yields no progress rather than failing the load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub initiative_id: String,
    pub metric_name: String,
    pub year: i32,
    pub actual_value: Option<f64>,
    pub data_source: String,
    pub quality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceRecord {
    pub initiative_id: String,
    pub metric_name: Option<String>,
    pub evidence_type: String,
    /// `None` when the cell was blank.
    pub confidence_score: Option<f64>,
    pub summary_or_link: String,
}

/// Evidence rows plus whether the source carried a `Metric` column at all.
/// Without one, every record is initiative-wide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceSet {
    pub records: Vec<EvidenceRecord>,
    pub has_metric_column: bool,
}

/// The three immutable snapshots a session computes against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub expectations: Vec<Expectation>,
    pub performance: Vec<Observation>,
    pub evidence: EvidenceSet,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MetricCardRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Initiative ID")]
    #[tabled(rename = "Initiative")]
    pub initiative_id: String,
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Baseline")]
    #[tabled(rename = "Baseline")]
    pub baseline: String,
    #[serde(rename = "Actual")]
    #[tabled(rename = "Actual")]
    pub actual: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: String,
    #[serde(rename = "Target 2030")]
    #[tabled(rename = "Target 2030")]
    pub target_2030: String,
    #[serde(rename = "Target 2045")]
    #[tabled(rename = "Target 2045")]
    pub target_2045: String,
    #[serde(rename = "Progress")]
    #[tabled(rename = "Progress")]
    pub progress: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Gap to Target")]
    #[tabled(rename = "Gap to Target")]
    pub gap: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PerformanceRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Actual Value")]
    #[tabled(rename = "Actual Value")]
    pub actual_value: String,
    #[serde(rename = "Data Source")]
    #[tabled(rename = "Data Source")]
    pub data_source: String,
    #[serde(rename = "Quality")]
    #[tabled(rename = "Quality")]
    pub quality: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct EvidenceRow {
    #[serde(rename = "Evidence Type")]
    #[tabled(rename = "Evidence Type")]
    pub evidence_type: String,
    #[serde(rename = "Confidence")]
    #[tabled(rename = "Confidence")]
    pub confidence: String,
    #[serde(rename = "Link / Summary")]
    #[tabled(rename = "Link / Summary")]
    pub summary: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProjectionRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Series")]
    #[tabled(rename = "Series")]
    pub series: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}
