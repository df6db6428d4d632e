// Letter grades for the evidence behind an observed change.
//
// When the evidence source has no `Metric` column, every record counts as
// initiative-wide and feeds the grade of each metric in that initiative.

use serde::Serialize;

use crate::types::{EvidenceRecord, EvidenceSet};
use crate::util::mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Inclusive lower bounds: 2.5, 2.0, 1.5. Scores are not range-checked.
    pub fn from_confidence(avg: f64) -> Self {
        if avg >= 2.5 {
            Self::A
        } else if avg >= 2.0 {
            Self::B
        } else if avg >= 1.5 {
            Self::C
        } else {
            Self::D
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceGrade<'a> {
    pub grade: Grade,
    pub records: Vec<&'a EvidenceRecord>,
    pub avg_confidence: f64,
}

/// Grade the evidence for an initiative, narrowed to `metric_name` only
/// when both a metric is given and the source is metric-scoped.
///
/// Records with a blank score are listed but do not count toward the
/// average; with no scored record left there is no grade.
pub fn grade<'a>(
    evidence: &'a EvidenceSet,
    initiative_id: &str,
    metric_name: Option<&str>,
) -> Option<EvidenceGrade<'a>> {
    let metric_filter = metric_name.filter(|_| evidence.has_metric_column);
    let records: Vec<&EvidenceRecord> = evidence
        .records
        .iter()
        .filter(|r| r.initiative_id == initiative_id)
        .filter(|r| metric_filter.map_or(true, |m| r.metric_name.as_deref() == Some(m)))
        .collect();
    let scores: Vec<f64> = records.iter().filter_map(|r| r.confidence_score).collect();
    let avg_confidence = mean(&scores)?;
    Some(EvidenceGrade {
        grade: Grade::from_confidence(avg_confidence),
        records,
        avg_confidence,
    })
}

/// Summaries that look like URLs get rendered as links.
pub fn is_link(summary: &str) -> bool {
    summary.trim_start().starts_with("http")
}
