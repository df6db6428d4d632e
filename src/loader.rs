// CSV loading for the expectations, performance, and evidence datasets.
//
// A load is all-or-nothing: the first malformed row fails the whole
// dataset, so progress is never computed against a partial snapshot.
// Blank numeric cells are nulls, not errors, except for `Year`. A blank
// `Confidence Score` keeps its record but stays out of the grade average.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use serde::de::DeserializeOwned;

use crate::error::{DashboardError, Result};
use crate::types::{
    Datasets, EvidenceRecord, EvidenceSet, Expectation, Observation, RawEvidenceRow,
    RawExpectationRow, RawObservationRow,
};
use crate::util::{clean_text, parse_f64_cell, parse_year_cell};

const EXPECTATION_COLUMNS: &[&str] = &["Initiative ID", "Metric", "Baseline", "Target 2030"];
const PERFORMANCE_COLUMNS: &[&str] = &["Initiative ID", "Metric", "Year", "Actual Value"];
const EVIDENCE_COLUMNS: &[&str] = &["Initiative ID", "Confidence Score"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetPaths {
    pub expectations: PathBuf,
    pub performance: PathBuf,
    pub evidence: PathBuf,
}

impl DatasetPaths {
    /// The conventional file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            expectations: dir.join("Expectations.csv"),
            performance: dir.join("Performance.csv"),
            evidence: dir.join("Evidence.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub expectation_rows: usize,
    pub observation_rows: usize,
    pub evidence_rows: usize,
    pub null_baselines: usize,
    pub null_targets: usize,
    pub null_actuals: usize,
}

pub fn load_datasets(paths: &DatasetPaths) -> Result<(Datasets, LoadReport)> {
    let expectations = load_expectations(&paths.expectations)?;
    let performance = load_performance(&paths.performance)?;
    let evidence = load_evidence(&paths.evidence)?;

    let report = LoadReport {
        expectation_rows: expectations.len(),
        observation_rows: performance.len(),
        evidence_rows: evidence.records.len(),
        null_baselines: expectations.iter().filter(|e| e.baseline.is_none()).count(),
        null_targets: expectations
            .iter()
            .filter(|e| e.target_horizon_a.is_none())
            .count(),
        null_actuals: performance.iter().filter(|o| o.actual_value.is_none()).count(),
    };
    info!(
        "loaded {} expectations, {} observations, {} evidence records",
        report.expectation_rows, report.observation_rows, report.evidence_rows
    );
    Ok((
        Datasets {
            expectations,
            performance,
            evidence,
        },
        report,
    ))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_expectations(path: &Path) -> Result<Vec<Expectation>> {
    read_expectations(open(path)?, path)
}

pub fn load_performance(path: &Path) -> Result<Vec<Observation>> {
    read_performance(open(path)?, path)
}

pub fn load_evidence(path: &Path) -> Result<EvidenceSet> {
    read_evidence(open(path)?, path)
}

/// Parse rows of `T`, after checking the header carries `required`.
/// `origin` only labels errors.
fn read_rows<R, T>(
    reader: R,
    origin: &Path,
    required: &[&'static str],
) -> Result<(StringRecord, Vec<T>)>
where
    R: Read,
    T: DeserializeOwned,
{
    let csv_err = |source| DashboardError::Csv {
        path: origin.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn {
                path: origin.to_path_buf(),
                column,
            });
        }
    }
    let rows = rdr
        .deserialize::<T>()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_err)?;
    Ok((headers, rows))
}

/// Cell-level failures carry the 1-based data row they came from.
struct RowCtx<'a> {
    origin: &'a Path,
    row: usize,
}

impl RowCtx<'_> {
    fn invalid(&self, column: &'static str, value: Option<&str>) -> DashboardError {
        DashboardError::InvalidValue {
            path: self.origin.to_path_buf(),
            row: self.row,
            column,
            value: value.unwrap_or_default().to_string(),
        }
    }

    fn text(&self, column: &'static str, value: Option<String>) -> Result<String> {
        clean_text(value).ok_or_else(|| self.invalid(column, None))
    }

    fn number(&self, column: &'static str, value: Option<&str>) -> Result<Option<f64>> {
        parse_f64_cell(value).map_err(|_| self.invalid(column, value))
    }
}

pub fn read_expectations<R: Read>(reader: R, origin: &Path) -> Result<Vec<Expectation>> {
    let (_, rows) = read_rows::<R, RawExpectationRow>(reader, origin, EXPECTATION_COLUMNS)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| -> Result<Expectation> {
            let ctx = RowCtx { origin, row: i + 1 };
            Ok(Expectation {
                baseline: ctx.number("Baseline", raw.baseline.as_deref())?,
                target_horizon_a: ctx.number("Target 2030", raw.target_2030.as_deref())?,
                target_horizon_b: ctx.number("Target 2045", raw.target_2045.as_deref())?,
                initiative_id: ctx.text("Initiative ID", raw.initiative_id)?,
                metric_name: ctx.text("Metric", raw.metric)?,
                category: clean_text(raw.category),
                expectation_type: clean_text(raw.expectation_type),
            })
        })
        .collect()
}

pub fn read_performance<R: Read>(reader: R, origin: &Path) -> Result<Vec<Observation>> {
    let (_, rows) = read_rows::<R, RawObservationRow>(reader, origin, PERFORMANCE_COLUMNS)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| -> Result<Observation> {
            let ctx = RowCtx { origin, row: i + 1 };
            let year = parse_year_cell(raw.year.as_deref())
                .ok()
                .flatten()
                .ok_or_else(|| ctx.invalid("Year", raw.year.as_deref()))?;
            Ok(Observation {
                year,
                actual_value: ctx.number("Actual Value", raw.actual_value.as_deref())?,
                initiative_id: ctx.text("Initiative ID", raw.initiative_id)?,
                metric_name: ctx.text("Metric", raw.metric)?,
                data_source: clean_text(raw.data_source).unwrap_or_default(),
                quality: clean_text(raw.quality).unwrap_or_default(),
            })
        })
        .collect()
}

pub fn read_evidence<R: Read>(reader: R, origin: &Path) -> Result<EvidenceSet> {
    let (headers, rows) = read_rows::<R, RawEvidenceRow>(reader, origin, EVIDENCE_COLUMNS)?;
    let has_metric_column = headers.iter().any(|h| h == "Metric");
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| -> Result<EvidenceRecord> {
            let ctx = RowCtx { origin, row: i + 1 };
            let confidence_score = ctx.number("Confidence Score", raw.confidence_score.as_deref())?;
            Ok(EvidenceRecord {
                confidence_score,
                initiative_id: ctx.text("Initiative ID", raw.initiative_id)?,
                metric_name: clean_text(raw.metric),
                evidence_type: clean_text(raw.evidence_type).unwrap_or_else(|| "Evidence".to_string()),
                summary_or_link: clean_text(raw.summary_or_link)
                    .unwrap_or_else(|| "No summary available".to_string()),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(EvidenceSet {
        records,
        has_metric_column,
    })
}
