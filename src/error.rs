// Load-time errors.

use std::path::PathBuf;

/// Failures that abort a load. Computation over loaded rows never produces
/// one of these; missing or degenerate data resolves to `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} is missing required column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{} row {row}: invalid value {value:?} in column `{column}`", path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
