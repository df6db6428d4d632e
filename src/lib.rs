// Metric evaluation engine for an initiative impact dashboard.
//
// Turns three tabular snapshots (expectations, yearly performance,
// evidence) into progress percentages, status tiers, trend projections,
// evidence grades, and summary counts. Nothing here renders; front-ends
// call in and present the results.

pub mod cache;
pub mod config;
pub mod error;
pub mod evidence;
pub mod format;
pub mod loader;
pub mod output;
pub mod polarity;
pub mod progress;
pub mod projection;
pub mod rationale;
pub mod reports;
pub mod series;
pub mod summary;
pub mod types;
mod util;

pub use config::{DashboardConfig, Engine};
pub use error::{DashboardError, Result};
pub use util::{format_int, format_number};
