// Lookups over the loaded datasets.
//
// Keys match by exact string equality. When several observations share the
// same (initiative, metric, year), the one appearing last in the file wins.

use std::collections::BTreeSet;

use crate::types::{Expectation, Observation};

fn is_key(o: &Observation, initiative_id: &str, metric_name: &str) -> bool {
    o.initiative_id == initiative_id && o.metric_name == metric_name
}

/// Most recent observation for the pair, or `None` when there is none.
pub fn latest<'a>(
    series: &'a [Observation],
    initiative_id: &str,
    metric_name: &str,
) -> Option<&'a Observation> {
    series
        .iter()
        .filter(|o| is_key(o, initiative_id, metric_name))
        .fold(None, |best: Option<&Observation>, o| match best {
            Some(b) if b.year > o.year => Some(b),
            _ => Some(o),
        })
}

/// All observations for the pair, oldest year first. The sort is stable, so
/// rows sharing a year keep their file order.
pub fn ordered<'a>(
    series: &'a [Observation],
    initiative_id: &str,
    metric_name: &str,
) -> Vec<&'a Observation> {
    let mut rows: Vec<&Observation> = series
        .iter()
        .filter(|o| is_key(o, initiative_id, metric_name))
        .collect();
    rows.sort_by_key(|o| o.year);
    rows
}

/// First expectation row for the pair; later duplicates are ignored.
pub fn find_expectation<'a>(
    expectations: &'a [Expectation],
    initiative_id: &str,
    metric_name: &str,
) -> Option<&'a Expectation> {
    expectations
        .iter()
        .find(|e| e.initiative_id == initiative_id && e.metric_name == metric_name)
}

/// Sorted, de-duplicated initiative IDs.
pub fn initiatives(expectations: &[Expectation]) -> Vec<String> {
    expectations
        .iter()
        .map(|e| e.initiative_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated IDs of initiatives that track `metric_name`.
pub fn initiatives_with_metric(expectations: &[Expectation], metric_name: &str) -> Vec<String> {
    expectations
        .iter()
        .filter(|e| e.metric_name == metric_name)
        .map(|e| e.initiative_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rows for one initiative, or every row when `initiative_id` is `None`.
pub fn filter_by_initiative<'a>(
    expectations: &'a [Expectation],
    initiative_id: Option<&str>,
) -> Vec<&'a Expectation> {
    expectations
        .iter()
        .filter(|e| initiative_id.map_or(true, |id| e.initiative_id == id))
        .collect()
}
