//! Cross-border physical flows.
//!
//! Points are placed by position on the period index, aligned to its tail.

use chrono_tz::Tz;
use tracing::debug;
use transparency_core::{Observation, Result, TimeSeries, TransparencyError};

use crate::index::period_index;
use crate::points::{parse_position, parse_value};
use crate::xml::{Element, parse_xml};

fn flow_series(series: &Element) -> Result<TimeSeries> {
    let mut points = series
        .find_all("point")
        .into_iter()
        .map(|point| {
            let position = parse_position(&point.require_text("position")?)?;
            let value = parse_value(&point.require_text("quantity")?)?;
            Ok((position, value))
        })
        .collect::<Result<Vec<_>>>()?;
    points.sort_by_key(|(position, _)| *position);

    let index = period_index(series, None)?;
    if index.len() < points.len() {
        return Err(TransparencyError::Schema(format!(
            "{} flow points but only {} intervals",
            points.len(),
            index.len()
        )));
    }
    if index.len() > points.len() {
        debug!(points = points.len(), intervals = index.len(), "aligning flow points to the end of the period");
    }

    let offset = index.len() - points.len();
    let observations = index[offset..]
        .iter()
        .zip(points)
        .map(|(t, (_, value))| Observation::new(t.with_timezone(&Tz::UTC), value))
        .collect();
    Ok(TimeSeries::from_observations(Vec::new(), observations))
}

/// Parses a cross-border flow document.
///
/// Points are ordered by position and laid on the index of the series'
/// first start, last end and resolution. When the index is longer than the
/// point list, the points fill its tail.
///
/// # Errors
///
/// Returns [`TransparencyError::Schema`] when a series has more points than
/// intervals, or a parse error.
pub fn crossborder_flows(xml: &str) -> Result<TimeSeries> {
    let doc = parse_xml(xml)?;
    let parts = doc
        .find_all("timeseries")
        .into_iter()
        .map(flow_series)
        .collect::<Result<Vec<_>>>()?;
    Ok(TimeSeries::concat(parts))
}
