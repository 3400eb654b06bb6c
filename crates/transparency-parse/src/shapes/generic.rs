//! Prices, net positions and loads.

use transparency_core::{
    ColumnKey, Duplicates, Frame, Resolution, ResolutionMap, Result, TimeSeries, TransparencyError,
};

use crate::assemble::{parse_document, parse_timeseries};
use crate::options::ParseOptions;
use crate::xml::parse_xml;

/// Parses a price document into one series per resolution.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed.
pub fn prices(xml: &str) -> Result<ResolutionMap> {
    parse_document(xml, &ParseOptions::prices())?.into_map()
}

/// Parses a net position document at `resolution`.
///
/// Series whose `out_Domain` is a region are imports and are negated.
///
/// # Errors
///
/// Returns [`TransparencyError::NoMatchingData`] when no series has data at
/// `resolution`, or a parse error.
pub fn net_positions(xml: &str, resolution: Resolution) -> Result<TimeSeries> {
    let doc = parse_xml(xml)?;
    let options = ParseOptions::quantity();
    let mut parts = Vec::new();
    for series in doc.find_all(&options.series_label) {
        let Some(part) = parse_timeseries(series, &options)?.remove(&resolution) else {
            continue;
        };
        let import = series
            .find_text("out_domain.mrid")
            .is_some_and(|mrid| mrid.contains("REGION"));
        parts.push(if import { part.map_values(|v| -v) } else { part });
    }
    let merged = TimeSeries::concat(parts);
    if merged.is_empty() {
        return Err(TransparencyError::NoMatchingData(format!(
            "no {resolution} net positions in document"
        )));
    }
    Ok(merged)
}

/// Kind of load document, by process type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadKind {
    /// Realised load (`A16`).
    Actual,
    /// Day-ahead forecast (`A01`).
    DayAhead,
    /// Week-ahead min/max forecast (`A31`).
    WeekAhead,
    /// Month-ahead min/max forecast (`A32`).
    MonthAhead,
    /// Year-ahead min/max forecast (`A33`).
    YearAhead,
}

impl LoadKind {
    /// Returns the process type code.
    #[must_use]
    pub const fn process_type(&self) -> &'static str {
        match self {
            Self::Actual => "A16",
            Self::DayAhead => "A01",
            Self::WeekAhead => "A31",
            Self::MonthAhead => "A32",
            Self::YearAhead => "A33",
        }
    }

    /// Looks up a process type code.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::InvalidParameter`] for other codes.
    pub fn from_process_type(code: &str) -> Result<Self> {
        match code {
            "A16" => Ok(Self::Actual),
            "A01" => Ok(Self::DayAhead),
            "A31" => Ok(Self::WeekAhead),
            "A32" => Ok(Self::MonthAhead),
            "A33" => Ok(Self::YearAhead),
            other => Err(TransparencyError::InvalidParameter(format!(
                "unsupported load process type {other}"
            ))),
        }
    }
}

/// Parses a load document.
///
/// Actual and day-ahead documents give a single column, `Actual Load` or
/// `Forecasted Load`. Longer horizons give `Min Forecasted Load` and
/// `Max Forecasted Load`, told apart by business type.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed.
pub fn loads(xml: &str, kind: LoadKind) -> Result<Frame> {
    let options = ParseOptions::quantity();
    match kind {
        LoadKind::Actual | LoadKind::DayAhead => {
            let column = if kind == LoadKind::Actual {
                "Actual Load"
            } else {
                "Forecasted Load"
            };
            let series = parse_document(xml, &options)?.into_merged();
            Ok(Frame::from_series(ColumnKey::single(column), &series))
        }
        LoadKind::WeekAhead | LoadKind::MonthAhead | LoadKind::YearAhead => {
            let doc = parse_xml(xml)?;
            let mut columns = Vec::new();
            for series in doc.find_all(&options.series_label) {
                let column = match series.find_text("businesstype").as_deref() {
                    Some("A60") => "Min Forecasted Load",
                    Some("A61") => "Max Forecasted Load",
                    _ => continue,
                };
                let points = TimeSeries::concat(parse_timeseries(series, &options)?.into_values())
                    .iter()
                    .map(|o| (o.timestamp, o.value))
                    .collect();
                columns.push((ColumnKey::single(column), points));
            }
            Ok(Frame::from_columns(columns, Duplicates::First))
        }
    }
}
