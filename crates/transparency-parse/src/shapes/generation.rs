//! Generation, installed capacity and per-plant production.
//!
//! Columns are keyed by plant, EIC code, production type and metric,
//! keeping only the levels that distinguish columns.

use tracing::{debug, warn};
use transparency_core::mappings::psr_type_name;
use transparency_core::{ColumnKey, Duplicates, Frame, Result, TimeSeries, Timestamp};

use crate::assemble::parse_timeseries;
use crate::options::{GenerationOptions, ParseOptions};
use crate::xml::{Element, parse_xml};

const PRODUCTION: &str = "Actual Aggregated";
const CONSUMPTION: &str = "Actual Consumption";

/// Repairs a plant name whose UTF-8 bytes were decoded as Latin-1.
///
/// Names with characters outside Latin-1, or whose bytes are not valid
/// UTF-8, are returned unchanged.
#[must_use]
pub fn fix_plant_name(name: &str) -> String {
    let bytes: Option<Vec<u8>> = name.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect();
    bytes
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| name.to_string())
}

fn column_key(series: &Element, options: GenerationOptions) -> Result<ColumnKey> {
    let mut levels = Vec::new();
    if options.per_plant {
        levels.push(fix_plant_name(&series.require_text("name")?));
        if options.include_eic {
            let eic = series
                .descendants()
                .find(|e| e.name() == "mrid" && e.attribute("codingscheme") == Some("A01"))
                .map(|e| e.text().trim().to_string())
                .unwrap_or_default();
            levels.push(eic);
        }
    }
    if let Some(code) = series.find_text("psrtype") {
        let name = psr_type_name(&code).map_or_else(
            || {
                warn!(%code, "unknown production type code");
                code.clone()
            },
            str::to_string,
        );
        levels.push(name);
    }
    let metric = if series.find("inbiddingzone_domain.mrid").is_some() {
        CONSUMPTION
    } else {
        PRODUCTION
    };
    levels.push(metric.to_string());
    Ok(ColumnKey::new(levels))
}

/// Parses a generation or installed-capacity document.
///
/// Columns are keyed `[plant, eic, production type, metric]`, keeping the
/// levels that apply. The metric is `Actual Consumption` for series with an
/// `inBiddingZone_Domain`, otherwise `Actual Aggregated`. Repeated timestamps
/// of one column keep their first value.
///
/// In nett mode each production type becomes production minus consumption,
/// missing values counting as zero. Otherwise a metric level that is the
/// same for every column is dropped, except in per-plant mode.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed.
pub fn generation(xml: &str, options: GenerationOptions) -> Result<Frame> {
    let doc = parse_xml(xml)?;
    let parse_options = ParseOptions::quantity();
    let mut columns = Vec::new();
    for series in doc.find_all(&parse_options.series_label) {
        let key = column_key(series, options)?;
        let merged = TimeSeries::concat(parse_timeseries(series, &parse_options)?.into_values());
        let points: Vec<(Timestamp, f64)> = merged.iter().map(|o| (o.timestamp, o.value)).collect();
        columns.push((key, points));
    }
    let frame = Frame::from_columns(columns, Duplicates::First);
    debug!(columns = frame.width(), rows = frame.height(), "parsed generation document");

    if options.nett {
        return Ok(nett(&frame));
    }

    let redundant = {
        let mut metrics = frame.keys().map(ColumnKey::last);
        let first = metrics.next().flatten();
        frame.keys().all(|k| k.levels().len() > 1)
            && metrics.all(|m| m == first)
            && !options.per_plant
    };
    Ok(if redundant {
        frame.map_keys(ColumnKey::without_last)
    } else {
        frame
    })
}

fn nett(frame: &Frame) -> Frame {
    let mut groups: Vec<ColumnKey> = Vec::new();
    for key in frame.keys() {
        let group = key.without_last();
        if !groups.contains(&group) {
            groups.push(group);
        }
    }

    let columns: Vec<(ColumnKey, Vec<(Timestamp, f64)>)> = groups
        .into_iter()
        .map(|group| {
            let metric = |name: &str| {
                let mut levels = group.levels().to_vec();
                levels.push(name.to_string());
                frame.column(&ColumnKey::new(levels))
            };
            let production = metric(PRODUCTION);
            let consumption = metric(CONSUMPTION);
            let points = frame
                .index()
                .iter()
                .enumerate()
                .map(|(row, t)| {
                    let p = production.and_then(|c| c[row]).unwrap_or(0.0);
                    let c = consumption.and_then(|c| c[row]).unwrap_or(0.0);
                    (*t, p - c)
                })
                .collect();
            let key = if group.levels().is_empty() {
                ColumnKey::single("Nett")
            } else {
                group
            };
            (key, points)
        })
        .collect();
    Frame::from_columns(columns, Duplicates::First)
}
