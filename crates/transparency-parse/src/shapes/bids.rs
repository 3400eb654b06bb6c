//! Aggregated balancing energy bids keyed by flow direction.

use chrono_tz::Tz;
use transparency_core::{ColumnKey, Duplicates, Frame, Result, Timestamp, TransparencyError};

use crate::points::{CurveType, Period};
use crate::xml::{Element, parse_xml};

fn direction(series: &Element) -> Result<&'static str> {
    match series.require_text("flowdirection.direction")?.as_str() {
        "A01" => Ok("Up"),
        "A02" => Ok("Down"),
        other => Err(TransparencyError::Schema(format!("unknown flow direction {other}"))),
    }
}

fn folded(period: &Element, label: &str, curve: CurveType) -> Result<Vec<(Timestamp, f64)>> {
    let points = Period::from_element(period, label, None)?
        .fold(curve)?
        .unwrap_or_default();
    Ok(points
        .into_iter()
        .map(|(t, v)| (t.with_timezone(&Tz::UTC), v))
        .collect())
}

/// Parses an aggregated balancing energy bids document.
///
/// Columns are keyed `[direction, kind]` where direction is `Up` or `Down`
/// and kind is `Offered`, plus `Activated` for series that publish a
/// secondary quantity.
///
/// # Errors
///
/// Returns [`TransparencyError::Schema`] for an unknown flow direction,
/// [`TransparencyError::MissingElement`] for a series with periods but no
/// `curveType`, or a parse error.
pub fn aggregated_bids(xml: &str) -> Result<Frame> {
    let doc = parse_xml(xml)?;
    let mut columns = Vec::new();
    for series in doc.find_all("timeseries") {
        let periods = series.find_all("period");
        if periods.is_empty() {
            continue;
        }
        let direction = direction(series)?;
        let curve = CurveType::from_code(&series.require_text("curvetype")?);
        let activated = series.find("secondaryquantity").is_some();
        for period in periods {
            columns.push((
                ColumnKey::new([direction, "Offered"]),
                folded(period, "quantity", curve)?,
            ));
            if activated {
                columns.push((
                    ColumnKey::new([direction, "Activated"]),
                    folded(period, "secondaryquantity", curve)?,
                ));
            }
        }
    }
    Ok(Frame::from_columns(columns, Duplicates::First))
}
