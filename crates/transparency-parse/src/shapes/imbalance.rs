//! Imbalance prices and volumes, as single documents or ZIP archives.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use tracing::debug;
use transparency_core::{ColumnKey, Duplicates, Frame, Resolution, Result, Timestamp, TransparencyError};

use crate::archive::parse_archive;
use crate::index::{build_index, period_index};
use crate::points::{parse_position, parse_value};
use crate::xml::{Element, parse_xml};

const VOLUME: &str = "Imbalance Volume";

fn category_name(code: Option<&str>) -> String {
    match code {
        Some("A04") => "Long".to_string(),
        Some("A05") => "Short".to_string(),
        None => "Price for Consumption".to_string(),
        Some(other) => other.to_string(),
    }
}

fn price_frame(series: &Element) -> Result<Frame> {
    let mut positions: BTreeMap<u32, Vec<(String, f64)>> = BTreeMap::new();
    for point in series.find_all("point") {
        let position = parse_position(&point.require_text("position")?)?;
        let amount = parse_value(&point.require_text("imbalance_price.amount")?)?;
        let category = category_name(point.find_text("imbalance_price.category").as_deref());
        positions.entry(position).or_default().push((category, amount));
    }

    let index = period_index(series, None)?;
    if index.len() != positions.len() {
        return Err(TransparencyError::Schema(format!(
            "{} price positions but {} intervals",
            positions.len(),
            index.len()
        )));
    }

    let columns: Vec<(ColumnKey, Vec<(Timestamp, f64)>)> = index
        .iter()
        .zip(positions.into_values())
        .flat_map(|(t, amounts)| {
            let t = t.with_timezone(&Tz::UTC);
            amounts
                .into_iter()
                .map(move |(category, amount)| (ColumnKey::single(category), vec![(t, amount)]))
        })
        .collect();
    Ok(Frame::from_columns(columns, Duplicates::First))
}

/// Parses one imbalance price document.
///
/// Each category becomes a column: `Long` (`A04`), `Short` (`A05`) or
/// `Price for Consumption` for uncategorised prices.
///
/// # Errors
///
/// Returns [`TransparencyError::Schema`] when a series' distinct positions
/// do not match its intervals, or a parse error.
pub fn imbalance_prices(xml: &str) -> Result<Frame> {
    let doc = parse_xml(xml)?;
    let frames = doc
        .find_all("timeseries")
        .into_iter()
        .map(price_frame)
        .collect::<Result<Vec<_>>>()?;
    Ok(Frame::join(frames))
}

/// Parses every document of an imbalance price archive and joins them.
///
/// # Errors
///
/// Returns an archive or parse error.
pub fn imbalance_prices_zip(bytes: &[u8]) -> Result<Frame> {
    let frames = parse_archive(bytes, imbalance_prices)?;
    debug!(documents = frames.len(), "parsed imbalance price archive");
    Ok(Frame::join(frames))
}

fn volume_points(xml: &str) -> Result<Vec<(Timestamp, f64)>> {
    let doc = parse_xml(xml)?;
    let mut points = Vec::new();
    for series in doc.find_all("timeseries") {
        let sign = match series.require_text("flowdirection.direction")?.as_str() {
            "A01" => 1.0,
            "A02" => -1.0,
            other => {
                return Err(TransparencyError::Schema(format!(
                    "unknown imbalance flow direction {other}"
                )));
            }
        };
        for period in series.find_all("period") {
            let start = period.require_timestamp("start")?;
            let end = period.require_timestamp("end")?;
            let resolution = Resolution::from_code(&period.require_text("resolution")?)?;
            let index = build_index(start, end, resolution, None)?;
            for (t, point) in index.iter().zip(period.find_all("point")) {
                let value = parse_value(&point.require_text("quantity")?)?;
                points.push((t.with_timezone(&Tz::UTC), value * sign));
            }
        }
    }
    Ok(points)
}

/// Parses one imbalance volume document into an `Imbalance Volume` column.
///
/// Points are laid on their period's intervals in document order and signed
/// by flow direction: `A01` positive, `A02` negative. Timestamps hit more
/// than once are averaged.
///
/// # Errors
///
/// Returns [`TransparencyError::Schema`] for an unknown flow direction, or a
/// parse error.
pub fn imbalance_volumes(xml: &str) -> Result<Frame> {
    let points = volume_points(xml)?;
    Ok(Frame::from_columns([(ColumnKey::single(VOLUME), points)], Duplicates::Mean))
}

/// Parses every document of an imbalance volume archive into one column,
/// averaging timestamps published more than once.
///
/// # Errors
///
/// Returns an archive or parse error.
pub fn imbalance_volumes_zip(bytes: &[u8]) -> Result<Frame> {
    let documents = parse_archive(bytes, volume_points)?;
    let columns = documents
        .into_iter()
        .map(|points| (ColumnKey::single(VOLUME), points));
    Ok(Frame::from_columns(columns, Duplicates::Mean))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::build_zip;
    use crate::shapes::fixtures::{document, period, point, quantities, series};
    use chrono::{TimeZone, Utc};

    fn price_series(start: &str, end: &str, points: &[String]) -> String {
        series(&[], &[period(start, end, "PT15M", points)])
    }

    fn priced(position: u32, amount: &str, category: Option<&str>) -> String {
        match category {
            Some(c) => point(
                position,
                &[("imbalance_Price.amount", amount), ("imbalance_Price.category", c)],
            ),
            None => point(position, &[("imbalance_Price.amount", amount)]),
        }
    }

    #[test]
    fn test_prices_by_category() {
        let xml = document(&[price_series(
            "2023-01-01T00:00Z",
            "2023-01-01T00:30Z",
            &[
                priced(1, "10", Some("A04")),
                priced(1, "12", Some("A05")),
                priced(2, "20", Some("A04")),
                priced(2, "22", Some("A05")),
            ],
        )]);
        let frame = imbalance_prices(&xml).unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.column(&"Long".into()).unwrap(), &[Some(10.0), Some(20.0)]);
        assert_eq!(frame.column(&"Short".into()).unwrap(), &[Some(12.0), Some(22.0)]);
    }

    #[test]
    fn test_uncategorised_price_column() {
        let xml = document(&[price_series(
            "2023-01-01T00:00Z",
            "2023-01-01T00:15Z",
            &[priced(1, "-5", None)],
        )]);
        let frame = imbalance_prices(&xml).unwrap();
        assert_eq!(frame.column(&"Price for Consumption".into()).unwrap(), &[Some(-5.0)]);
    }

    #[test]
    fn test_price_length_mismatch() {
        let xml = document(&[price_series(
            "2023-01-01T00:00Z",
            "2023-01-01T00:30Z",
            &[priced(1, "10", Some("A04"))],
        )]);
        assert!(matches!(imbalance_prices(&xml), Err(TransparencyError::Schema(_))));
    }

    #[test]
    fn test_price_archive_joins_documents() {
        let first = document(&[price_series(
            "2023-01-01T00:00Z",
            "2023-01-01T00:15Z",
            &[priced(1, "1", Some("A04"))],
        )]);
        let second = document(&[price_series(
            "2023-01-01T00:15Z",
            "2023-01-01T00:30Z",
            &[priced(1, "2", Some("A04"))],
        )]);
        let bytes = build_zip(&[("1.xml", first.as_str()), ("2.xml", second.as_str())]);
        let frame = imbalance_prices_zip(&bytes).unwrap();
        assert_eq!(frame.column(&"Long".into()).unwrap(), &[Some(1.0), Some(2.0)]);
    }

    fn volume_series(direction: &str, values: &[&str]) -> String {
        series(
            &[("flowDirection.direction", direction)],
            &[period("2023-01-01T00:00Z", "2023-01-01T00:30Z", "PT15M", &quantities(values))],
        )
    }

    #[test]
    fn test_volumes_are_signed() {
        let xml = document(&[volume_series("A02", &["5", "6"])]);
        let frame = imbalance_volumes(&xml).unwrap();
        assert_eq!(frame.column(&VOLUME.into()).unwrap(), &[Some(-5.0), Some(-6.0)]);
    }

    #[test]
    fn test_unknown_volume_direction() {
        let xml = document(&[volume_series("A03", &["5"])]);
        assert!(matches!(imbalance_volumes(&xml), Err(TransparencyError::Schema(_))));
    }

    #[test]
    fn test_volume_archive_averages_repeats() {
        let first = document(&[volume_series("A01", &["4", "8"])]);
        let second = document(&[volume_series("A01", &["6"])]);
        let bytes = build_zip(&[("1.xml", first.as_str()), ("2.xml", second.as_str())]);
        let frame = imbalance_volumes_zip(&bytes).unwrap();
        let t0 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 15, 0).unwrap();
        assert_eq!(frame.get(&t0, &VOLUME.into()), Some(5.0));
        assert_eq!(frame.get(&t1, &VOLUME.into()), Some(8.0));
    }
}
