//! Assembly of folded periods into per-resolution series.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use tracing::debug;
use transparency_core::{
    Observation, Resolution, ResolutionMap, Result, Tags, TimeSeries, TransparencyError,
};

use crate::options::{MergeMode, ParseOptions};
use crate::points::{CurveType, Period};
use crate::xml::{Element, parse_xml};

/// Result of [`parse_document`], shaped by the [`MergeMode`].
#[derive(Clone, Debug, PartialEq)]
pub enum Assembled {
    /// One series per resolution.
    PerResolution(ResolutionMap),
    /// One series across all resolutions.
    Merged(TimeSeries),
}

impl Assembled {
    /// Returns a single series, concatenating resolutions if needed.
    #[must_use]
    pub fn into_merged(self) -> TimeSeries {
        match self {
            Self::PerResolution(map) => TimeSeries::concat(map.into_values()),
            Self::Merged(series) => series,
        }
    }

    /// Returns the per-resolution map.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::InvalidParameter`] for merged output.
    pub fn into_map(self) -> Result<ResolutionMap> {
        match self {
            Self::PerResolution(map) => Ok(map),
            Self::Merged(_) => Err(TransparencyError::InvalidParameter(
                "series were merged across resolutions".to_string(),
            )),
        }
    }

    /// Returns true when nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::PerResolution(map) => map.values().all(TimeSeries::is_empty),
            Self::Merged(series) => series.is_empty(),
        }
    }
}

/// Reads the requested attributes present on a series element.
///
/// Attributes whose element is missing or empty are left out.
#[must_use]
pub fn series_tags(series: &Element, options: &ParseOptions) -> Tags {
    let mut tags = Tags::default();
    for attribute in &options.attributes {
        if let Some(text) = series.find_text(attribute.tag()).filter(|t| !t.is_empty()) {
            tags.set(*attribute, text);
        }
    }
    tags
}

/// Parses one series element into a series per resolution.
///
/// Periods sharing a resolution are concatenated and sorted; duplicate
/// timestamps are kept. Resolutions without data are absent from the map.
///
/// # Errors
///
/// Returns an error for schema problems, unsupported resolutions or
/// malformed point values.
pub fn parse_timeseries(series: &Element, options: &ParseOptions) -> Result<ResolutionMap> {
    let periods = series.find_all(&options.period_label);
    if periods.is_empty() {
        return Ok(ResolutionMap::new());
    }

    let curve = CurveType::from_code(&series.require_text("curvetype")?);
    let tags = series_tags(series, options);
    let attributes: Vec<_> = options
        .attributes
        .iter()
        .copied()
        .filter(|a| tags.get(*a).is_some())
        .collect();

    let mut fragments: BTreeMap<Resolution, Vec<TimeSeries>> = BTreeMap::new();
    for element in periods {
        let period = Period::from_element(
            element,
            &options.value_label,
            options.fallback_label.as_deref(),
        )?;
        let Some(points) = period.fold(curve)? else {
            continue;
        };
        let observations = points
            .into_iter()
            .map(|(t, value)| {
                Observation::new(t.with_timezone(&Tz::UTC), value).with_tags(tags.clone())
            })
            .collect();
        fragments
            .entry(period.resolution)
            .or_default()
            .push(TimeSeries::from_observations(attributes.clone(), observations));
    }

    Ok(fragments
        .into_iter()
        .map(|(resolution, parts)| (resolution, TimeSeries::concat(parts)))
        .collect())
}

/// Parses every series of a document.
///
/// # Errors
///
/// Returns an error for malformed XML, schema problems, unsupported
/// resolutions or malformed point values.
pub fn parse_document(xml: &str, options: &ParseOptions) -> Result<Assembled> {
    let doc = parse_xml(xml)?;
    let series = doc.find_all(&options.series_label);
    debug!(count = series.len(), label = %options.series_label, "parsing document");

    let mut per_resolution: BTreeMap<Resolution, Vec<TimeSeries>> = BTreeMap::new();
    let mut merged = Vec::new();
    for element in series {
        let map = parse_timeseries(element, options)?;
        match options.merge {
            MergeMode::PerResolution => {
                for (resolution, part) in map {
                    per_resolution.entry(resolution).or_default().push(part);
                }
            }
            MergeMode::Merged => merged.push(TimeSeries::concat(map.into_values())),
        }
    }

    Ok(match options.merge {
        MergeMode::PerResolution => Assembled::PerResolution(
            per_resolution
                .into_iter()
                .map(|(resolution, parts)| (resolution, TimeSeries::concat(parts)))
                .collect(),
        ),
        MergeMode::Merged => Assembled::Merged(TimeSeries::concat(merged)),
    })
}

/// Picks the series at `resolution`.
///
/// # Errors
///
/// Returns [`TransparencyError::NoMatchingData`] if it is absent or empty.
pub fn select(mut map: ResolutionMap, resolution: Resolution) -> Result<TimeSeries> {
    map.remove(&resolution)
        .filter(|series| !series.is_empty())
        .ok_or_else(|| TransparencyError::NoMatchingData(format!("no {resolution} series in document")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use transparency_core::Attribute;

    fn series_xml(direction: &str, resolution: &str, start: &str, end: &str, values: &[&str]) -> String {
        let points: String = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("<Point><position>{}</position><quantity>{v}</quantity></Point>", i + 1))
            .collect();
        format!(
            "<TimeSeries><curveType>A01</curveType>\
             <flowDirection.direction>{direction}</flowDirection.direction>\
             <Period><timeInterval><start>{start}</start><end>{end}</end></timeInterval>\
             <resolution>{resolution}</resolution>{points}</Period></TimeSeries>"
        )
    }

    fn document(parts: &[String]) -> String {
        format!("<GL_MarketDocument>{}</GL_MarketDocument>", parts.concat())
    }

    #[test]
    fn test_fragments_concatenate_sorted_with_duplicates() {
        let xml = document(&[
            series_xml("A01", "PT60M", "2023-01-01T02:00Z", "2023-01-01T04:00Z", &["3", "4"]),
            series_xml("A01", "PT60M", "2023-01-01T00:00Z", "2023-01-01T02:00Z", &["1", "2"]),
            series_xml("A02", "PT60M", "2023-01-01T00:00Z", "2023-01-01T01:00Z", &["9"]),
        ]);
        let map = parse_document(&xml, &ParseOptions::quantity()).unwrap().into_map().unwrap();
        let hourly = &map[&Resolution::Hour];
        assert_eq!(hourly.values(), vec![1.0, 9.0, 2.0, 3.0, 4.0]);
        assert!(hourly.attributes().is_empty());
    }

    #[test]
    fn test_resolutions_are_kept_apart_or_merged() {
        let xml = document(&[
            series_xml("A01", "PT60M", "2023-01-01T00:00Z", "2023-01-01T01:00Z", &["1"]),
            series_xml("A01", "PT15M", "2023-01-01T01:00Z", "2023-01-01T01:30Z", &["2", "3"]),
        ]);
        let map = parse_document(&xml, &ParseOptions::quantity()).unwrap().into_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Resolution::QuarterHour].len(), 2);

        let merged = parse_document(&xml, &ParseOptions::quantity().with_merge(MergeMode::Merged))
            .unwrap()
            .into_merged();
        assert_eq!(merged.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_attributes_are_broadcast() {
        let xml = document(&[
            series_xml("A01", "PT60M", "2023-01-01T00:00Z", "2023-01-01T02:00Z", &["1", "2"]),
            series_xml("A02", "PT60M", "2023-01-01T00:00Z", "2023-01-01T01:00Z", &["5"]),
        ]);
        let options = ParseOptions::quantity()
            .with_attribute(Attribute::Direction)
            .with_attribute(Attribute::ContractType);
        let series = parse_document(&xml, &options).unwrap().into_merged();
        assert_eq!(series.attributes(), &[Attribute::Direction]);
        let first = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let directions: Vec<_> = series
            .iter()
            .filter(|o| o.timestamp == first)
            .map(|o| o.tags.get(Attribute::Direction).unwrap_or_default())
            .collect();
        assert_eq!(directions, vec!["A01", "A02"]);
    }

    #[test]
    fn test_single_zero_period_contributes_nothing() {
        let xml = document(&[series_xml("A01", "PT60M", "2023-01-01T00:00Z", "2023-01-01T01:00Z", &["0"])]);
        let assembled = parse_document(&xml, &ParseOptions::quantity()).unwrap();
        assert!(assembled.is_empty());
        let err = select(assembled.into_map().unwrap(), Resolution::Hour).unwrap_err();
        assert!(err.is_no_matching_data());
    }

    #[test]
    fn test_missing_curve_type_is_fatal() {
        let xml = "<doc><TimeSeries><Period><timeInterval><start>2023-01-01T00:00Z</start>\
                   <end>2023-01-01T01:00Z</end></timeInterval><resolution>PT60M</resolution>\
                   <Point><position>1</position><quantity>1</quantity></Point></Period></TimeSeries></doc>";
        let err = parse_document(xml, &ParseOptions::quantity()).unwrap_err();
        assert!(matches!(err, TransparencyError::MissingElement { element, .. } if element == "curvetype"));
    }

    #[test]
    fn test_malformed_point_is_fatal() {
        let xml = document(&[series_xml("A01", "PT60M", "2023-01-01T00:00Z", "2023-01-01T02:00Z", &["1", "N/A"])]);
        let err = parse_document(&xml, &ParseOptions::quantity()).unwrap_err();
        assert!(matches!(err, TransparencyError::MalformedPoint(_)));
    }
}
