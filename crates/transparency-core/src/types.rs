//! Output tables produced by the document parsers.
//!
//! This module defines the timezone-aware structures every parser returns:
//!
//! - [`TimeSeries`] - Ordered observations with optional attribute columns
//! - [`Frame`] - Timestamp index by [`ColumnKey`] columns
//! - [`UnavailabilityTable`] - Outage interval records
//!
//! Timestamps are [`chrono_tz::Tz`]-aware so that a table can be moved from
//! UTC to an area's zone without changing its instants.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolution::Resolution;

/// A timezone-aware instant.
pub type Timestamp = DateTime<Tz>;

/// Document-level tag that can be broadcast as a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// `flowDirection.direction` (A01 up, A02 down).
    Direction,
    /// `contract_MarketAgreement.type`.
    ContractType,
    /// `classificationSequence_AttributeInstanceComponent.position`.
    ClassificationSequence,
}

impl Attribute {
    /// Lowercased document tag carrying this attribute.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Direction => "flowdirection.direction",
            Self::ContractType => "contract_marketagreement.type",
            Self::ClassificationSequence => {
                "classificationsequence_attributeinstancecomponent.position"
            }
        }
    }

    /// Column name used for this attribute in output tables.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Direction => "direction",
            Self::ContractType => "contract_marketagreement_type",
            Self::ClassificationSequence => "classification_sequence",
        }
    }
}

/// Attribute values attached to an observation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tags {
    /// Flow direction code.
    pub direction: Option<String>,
    /// Contract type code.
    pub contract_type: Option<String>,
    /// Classification sequence position.
    pub classification_sequence: Option<String>,
}

impl Tags {
    /// Returns the value for an attribute.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Direction => self.direction.as_deref(),
            Attribute::ContractType => self.contract_type.as_deref(),
            Attribute::ClassificationSequence => self.classification_sequence.as_deref(),
        }
    }

    /// Sets the value for an attribute.
    pub fn set(&mut self, attribute: Attribute, value: impl Into<String>) {
        let value = Some(value.into());
        match attribute {
            Attribute::Direction => self.direction = value,
            Attribute::ContractType => self.contract_type = value,
            Attribute::ClassificationSequence => self.classification_sequence = value,
        }
    }
}

/// A single value of a time series.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Start of the interval the value applies to.
    pub timestamp: Timestamp,
    /// The value.
    pub value: f64,
    /// Attribute values broadcast from the enclosing document series.
    pub tags: Tags,
}

impl Observation {
    /// Creates an untagged observation.
    #[must_use]
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self {
            timestamp,
            value,
            tags: Tags::default(),
        }
    }

    /// Sets the tags of this observation.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

/// Ordered series of observations.
///
/// Observations are kept sorted by timestamp. Duplicate timestamps are
/// preserved; when attribute columns were requested they tell duplicates
/// apart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    attributes: Vec<Attribute>,
    observations: Vec<Observation>,
}

impl TimeSeries {
    /// Creates an empty series with the given attribute columns.
    #[must_use]
    pub const fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            observations: Vec::new(),
        }
    }

    /// Creates a series from observations, sorting them by timestamp.
    ///
    /// The sort is stable, so observations sharing a timestamp keep their
    /// input order.
    #[must_use]
    pub fn from_observations(attributes: Vec<Attribute>, mut observations: Vec<Observation>) -> Self {
        observations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self {
            attributes,
            observations,
        }
    }

    /// Concatenates several series into one sorted series.
    ///
    /// The attribute columns of the result are the union of the inputs'.
    #[must_use]
    pub fn concat(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut observations = Vec::new();
        for part in parts {
            for attribute in part.attributes {
                if !attributes.contains(&attribute) {
                    attributes.push(attribute);
                }
            }
            observations.extend(part.observations);
        }
        attributes.sort();
        Self::from_observations(attributes, observations)
    }

    /// Returns the attribute columns of this series.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the observations in timestamp order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns an iterator over the observations.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    /// Returns an iterator over the timestamps.
    pub fn timestamps(&self) -> impl Iterator<Item = &Timestamp> {
        self.observations.iter().map(|o| &o.timestamp)
    }

    /// Returns the values in timestamp order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Returns the first observation at `timestamp`, if any.
    #[must_use]
    pub fn get<T: TimeZone>(&self, timestamp: &DateTime<T>) -> Option<f64> {
        self.observations
            .iter()
            .find(|o| o.timestamp == *timestamp)
            .map(|o| o.value)
    }

    /// Applies `f` to every value.
    #[must_use]
    pub fn map_values(mut self, f: impl Fn(f64) -> f64) -> Self {
        for observation in &mut self.observations {
            observation.value = f(observation.value);
        }
        self
    }

    /// Expresses every timestamp in `tz`. Instants are unchanged.
    #[must_use]
    pub fn tz_convert(mut self, tz: Tz) -> Self {
        for observation in &mut self.observations {
            observation.timestamp = observation.timestamp.with_timezone(&tz);
        }
        self
    }

    /// Keeps observations with `before <= timestamp <= after`.
    #[must_use]
    pub fn truncate<T: TimeZone>(mut self, before: &DateTime<T>, after: &DateTime<T>) -> Self {
        self.observations
            .retain(|o| o.timestamp >= *before && o.timestamp <= *after);
        self
    }

    /// Converts the series to a DataFrame with a `timestamp` column, a
    /// `value` column and one string column per attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the DataFrame cannot be built.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = vec![
            datetime_column("timestamp", self.timestamps())?,
            Column::new("value".into(), self.values()),
        ];
        for attribute in &self.attributes {
            let values: Vec<Option<&str>> = self
                .observations
                .iter()
                .map(|o| o.tags.get(*attribute))
                .collect();
            columns.push(Column::new(attribute.column().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

impl IntoIterator for TimeSeries {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

/// Series grouped by the resolution they were published at.
pub type ResolutionMap = BTreeMap<Resolution, TimeSeries>;

/// Composite column key of a [`Frame`], e.g. `(plant, production type)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey(Vec<String>);

impl ColumnKey {
    /// Creates a key from its levels, outermost first.
    #[must_use]
    pub fn new<S: Into<String>>(levels: impl IntoIterator<Item = S>) -> Self {
        Self(levels.into_iter().map(Into::into).collect())
    }

    /// Creates a single-level key.
    #[must_use]
    pub fn single(level: impl Into<String>) -> Self {
        Self(vec![level.into()])
    }

    /// Returns the levels of this key.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.0
    }

    /// Returns the level at `index`.
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Returns the innermost level.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns the key without its innermost level.
    #[must_use]
    pub fn without_last(&self) -> Self {
        let mut levels = self.0.clone();
        levels.pop();
        Self(levels)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" / "))
    }
}

impl From<&str> for ColumnKey {
    fn from(s: &str) -> Self {
        Self::single(s)
    }
}

/// How [`Frame::from_columns`] resolves several values for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Duplicates {
    /// Keep the first value seen.
    #[default]
    First,
    /// Average all values.
    Mean,
}

/// Wide table: a sorted timestamp index and keyed columns of optional values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    index: Vec<Timestamp>,
    columns: Vec<(ColumnKey, Vec<Option<f64>>)>,
}

impl Frame {
    /// Outer-joins keyed point lists into a frame.
    ///
    /// Lists sharing a key are merged into one column; cells hit more than
    /// once are resolved with `duplicates`. Column order follows first
    /// appearance.
    #[must_use]
    pub fn from_columns(
        columns: impl IntoIterator<Item = (ColumnKey, Vec<(Timestamp, f64)>)>,
        duplicates: Duplicates,
    ) -> Self {
        let mut merged: Vec<(ColumnKey, BTreeMap<Timestamp, Vec<f64>>)> = Vec::new();
        for (key, points) in columns {
            let position = match merged.iter().position(|(k, _)| *k == key) {
                Some(position) => position,
                None => {
                    merged.push((key, BTreeMap::new()));
                    merged.len() - 1
                }
            };
            let cells = &mut merged[position].1;
            for (timestamp, value) in points {
                cells.entry(timestamp).or_default().push(value);
            }
        }

        let mut index: Vec<Timestamp> = merged
            .iter()
            .flat_map(|(_, cells)| cells.keys().copied())
            .collect();
        index.sort();
        index.dedup();

        let columns = merged
            .into_iter()
            .map(|(key, cells)| {
                let values = index
                    .iter()
                    .map(|t| {
                        cells.get(t).map(|values| match duplicates {
                            Duplicates::First => values[0],
                            Duplicates::Mean => values.iter().sum::<f64>() / values.len() as f64,
                        })
                    })
                    .collect();
                (key, values)
            })
            .collect();

        Self { index, columns }
    }

    /// Creates a one-column frame from a series, ignoring its attributes.
    #[must_use]
    pub fn from_series(key: ColumnKey, series: &TimeSeries) -> Self {
        let points = series.iter().map(|o| (o.timestamp, o.value)).collect();
        Self::from_columns([(key, points)], Duplicates::First)
    }

    /// Outer-joins several frames side by side.
    #[must_use]
    pub fn join(frames: impl IntoIterator<Item = Self>) -> Self {
        let columns: Vec<(ColumnKey, Vec<(Timestamp, f64)>)> = frames
            .into_iter()
            .flat_map(|frame| frame.into_keyed_points())
            .collect();
        Self::from_columns(columns, Duplicates::First)
    }

    /// Returns the sorted timestamp index.
    #[must_use]
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    /// Returns the column keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(k, _)| k)
    }

    /// Returns the values of a column.
    #[must_use]
    pub fn column(&self, key: &ColumnKey) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the value of one cell.
    #[must_use]
    pub fn get<T: TimeZone>(&self, timestamp: &DateTime<T>, key: &ColumnKey) -> Option<f64> {
        let row = self.index.iter().position(|t| *t == *timestamp)?;
        self.column(key)?.get(row).copied().flatten()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rewrites every column key.
    #[must_use]
    pub fn map_keys(self, f: impl Fn(&ColumnKey) -> ColumnKey) -> Self {
        let columns: Vec<(ColumnKey, Vec<(Timestamp, f64)>)> = self
            .into_keyed_points()
            .into_iter()
            .map(|(key, points)| (f(&key), points))
            .collect();
        Self::from_columns(columns, Duplicates::First)
    }

    /// Keeps the columns for which `keep` returns true.
    #[must_use]
    pub fn retain_columns(mut self, keep: impl Fn(&ColumnKey, &[Option<f64>]) -> bool) -> Self {
        self.columns.retain(|(key, values)| keep(key, values));
        self
    }

    /// Appends a column holding the row-wise sum of all columns, missing
    /// cells counting as zero.
    #[must_use]
    pub fn with_row_sums(mut self, key: ColumnKey) -> Self {
        let sums = (0..self.index.len())
            .map(|row| {
                Some(
                    self.columns
                        .iter()
                        .map(|(_, values)| values[row].unwrap_or(0.0))
                        .sum(),
                )
            })
            .collect();
        self.columns.push((key, sums));
        self
    }

    /// Expresses the index in `tz`. Instants are unchanged.
    #[must_use]
    pub fn tz_convert(mut self, tz: Tz) -> Self {
        for timestamp in &mut self.index {
            *timestamp = timestamp.with_timezone(&tz);
        }
        self
    }

    /// Keeps rows with `before <= timestamp <= after`.
    #[must_use]
    pub fn truncate<T: TimeZone>(self, before: &DateTime<T>, after: &DateTime<T>) -> Self {
        let keep: Vec<bool> = self
            .index
            .iter()
            .map(|t| *t >= *before && *t <= *after)
            .collect();
        let index = self
            .index
            .into_iter()
            .zip(&keep)
            .filter_map(|(t, k)| k.then_some(t))
            .collect();
        let columns = self
            .columns
            .into_iter()
            .map(|(key, values)| {
                let values = values
                    .into_iter()
                    .zip(&keep)
                    .filter_map(|(v, k)| k.then_some(v))
                    .collect();
                (key, values)
            })
            .collect();
        Self { index, columns }
    }

    /// Converts the frame to a DataFrame with a `timestamp` column and one
    /// column per key, named by joining the key levels with ` / `.
    ///
    /// # Errors
    ///
    /// Returns an error if the DataFrame cannot be built.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = vec![datetime_column("timestamp", self.index.iter())?];
        for (key, values) in &self.columns {
            columns.push(Column::new(key.to_string().into(), values.clone()));
        }
        Ok(DataFrame::new(columns)?)
    }

    fn into_keyed_points(self) -> Vec<(ColumnKey, Vec<(Timestamp, f64)>)> {
        let index = self.index;
        self.columns
            .into_iter()
            .map(|(key, values)| {
                let points = index
                    .iter()
                    .zip(values)
                    .filter_map(|(t, v)| v.map(|v| (*t, v)))
                    .collect();
                (key, points)
            })
            .collect()
    }
}

/// The asset an outage applies to.
#[derive(Clone, Debug, PartialEq)]
pub enum Asset {
    /// A generation or production unit.
    Production {
        /// Bidding zone EIC code.
        bidding_zone: String,
        /// Registered resource EIC code.
        resource_id: String,
        /// Registered resource name.
        resource_name: String,
        /// Registered resource location.
        location: String,
        /// Production type name.
        plant_type: String,
        /// Nominal power, if published.
        nominal_power: Option<f64>,
    },
    /// A transmission asset between two domains.
    Transmission {
        /// Importing domain EIC code.
        in_domain: String,
        /// Exporting domain EIC code.
        out_domain: String,
    },
}

/// One outage interval of an unavailability document.
#[derive(Clone, Debug, PartialEq)]
pub struct UnavailabilityRecord {
    /// Creation time of the document.
    pub created: Option<Timestamp>,
    /// Document status name (Active, Cancelled, Withdrawn).
    pub doc_status: Option<String>,
    /// Document identifier.
    pub mrid: String,
    /// Document revision number.
    pub revision: u32,
    /// Business type name (e.g. Planned maintenance).
    pub business_type: String,
    /// Unit of the available quantity.
    pub unit: String,
    /// Curve type code of the series.
    pub curve_type: String,
    /// The affected asset.
    pub asset: Asset,
    /// Start of the outage.
    pub start: Timestamp,
    /// End of the outage.
    pub end: Timestamp,
    /// Resolution of the availability period.
    pub resolution: Resolution,
    /// Position of the availability point.
    pub position: u32,
    /// Capacity that stays available during the outage.
    pub available_quantity: f64,
}

impl UnavailabilityRecord {
    /// Returns true when the record overlaps `[start, end)`.
    #[must_use]
    pub fn overlaps<T: TimeZone>(&self, start: &DateTime<T>, end: &DateTime<T>) -> bool {
        self.start < *end && self.end > *start
    }
}

/// Outage records ordered by document creation time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnavailabilityTable {
    records: Vec<UnavailabilityRecord>,
}

impl UnavailabilityTable {
    /// Creates a table, sorting records by creation time.
    #[must_use]
    pub fn new(mut records: Vec<UnavailabilityRecord>) -> Self {
        records.sort_by(|a, b| a.created.cmp(&b.created));
        Self { records }
    }

    /// Returns the records.
    #[must_use]
    pub fn records(&self) -> &[UnavailabilityRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> impl Iterator<Item = &UnavailabilityRecord> {
        self.records.iter()
    }

    /// Expresses creation, start and end times in `tz`.
    #[must_use]
    pub fn tz_convert(mut self, tz: Tz) -> Self {
        for record in &mut self.records {
            record.created = record.created.map(|t| t.with_timezone(&tz));
            record.start = record.start.with_timezone(&tz);
            record.end = record.end.with_timezone(&tz);
        }
        self
    }

    /// Keeps records overlapping the window `[start, end)`.
    #[must_use]
    pub fn overlapping<T: TimeZone>(mut self, start: &DateTime<T>, end: &DateTime<T>) -> Self {
        self.records.retain(|r| r.overlaps(start, end));
        self
    }

    /// Merges several tables, keeping creation order.
    #[must_use]
    pub fn concat(parts: impl IntoIterator<Item = Self>) -> Self {
        Self::new(parts.into_iter().flat_map(|t| t.records).collect())
    }

    /// Converts the table to a DataFrame, one row per record.
    ///
    /// # Errors
    ///
    /// Returns an error if the DataFrame cannot be built.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let records = self.records.as_slice();
        let created: Vec<Option<i64>> = self
            .records
            .iter()
            .map(|r| r.created.map(|t| t.timestamp_millis()))
            .collect();
        let created = Column::new("created_doc_time".into(), created)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let columns = vec![
            created,
            text_column("docstatus", records, |r| r.doc_status.as_deref()),
            text_column("mrid", records, |r| Some(r.mrid.as_str())),
            Column::new(
                "revision".into(),
                self.records.iter().map(|r| r.revision).collect::<Vec<u32>>(),
            ),
            text_column("businesstype", records, |r| Some(r.business_type.as_str())),
            text_column("qty_uom", records, |r| Some(r.unit.as_str())),
            text_column("curvetype", records, |r| Some(r.curve_type.as_str())),
            text_column("resource_name", records, |r| match &r.asset {
                Asset::Production { resource_name, .. } => Some(resource_name.as_str()),
                Asset::Transmission { .. } => None,
            }),
            text_column("plant_type", records, |r| match &r.asset {
                Asset::Production { plant_type, .. } => Some(plant_type.as_str()),
                Asset::Transmission { .. } => None,
            }),
            Column::new(
                "nominal_power".into(),
                self.records
                    .iter()
                    .map(|r| match &r.asset {
                        Asset::Production { nominal_power, .. } => *nominal_power,
                        Asset::Transmission { .. } => None,
                    })
                    .collect::<Vec<Option<f64>>>(),
            ),
            datetime_column("start", self.records.iter().map(|r| &r.start))?,
            datetime_column("end", self.records.iter().map(|r| &r.end))?,
            text_column("resolution", records, |r| Some(r.resolution.code())),
            Column::new(
                "pstn".into(),
                self.records.iter().map(|r| r.position).collect::<Vec<u32>>(),
            ),
            Column::new(
                "avail_qty".into(),
                self.records
                    .iter()
                    .map(|r| r.available_quantity)
                    .collect::<Vec<f64>>(),
            ),
        ];
        Ok(DataFrame::new(columns)?)
    }
}

/// Builds a nullable string column from one field of each record.
fn text_column<'a>(
    name: &str,
    records: &'a [UnavailabilityRecord],
    field: impl Fn(&'a UnavailabilityRecord) -> Option<&'a str>,
) -> Column {
    let values: Vec<Option<&str>> = records.iter().map(field).collect();
    Column::new(name.into(), values)
}

/// Builds a millisecond datetime column from timestamps.
fn datetime_column<'a>(
    name: &str,
    timestamps: impl Iterator<Item = &'a Timestamp>,
) -> Result<Column> {
    let millis: Vec<i64> = timestamps.map(|t| t.timestamp_millis()).collect();
    Ok(Column::new(name.into(), millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::Europe::Amsterdam;

    fn ts(day: u32, hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2023, 10, day, hour, 0, 0)
            .unwrap()
            .with_timezone(&Tz::UTC)
    }

    #[test]
    fn test_from_observations_sorts_stably() {
        let series = TimeSeries::from_observations(
            vec![],
            vec![
                Observation::new(ts(2, 0), 2.0),
                Observation::new(ts(1, 0), 1.0),
                Observation::new(ts(2, 0), 3.0),
            ],
        );
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_concat_keeps_duplicates_and_unions_attributes() {
        let mut up = Tags::default();
        up.set(Attribute::Direction, "A01");
        let a = TimeSeries::from_observations(
            vec![Attribute::Direction],
            vec![Observation::new(ts(1, 0), 1.0).with_tags(up)],
        );
        let b = TimeSeries::from_observations(vec![], vec![Observation::new(ts(1, 0), 5.0)]);
        let combined = TimeSeries::concat([a, b]);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.attributes(), &[Attribute::Direction]);
        assert_eq!(combined.observations()[0].tags.get(Attribute::Direction), Some("A01"));
        assert_eq!(combined.observations()[1].tags.get(Attribute::Direction), None);
    }

    #[test]
    fn test_truncate_is_inclusive() {
        let series = TimeSeries::from_observations(
            vec![],
            (0..5).map(|h| Observation::new(ts(1, h), f64::from(h))).collect(),
        );
        let before = Utc.with_ymd_and_hms(2023, 10, 1, 1, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2023, 10, 1, 3, 0, 0).unwrap();
        assert_eq!(series.truncate(&before, &after).values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tz_convert_keeps_instants() {
        let series = TimeSeries::from_observations(vec![], vec![Observation::new(ts(1, 22), 1.0)]);
        let local = series.tz_convert(Amsterdam);
        let first = &local.observations()[0].timestamp;
        assert_eq!(first.to_rfc3339(), "2023-10-02T00:00:00+02:00");
        assert_eq!(*first, ts(1, 22));
    }

    #[test]
    fn test_frame_outer_join_and_duplicates() {
        let frame = Frame::from_columns(
            [
                (ColumnKey::single("a"), vec![(ts(1, 0), 1.0), (ts(1, 1), 2.0)]),
                (ColumnKey::single("b"), vec![(ts(1, 1), 10.0), (ts(1, 1), 30.0)]),
            ],
            Duplicates::Mean,
        );
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.column(&"b".into()).unwrap(), &[None, Some(20.0)]);
        assert_eq!(frame.get(&ts(1, 0), &"a".into()), Some(1.0));
    }

    #[test]
    fn test_frame_row_sums_and_retain() {
        let frame = Frame::from_columns(
            [
                (ColumnKey::single("a"), vec![(ts(1, 0), 1.0), (ts(1, 1), 2.0)]),
                (ColumnKey::single("zero"), vec![(ts(1, 0), 0.0)]),
                (ColumnKey::single("b"), vec![(ts(1, 1), 3.0)]),
            ],
            Duplicates::First,
        )
        .retain_columns(|_, values| values.iter().any(|v| v.is_some_and(|v| v != 0.0)))
        .with_row_sums(ColumnKey::single("sum"));
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.column(&"sum".into()).unwrap(), &[Some(1.0), Some(5.0)]);
    }

    #[test]
    fn test_column_key_levels() {
        let key = ColumnKey::new(["Plant A", "Nuclear", "Actual Aggregated"]);
        assert_eq!(key.to_string(), "Plant A / Nuclear / Actual Aggregated");
        assert_eq!(key.without_last(), ColumnKey::new(["Plant A", "Nuclear"]));
        assert_eq!(key.last(), Some("Actual Aggregated"));
    }

    #[test]
    fn test_series_to_dataframe() {
        let mut tags = Tags::default();
        tags.set(Attribute::ContractType, "A01");
        let series = TimeSeries::from_observations(
            vec![Attribute::ContractType],
            vec![Observation::new(ts(1, 0), 1.5).with_tags(tags)],
        );
        let df = series.to_dataframe().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_unavailability_overlap_window() {
        let record = |start: Timestamp, end: Timestamp| UnavailabilityRecord {
            created: None,
            doc_status: None,
            mrid: "doc".into(),
            revision: 1,
            business_type: "Planned maintenance".into(),
            unit: "MAW".into(),
            curve_type: "A03".into(),
            asset: Asset::Transmission {
                in_domain: "a".into(),
                out_domain: "b".into(),
            },
            start,
            end,
            resolution: Resolution::Minute,
            position: 1,
            available_quantity: 0.0,
        };
        let table = UnavailabilityTable::new(vec![
            record(ts(1, 0), ts(3, 0)),
            record(ts(1, 0), ts(1, 12)),
        ]);
        let kept = table.overlapping(&ts(2, 0), &ts(4, 0));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.records()[0].end, ts(3, 0));
    }
}
