//! Point extraction and period folding.
//!
//! A `period` element holds `point` children addressed by 1-based position.
//! [`Period::fold`] turns them into timestamped values, forward filling the
//! gaps of interval curves.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use transparency_core::{Resolution, Result, TransparencyError};

use crate::xml::Element;

/// How the points of a series are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveType {
    /// Every position carries its own value (`A01` and anything unknown).
    #[default]
    Sequential,
    /// Positions may be missing; a value holds until the next present
    /// position and the last one holds to the end of the period (`A03`).
    IntervalRepeat,
}

impl CurveType {
    /// Maps a curve type code to its layout.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "A03" => Self::IntervalRepeat,
            _ => Self::Sequential,
        }
    }
}

/// Converts a point value to a number, ignoring thousands separators.
///
/// # Errors
///
/// Returns [`TransparencyError::MalformedPoint`] for non-numeric text.
pub fn parse_value(text: &str) -> Result<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| TransparencyError::MalformedPoint(text.to_string()))
}

/// Parses a 1-based point position.
///
/// # Errors
///
/// Returns [`TransparencyError::Schema`] for anything but a positive integer.
pub fn parse_position(text: &str) -> Result<u32> {
    match text.trim().parse::<u32>() {
        Ok(position) if position >= 1 => Ok(position),
        _ => Err(TransparencyError::Schema(format!("invalid point position {text:?}"))),
    }
}

/// A parsed `period` element.
#[derive(Clone, Debug, PartialEq)]
pub struct Period {
    /// Start of the period.
    pub start: DateTime<Utc>,
    /// End of the period (exclusive).
    pub end: DateTime<Utc>,
    /// Resolution of the period.
    pub resolution: Resolution,
    /// `(position, raw value)` pairs in document order.
    pub points: Vec<(u32, String)>,
}

impl Period {
    /// Reads a period, taking each point's value from `label`, or from
    /// `fallback` when `label` is absent.
    ///
    /// # Errors
    ///
    /// Returns a schema error when `start`, `end`, `resolution`, a point's
    /// `position` or its value is missing, and
    /// [`TransparencyError::UnsupportedResolution`] for unknown resolutions.
    pub fn from_element(period: &Element, label: &str, fallback: Option<&str>) -> Result<Self> {
        let start = period.require_timestamp("start")?;
        let end = period.require_timestamp("end")?;
        let resolution = Resolution::from_code(&period.require_text("resolution")?)?;

        let points = period
            .find_all("point")
            .into_iter()
            .map(|point| {
                let position = parse_position(&point.require_text("position")?)?;
                let value = point
                    .find(label)
                    .or_else(|| fallback.and_then(|f| point.find(f)))
                    .ok_or_else(|| TransparencyError::missing(label, point.name()))?;
                Ok((position, value.text().trim().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            start,
            end,
            resolution,
            points,
        })
    }

    /// Returns the start of the interval at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar arithmetic overflows.
    pub fn timestamp(&self, position: u32) -> Result<DateTime<Utc>> {
        self.resolution
            .step()
            .advance(&self.start, position.saturating_sub(1))
            .ok_or_else(|| {
                TransparencyError::Schema(format!(
                    "position {position} overflows period starting {}",
                    self.start
                ))
            })
    }

    /// Folds the points into sorted `(timestamp, value)` pairs.
    ///
    /// A later point at the same position replaces an earlier one. A period
    /// whose only point is the literal `0` yields `None`. Interval curves are
    /// reindexed onto every step with `t + step <= end` and forward filled.
    /// Steps before the first present position are omitted, so such a
    /// series is shorter than the period and starts at its first point.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::MalformedPoint`] for non-numeric values.
    pub fn fold(&self, curve: CurveType) -> Result<Option<Vec<(DateTime<Utc>, f64)>>> {
        let mut raw: BTreeMap<DateTime<Utc>, &str> = BTreeMap::new();
        for (position, value) in &self.points {
            let t = self.timestamp(*position)?;
            if t >= self.end {
                warn!(position, start = %self.start, end = %self.end, "point lies past the period end");
            }
            raw.insert(t, value.as_str());
        }

        if raw.len() == 1 && raw.values().all(|v| *v == "0") {
            debug!(start = %self.start, "discarding period holding a single zero point");
            return Ok(None);
        }

        let values = raw
            .into_iter()
            .map(|(t, v)| Ok((t, parse_value(v)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        let folded = match curve {
            CurveType::Sequential => values.into_iter().collect(),
            CurveType::IntervalRepeat => self.forward_fill(&values)?,
        };
        Ok(Some(folded))
    }

    fn forward_fill(
        &self,
        values: &BTreeMap<DateTime<Utc>, f64>,
    ) -> Result<Vec<(DateTime<Utc>, f64)>> {
        let step = self.resolution.step();
        let mut out = Vec::new();
        let mut last = None;
        for n in 0u32.. {
            let (Some(t), Some(next)) = (step.advance(&self.start, n), step.advance(&self.start, n + 1))
            else {
                return Err(TransparencyError::Schema(format!(
                    "period starting {} overflows",
                    self.start
                )));
            };
            if next > self.end {
                break;
            }
            if let Some(value) = values.get(&t) {
                last = Some(*value);
            }
            if let Some(value) = last {
                out.push((t, value));
            }
        }
        Ok(out)
    }
}
