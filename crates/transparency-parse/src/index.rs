//! Datetime index construction for document periods.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use chrono_tz::{OffsetComponents, Tz};
use tracing::debug;
use transparency_core::{Resolution, Result, Step, TransparencyError};

use crate::xml::Element;

/// Builds the half-open index `[start, end)` at `resolution`.
///
/// Fixed steps advance in absolute time; calendar steps (months, years)
/// advance on the wall clock of `tz`, or of UTC without one. Two corrections
/// are applied when a period spans a daylight-saving change:
///
/// - with `tz`, a weekly index that crosses a fall-back transition (its last
///   instant carries a smaller DST offset than its first) loses its final
///   element;
/// - without `tz`, an index of two or more daily or coarser steps loses its
///   final element when `end` is exactly one wall hour later than `start`.
///
/// # Errors
///
/// Returns an error if the calendar arithmetic overflows.
pub fn build_index(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    resolution: Resolution,
    tz: Option<Tz>,
) -> Result<Vec<DateTime<Utc>>> {
    let step = resolution.step();
    match tz {
        Some(tz) => {
            let mut local = steps(&start.with_timezone(&tz), &end, step, resolution)?;
            let falls_back = match (local.first(), local.last()) {
                (Some(first), Some(last)) => {
                    first.offset().dst_offset() > last.offset().dst_offset()
                }
                _ => false,
            };
            if falls_back && step.is_week() {
                debug!(%start, %end, "weekly period repeats a local hour, dropping last instant");
                local.pop();
            }
            Ok(local.into_iter().map(|t| t.with_timezone(&Utc)).collect())
        }
        None => {
            let mut index = steps(&start, &end, step, resolution)?;
            if index.len() > 1 && step.is_at_least_one_day() && end.hour() == start.hour() + 1 {
                debug!(%start, %end, %resolution, "period gained an hour, dropping last instant");
                index.pop();
            }
            Ok(index)
        }
    }
}

/// Builds the index of a `period` element from its `start`, last `end` and
/// `resolution` children.
///
/// # Errors
///
/// Returns an error if any of the three is missing or malformed.
pub fn period_index(period: &Element, tz: Option<Tz>) -> Result<Vec<DateTime<Utc>>> {
    let start = period.require_timestamp("start")?;
    let end = period
        .find_all("end")
        .last()
        .map(|e| crate::xml::parse_timestamp(&e.text()))
        .ok_or_else(|| TransparencyError::missing("end", period.name()))??;
    let resolution = Resolution::from_code(&period.require_text("resolution")?)?;
    build_index(start, end, resolution, tz)
}

fn steps<T: TimeZone>(
    start: &DateTime<T>,
    end: &DateTime<Utc>,
    step: Step,
    resolution: Resolution,
) -> Result<Vec<DateTime<T>>> {
    let mut out = Vec::new();
    for n in 0u32.. {
        let t = step.advance(start, n).ok_or_else(|| {
            TransparencyError::Schema(format!(
                "cannot advance {} by {n} steps of {resolution}",
                start.to_utc()
            ))
        })?;
        if t >= *end {
            break;
        }
        out.push(t);
    }
    Ok(out)
}
