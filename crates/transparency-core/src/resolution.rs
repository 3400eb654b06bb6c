//! Resolution codes and their calendar step sizes.
//!
//! This module defines [`Resolution`], the closed set of period resolutions a
//! document may declare, and [`Step`], the calendar arithmetic behind each of
//! them. An unknown code is always an error; a step size is never guessed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransparencyError};

/// Resolution of a document period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// `PT1M`, one minute.
    Minute,
    /// `PT15M`, fifteen minutes.
    QuarterHour,
    /// `PT30M`, thirty minutes.
    HalfHour,
    /// `PT60M`, one hour.
    Hour,
    /// `P1D`, one day.
    Day,
    /// `P7D`, seven days.
    Week,
    /// `P1M`, one calendar month.
    Month,
    /// `P1Y`, one calendar year.
    Year,
    /// `PT4S`, used by heartbeat-like documents. Its step is four days and
    /// four hours, which is what the platform's data has always been read as.
    FourSecond,
}

/// Every supported resolution, in declaration order.
pub const RESOLUTIONS: &[Resolution] = &[
    Resolution::Minute,
    Resolution::QuarterHour,
    Resolution::HalfHour,
    Resolution::Hour,
    Resolution::Day,
    Resolution::Week,
    Resolution::Month,
    Resolution::Year,
    Resolution::FourSecond,
];

impl Resolution {
    /// Looks up a document resolution code such as `PT60M`.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::UnsupportedResolution`] for any code
    /// outside the supported set.
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "PT60M" => Ok(Self::Hour),
            "P1Y" => Ok(Self::Year),
            "PT15M" => Ok(Self::QuarterHour),
            "PT30M" => Ok(Self::HalfHour),
            "P1D" => Ok(Self::Day),
            "P7D" => Ok(Self::Week),
            "P1M" => Ok(Self::Month),
            "PT1M" => Ok(Self::Minute),
            "PT4S" => Ok(Self::FourSecond),
            other => Err(TransparencyError::UnsupportedResolution(other.to_string())),
        }
    }

    /// Returns the document code for this resolution.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Minute => "PT1M",
            Self::QuarterHour => "PT15M",
            Self::HalfHour => "PT30M",
            Self::Hour => "PT60M",
            Self::Day => "P1D",
            Self::Week => "P7D",
            Self::Month => "P1M",
            Self::Year => "P1Y",
            Self::FourSecond => "PT4S",
        }
    }

    /// Returns the short frequency label used for grouping and display,
    /// e.g. `60min` or `1MS`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Minute => "1min",
            Self::QuarterHour => "15min",
            Self::HalfHour => "30min",
            Self::Hour => "60min",
            Self::Day => "1D",
            Self::Week => "7D",
            Self::Month => "1MS",
            Self::Year => "12MS",
            Self::FourSecond => "4D 4h",
        }
    }

    /// Returns the calendar step between consecutive positions.
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Self::Minute => Step::Fixed(TimeDelta::minutes(1)),
            Self::QuarterHour => Step::Fixed(TimeDelta::minutes(15)),
            Self::HalfHour => Step::Fixed(TimeDelta::minutes(30)),
            Self::Hour => Step::Fixed(TimeDelta::minutes(60)),
            Self::Day => Step::Fixed(TimeDelta::days(1)),
            Self::Week => Step::Fixed(TimeDelta::days(7)),
            Self::Month => Step::Months(1),
            Self::Year => Step::Months(12),
            Self::FourSecond => Step::Fixed(TimeDelta::days(4) + TimeDelta::hours(4)),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = TransparencyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

/// Resolves a resolution code straight to its step.
///
/// # Errors
///
/// Returns [`TransparencyError::UnsupportedResolution`] for unknown codes.
pub fn resolve(code: &str) -> Result<Step> {
    Resolution::from_code(code).map(|r| r.step())
}

/// Calendar step between consecutive positions of a period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A fixed absolute duration.
    Fixed(TimeDelta),
    /// A number of calendar months, applied to wall-clock time.
    Months(u32),
}

impl Step {
    /// Returns `t` advanced by `n` steps, or `None` on overflow or when the
    /// resulting wall-clock time does not exist in `t`'s zone.
    #[must_use]
    pub fn advance<Tz: TimeZone>(&self, t: &DateTime<Tz>, n: u32) -> Option<DateTime<Tz>> {
        match *self {
            Self::Fixed(delta) => {
                let n = i32::try_from(n).ok()?;
                t.clone().checked_add_signed(delta.checked_mul(n)?)
            }
            Self::Months(months) => t.clone().checked_add_months(Months::new(months.checked_mul(n)?)),
        }
    }

    /// Returns true when every step spans at least one day.
    #[must_use]
    pub fn is_at_least_one_day(&self) -> bool {
        match self {
            Self::Fixed(delta) => *delta >= TimeDelta::days(1),
            Self::Months(_) => true,
        }
    }

    /// Returns true for the seven-day week step.
    #[must_use]
    pub fn is_week(&self) -> bool {
        *self == Self::Fixed(TimeDelta::days(7))
    }
}
