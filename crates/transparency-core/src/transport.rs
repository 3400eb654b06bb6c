//! Transport abstraction for fetching raw documents.
//!
//! A [`Transport`] turns query parameters into a raw [`Response`]. The HTTP
//! implementation lives in the client crate; tests plug in canned responses.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::error::{Result, TransparencyError};

/// Ordered key-value query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets `key` to `value`, replacing an earlier value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value` in place, replacing an earlier value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Adds `periodStart` and `periodEnd` for the window.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound cannot be rounded to the hour.
    pub fn with_period(self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<Self> {
        Ok(self
            .with("periodStart", format_period(start)?)
            .with("periodEnd", format_period(end)?))
    }

    /// Returns the value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the parameters as key-value pairs.
    #[must_use]
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Formats a window bound as `YYYYMMDDHH00`, rounded to the nearest hour.
///
/// # Errors
///
/// Returns [`TransparencyError::InvalidParameter`] when rounding overflows.
pub fn format_period(t: &DateTime<Utc>) -> Result<String> {
    let rounded = t
        .duration_round(TimeDelta::hours(1))
        .map_err(|e| TransparencyError::InvalidParameter(format!("{t}: {e}")))?;
    Ok(rounded.format("%Y%m%d%H00").to_string())
}

/// A raw response body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// The body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates an XML response.
    #[must_use]
    pub fn xml(body: impl Into<String>) -> Self {
        Self {
            content_type: Some("text/xml".to_string()),
            body: body.into().into_bytes(),
        }
    }

    /// Creates a ZIP response.
    #[must_use]
    pub fn zip(body: Vec<u8>) -> Self {
        Self {
            content_type: Some("application/zip".to_string()),
            body,
        }
    }

    /// Returns true if the body is a ZIP archive.
    #[must_use]
    pub fn is_zip(&self) -> bool {
        self.body.starts_with(b"PK\x03\x04")
            || self
                .content_type
                .as_deref()
                .is_some_and(|c| c.contains("zip"))
    }

    /// Returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::Xml`] if the body is not UTF-8.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|e| TransparencyError::Xml(e.to_string()))
    }
}

/// Source of raw documents.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Returns the name of this transport.
    fn name(&self) -> &str;

    /// Performs one request.
    async fn get(&self, params: &Params) -> Result<Response>;
}
