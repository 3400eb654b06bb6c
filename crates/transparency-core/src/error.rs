//! Error types for parsing and fetching transparency-platform documents.
//!
//! This module defines [`TransparencyError`], which covers every failure the
//! workspace surfaces: schema problems in a document, unsupported resolution
//! codes, malformed point values, empty responses and transport failures.

use thiserror::Error;

/// Errors that can occur while fetching or parsing timeseries documents.
#[derive(Error, Debug)]
pub enum TransparencyError {
    /// A structurally required element is absent from the document.
    #[error("Missing element <{element}> in {context}")]
    MissingElement {
        /// Lowercased local name of the missing element.
        element: String,
        /// The element that was searched.
        context: String,
    },

    /// The document does not have the expected structure.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// A timestamp could not be parsed.
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// The resolution code is not in the supported set.
    #[error("Unsupported resolution: {0}")]
    UnsupportedResolution(String),

    /// A point value could not be converted to a number.
    #[error("Malformed point value: {0:?}")]
    MalformedPoint(String),

    /// The response was valid but contained no usable data.
    #[error("No matching data found: {0}")]
    NoMatchingData(String),

    /// A ZIP archive could not be read.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Network-related errors (connection failures, timeouts, HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded.
    #[error("Rate limited: retry after {retry_after:?}")]
    RateLimited {
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The combination of query parameters is rejected by the platform.
    #[error("Invalid business parameter: {0}")]
    InvalidBusinessParameter(String),

    /// The production type is not valid for the requested area.
    #[error("Invalid production type: {0}")]
    InvalidPsrType(String),

    /// The request asks for more documents than one call may return.
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The area code or name is not known.
    #[error("Unknown area: {0}")]
    UnknownArea(String),

    /// Converting a table to a DataFrame failed.
    #[error("DataFrame error: {0}")]
    DataFrame(String),
}

impl TransparencyError {
    /// Shorthand for a [`TransparencyError::MissingElement`].
    pub fn missing(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Returns true for a valid-but-empty response.
    #[must_use]
    pub const fn is_no_matching_data(&self) -> bool {
        matches!(self, Self::NoMatchingData(_))
    }
}

impl From<polars::prelude::PolarsError> for TransparencyError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        Self::DataFrame(e.to_string())
    }
}

/// Result type alias using [`TransparencyError`].
pub type Result<T> = std::result::Result<T, TransparencyError>;
