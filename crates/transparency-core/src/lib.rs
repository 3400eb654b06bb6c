#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/transparency/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for transparency-platform timeseries.
//!
//! - [`Resolution`](resolution::Resolution) - Supported period resolutions
//! - [`TimeSeries`](types::TimeSeries) - Ordered, timezone-aware observations
//! - [`Frame`](types::Frame) - Keyed wide tables
//! - [`UnavailabilityTable`](types::UnavailabilityTable) - Outage records
//! - [`Transport`](transport::Transport) - Raw document source

/// Error types for parsing and fetching.
pub mod error;
/// Areas and code tables.
pub mod mappings;
/// Resolution codes and calendar steps.
pub mod resolution;
/// Transport trait and request parameters.
pub mod transport;
/// Output tables.
pub mod types;

// Re-export commonly used items at crate root
pub use error::{Result, TransparencyError};
pub use mappings::{Area, lookup_area, neighbours};
pub use resolution::{RESOLUTIONS, Resolution, Step, resolve};
pub use transport::{Params, Response, Transport};
pub use types::{
    Asset, Attribute, ColumnKey, Duplicates, Frame, Observation, ResolutionMap, Tags, TimeSeries,
    Timestamp, UnavailabilityRecord, UnavailabilityTable,
};
