#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/transparency/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ENTSO-E transparency-platform timeseries.
//!
//! # Features
//!
//! - `client` - Async HTTP client and query methods
//!
//! # Example
//!
//! ```rust,ignore
//! use chrono::TimeZone;
//! use chrono_tz::Europe::Berlin;
//! use transparency::TransparencyClient;
//!
//! #[tokio::main]
//! async fn main() -> transparency::Result<()> {
//!     let client = TransparencyClient::from_env()?;
//!     let start = Berlin.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//!     let end = Berlin.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
//!
//!     let flows = client.physical_crossborder_allborders("DE_LU", start, end, true).await?;
//!     println!("{:?}", flows.to_dataframe()?);
//!
//!     Ok(())
//! }
//! ```

// Core types
pub use transparency_core::*;

// Parsers
pub use transparency_parse::{
    Assembled, CurveType, GenerationOptions, LoadKind, MergeMode, ParseOptions,
    UnavailabilityKind, aggregated_bids, build_index, crossborder_flows, generation,
    imbalance_prices, imbalance_prices_zip, imbalance_volumes, imbalance_volumes_zip, loads,
    net_positions, parse_document, parse_timeseries, prices, read_archive, select,
    unavailabilities, unavailability_document,
};

// Client
#[cfg(feature = "client")]
pub use transparency_client::{HttpTransport, TransparencyClient};
