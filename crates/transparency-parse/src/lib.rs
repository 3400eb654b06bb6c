#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/transparency/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Document parsers.
//!
//! - [`parse_xml`](xml::parse_xml) - Element tree over XML text
//! - [`build_index`](index::build_index) - Period datetime indexes
//! - [`Period`](points::Period) - Point folding and forward filling
//! - [`parse_document`](assemble::parse_document) - Series per resolution
//! - [`read_archive`](archive::read_archive) - ZIP bundles of documents
//! - [`shapes`] - Document families

/// ZIP archive reading.
pub mod archive;
/// Series assembly.
pub mod assemble;
/// Datetime index construction.
pub mod index;
/// Parser options.
pub mod options;
/// Point folding.
pub mod points;
/// Document families.
pub mod shapes;
/// XML element tree.
pub mod xml;

// Re-export commonly used items at crate root
pub use archive::{parse_archive, read_archive};
pub use assemble::{Assembled, parse_document, parse_timeseries, select, series_tags};
pub use index::{build_index, period_index};
pub use options::{GenerationOptions, MergeMode, ParseOptions};
pub use points::{CurveType, Period, parse_position, parse_value};
pub use shapes::{
    LoadKind, UnavailabilityKind, aggregated_bids, crossborder_flows, fix_plant_name, generation,
    imbalance_prices, imbalance_prices_zip, imbalance_volumes, imbalance_volumes_zip, loads,
    net_positions, prices, unavailabilities, unavailability_document,
};
pub use xml::{Descendants, Element, parse_timestamp, parse_xml};
