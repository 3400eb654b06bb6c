//! Document families built on the generic assembler.
//!
//! - [`prices`] / [`net_positions`] / [`loads`] - Single-value series
//! - [`generation`] - Production and consumption per production type and plant
//! - [`crossborder_flows`] - Positional flow series
//! - [`aggregated_bids`] - Offered and activated balancing bids
//! - [`imbalance_prices_zip`] / [`imbalance_volumes_zip`] - Imbalance archives
//! - [`unavailabilities`] - Outage records

mod bids;
mod flows;
mod generation;
mod generic;
mod imbalance;
mod unavailability;

pub use bids::aggregated_bids;
pub use flows::crossborder_flows;
pub use generation::{fix_plant_name, generation};
pub use generic::{LoadKind, loads, net_positions, prices};
pub use imbalance::{imbalance_prices, imbalance_prices_zip, imbalance_volumes, imbalance_volumes_zip};
pub use unavailability::{UnavailabilityKind, unavailabilities, unavailability_document};
