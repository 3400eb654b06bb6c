#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/transparency/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Query client.
//!
//! - [`HttpTransport`] - `reqwest` transport with acknowledgement handling
//! - [`TransparencyClient`] - Query methods per document family

/// Query methods.
pub mod client;
/// HTTP transport.
pub mod http;

// Re-export commonly used items at crate root
pub use client::TransparencyClient;
pub use http::{API_KEY_ENV, DEFAULT_BASE_URL, HttpTransport};
