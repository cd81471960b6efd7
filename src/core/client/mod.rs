//! Memento client implementation.
//!
//! This module finds archived versions of web resources by talking to
//! TimeGates and TimeMaps (RFC 7089):
//!
//! - **Discover native TimeGates and TimeMaps** advertised by a resource
//! - **Negotiate** with a TimeGate over `Accept-Datetime`
//! - **Classify** responses as mementos or TimeGates
//! - **Collect TimeMaps** across pages and indexes
//! - **Read the archive registry**
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch          - MementoClient and the public entry points
//! ├── discovery      - native TimeGate/TimeMap discovery loop
//! ├── classify       - is_memento / is_timegate
//! ├── timemap        - paged TimeMap aggregation
//! ├── registry       - archive registry XML
//! ├── native_network - reqwest transport with recorded redirects
//! ├── config         - Client configuration
//! └── utils          - Utility functions
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MementoClient`] | Negotiation client |
//! | [`ClientConfig`] | Client configuration options |
//! | [`NativeNetwork`] | reqwest-backed [`MementoNetwork`](crate::MementoNetwork) |
//! | [`TimeMapAggregator`] | TimeMap page walker |
//!
//! # Examples
//!
//! ```
//! use memento_rs::{ClientConfig, MementoClient};
//!
//! let config = ClientConfig {
//!     timegate_uri: "http://web.archive.org/web/".to_string(),
//!     check_native_timegate: false,
//!     ..Default::default()
//! };
//! let client = MementoClient::with_config(config).unwrap();
//! assert!(!client.config().check_native_timegate);
//! ```

pub mod classify;
mod config;
pub mod discovery;
mod fetch;
mod native_network;
mod registry;
mod timemap;
mod utils;

pub use classify::{is_memento, is_timegate};
pub use config::ClientConfig;
pub use discovery::{DiscoveryContext, DiscoveryOutcome, HopDecision};
pub use fetch::MementoClient;
pub use native_network::NativeNetwork;
pub use registry::{parse_archive_registry, ArchiveInfo};
pub use timemap::TimeMapAggregator;
pub use utils::*;
