//! memento_rs: Memento (RFC 7089) client in Rust.
//!
//! Finds archived snapshots ("mementos") of a web resource near a target
//! datetime:
//!
//! - **protocol**: `Link` header parser, relation lookup, datetime codec.
//! - **client**: TimeGate discovery and negotiation, TimeMap aggregation,
//!   archive registry.

pub mod core;

// Top-level re-exports for common usage
pub use crate::core::error::{MementoError, NegotiationContext, Result};
pub use crate::core::protocol;
pub use crate::core::protocol::{
    convert_to_datetime, convert_to_http_datetime, find_by_rel, format_http_datetime,
    parse_http_datetime, parse_link_header, uri_for_rel,
};
pub use crate::core::traits::MementoNetwork;
pub use crate::core::types;
pub use crate::core::types::{
    LinkEntry, LinkHeaderMap, MementoRecord, Mementos, NegotiationResult, ProbeRequest,
    ProbeResponse, TimeMapResult,
};

#[cfg(feature = "client")]
pub use crate::core::client;
#[cfg(feature = "client")]
pub use crate::core::client::{ArchiveInfo, ClientConfig, MementoClient};
