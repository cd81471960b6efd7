//! Core Memento protocol implementation.
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── client    - MementoClient, discovery, classification, TimeMaps
//! ├── error     - MementoError and the Result alias
//! ├── protocol  - Link header parser, rel index, datetime codec
//! ├── traits    - MementoNetwork transport seam
//! └── types     - Link entries, probe request/response, results
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod error;
pub mod protocol;
pub mod traits;
pub mod types;

#[cfg(feature = "client")]
pub use client::{ClientConfig, MementoClient};
pub use error::{MementoError, NegotiationContext, Result};
pub use protocol::{
    convert_to_datetime, convert_to_http_datetime, find_by_rel, format_http_datetime,
    parse_http_datetime, parse_link_header, uri_for_rel,
};
pub use traits::MementoNetwork;
pub use types::*;
