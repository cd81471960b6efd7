//! Core data types for Memento negotiation.
//!
//! # Type Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ProbeRequest                         │
//! │   (Client → server: method, Accept-Datetime, redirects)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ProbeResponse                        │
//! │  (status, headers, effective URL, redirect history, body)   │
//! │  └── Link header ──▶ LinkHeaderMap ──▶ LinkEntry            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            NegotiationResult / TimeMapResult                │
//! │     (closest, prev, next, first, last / memento list)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LinkEntry`] | One link target with its `rel` set and parameters |
//! | [`LinkHeaderMap`] | All entries of one `Link` header, keyed by URI |
//! | [`MementoRecord`] | A memento URI with its datetime and status |
//! | [`NegotiationResult`] | Outcome of TimeGate negotiation |
//! | [`TimeMapResult`] | Every memento listed by a TimeMap and its pages |
//! | [`ProbeRequest`] / [`ProbeResponse`] | Transport contract |

mod link;
mod memento;
mod request;
mod response;

pub use bytes::Bytes;
pub use link::{LinkEntry, LinkHeaderMap};
pub use memento::{
    ClosestMemento, MementoRecord, MementoRole, Mementos, NegotiationResult, TimeMapFormat,
    TimeMapResult,
};
pub use request::{ProbeMethod, ProbeRequest};
pub use response::ProbeResponse;
