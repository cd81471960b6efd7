//! Protocol-level utilities for Memento: headers, dates and relation lookup.

pub mod constants;
pub mod datetime;
pub mod link;
pub mod rel;

pub use constants::*;
pub use datetime::*;
pub use link::{parse_link_header, parse_optional_link_header, LinkParseState};
pub use rel::{find_by_rel, uri_for_rel};
