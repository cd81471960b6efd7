//! Predicates that decide what a probed URI is.
//!
//! | Predicate | Holds when |
//! |-----------|------------|
//! | [`is_memento`] | `Memento-Datetime` decodes and the `Link` header has `rel="original"` |
//! | [`is_timegate`] | the response negotiated on `Accept-Datetime` and points at a memento |
//!
//! Both propagate a malformed `Link` header as a parse error.

use crate::core::error::{MementoError, NegotiationContext, Result};
use crate::core::protocol::{
    constants::{headers, rels},
    format_http_datetime, parse_http_datetime, parse_optional_link_header,
};
use crate::core::types::ProbeResponse;
use chrono::{DateTime, Utc};

/// Whether `response` (fetched from `uri`) is a memento.
pub fn is_memento(uri: &str, response: &ProbeResponse) -> Result<bool> {
    let Some(raw_dt) = response.memento_datetime() else {
        return Ok(false);
    };
    if parse_http_datetime(raw_dt).is_err() {
        tracing::debug!(uri, memento_datetime = raw_dt, "undecodable Memento-Datetime");
        return Ok(false);
    }
    let links = parse_optional_link_header(response.link())?;
    Ok(links.iter().any(|e| e.has_rel(rels::ORIGINAL)))
}

/// Whether `response` (fetched from `uri` with `accept_datetime`) came from a
/// TimeGate.
///
/// Only 200 and 302 are acceptable TimeGate statuses; any other status is a
/// [`MementoError::Negotiation`] error. A 302 must carry `Location` and no
/// `Memento-Datetime`. A 200 must carry `Memento-Datetime`; the memento then
/// lives at `Content-Location` or at the response URL.
pub fn is_timegate(
    uri: &str,
    accept_datetime: Option<&DateTime<Utc>>,
    response: &ProbeResponse,
) -> Result<bool> {
    if response.status != 200 && response.status != 302 {
        return Err(MementoError::negotiation(
            NegotiationContext::new("unexpected TimeGate status")
                .with_status(response.status)
                .with_request(uri)
                .with_accept_datetime(accept_datetime.map(format_http_datetime)),
        ));
    }

    if !response.varies_on_accept_datetime() {
        return Ok(false);
    }

    let links = parse_optional_link_header(response.link())?;
    if !links.iter().any(|e| e.has_rel(rels::ORIGINAL)) {
        return Ok(false);
    }

    Ok(memento_location(response).is_some())
}

/// Where the memento selected by a TimeGate response lives, if anywhere.
pub(crate) fn memento_location(response: &ProbeResponse) -> Option<&str> {
    match response.status {
        302 if !response.has_header(headers::MEMENTO_DATETIME) => response.location(),
        200 if response.has_header(headers::MEMENTO_DATETIME) => Some(
            response
                .header(headers::CONTENT_LOCATION)
                .unwrap_or(response.url.as_str()),
        ),
        _ => None,
    }
}
