//! Probe response: the contract between the negotiation logic and any transport.

use crate::core::protocol::constants::headers;
use bytes::Bytes;
use std::collections::BTreeMap;

/// HTTP response as seen by the Memento client.
///
/// Both the reqwest transport and test doubles produce this. `history` holds
/// the responses of earlier hops (oldest first) when redirects were followed.
#[derive(Clone, Debug)]
pub struct ProbeResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    /// Effective URL of this response.
    pub url: String,
    pub history: Vec<ProbeResponse>,
    pub body: Bytes,
}

impl ProbeResponse {
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        ProbeResponse {
            status,
            headers: BTreeMap::new(),
            url: url.into(),
            history: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_history(mut self, history: Vec<ProbeResponse>) -> Self {
        self.history = history;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    pub fn link(&self) -> Option<&str> {
        self.header(headers::LINK)
    }

    pub fn location(&self) -> Option<&str> {
        self.header(headers::LOCATION)
    }

    pub fn memento_datetime(&self) -> Option<&str> {
        self.header(headers::MEMENTO_DATETIME)
    }

    /// `true` if `Vary` lists `accept-datetime` (case-insensitive).
    pub fn varies_on_accept_datetime(&self) -> bool {
        self.header(headers::VARY)
            .map(|v| v.to_ascii_lowercase().contains("accept-datetime"))
            .unwrap_or(false)
    }

    #[inline]
    pub fn is_redirect(&self) -> bool {
        299 < self.status && self.status < 400
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Every hop of the chain, oldest first, ending with this response.
    pub fn chain(&self) -> impl Iterator<Item = &ProbeResponse> {
        self.history.iter().chain(std::iter::once(self))
    }

    /// The first response of the chain (the one for the requested URL).
    pub fn first_hop(&self) -> &ProbeResponse {
        self.history.first().unwrap_or(self)
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

impl Default for ProbeResponse {
    fn default() -> Self {
        ProbeResponse::new(200, "")
    }
}
