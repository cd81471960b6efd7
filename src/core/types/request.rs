//! Probe request parameters.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP method of a probe. Memento negotiation only ever reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProbeMethod {
    #[default]
    Head,
    Get,
}

impl ProbeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::Get => "GET",
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request against an original resource, TimeGate, memento or TimeMap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeRequest {
    pub method: ProbeMethod,
    /// Sent as `Accept-Datetime` when present.
    pub accept_datetime: Option<DateTime<Utc>>,
    pub follow_redirects: bool,
    /// Upper bound on hops when `follow_redirects` is set.
    pub max_redirects: u32,
    pub extra_headers: BTreeMap<String, String>,
}

impl Default for ProbeRequest {
    fn default() -> Self {
        Self {
            method: ProbeMethod::Head,
            accept_datetime: None,
            follow_redirects: false,
            max_redirects: 50,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl ProbeRequest {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head() -> Self {
        Self::default()
    }

    pub fn get() -> Self {
        Self {
            method: ProbeMethod::Get,
            ..Default::default()
        }
    }

    pub fn with_accept_datetime(mut self, datetime: Option<DateTime<Utc>>) -> Self {
        self.accept_datetime = datetime;
        self
    }

    pub fn follow_redirects(mut self, max_redirects: u32) -> Self {
        self.follow_redirects = true;
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_is_head_without_redirects() {
        let req = ProbeRequest::new();
        assert_eq!(req.method, ProbeMethod::Head);
        assert!(!req.follow_redirects);
        assert!(req.accept_datetime.is_none());
    }

    #[test]
    fn test_builder() {
        let dt = Utc.with_ymd_and_hms(2010, 4, 1, 12, 0, 0).unwrap();
        let req = ProbeRequest::get()
            .with_accept_datetime(Some(dt))
            .follow_redirects(7)
            .with_header("Accept", "application/json");
        assert_eq!(req.method.to_string(), "GET");
        assert_eq!(req.accept_datetime, Some(dt));
        assert!(req.follow_redirects);
        assert_eq!(req.max_redirects, 7);
        assert_eq!(req.extra_headers.get("Accept").unwrap(), "application/json");
    }
}
