//! Negotiation and TimeMap results.

use crate::core::protocol::constants::rels;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One point in a resource's archived history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MementoRecord {
    pub uri: String,
    pub datetime: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
}

impl MementoRecord {
    pub fn new(uri: impl Into<String>) -> Self {
        MementoRecord {
            uri: uri.into(),
            datetime: None,
            http_status_code: None,
        }
    }

    pub fn with_datetime(mut self, datetime: Option<DateTime<Utc>>) -> Self {
        self.datetime = datetime;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status_code = Some(status);
        self
    }
}

/// The slot a memento fills relative to the requested datetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MementoRole {
    Closest,
    Prev,
    Next,
    First,
    Last,
}

impl MementoRole {
    pub const NAVIGATION: [MementoRole; 4] = [
        MementoRole::Prev,
        MementoRole::Next,
        MementoRole::First,
        MementoRole::Last,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MementoRole::Closest => "closest",
            MementoRole::Prev => rels::PREV,
            MementoRole::Next => rels::NEXT,
            MementoRole::First => rels::FIRST,
            MementoRole::Last => rels::LAST,
        }
    }
}

impl fmt::Display for MementoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The memento the TimeGate selected.
///
/// `uri` is a list because a negotiation may surface the same memento under
/// more than one URI; the first element is the effective one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClosestMemento {
    pub uri: Vec<String>,
    pub datetime: Option<DateTime<Utc>>,
    pub http_status_code: Option<u16>,
}

/// Mementos found during one negotiation, keyed by role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Mementos {
    pub closest: ClosestMemento,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<MementoRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<MementoRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<MementoRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<MementoRecord>,
}

impl Mementos {
    /// Navigation slot for `role`; `Closest` is not a plain record.
    pub fn get(&self, role: MementoRole) -> Option<&MementoRecord> {
        match role {
            MementoRole::Closest => None,
            MementoRole::Prev => self.prev.as_ref(),
            MementoRole::Next => self.next.as_ref(),
            MementoRole::First => self.first.as_ref(),
            MementoRole::Last => self.last.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, role: MementoRole, record: MementoRecord) {
        match role {
            MementoRole::Closest => {
                self.closest.uri = vec![record.uri];
                self.closest.datetime = record.datetime;
                self.closest.http_status_code = record.http_status_code;
            }
            MementoRole::Prev => self.prev = Some(record),
            MementoRole::Next => self.next = Some(record),
            MementoRole::First => self.first = Some(record),
            MementoRole::Last => self.last = Some(record),
        }
    }
}

/// Outcome of [`get_memento_info`](crate::core::client::MementoClient::get_memento_info).
///
/// `mementos` is `None` when no compliant TimeGate answered; the URIs are
/// always filled in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NegotiationResult {
    pub original_uri: String,
    pub timegate_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mementos: Option<Mementos>,
}

impl NegotiationResult {
    pub fn partial(original_uri: impl Into<String>, timegate_uri: impl Into<String>) -> Self {
        NegotiationResult {
            original_uri: original_uri.into(),
            timegate_uri: timegate_uri.into(),
            mementos: None,
        }
    }

    /// The effective URI of the closest memento, if one was found.
    pub fn closest_uri(&self) -> Option<&str> {
        self.mementos
            .as_ref()
            .and_then(|m| m.closest.uri.first())
            .map(String::as_str)
    }
}

/// TimeMap serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMapFormat {
    LinkFormat,
    JsonFormat,
}

impl TimeMapFormat {
    /// Pick a format from a `Content-Type` value and the start of the body.
    pub fn detect(content_type: Option<&str>, body: &[u8]) -> Self {
        if let Some(ct) = content_type {
            let ct = ct.to_ascii_lowercase();
            if ct.contains("json") {
                return TimeMapFormat::JsonFormat;
            }
            if ct.contains("link-format") {
                return TimeMapFormat::LinkFormat;
            }
        }
        match body.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => TimeMapFormat::JsonFormat,
            _ => TimeMapFormat::LinkFormat,
        }
    }
}

/// Every memento collected from a TimeMap and its pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TimeMapResult {
    pub original_uri: String,
    /// TimeMap documents consulted, per format, in visit order.
    pub timemap_uris: BTreeMap<TimeMapFormat, Vec<String>>,
    /// Mementos in discovery order.
    pub mementos: Vec<MementoRecord>,
}

impl TimeMapResult {
    pub fn new(original_uri: impl Into<String>) -> Self {
        TimeMapResult {
            original_uri: original_uri.into(),
            ..Default::default()
        }
    }

    pub(crate) fn record_page(&mut self, format: TimeMapFormat, uri: &str) {
        self.timemap_uris
            .entry(format)
            .or_default()
            .push(uri.to_string());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(MementoRole::Closest.to_string(), "closest");
        assert_eq!(MementoRole::NAVIGATION.len(), 4);
        let names: Vec<_> = MementoRole::NAVIGATION.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["prev", "next", "first", "last"]);
    }

    #[test]
    fn test_mementos_set_and_get() {
        let mut m = Mementos::default();
        m.set(MementoRole::Prev, MementoRecord::new("http://p/"));
        m.set(MementoRole::Closest, MementoRecord::new("http://c/").with_status(200));
        assert_eq!(m.get(MementoRole::Prev).unwrap().uri, "http://p/");
        assert!(m.get(MementoRole::Next).is_none());
        assert_eq!(m.closest.uri, vec!["http://c/".to_string()]);
        assert_eq!(m.closest.http_status_code, Some(200));
    }

    #[test]
    fn test_partial_result_has_no_mementos() {
        let r = NegotiationResult::partial("http://o/", "http://tg/http://o/");
        assert!(r.mementos.is_none());
        assert!(r.closest_uri().is_none());
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("mementos").is_none());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            TimeMapFormat::detect(Some("application/json; charset=utf-8"), b""),
            TimeMapFormat::JsonFormat
        );
        assert_eq!(
            TimeMapFormat::detect(Some("application/link-format"), b"{"),
            TimeMapFormat::LinkFormat
        );
        assert_eq!(TimeMapFormat::detect(None, b"  {\"a\":1}"), TimeMapFormat::JsonFormat);
        assert_eq!(TimeMapFormat::detect(Some("text/plain"), b"<http://a/>"), TimeMapFormat::LinkFormat);
    }

    #[test]
    fn test_timemap_result_pages() {
        let mut r = TimeMapResult::new("http://o/");
        r.record_page(TimeMapFormat::LinkFormat, "http://tm/1");
        r.record_page(TimeMapFormat::LinkFormat, "http://tm/2");
        assert_eq!(r.timemap_uris[&TimeMapFormat::LinkFormat].len(), 2);
        assert!(r.is_empty());
    }
}
