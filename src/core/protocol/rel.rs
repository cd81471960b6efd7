//! Lookup of link targets by relation type.

use crate::core::protocol::datetime::parse_http_datetime;
use crate::core::types::{LinkHeaderMap, MementoRecord};
use std::collections::BTreeMap;

/// Collect, for each requested relation type, every entry carrying it.
///
/// Each record keeps the entry's first `datetime`, decoded. A `datetime` that
/// does not decode is dropped rather than failing the lookup. Relation types
/// that appear nowhere are absent from the result.
///
/// # Examples
///
/// ```
/// use memento_rs::{find_by_rel, parse_link_header};
///
/// let links = parse_link_header(
///     r#"<http://a/>;rel="original", <http://a/1>;rel="prev memento";datetime="Thu, 01 Apr 2010 12:00:00 GMT""#,
/// ).unwrap();
/// let found = find_by_rel(&links, &["prev", "next"]);
/// assert_eq!(found["prev"][0].uri, "http://a/1");
/// assert!(found["prev"][0].datetime.is_some());
/// assert!(!found.contains_key("next"));
/// ```
pub fn find_by_rel(links: &LinkHeaderMap, rels: &[&str]) -> BTreeMap<String, Vec<MementoRecord>> {
    let mut found: BTreeMap<String, Vec<MementoRecord>> = BTreeMap::new();
    if links.is_empty() || rels.is_empty() {
        return found;
    }

    for rel in rels {
        for entry in links.with_rel(rel) {
            let datetime = entry
                .datetime()
                .and_then(|dt| parse_http_datetime(dt).ok());
            found
                .entry(rel.to_string())
                .or_default()
                .push(MementoRecord::new(entry.uri.clone()).with_datetime(datetime));
        }
    }
    found
}

/// First URI carrying `rel`, in header order.
pub fn uri_for_rel<'a>(links: &'a LinkHeaderMap, rel: &str) -> Option<&'a str> {
    links.with_rel(rel).next().map(|e| e.uri.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::protocol::link::parse_link_header;

    fn sample() -> LinkHeaderMap {
        parse_link_header(concat!(
            r#"<http://a/>;rel="original","#,
            r#"<http://arc/1>;rel="first memento";datetime="Sat, 12 Dec 2009 01:39:21 GMT","#,
            r#"<http://arc/2>;rel="memento";datetime="not a date","#,
            r#"<http://arc/3>;rel="last memento";datetime="Tue, 20 Sep 2016 17:52:06 GMT""#,
        ))
        .unwrap()
    }

    #[test]
    fn test_find_by_rel_collects_all_in_order() {
        let found = find_by_rel(&sample(), &["memento"]);
        let uris: Vec<_> = found["memento"].iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec!["http://arc/1", "http://arc/2", "http://arc/3"]);
    }

    #[test]
    fn test_find_by_rel_bad_datetime_is_none() {
        let found = find_by_rel(&sample(), &["memento"]);
        assert!(found["memento"][0].datetime.is_some());
        assert!(found["memento"][1].datetime.is_none());
    }

    #[test]
    fn test_find_by_rel_missing_rel_absent() {
        let found = find_by_rel(&sample(), &["first", "prev"]);
        assert!(found.contains_key("first"));
        assert!(!found.contains_key("prev"));
    }

    #[test]
    fn test_find_by_rel_empty_inputs() {
        assert!(find_by_rel(&LinkHeaderMap::new(), &["memento"]).is_empty());
        assert!(find_by_rel(&sample(), &[]).is_empty());
    }

    #[test]
    fn test_uri_for_rel() {
        let links = sample();
        assert_eq!(uri_for_rel(&links, "original"), Some("http://a/"));
        assert_eq!(uri_for_rel(&links, "last"), Some("http://arc/3"));
        assert_eq!(uri_for_rel(&links, "timegate"), None);
    }
}
