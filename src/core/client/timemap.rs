//! TimeMap retrieval across pages and indexes.
//!
//! A TimeMap lists every memento of a resource. Large TimeMaps are split:
//! link-format documents point at further pages with `rel="timemap"`, JSON
//! documents list them under `timemap_index` or `timemap`. Pages are visited
//! depth-first in document order from an explicit work stack, and each URI is
//! fetched at most once per [`TimeMapAggregator::collect`] call.
//!
//! # JSON layout
//!
//! ```json
//! {
//!   "original_uri": "http://example.org/",
//!   "mementos": {
//!     "list": [{"datetime": "2010-04-01T12:00:00Z", "uri": "http://arc/2010/..."}]
//!   },
//!   "timemap_index": [{"uri": "http://arc/timemap/json/2/http://example.org/"}]
//! }
//! ```

use crate::core::client::utils::resolve_relative;
use crate::core::error::{MementoError, Result};
use crate::core::protocol::{
    constants::{headers, rels},
    parse_http_datetime, parse_link_header, parse_timemap_datetime,
};
use crate::core::traits::MementoNetwork;
use crate::core::types::{MementoRecord, ProbeRequest, TimeMapFormat, TimeMapResult};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Default, Deserialize)]
struct JsonTimeMap {
    #[serde(default)]
    mementos: Option<JsonMementos>,
    #[serde(default)]
    timemap_index: Vec<JsonRef>,
    #[serde(default)]
    timemap: Vec<JsonRef>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonMementos {
    #[serde(default)]
    list: Vec<JsonMemento>,
}

#[derive(Debug, Deserialize)]
struct JsonMemento {
    uri: String,
    #[serde(default)]
    datetime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonRef {
    uri: String,
}

/// What one page contributed.
struct Page {
    records: Vec<MementoRecord>,
    children: Vec<String>,
}

/// Collects mementos from a TimeMap and every page it references.
pub struct TimeMapAggregator<'n> {
    network: &'n dyn MementoNetwork,
    max_redirects: u32,
}

impl<'n> TimeMapAggregator<'n> {
    pub fn new(network: &'n dyn MementoNetwork, max_redirects: u32) -> Self {
        Self {
            network,
            max_redirects,
        }
    }

    /// Fetch `timemap_uri` and everything it links to.
    ///
    /// Malformed pages and non-2xx statuses abort the whole collection.
    pub async fn collect(&self, timemap_uri: &str, original_uri: &str) -> Result<TimeMapResult> {
        let mut result = TimeMapResult::new(original_uri);
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack = vec![timemap_uri.to_string()];
        visited.insert(timemap_uri.to_string());

        while let Some(uri) = stack.pop() {
            let request = ProbeRequest::get().follow_redirects(self.max_redirects);
            let response = self.network.probe(&uri, request).await?;
            if !response.is_success() {
                return Err(MementoError::Http(format!(
                    "TimeMap {} returned status {}",
                    uri, response.status
                )));
            }

            let format = TimeMapFormat::detect(response.header(headers::CONTENT_TYPE), &response.body);
            let text = String::from_utf8_lossy(&response.body);
            let base = if response.url.is_empty() {
                uri.as_str()
            } else {
                response.url.as_str()
            };
            let page = match format {
                TimeMapFormat::LinkFormat => parse_link_page(base, &text)?,
                TimeMapFormat::JsonFormat => parse_json_page(base, &text)?,
            };
            tracing::debug!(
                uri = %uri,
                ?format,
                mementos = page.records.len(),
                pages = page.children.len(),
                "TimeMap page"
            );

            result.record_page(format, &uri);
            result.mementos.extend(page.records);

            // Reverse so the first child in the document is fetched next.
            for child in page.children.into_iter().rev() {
                if visited.insert(child.clone()) {
                    stack.push(child);
                }
            }
        }

        Ok(result)
    }
}

fn parse_link_page(base: &str, text: &str) -> Result<Page> {
    let links = parse_link_header(text)?;
    let mut page = Page {
        records: Vec::new(),
        children: Vec::new(),
    };
    for entry in &links {
        if entry.has_rel(rels::MEMENTO) {
            let datetime = entry.datetime().and_then(|dt| parse_http_datetime(dt).ok());
            page.records
                .push(MementoRecord::new(resolve_relative(base, &entry.uri)).with_datetime(datetime));
        }
        if entry.has_rel(rels::TIMEMAP) {
            page.children.push(resolve_relative(base, &entry.uri));
        }
    }
    Ok(page)
}

fn parse_json_page(base: &str, text: &str) -> Result<Page> {
    let doc: JsonTimeMap = serde_json::from_str(text)?;
    let records = doc
        .mementos
        .map(|m| m.list)
        .unwrap_or_default()
        .into_iter()
        .map(|m| {
            let datetime = m
                .datetime
                .as_deref()
                .and_then(|dt| parse_timemap_datetime(dt).ok());
            MementoRecord::new(resolve_relative(base, &m.uri)).with_datetime(datetime)
        })
        .collect();
    let children = doc
        .timemap_index
        .iter()
        .chain(doc.timemap.iter())
        .map(|r| resolve_relative(base, &r.uri))
        .collect();
    Ok(Page { records, children })
}
