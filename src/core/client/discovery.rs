//! Native TimeGate and TimeMap discovery.
//!
//! A resource may advertise its own TimeGate (`rel="timegate"`) or TimeMap
//! (`rel="timemap"`) in its `Link` header, possibly behind redirects. The walk
//! is an explicit loop: every hop is probed with `HEAD` (no redirect
//! following) and reduced to a [`HopDecision`].
//!
//! ```text
//!            ┌──────────────┐
//!   uri ───▶ │  probe (HEAD)│ ── connectivity error ─────────▶ NoTimegate
//!            └──────┬───────┘
//!                   ▼
//!   Vary: accept-datetime ───────────────────────────────────▶ NoTimegate
//!   Memento-Datetime ────────────────────────────────────────▶ NoTimegate
//!   3xx + Location + budget ── counter += 1 ─────────────────▶ Continue(next)
//!   no Link / no wanted rel ─────────────────────────────────▶ NoTimegate
//!   malformed Link ──────────────────────────────────────────▶ Err(LinkParse)
//!   wanted rel ──────────────────────────────────────────────▶ Found(uri)
//! ```
//!
//! Only connectivity errors are swallowed: they end the walk with nothing
//! found. A malformed `Link` header is returned to the caller. The redirect
//! budget lives in a [`DiscoveryContext`] created per top-level call.

use crate::core::client::utils::resolve_relative;
use crate::core::error::Result;
use crate::core::protocol::{
    constants::{headers, rels},
    parse_link_header, uri_for_rel,
};
use crate::core::traits::MementoNetwork;
use crate::core::types::{ProbeRequest, ProbeResponse};
use chrono::{DateTime, Utc};
use std::iter;

/// Per-call discovery state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryContext {
    redirects: u32,
    max_redirects: u32,
}

impl DiscoveryContext {
    pub fn new(max_redirects: u32) -> Self {
        Self {
            redirects: 0,
            max_redirects,
        }
    }

    /// Redirects taken so far.
    #[inline]
    pub fn redirects(&self) -> u32 {
        self.redirects
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.max_redirects.saturating_sub(self.redirects)
    }

    fn try_spend(&mut self) -> bool {
        if self.redirects < self.max_redirects {
            self.redirects += 1;
            true
        } else {
            false
        }
    }

    fn spend(&mut self, hops: usize) {
        let hops = u32::try_from(hops).unwrap_or(u32::MAX);
        self.redirects = self.redirects.saturating_add(hops);
    }
}

/// What one probed hop means for the walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HopDecision {
    /// Follow the redirect to this absolute URI.
    Continue(String),
    /// A wanted relation was found.
    Found { rel: &'static str, uri: String },
    /// The walk ends without a native target.
    NoTimegate,
}

/// Result of a discovery walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub uri: Option<String>,
    /// Redirects spent, for diagnostics.
    pub redirects: u32,
}

/// Reduce one probed hop to a decision, spending redirect budget on 3xx.
///
/// A redirect that cannot be followed (no `Location`, or no budget left) is
/// treated like any other response and checked for a `Link` header.
pub fn decide(
    ctx: &mut DiscoveryContext,
    current: &str,
    response: &ProbeResponse,
    wanted: &[&'static str],
) -> Result<HopDecision> {
    if response.varies_on_accept_datetime() {
        tracing::debug!(uri = current, "negotiable resource, no native target");
        return Ok(HopDecision::NoTimegate);
    }
    if response.has_header(headers::MEMENTO_DATETIME) {
        tracing::debug!(uri = current, "resource is a memento");
        return Ok(HopDecision::NoTimegate);
    }

    if response.is_redirect() {
        match response.location() {
            Some(location) if ctx.try_spend() => {
                return Ok(HopDecision::Continue(resolve_relative(current, location)));
            }
            Some(_) => tracing::warn!(
                uri = current,
                redirects = ctx.redirects(),
                "redirect budget exhausted during discovery"
            ),
            None => tracing::debug!(uri = current, "redirect without Location"),
        }
    }

    let Some(raw) = response.link() else {
        return Ok(HopDecision::NoTimegate);
    };
    let links = parse_link_header(raw)?;

    for &rel in wanted {
        if let Some(uri) = uri_for_rel(&links, rel) {
            return Ok(HopDecision::Found {
                rel,
                uri: resolve_relative(current, uri),
            });
        }
    }
    Ok(HopDecision::NoTimegate)
}

async fn walk(
    network: &dyn MementoNetwork,
    ctx: &mut DiscoveryContext,
    start: &str,
    accept_datetime: Option<&DateTime<Utc>>,
    wanted: &[&'static str],
) -> Result<Option<(&'static str, String)>> {
    let mut current = start.to_string();
    loop {
        let request = ProbeRequest::head().with_accept_datetime(accept_datetime.copied());
        let response = match network.probe(&current, request).await {
            Ok(response) => response,
            Err(e) if e.is_connectivity() => {
                tracing::warn!(uri = %current, error = %e, "discovery probe failed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(uri = %current, status = response.status, "discovery hop");

        match decide(ctx, &current, &response, wanted)? {
            HopDecision::Continue(next) => current = next,
            HopDecision::Found { rel, uri } => return Ok(Some((rel, uri))),
            HopDecision::NoTimegate => return Ok(None),
        }
    }
}

/// Find the TimeGate a resource advertises for itself.
pub async fn discover_timegate(
    network: &dyn MementoNetwork,
    ctx: &mut DiscoveryContext,
    original_uri: &str,
    accept_datetime: Option<&DateTime<Utc>>,
) -> Result<DiscoveryOutcome> {
    let uri = walk(network, ctx, original_uri, accept_datetime, &[rels::TIMEGATE])
        .await?
        .map(|(_, uri)| uri);
    Ok(DiscoveryOutcome {
        uri,
        redirects: ctx.redirects(),
    })
}

/// Find the TimeMap a resource advertises, directly or through its TimeGate.
pub async fn discover_timemap(
    network: &dyn MementoNetwork,
    ctx: &mut DiscoveryContext,
    original_uri: &str,
    accept_datetime: Option<&DateTime<Utc>>,
) -> Result<DiscoveryOutcome> {
    let found = walk(
        network,
        ctx,
        original_uri,
        accept_datetime,
        &[rels::TIMEMAP, rels::TIMEGATE],
    )
    .await?;

    let uri = match found {
        Some((rels::TIMEMAP, uri)) => Some(uri),
        Some((_, timegate)) => {
            timemap_via_timegate(network, ctx, &timegate, accept_datetime).await?
        }
        None => None,
    };
    Ok(DiscoveryOutcome {
        uri,
        redirects: ctx.redirects(),
    })
}

async fn timemap_via_timegate(
    network: &dyn MementoNetwork,
    ctx: &mut DiscoveryContext,
    timegate: &str,
    accept_datetime: Option<&DateTime<Utc>>,
) -> Result<Option<String>> {
    let request = ProbeRequest::head()
        .with_accept_datetime(accept_datetime.copied())
        .follow_redirects(ctx.remaining());
    let response = match network.probe(timegate, request).await {
        Ok(response) => response,
        Err(e) if e.is_connectivity() => {
            tracing::warn!(uri = timegate, error = %e, "TimeGate probe failed during discovery");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    ctx.spend(response.history.len());

    // Final response first, then earlier hops.
    for hop in iter::once(&response).chain(response.history.iter()) {
        let Some(raw) = hop.link() else { continue };
        let links = parse_link_header(raw)?;
        if let Some(uri) = uri_for_rel(&links, rels::TIMEMAP) {
            return Ok(Some(resolve_relative(&hop.url, uri)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DiscoveryContext {
        DiscoveryContext::new(2)
    }

    const WANT_TG: &[&str] = &[rels::TIMEGATE];

    #[test]
    fn test_decide_vary_means_no_timegate() {
        let r = ProbeResponse::new(302, "http://a/")
            .with_header("Vary", "Accept-Datetime")
            .with_header("Location", "http://b/");
        assert_eq!(decide(&mut ctx(), "http://a/", &r, WANT_TG).unwrap(), HopDecision::NoTimegate);
    }

    #[test]
    fn test_decide_memento_means_no_timegate() {
        let r = ProbeResponse::new(200, "http://a/")
            .with_header("Memento-Datetime", "Thu, 01 Apr 2010 12:00:00 GMT")
            .with_header("Link", r#"<http://tg/>;rel="timegate""#);
        assert_eq!(decide(&mut ctx(), "http://a/", &r, WANT_TG).unwrap(), HopDecision::NoTimegate);
    }

    #[test]
    fn test_decide_redirect_spends_budget() {
        let mut c = ctx();
        let r = ProbeResponse::new(301, "http://a/").with_header("Location", "/moved");
        assert_eq!(
            decide(&mut c, "http://a/old", &r, WANT_TG).unwrap(),
            HopDecision::Continue("http://a/moved".to_string())
        );
        assert_eq!(c.redirects(), 1);
        assert_eq!(c.remaining(), 1);
    }

    #[test]
    fn test_decide_redirect_budget_exhausted() {
        let mut c = DiscoveryContext::new(0);
        let r = ProbeResponse::new(302, "http://a/").with_header("Location", "http://b/");
        assert_eq!(decide(&mut c, "http://a/", &r, WANT_TG).unwrap(), HopDecision::NoTimegate);
        assert_eq!(c.redirects(), 0);
    }

    #[test]
    fn test_decide_redirect_without_location() {
        let r = ProbeResponse::new(302, "http://a/");
        assert_eq!(decide(&mut ctx(), "http://a/", &r, WANT_TG).unwrap(), HopDecision::NoTimegate);
    }

    #[test]
    fn test_decide_redirect_without_location_checks_link() {
        let mut c = ctx();
        let r = ProbeResponse::new(302, "http://a/")
            .with_header("Link", r#"<http://tg.native/>;rel="timegate""#);
        assert_eq!(
            decide(&mut c, "http://a/", &r, WANT_TG).unwrap(),
            HopDecision::Found {
                rel: rels::TIMEGATE,
                uri: "http://tg.native/".to_string()
            }
        );
        assert_eq!(c.redirects(), 0);
    }

    #[test]
    fn test_decide_exhausted_redirect_checks_link() {
        let mut c = DiscoveryContext::new(0);
        let r = ProbeResponse::new(302, "http://a/")
            .with_header("Location", "http://b/")
            .with_header("Link", r#"<http://tg.native/>;rel="timegate""#);
        assert!(matches!(
            decide(&mut c, "http://a/", &r, WANT_TG).unwrap(),
            HopDecision::Found { .. }
        ));
    }

    #[test]
    fn test_decide_found() {
        let r = ProbeResponse::new(200, "http://a/")
            .with_header("Link", r#"<http://tg/a>;rel="timegate", <http://tm/a>;rel="timemap""#);
        assert_eq!(
            decide(&mut ctx(), "http://a/", &r, WANT_TG).unwrap(),
            HopDecision::Found {
                rel: rels::TIMEGATE,
                uri: "http://tg/a".to_string()
            }
        );
    }

    #[test]
    fn test_decide_wanted_order_wins() {
        let r = ProbeResponse::new(200, "http://a/")
            .with_header("Link", r#"<http://tg/a>;rel="timegate", <http://tm/a>;rel="timemap""#);
        let decision = decide(&mut ctx(), "http://a/", &r, &[rels::TIMEMAP, rels::TIMEGATE]).unwrap();
        assert_eq!(
            decision,
            HopDecision::Found {
                rel: rels::TIMEMAP,
                uri: "http://tm/a".to_string()
            }
        );
    }

    #[test]
    fn test_decide_no_link() {
        let r = ProbeResponse::new(200, "http://a/");
        assert_eq!(decide(&mut ctx(), "http://a/", &r, WANT_TG).unwrap(), HopDecision::NoTimegate);
    }

    #[test]
    fn test_decide_malformed_link_is_error() {
        let r = ProbeResponse::new(200, "http://a/").with_header("Link", "garbage");
        assert!(decide(&mut ctx(), "http://a/", &r, WANT_TG)
            .unwrap_err()
            .is_parse_error());

        let r = ProbeResponse::new(200, "http://a/")
            .with_header("Link", r#"<http://tg/>;rel="timegate"#);
        assert!(matches!(
            decide(&mut ctx(), "http://a/", &r, WANT_TG),
            Err(crate::core::error::MementoError::LinkParseEof { .. })
        ));
    }

    #[test]
    fn test_decide_link_without_timegate() {
        let r = ProbeResponse::new(200, "http://a/")
            .with_header("Link", r#"<http://a/>;rel="canonical""#);
        assert_eq!(decide(&mut ctx(), "http://a/", &r, WANT_TG).unwrap(), HopDecision::NoTimegate);
    }

    #[test]
    fn test_decide_relative_timegate_resolved() {
        let r = ProbeResponse::new(200, "http://a/page")
            .with_header("Link", r#"</timegate/page>;rel="timegate""#);
        assert_eq!(
            decide(&mut ctx(), "http://a/page", &r, WANT_TG).unwrap(),
            HopDecision::Found {
                rel: rels::TIMEGATE,
                uri: "http://a/timegate/page".to_string()
            }
        );
    }
}
