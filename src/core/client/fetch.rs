//! Main Memento client implementation.
//!
//! Provides [`MementoClient`], which ties discovery, negotiation and TimeMap
//! retrieval together over a [`MementoNetwork`].

use crate::core::client::classify::{self, memento_location};
use crate::core::client::config::ClientConfig;
use crate::core::client::discovery::{self, DiscoveryContext};
use crate::core::client::native_network::NativeNetwork;
use crate::core::client::registry::{parse_archive_registry, ArchiveInfo};
use crate::core::client::timemap::TimeMapAggregator;
use crate::core::client::utils::{join_base, resolve_relative, validate_uri};
use crate::core::error::{MementoError, NegotiationContext, Result};
use crate::core::protocol::{
    constants::rels, find_by_rel, format_http_datetime, parse_http_datetime,
    parse_optional_link_header, parse_user_datetime, uri_for_rel,
};
use crate::core::traits::MementoNetwork;
use crate::core::types::{
    ClosestMemento, MementoRole, Mementos, NegotiationResult, ProbeRequest, ProbeResponse,
    TimeMapResult,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The main Memento client.
///
/// Cheap to clone. Every call keeps its own redirect budget and visited set,
/// so one client can serve concurrent tasks.
#[derive(Clone)]
pub struct MementoClient {
    network: Arc<dyn MementoNetwork>,
    config: Arc<ClientConfig>,
}

impl MementoClient {
    /// Create a client with default configuration over reqwest.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration over reqwest.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let network = NativeNetwork::from_config(&config)?;
        Ok(Self::with_network(Arc::new(network), config))
    }

    /// Create a client over any transport.
    pub fn with_network(network: Arc<dyn MementoNetwork>, config: ClientConfig) -> Self {
        MementoClient {
            network,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn follow(&self) -> ProbeRequest {
        ProbeRequest::head().follow_redirects(self.config.max_redirects)
    }

    /// The URI of the original resource behind `uri`.
    ///
    /// If `uri` is a memento, its `rel="original"` link wins. An unreachable
    /// `uri` is returned as is.
    pub async fn get_original_uri(&self, uri: &str) -> Result<String> {
        validate_uri(uri)?;
        let response = match self.network.probe(uri, self.follow()).await {
            Ok(response) => response,
            Err(e) if e.is_connectivity() => {
                tracing::debug!(uri, error = %e, "original URI probe failed, using request URI");
                return Ok(uri.to_string());
            }
            Err(e) => return Err(e),
        };

        let links = parse_optional_link_header(response.link())?;
        Ok(match uri_for_rel(&links, rels::ORIGINAL) {
            Some(original) => resolve_relative(&response.url, original),
            None => uri.to_string(),
        })
    }

    /// The TimeGate advertised by the resource itself, if any.
    pub async fn get_native_timegate_uri(
        &self,
        uri: &str,
        accept_datetime: Option<DateTime<Utc>>,
    ) -> Result<Option<String>> {
        validate_uri(uri)?;
        let mut ctx = DiscoveryContext::new(self.config.max_redirects);
        let outcome =
            discovery::discover_timegate(self.network.as_ref(), &mut ctx, uri, accept_datetime.as_ref())
                .await?;
        Ok(outcome.uri)
    }

    /// The TimeMap advertised by the resource or its TimeGate, if any.
    pub async fn get_native_timemap_uri(
        &self,
        uri: &str,
        accept_datetime: Option<DateTime<Utc>>,
    ) -> Result<Option<String>> {
        validate_uri(uri)?;
        let mut ctx = DiscoveryContext::new(self.config.max_redirects);
        let outcome =
            discovery::discover_timemap(self.network.as_ref(), &mut ctx, uri, accept_datetime.as_ref())
                .await?;
        Ok(outcome.uri)
    }

    /// Probe `uri` and report whether it is a memento.
    pub async fn is_memento_uri(&self, uri: &str) -> Result<bool> {
        validate_uri(uri)?;
        let response = self.network.probe(uri, self.follow()).await?;
        classify::is_memento(&response.url, &response)
    }

    /// Probe `uri` with `Accept-Datetime` and report whether it is a TimeGate.
    pub async fn is_timegate_uri(
        &self,
        uri: &str,
        accept_datetime: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        validate_uri(uri)?;
        let accept = accept_datetime.unwrap_or_else(Utc::now);
        let request = ProbeRequest::head().with_accept_datetime(Some(accept));
        let response = self.network.probe(uri, request).await?;
        classify::is_timegate(uri, Some(&accept), &response)
    }

    /// Like [`get_memento_info`](Self::get_memento_info), with the datetime
    /// given as text (HTTP date, RFC 3339 or `%Y-%m-%dT%H:%M:%SZ`).
    pub async fn get_memento_info_str(
        &self,
        request_uri: &str,
        accept_datetime: &str,
    ) -> Result<NegotiationResult> {
        let accept = parse_user_datetime(accept_datetime)?;
        self.get_memento_info(request_uri, Some(accept)).await
    }

    /// Negotiate with a TimeGate for the memento of `request_uri` closest to
    /// `accept_datetime` (now when `None`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> memento_rs::Result<()> {
    /// use memento_rs::{convert_to_datetime, MementoClient};
    ///
    /// let client = MementoClient::new()?;
    /// let dt = convert_to_datetime(Some("Thu, 01 Apr 2010 12:00:00 GMT"))?;
    /// let info = client.get_memento_info("http://example.org/", dt).await?;
    /// if let Some(uri) = info.closest_uri() {
    ///     println!("closest memento: {}", uri);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_memento_info(
        &self,
        request_uri: &str,
        accept_datetime: Option<DateTime<Utc>>,
    ) -> Result<NegotiationResult> {
        validate_uri(request_uri)?;
        let accept = accept_datetime.unwrap_or_else(Utc::now);

        let original = self.get_original_uri(request_uri).await?;
        let timegate = self.select_timegate(&original, &accept).await?;
        if self.config.enable_logging {
            tracing::info!(original = %original, timegate = %timegate, "negotiating");
        }

        let request = ProbeRequest::head()
            .with_accept_datetime(Some(accept))
            .follow_redirects(self.config.max_redirects);
        let response = self.network.probe(&timegate, request).await?;

        assemble(request_uri, &original, &timegate, &accept, &response)
    }

    async fn select_timegate(&self, original: &str, accept: &DateTime<Utc>) -> Result<String> {
        if self.config.check_native_timegate {
            let mut ctx = DiscoveryContext::new(self.config.max_redirects);
            let outcome =
                discovery::discover_timegate(self.network.as_ref(), &mut ctx, original, Some(accept))
                    .await?;
            if let Some(native) = outcome.uri {
                return Ok(native);
            }
        }
        Ok(join_base(&self.config.timegate_uri, original))
    }

    /// Every memento listed in the resource's TimeMap, across all pages.
    pub async fn get_all_mementos(
        &self,
        uri: &str,
        accept_datetime: Option<DateTime<Utc>>,
    ) -> Result<TimeMapResult> {
        let original = self.get_original_uri(uri).await?;
        let native = if self.config.check_native_timegate {
            self.get_native_timemap_uri(&original, accept_datetime).await?
        } else {
            None
        };
        let timemap = native.unwrap_or_else(|| join_base(&self.config.timemap_uri, &original));
        if self.config.enable_logging {
            tracing::info!(original = %original, timemap = %timemap, "collecting TimeMap");
        }

        TimeMapAggregator::new(self.network.as_ref(), self.config.max_redirects)
            .collect(&timemap, &original)
            .await
    }

    /// Archives listed in the configured registry, keyed by id.
    pub async fn archive_list(&self) -> Result<BTreeMap<String, ArchiveInfo>> {
        let uri = &self.config.archive_registry_uri;
        let request = ProbeRequest::get().follow_redirects(self.config.max_redirects);
        let response = self.network.probe(uri, request).await?;
        if !response.is_success() {
            return Err(MementoError::Http(format!(
                "archive registry {} returned status {}",
                uri, response.status
            )));
        }
        parse_archive_registry(&String::from_utf8_lossy(&response.body))
    }
}

/// Turn the negotiation probe's response chain into a result.
fn assemble(
    request_uri: &str,
    original: &str,
    timegate: &str,
    accept: &DateTime<Utc>,
    response: &ProbeResponse,
) -> Result<NegotiationResult> {
    let context = |message: &str| {
        NegotiationContext::new(message)
            .with_timegate(timegate)
            .with_original(original)
            .with_request(request_uri)
            .with_accept_datetime(Some(format_http_datetime(accept)))
    };

    let tg_hop = response.first_hop();
    match tg_hop.status {
        404 => {
            tracing::debug!(timegate, "TimeGate has no mementos");
            return Ok(NegotiationResult::partial(original, timegate));
        }
        s if s >= 400 => {
            return Err(MementoError::negotiation(
                context("TimeGate returned an error status").with_status(s),
            ));
        }
        200 if tg_hop.link().is_none() => {
            return Err(MementoError::negotiation(
                context("non-compliant TimeGate: no Link header").with_status(200),
            ));
        }
        _ => {}
    }

    let mut tg_response = None;
    for hop in response.chain() {
        if hop.status != 200 && hop.status != 302 {
            continue;
        }
        if hop.varies_on_accept_datetime() && hop.link().is_none() {
            let mut ctx = context("Memento-compliant TimeGate sent no Link header")
                .with_status(hop.status);
            if let Some(location) = memento_location(hop) {
                ctx = ctx.with_memento(resolve_relative(&hop.url, location));
            }
            return Err(MementoError::negotiation(ctx));
        }
        if classify::is_timegate(&hop.url, Some(accept), hop)? {
            tg_response = Some(hop);
            break;
        }
    }
    let Some(tg) = tg_response else {
        tracing::debug!(timegate, "no hop behaved as a TimeGate");
        return Ok(NegotiationResult::partial(original, timegate));
    };

    let effective = if std::ptr::eq(tg, response) {
        memento_location(tg).unwrap_or(response.url.as_str())
    } else {
        response.url.as_str()
    };
    let uri_m = resolve_relative(timegate, effective);

    let links = parse_optional_link_header(tg.link())?;
    let header_datetime = if classify::is_memento(&response.url, response)? {
        response
            .memento_datetime()
            .and_then(|dt| parse_http_datetime(dt).ok())
    } else {
        None
    };
    let datetime = header_datetime.or_else(|| {
        links
            .get(&uri_m)
            .and_then(|e| e.datetime())
            .and_then(|dt| parse_http_datetime(dt).ok())
    });

    let mut mementos = Mementos {
        closest: ClosestMemento {
            uri: vec![uri_m],
            datetime,
            http_status_code: Some(response.status),
        },
        ..Default::default()
    };

    let names: Vec<&str> = MementoRole::NAVIGATION.iter().map(|r| r.as_str()).collect();
    let found = find_by_rel(&links, &names);
    for role in MementoRole::NAVIGATION {
        if let Some(record) = found.get(role.as_str()).and_then(|v| v.first()) {
            let mut record = record.clone();
            record.uri = resolve_relative(&tg.url, &record.uri);
            mementos.set(role, record);
        }
    }

    Ok(NegotiationResult {
        original_uri: original.to_string(),
        timegate_uri: timegate.to_string(),
        mementos: Some(mementos),
    })
}
