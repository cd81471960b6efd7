use crate::core::client::ClientConfig;
use crate::core::error::{MementoError, Result};
use crate::core::protocol::{constants::headers, format_http_datetime};
use crate::core::traits::MementoNetwork;
use crate::core::types::{ProbeMethod, ProbeRequest, ProbeResponse};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

/// [`MementoNetwork`] over reqwest.
///
/// Redirects are never followed by reqwest itself: every hop is issued here
/// so its status and headers land in [`ProbeResponse::history`].
pub struct NativeNetwork {
    client: Client,
}

impl NativeNetwork {
    /// Wrap an existing client. It should be built with
    /// `redirect::Policy::none()`, otherwise history stays empty.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if !config.proxy_url.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy_url)
                .map_err(|e| MementoError::Config(format!("proxy_url: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        if !config.user_agent.is_empty() {
            builder = builder.user_agent(config.user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| MementoError::Config(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn send_once(&self, url: &str, request: &ProbeRequest) -> Result<ProbeResponse> {
        let method = match request.method {
            ProbeMethod::Head => reqwest::Method::HEAD,
            ProbeMethod::Get => reqwest::Method::GET,
        };

        let mut req_builder = self.client.request(method, url);
        for (k, v) in &request.extra_headers {
            req_builder = req_builder.header(k, v);
        }
        if let Some(dt) = &request.accept_datetime {
            req_builder = req_builder.header(headers::ACCEPT_DATETIME, format_http_datetime(dt));
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| MementoError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let effective = response.url().to_string();
        let mut probe = ProbeResponse::new(status, effective);

        // Repeated headers (several Link lines) are joined the way HTTP allows.
        let mut collected: BTreeMap<String, String> = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                collected
                    .entry(k.as_str().to_string())
                    .and_modify(|existing| {
                        existing.push_str(", ");
                        existing.push_str(val);
                    })
                    .or_insert_with(|| val.to_string());
            }
        }
        for (k, v) in collected {
            probe = probe.with_header(k, v);
        }

        if request.method == ProbeMethod::Get && !probe.is_redirect() {
            let body = response
                .bytes()
                .await
                .map_err(|e| MementoError::Http(e.to_string()))?;
            probe = probe.with_body(body);
        } else {
            probe = probe.with_body(Bytes::new());
        }

        Ok(probe)
    }
}

#[async_trait]
impl MementoNetwork for NativeNetwork {
    async fn probe(&self, url: &str, request: ProbeRequest) -> Result<ProbeResponse> {
        let mut history = Vec::new();
        let mut current = url.to_string();

        loop {
            let response = self.send_once(&current, &request).await?;
            tracing::debug!(url = %current, status = response.status, "probe");

            if !request.follow_redirects
                || !response.is_redirect()
                || history.len() as u32 >= request.max_redirects
            {
                return Ok(response.with_history(history));
            }

            let next = match response
                .location()
                .and_then(|loc| url::Url::parse(&current).and_then(|base| base.join(loc)).ok())
            {
                Some(next) => next.to_string(),
                None => return Ok(response.with_history(history)),
            };

            history.push(response);
            current = next;
        }
    }
}
