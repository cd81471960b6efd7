//! Scripted in-memory transport for end-to-end tests.

#![allow(dead_code)]

use async_trait::async_trait;
use memento_rs::{MementoError, MementoNetwork, ProbeRequest, ProbeResponse, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

enum Route {
    Respond(ProbeResponse),
    Fail(String),
}

/// One request the transport saw (one per hop when redirects are followed).
#[derive(Clone, Debug)]
pub struct Call {
    pub url: String,
    pub request: ProbeRequest,
}

/// Answers probes from a fixed URL → response table and follows redirects
/// the way `NativeNetwork` does. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct ScriptedNetwork {
    routes: HashMap<String, Route>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, response: ProbeResponse) -> Self {
        let mut response = response;
        response.url = url.to_string();
        self.routes.insert(url.to_string(), Route::Respond(response));
        self
    }

    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.routes
            .insert(url.to_string(), Route::Fail(message.to_string()));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.url == url).collect()
    }

    fn answer(&self, url: &str, request: &ProbeRequest) -> Result<ProbeResponse> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            request: request.clone(),
        });
        match self.routes.get(url) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::Fail(message)) => Err(MementoError::Http(message.clone())),
            None => Err(MementoError::Http(format!("connection refused: {}", url))),
        }
    }
}

#[async_trait]
impl MementoNetwork for ScriptedNetwork {
    async fn probe(&self, url: &str, request: ProbeRequest) -> Result<ProbeResponse> {
        let mut history = Vec::new();
        let mut current = url.to_string();
        loop {
            let response = self.answer(&current, &request)?;
            if !request.follow_redirects
                || !response.is_redirect()
                || history.len() as u32 >= request.max_redirects
            {
                return Ok(response.with_history(history));
            }
            let Some(next) = response.location().and_then(|loc| {
                url::Url::parse(&current)
                    .and_then(|base| base.join(loc))
                    .ok()
                    .map(|u| u.to_string())
            }) else {
                return Ok(response.with_history(history));
            };
            history.push(response);
            current = next;
        }
    }
}

pub const ORIGINAL: &str = "http://example.org/";
pub const TIMEGATE_BASE: &str = "http://tg.example/timegate/";
pub const TIMEGATE: &str = "http://tg.example/timegate/http://example.org/";
pub const MEMENTO: &str = "http://archive.example/2010/http://example.org/";
pub const PREV: &str = "http://archive.example/2009/http://example.org/";

/// `Link` header of a TimeGate for [`ORIGINAL`].
pub fn timegate_links() -> String {
    format!(
        concat!(
            r#"<{original}>;rel="original", "#,
            r#"<{prev}>;rel="prev";datetime="Sat, 12 Dec 2009 01:39:21 GMT", "#,
            r#"<{memento}>;rel="memento";datetime="Thu, 01 Apr 2010 11:00:00 GMT""#,
        ),
        original = ORIGINAL,
        prev = PREV,
        memento = MEMENTO,
    )
}

/// A compliant TimeGate redirecting to [`MEMENTO`].
pub fn timegate_302() -> ProbeResponse {
    ProbeResponse::new(302, TIMEGATE)
        .with_header("Vary", "negotiate, accept-datetime")
        .with_header("Location", MEMENTO)
        .with_header("Link", timegate_links())
}

/// The memento itself.
pub fn memento_200() -> ProbeResponse {
    ProbeResponse::new(200, MEMENTO)
        .with_header("Memento-Datetime", "Thu, 01 Apr 2010 11:00:00 GMT")
        .with_header("Link", format!(r#"<{}>;rel="original""#, ORIGINAL))
}

/// An original resource with no Memento headers at all.
pub fn plain_200() -> ProbeResponse {
    ProbeResponse::new(200, ORIGINAL).with_header("Content-Type", "text/html")
}
