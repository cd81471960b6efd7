use crate::core::error::Result;
use crate::core::types::{ProbeRequest, ProbeResponse};
use async_trait::async_trait;

/// Abstraction for network operations.
///
/// The negotiation logic only ever talks to the web through this trait, so a
/// scripted implementation can stand in for real archives in tests.
#[async_trait]
pub trait MementoNetwork: Send + Sync + 'static {
    /// Issue one probe, following redirects if `request.follow_redirects` is
    /// set and recording every intermediate hop in `history`.
    ///
    /// Transport failures (refused connection, DNS, timeout) are reported as
    /// [`MementoError::Http`](crate::core::error::MementoError::Http).
    async fn probe(&self, url: &str, request: ProbeRequest) -> Result<ProbeResponse>;
}
