//! Configuration for the Memento client.
//!
//! This module defines the [`ClientConfig`] struct that controls where the
//! client falls back to when a resource advertises no TimeGate of its own,
//! how many redirects it follows, and the transport knobs of the underlying
//! HTTP client.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `timegate_uri` | `http://timetravel.mementoweb.org/timegate/` | Fallback TimeGate base |
//! | `timemap_uri` | `http://timetravel.mementoweb.org/timemap/link/` | Fallback TimeMap base |
//! | `archive_registry_uri` | `http://labs.mementoweb.org/aggregator_config/archivelist.xml` | Archive list |
//! | `check_native_timegate` | true | Look for a TimeGate advertised by the resource |
//! | `max_redirects` | 50 | Redirect budget per call |
//! | `request_timeout_ms` | 30000 | Per-request timeout |
//! | `enable_logging` | false | Log the chosen TimeGate |
//!
//! # Examples
//!
//! ```
//! use memento_rs::ClientConfig;
//!
//! let config = ClientConfig {
//!     check_native_timegate: false,
//!     ..Default::default()
//! };
//! assert_eq!(config.max_redirects, 50);
//! assert!(config.validate().is_ok());
//! ```

use crate::core::error::{MementoError, Result};
use crate::core::protocol::constants::defaults;

/// Configuration for the Memento client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URI of the TimeGate used when no native TimeGate is found.
    ///
    /// The original URI is appended verbatim.
    pub timegate_uri: String,

    /// Base URI of the TimeMap used when no native TimeMap is found.
    pub timemap_uri: String,

    /// Location of the archive registry XML.
    pub archive_registry_uri: String,

    /// Look for a `rel="timegate"` link on the original resource first.
    pub check_native_timegate: bool,

    /// Maximum redirects followed by one call, during discovery and
    /// negotiation alike.
    pub max_redirects: u32,

    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Proxy URL (optional).
    ///
    /// If set, requests will be routed through this proxy.
    pub proxy_url: String,

    /// `User-Agent` sent with every probe. Empty keeps reqwest's default.
    pub user_agent: String,

    /// Enable request logging.
    ///
    /// When enabled, logs the TimeGate chosen for each negotiation using the
    /// `tracing` crate.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timegate_uri: defaults::TIMEGATE_BASE_URI.to_string(),
            timemap_uri: defaults::TIMEMAP_BASE_URI.to_string(),
            archive_registry_uri: defaults::ARCHIVE_REGISTRY_URI.to_string(),
            check_native_timegate: true,
            max_redirects: defaults::MAX_REDIRECTS,
            request_timeout_ms: 30000,
            proxy_url: String::new(),
            user_agent: String::new(),
            enable_logging: false,
        }
    }
}

impl ClientConfig {
    /// Check that every base URI is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("timegate_uri", &self.timegate_uri),
            ("timemap_uri", &self.timemap_uri),
            ("archive_registry_uri", &self.archive_registry_uri),
        ] {
            let parsed = url::Url::parse(value)
                .map_err(|e| MementoError::Config(format!("{}: {} ({})", name, value, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(MementoError::Config(format!(
                    "{}: expected an http(s) URL, got {}",
                    name, value
                )));
            }
        }
        if !self.proxy_url.is_empty() && url::Url::parse(&self.proxy_url).is_err() {
            return Err(MementoError::Config(format!(
                "proxy_url: {} is not a URL",
                self.proxy_url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timegate_uri, "http://timetravel.mementoweb.org/timegate/");
        assert_eq!(config.timemap_uri, "http://timetravel.mementoweb.org/timemap/link/");
        assert!(config.check_native_timegate);
        assert_eq!(config.max_redirects, 50);
        assert!(!config.enable_logging);
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig {
            max_redirects: 3,
            ..Default::default()
        };
        assert_eq!(config.max_redirects, 3);
        assert!(config.check_native_timegate);
    }

    #[test]
    fn test_validate_default() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http() {
        let config = ClientConfig {
            timegate_uri: "ftp://archive.example/tg/".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MementoError::Config(_))));

        let config = ClientConfig {
            timemap_uri: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MementoError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_proxy() {
        let config = ClientConfig {
            proxy_url: "::nope".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clone() {
        let config = ClientConfig::default();
        assert_eq!(config.clone(), config);
    }
}
