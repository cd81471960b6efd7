//! Utility functions for the Memento client.

use crate::core::error::{MementoError, Result};
use url::Url;

/// Check that `uri` is non-empty and uses the http or https scheme.
///
/// # Examples
///
/// ```
/// use memento_rs::client::validate_uri;
///
/// assert!(validate_uri("http://example.org/").is_ok());
/// assert!(validate_uri("https://example.org/").is_ok());
/// assert!(validate_uri("").is_err());
/// assert!(validate_uri("ftp://example.org/").is_err());
/// ```
pub fn validate_uri(uri: &str) -> Result<()> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(MementoError::InvalidInput("URI must not be empty".into()));
    }
    let lower = trimmed.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(MementoError::InvalidInput(format!(
            "only http and https URIs are supported: {}",
            uri
        )));
    }
    Ok(())
}

/// Resolve a possibly relative reference against `base`.
///
/// Absolute references come back unchanged. A `base` that does not parse
/// leaves the reference as is.
pub fn resolve_relative(base: &str, reference: &str) -> String {
    if Url::parse(reference).is_ok() {
        return reference.to_string();
    }
    match Url::parse(base).and_then(|b| b.join(reference)) {
        Ok(joined) => joined.to_string(),
        Err(_) => reference.to_string(),
    }
}

/// Append `original_uri` to a TimeGate or TimeMap base, the way aggregators
/// expect (`http://tg/` + `http://example.org/`).
pub fn join_base(base: &str, original_uri: &str) -> String {
    format!("{}{}", base, original_uri)
}
