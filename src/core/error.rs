//! Error types for Memento operations.
//!
//! This module defines all error types that can occur while parsing Memento
//! headers, probing resources and negotiating with TimeGates. The [`Result`]
//! type alias provides a convenient shorthand for operations that may fail.
//!
//! # Error Categories
//!
//! | Category | Variants | Soft during discovery |
//! |----------|----------|-----------------------|
//! | Input | `InvalidInput`, `Config` | No |
//! | Protocol | `LinkParse`, `LinkParseEof`, `DateParse`, `Negotiation` | No |
//! | Network | `Http` | Yes |
//! | Data | `Json`, `Xml` | No |
//!
//! # Examples
//!
//! ```
//! use memento_rs::MementoError;
//!
//! let err = MementoError::Http("connection refused".into());
//! assert!(err.is_connectivity());
//!
//! let err = MementoError::InvalidInput("ftp://example.org".into());
//! assert!(!err.is_connectivity());
//! ```

use crate::core::protocol::link::LinkParseState;
use std::fmt;
use thiserror::Error;

/// Result type for Memento operations.
pub type Result<T> = std::result::Result<T, MementoError>;

/// Everything known about a negotiation at the point it went wrong.
///
/// Carried by [`MementoError::Negotiation`] so the caller can tell which
/// external server misbehaved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationContext {
    pub message: String,
    pub status: Option<u16>,
    pub timegate_uri: Option<String>,
    pub original_uri: Option<String>,
    pub request_uri: Option<String>,
    pub accept_datetime: Option<String>,
    pub memento_uri: Option<String>,
}

impl NegotiationContext {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_timegate(mut self, uri: impl Into<String>) -> Self {
        self.timegate_uri = Some(uri.into());
        self
    }

    pub fn with_original(mut self, uri: impl Into<String>) -> Self {
        self.original_uri = Some(uri.into());
        self
    }

    pub fn with_request(mut self, uri: impl Into<String>) -> Self {
        self.request_uri = Some(uri.into());
        self
    }

    pub fn with_accept_datetime(mut self, datetime: Option<String>) -> Self {
        self.accept_datetime = datetime;
        self
    }

    pub fn with_memento(mut self, uri: impl Into<String>) -> Self {
        self.memento_uri = Some(uri.into());
        self
    }
}

impl fmt::Display for NegotiationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {})", status)?;
        }
        let fields = [
            ("timegate", &self.timegate_uri),
            ("original", &self.original_uri),
            ("request", &self.request_uri),
            ("accept-datetime", &self.accept_datetime),
            ("memento", &self.memento_uri),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                write!(f, " {}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur during Memento operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MementoError {
    /// The caller supplied something unusable: an empty URI, a non-HTTP
    /// scheme, or a datetime string that does not decode.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed `Link` header syntax.
    #[error("Link header parse error: unexpected {found:?} at position {position} in state {state}")]
    LinkParse {
        found: char,
        state: LinkParseState,
        position: usize,
    },

    /// The `Link` header ended in the middle of an entry.
    #[error("Link header parse error: unexpected end of input in state {state}")]
    LinkParseEof { state: LinkParseState },

    /// A date did not match the HTTP-date or TimeMap format.
    #[error("Date parse error: {0}")]
    DateParse(String),

    /// A TimeGate did not behave per RFC 7089.
    #[error("Negotiation error: {0}")]
    Negotiation(Box<NegotiationContext>),

    /// Transport failure (connection refused, DNS, TLS, timeout).
    ///
    /// Swallowed during native discovery, surfaced everywhere else.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Malformed TimeMap JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed archive registry XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MementoError {
    pub fn negotiation(context: NegotiationContext) -> Self {
        MementoError::Negotiation(Box::new(context))
    }

    /// Check if this error came from the transport rather than the protocol.
    ///
    /// # Examples
    ///
    /// ```
    /// use memento_rs::MementoError;
    ///
    /// assert!(MementoError::Http("timed out".into()).is_connectivity());
    /// assert!(!MementoError::Config("bad".into()).is_connectivity());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, MementoError::Http(_))
    }

    /// Check if this is a `Link` header syntax error.
    #[inline]
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            MementoError::LinkParse { .. } | MementoError::LinkParseEof { .. }
        )
    }

    /// The negotiation context, if this is a negotiation failure.
    pub fn negotiation_context(&self) -> Option<&NegotiationContext> {
        match self {
            MementoError::Negotiation(ctx) => Some(ctx),
            _ => None,
        }
    }
}

impl From<quick_xml::DeError> for MementoError {
    fn from(err: quick_xml::DeError) -> Self {
        MementoError::Xml(err.to_string())
    }
}

impl From<url::ParseError> for MementoError {
    fn from(err: url::ParseError) -> Self {
        MementoError::InvalidInput(err.to_string())
    }
}
