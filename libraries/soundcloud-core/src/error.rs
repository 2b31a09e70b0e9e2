//! Error types for the SoundCloud SDK.

use std::fmt;
use thiserror::Error;

/// Errors that can occur when talking to the SoundCloud API.
///
/// Every per-request failure reaches the caller as the `Err` side of a
/// [`Result`] handed to the completion callback. Configuration and lifecycle
/// errors are returned directly from the call that caused them instead.
#[derive(Error, Debug)]
pub enum SdkError {
    /// The network call failed outright, no payload was received
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Payload was received but could not be decoded into the requested value
    #[error("Failed to parse response{}", parsing_detail(.field))]
    Parsing { field: Option<String> },

    /// A required setting (such as the client identifier) is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A resource path could not be turned into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Lifecycle misuse, e.g. starting a request twice
    #[error("Invalid request state: {0}")]
    InvalidState(String),
}

impl SdkError {
    /// Parsing failure pointing at the offending field.
    pub fn parsing(field: impl Into<String>) -> Self {
        Self::Parsing {
            field: Some(field.into()),
        }
    }

    /// Parsing failure with no further diagnostic.
    pub fn parsing_failed() -> Self {
        Self::Parsing { field: None }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error came from the network layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_parsing(&self) -> bool {
        matches!(self, Self::Parsing { .. })
    }
}

fn parsing_detail(field: &Option<String>) -> String {
    match field {
        Some(field) => format!(": missing or invalid `{field}`"),
        None => String::new(),
    }
}

/// Broad classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Could not reach the server
    Connect,
    /// The transport gave up waiting
    Timeout,
    /// Anything else (TLS, malformed response, body read failure, ...)
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Failure reported by a transport implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }
}

/// Result type for SDK operations.
///
/// `Ok` carries the decoded value, `Err` the structured failure. Exactly one
/// side is ever populated, so `is_ok()`, `ok()` and `err()` are the success
/// flag and the two projections.
pub type Result<T> = std::result::Result<T, SdkError>;
