//! Client identifier appended to every resource URL.

use crate::error::{Result, SdkError};
use serde::Serialize;
use std::fmt;

/// Name of the query parameter carrying the client identifier.
pub const CLIENT_ID_PARAM: &str = "client_id";

/// A validated, non-empty SoundCloud client identifier.
///
/// There is no process-wide identifier: every component that produces
/// network addresses receives one of these explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClientId(String);

impl ClientId {
    /// Create a client identifier, rejecting empty or blank values.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SdkError::configuration("client identifier cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `client_id=<id>` to the URL's query, keeping existing pairs.
    pub fn apply(&self, url: &mut url::Url) {
        url.query_pairs_mut().append_pair(CLIENT_ID_PARAM, &self.0);
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
