//! Client configuration.

use crate::error::{Result, SdkError};
use serde::Deserialize;
use soundcloud_core::ClientId;
use std::path::Path;
use url::Url;

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.soundcloud.com";

/// Environment variable prefix read by [`ClientConfig::load`].
pub const ENV_PREFIX: &str = "SOUNDCLOUD";

/// Configuration shared by every request made through a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identifier appended to every resource URL
    pub client_id: ClientId,
    /// Base URL of the API (e.g. "https://api.soundcloud.com")
    pub api_url: Url,
    pub user_agent: String,
    /// Whole-request timeout applied by the HTTP transport
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

/// Raw settings as read from file and environment.
#[derive(Debug, Deserialize)]
struct Settings {
    client_id: Option<String>,

    #[serde(default = "default_api_url")]
    api_url: String,

    #[serde(default = "default_user_agent")]
    user_agent: String,

    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    connect_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a config for the public API with default transport settings.
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Point the client at another API base URL (e.g. a mock server).
    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.api_url = parse_api_url(url)?;
        Ok(self)
    }

    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables prefixed with `SOUNDCLOUD_` override the file
    /// (`SOUNDCLOUD_CLIENT_ID`, `SOUNDCLOUD_API_URL`, ...). When `path` is
    /// `None`, `soundcloud.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path)),
            None => settings.add_source(config::File::with_name("soundcloud").required(false)),
        };

        // Raw strings: a client id of `007` must not become `7`
        settings = settings.add_source(config::Environment::with_prefix(prefix).try_parsing(false));

        let settings: Settings = settings
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| SdkError::configuration(e.to_string()))?;

        let client_id = settings.client_id.ok_or_else(|| {
            SdkError::configuration(format!(
                "client identifier is required (set {prefix}_CLIENT_ID)"
            ))
        })?;

        Ok(Self {
            client_id: ClientId::new(client_id)?,
            api_url: parse_api_url(&settings.api_url)?,
            user_agent: settings.user_agent,
            timeout_secs: settings.timeout_secs,
            connect_timeout_secs: settings.connect_timeout_secs,
        })
    }

    /// URL of an API resource with the client identifier appended.
    ///
    /// `path` is relative to the API base URL; a leading `/` is ignored so the
    /// base URL's own path is kept.
    pub fn resource_url(&self, path: &str) -> Result<Url> {
        let mut base = self.api_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }

        let mut url = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| SdkError::InvalidUrl(format!("{path}: {e}")))?;
        self.client_id.apply(&mut url);
        Ok(url)
    }
}

fn parse_api_url(url: &str) -> Result<Url> {
    let url = url.trim();
    if url.is_empty() {
        return Err(SdkError::InvalidUrl("URL cannot be empty".into()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SdkError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Url::parse(url).map_err(|e| SdkError::InvalidUrl(e.to_string()))
}

// Default values
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    format!("SoundCloudSDK/{} (Rust)", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config() -> ClientConfig {
        ClientConfig::new(ClientId::new("abc").unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.api_url.as_str(), "https://api.soundcloud.com/");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("SoundCloudSDK/"));
    }

    #[test]
    fn test_resource_url() {
        let url = config().resource_url("/tracks/42").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.soundcloud.com/tracks/42?client_id=abc"
        );
    }

    #[test]
    fn test_resource_url_keeps_base_path() {
        let config = config().with_api_url("http://localhost:8080/v1").unwrap();
        let url = config.resource_url("users/7").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/users/7?client_id=abc");
    }

    #[test]
    fn test_api_url_validation() {
        assert!(config().with_api_url("").is_err());
        assert!(config().with_api_url("ftp://example.com").is_err());
        assert!(config().with_api_url("example.com").is_err());
        assert!(config().with_api_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        std::env::set_var("SCTEST_ENV_CLIENT_ID", "from-env");
        std::env::set_var("SCTEST_ENV_TIMEOUT_SECS", "5");

        let config = ClientConfig::load_with_prefix(None, "SCTEST_ENV").unwrap();
        assert_eq!(config.client_id.as_str(), "from-env");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_url.as_str(), "https://api.soundcloud.com/");
    }

    #[test]
    fn test_numeric_looking_client_id_is_kept_verbatim() {
        std::env::set_var("SCTEST_NUMERIC_CLIENT_ID", "007");
        std::env::set_var("SCTEST_NUMERIC_CONNECT_TIMEOUT_SECS", "3");

        let config = ClientConfig::load_with_prefix(None, "SCTEST_NUMERIC").unwrap();
        assert_eq!(config.client_id.as_str(), "007");
        assert_eq!(config.connect_timeout_secs, 3);

        let url = config.resource_url("tracks/1").unwrap();
        assert_eq!(url.query(), Some("client_id=007"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "client_id = \"from-file\"\napi_url = \"http://localhost:9000\""
        )
        .unwrap();

        let config = ClientConfig::load_with_prefix(Some(file.path()), "SCTEST_FILE").unwrap();
        assert_eq!(config.client_id.as_str(), "from-file");
        assert_eq!(config.api_url.as_str(), "http://localhost:9000/");
    }

    #[test]
    fn test_missing_client_id_is_configuration_error() {
        let result = ClientConfig::load_with_prefix(None, "SCTEST_MISSING");
        match result {
            Err(SdkError::Configuration(msg)) => assert!(msg.contains("SCTEST_MISSING_CLIENT_ID")),
            other => panic!("Expected configuration error, got: {:?}", other),
        }
    }

    #[test]
    fn test_blank_client_id_is_configuration_error() {
        std::env::set_var("SCTEST_BLANK_CLIENT_ID", "  ");
        let result = ClientConfig::load_with_prefix(None, "SCTEST_BLANK");
        assert!(matches!(result, Err(SdkError::Configuration(_))));
    }
}
