//! HTTP configuration shared by every provider client.
//!
//! The registry builds exactly one `reqwest::Client` from [`RegistryOptions`]
//! and hands it to every factory through the build context. Building a client
//! is in-memory work; nothing here touches the network.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::RegistryError;

/// Default request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Default connection timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default user agent.
pub const USER_AGENT: &str = concat!("meladai-registry/", env!("CARGO_PKG_VERSION"));

/// HTTP options for the shared client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
    /// Request timeout, in seconds when serialized
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout, in seconds when serialized
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Headers sent on every request, to every provider
    pub headers: HashMap<String, String>,
    /// Proxy URL
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            timeout: Some(REQUEST_TIMEOUT),
            connect_timeout: Some(CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(USER_AGENT.to_string()),
        }
    }
}

impl RegistryOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Parse options from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json)
            .map_err(|e| RegistryError::Configuration(format!("Invalid registry options: {e}")))
    }
}

/// Build an HTTP client from [`RegistryOptions`].
pub fn build_http_client(options: &RegistryOptions) -> Result<reqwest::Client, RegistryError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = options.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(proxy_url) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| RegistryError::Configuration(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }
    if let Some(user_agent) = &options.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if !options.headers.is_empty() {
        let mut headers = reqwest::header::HeaderMap::new();
        for (k, v) in &options.headers {
            let name = reqwest::header::HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                RegistryError::Configuration(format!("Invalid header name '{k}': {e}"))
            })?;
            let value = reqwest::header::HeaderValue::from_str(v).map_err(|e| {
                RegistryError::Configuration(format!("Invalid header value for '{k}': {e}"))
            })?;
            headers.insert(name, value);
        }
        builder = builder.default_headers(headers);
    }

    builder
        .build()
        .map_err(|e| RegistryError::Configuration(format!("Failed to build HTTP client: {e}")))
}

// Durations travel as whole seconds.
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
