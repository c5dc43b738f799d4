//! Credential sources and per-provider credential bags.
//!
//! A [`CredentialSource`] is an opaque key/value lookup (the process
//! environment by default). The registry captures a [`CredentialsSnapshot`]
//! from it exactly once, so later changes to the source never leak into a
//! registry that has already been built.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::provider::ProviderSpec;

/// A credential field a provider may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialField {
    ApiKey,
    BaseUrl,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialField::ApiKey => write!(f, "api key"),
            CredentialField::BaseUrl => write!(f, "base URL"),
        }
    }
}

/// Key/value lookup for optional secrets.
///
/// Implementations must never fail on an absent key.
pub trait CredentialSource {
    /// Raw value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key` when present and not blank.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Whether `key` is present and not blank.
    fn is_set(&self, key: &str) -> bool {
        self.get_non_empty(key).is_some()
    }
}

impl<S: CredentialSource + ?Sized> CredentialSource for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Reads credentials from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory credentials, mostly for tests and embedding.
#[derive(Default, Clone)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) one key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys only; values may be secrets.
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("StaticCredentials")
            .field("keys", &keys)
            .finish()
    }
}

impl CredentialSource for StaticCredentials {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticCredentials {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Credentials captured for one provider.
#[derive(Debug, Default)]
pub struct ProviderCredentials {
    pub api_key: Option<SecretString>,
    /// Base endpoint as supplied (not yet normalized).
    pub base_url: Option<String>,
    pub extra_headers: Vec<(String, String)>,
}

impl ProviderCredentials {
    /// Read the keys `spec` declares from `source`.
    ///
    /// A base URL that does not parse as an absolute http(s) URL is dropped
    /// (and logged), so the provider counts as missing that field.
    pub fn from_source(source: &dyn CredentialSource, spec: &ProviderSpec) -> Self {
        let api_key = spec
            .api_key_env
            .and_then(|key| source.get_non_empty(key))
            .map(SecretString::from);

        let base_url = spec
            .base_url_env
            .and_then(|key| source.get_non_empty(key))
            .and_then(accept_base_url);

        let extra_headers = spec
            .default_headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        Self {
            api_key,
            base_url,
            extra_headers,
        }
    }

    /// Explicit credentials, bypassing any source.
    ///
    /// The base URL is checked the same way as one read from a source.
    pub fn new(api_key: Option<&str>, base_url: Option<&str>) -> Self {
        Self {
            api_key: api_key
                .filter(|k| !k.trim().is_empty())
                .map(|k| SecretString::from(k.to_string())),
            base_url: base_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .and_then(accept_base_url),
            extra_headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Whether `field` is present and non-empty.
    pub fn has(&self, field: CredentialField) -> bool {
        match field {
            CredentialField::ApiKey => self
                .api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().is_empty()),
            CredentialField::BaseUrl => self.base_url.as_ref().is_some_and(|u| !u.is_empty()),
        }
    }

    /// Required fields that are absent.
    pub fn missing(&self, required: &[CredentialField]) -> Vec<CredentialField> {
        required.iter().copied().filter(|f| !self.has(*f)).collect()
    }

    /// Copy of the key for handing to a client.
    pub(crate) fn api_key_copy(&self) -> Option<SecretString> {
        self.api_key
            .as_ref()
            .map(|k| SecretString::from(k.expose_secret().to_string()))
    }
}

// An endpoint that is not an absolute http(s) URL counts as absent.
fn accept_base_url(value: String) -> Option<String> {
    match validate_base_url(&value) {
        Ok(()) => Some(value),
        Err(reason) => {
            tracing::warn!("Ignoring base URL '{}': {}", value, reason);
            None
        }
    }
}

fn validate_base_url(value: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Credentials for every known provider, captured once.
#[derive(Debug, Default)]
pub struct CredentialsSnapshot {
    by_provider: BTreeMap<String, ProviderCredentials>,
}

impl CredentialsSnapshot {
    /// Read every key the given specs declare, one lookup per key.
    pub fn capture<'a>(
        source: &dyn CredentialSource,
        specs: impl IntoIterator<Item = &'a ProviderSpec>,
    ) -> Self {
        let by_provider = specs
            .into_iter()
            .map(|spec| {
                (
                    spec.id.to_string(),
                    ProviderCredentials::from_source(source, spec),
                )
            })
            .collect();
        Self { by_provider }
    }

    /// Replace the captured credentials for one provider.
    pub fn set(&mut self, provider: impl Into<String>, credentials: ProviderCredentials) {
        self.by_provider.insert(provider.into(), credentials);
    }

    pub fn get(&self, provider: &str) -> Option<&ProviderCredentials> {
        self.by_provider.get(provider)
    }
}
