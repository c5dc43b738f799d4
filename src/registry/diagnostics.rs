//! Diagnostic trail of a registry build.
//!
//! Lookups only ever say "found" or "not found"; why an identifier is missing
//! (unconfigured provider, unknown provider, failed handle) lives here.

use std::fmt;

use serde::Serialize;

use crate::credentials::CredentialField;

/// Outcome of the configuration gate for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub provider: String,
    pub name: String,
    pub required: Vec<CredentialField>,
    pub present: Vec<CredentialField>,
    pub missing: Vec<CredentialField>,
    /// Effective endpoint once the client is built.
    pub base_url: Option<String>,
    pub initialized: bool,
    pub error: Option<String>,
}

impl ProviderStatus {
    pub fn is_configured(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Why a binding produced no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The provider's client was not built.
    ProviderUnconfigured,
    /// No factory is registered under the binding's provider id.
    ProviderUnknown,
    /// The client refused to materialize the handle.
    HandleConstruction(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderUnconfigured => write!(f, "provider not configured"),
            Self::ProviderUnknown => write!(f, "provider not registered"),
            Self::HandleConstruction(msg) => write!(f, "handle construction failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRegistration {
    pub identifier: String,
    pub provider: String,
    pub reason: SkipReason,
}

/// Everything the build decided, sorted for stable output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistryDiagnostics {
    providers: Vec<ProviderStatus>,
    skipped: Vec<SkippedRegistration>,
}

impl RegistryDiagnostics {
    pub(crate) fn new(
        mut providers: Vec<ProviderStatus>,
        mut skipped: Vec<SkippedRegistration>,
    ) -> Self {
        providers.sort_by(|a, b| a.provider.cmp(&b.provider));
        skipped.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Self { providers, skipped }
    }

    pub fn providers(&self) -> &[ProviderStatus] {
        &self.providers
    }

    pub fn provider(&self, provider: &str) -> Option<&ProviderStatus> {
        self.providers.iter().find(|s| s.provider == provider)
    }

    pub fn skipped(&self) -> &[SkippedRegistration] {
        &self.skipped
    }

    pub fn skip_reason(&self, identifier: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|s| s.identifier == identifier)
            .map(|s| &s.reason)
    }

    /// Providers whose client was built.
    pub fn initialized_providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|s| s.initialized)
            .map(|s| s.provider.as_str())
            .collect()
    }
}
