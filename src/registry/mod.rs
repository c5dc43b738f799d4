//! Model registry.
//!
//! Maps opaque model identifiers to pre-built [`ModelHandle`]s and to the
//! provider serving them. A [`Registry`] is produced once by a
//! [`RegistryBuilder`] and is read-only afterwards; share it behind an `Arc`.

pub mod bindings;
pub mod builder;
pub mod diagnostics;
pub mod rules;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::ModelCatalog;
use crate::credentials::CredentialSource;
use crate::error::{RegistryError, Result};
use crate::model::ModelHandle;
use crate::provider::ProviderClient;

pub use bindings::{ModelBinding, builtin_bindings};
pub use builder::RegistryBuilder;
pub use diagnostics::{ProviderStatus, RegistryDiagnostics, SkipReason, SkippedRegistration};
pub use rules::{Matcher, ProviderRule, ProviderRules};

/// Immutable identifier → handle and identifier → provider maps.
pub struct Registry {
    handles: HashMap<String, ModelHandle>,
    providers: HashMap<String, String>,
    clients: BTreeMap<String, Arc<dyn ProviderClient>>,
    diagnostics: RegistryDiagnostics,
}

/// Whether a catalog entry can currently be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelAvailability {
    pub identifier: String,
    pub label: String,
    pub provider: Option<String>,
    pub available: bool,
}

impl Registry {
    /// Shorthand for [`RegistryBuilder::with_defaults`].
    pub fn builder(source: impl CredentialSource) -> RegistryBuilder {
        RegistryBuilder::with_defaults(source)
    }

    /// Handle registered under `identifier`.
    pub fn resolve_handle(&self, identifier: &str) -> Result<ModelHandle> {
        self.handles
            .get(identifier)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownIdentifier(identifier.to_string()))
    }

    pub fn handle(&self, identifier: &str) -> Option<&ModelHandle> {
        self.handles.get(identifier)
    }

    /// Provider serving `identifier`; `None` when it is not registered.
    pub fn resolve_provider(&self, identifier: &str) -> Option<&str> {
        self.providers.get(identifier).map(String::as_str)
    }

    /// Whether `identifier` resolves to a handle. Never fails; misses are logged.
    pub fn verify_exists(&self, identifier: &str) -> bool {
        match self.resolve_handle(identifier) {
            Ok(handle) => {
                tracing::debug!(
                    identifier = %identifier,
                    provider = %handle.provider(),
                    model = %handle.model_name(),
                    "Model verified"
                );
                true
            }
            Err(err) => {
                match self.diagnostics.skip_reason(identifier) {
                    Some(reason) => tracing::warn!(
                        identifier = %identifier,
                        reason = %reason,
                        "Model unavailable"
                    ),
                    None => tracing::warn!(identifier = %identifier, error = %err, "Model not found"),
                }
                false
            }
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.handles.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Identifier → provider, sorted by identifier.
    pub fn provider_map(&self) -> BTreeMap<&str, &str> {
        self.providers
            .iter()
            .map(|(id, provider)| (id.as_str(), provider.as_str()))
            .collect()
    }

    /// Identifiers served by `provider`, sorted.
    pub fn identifiers_for(&self, provider: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .providers
            .iter()
            .filter(|(_, p)| p.as_str() == provider)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Providers with a built client, sorted.
    pub fn configured_providers(&self) -> Vec<&str> {
        self.clients.keys().map(String::as_str).collect()
    }

    pub fn client(&self, provider: &str) -> Option<&Arc<dyn ProviderClient>> {
        self.clients.get(provider)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn diagnostics(&self) -> &RegistryDiagnostics {
        &self.diagnostics
    }

    /// Availability of every catalog entry, in catalog order.
    pub fn availability(&self, catalog: &ModelCatalog) -> Vec<ModelAvailability> {
        catalog
            .iter()
            .map(|d| ModelAvailability {
                identifier: d.id.clone(),
                label: d.label.clone(),
                provider: self.resolve_provider(&d.id).map(str::to_string),
                available: self.contains(&d.id),
            })
            .collect()
    }

    /// Emit the startup summary.
    pub fn log_summary(&self) {
        tracing::info!(
            models = self.len(),
            providers = self.clients.len(),
            "Model registry ready"
        );
        tracing::info!(
            "Registered identifiers: {}",
            self.identifiers().join(", ")
        );
        tracing::info!(
            "Initialized provider clients: {}",
            self.configured_providers().join(", ")
        );
        for (identifier, provider) in self.provider_map() {
            tracing::debug!(identifier = %identifier, provider = %provider, "Provider map entry");
        }
        let skipped = self.diagnostics.skipped();
        if !skipped.is_empty() {
            tracing::info!(count = skipped.len(), "Bindings without a handle");
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("identifiers", &self.identifiers())
            .field("providers", &self.configured_providers())
            .finish()
    }
}

static_assertions::assert_impl_all!(Registry: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use crate::provider::ids;

    fn unconfigured() -> Registry {
        RegistryBuilder::with_defaults(StaticCredentials::new()).build()
    }

    #[test]
    fn only_ungated_providers_without_credentials() {
        let registry = unconfigured();
        assert_eq!(
            registry.configured_providers(),
            vec![ids::COHERE, ids::GOOGLE, ids::MISTRAL]
        );
        assert!(registry.verify_exists("google-gemini-pro"));
        assert!(registry.verify_exists("melad-default"));
        assert!(!registry.verify_exists("compound-beta"));
    }

    #[test]
    fn miss_is_typed() {
        let registry = unconfigured();
        let err = registry.resolve_handle("nope").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownIdentifier(id) if id == "nope"));
        assert_eq!(registry.resolve_provider("nope"), None);
        assert_eq!(
            registry.diagnostics().skip_reason("compound-beta"),
            Some(&SkipReason::ProviderUnconfigured)
        );
    }

    #[test]
    fn provider_map_is_total_over_handles() {
        let registry = unconfigured();
        for id in registry.identifiers() {
            assert!(registry.resolve_provider(id).is_some(), "{id}");
        }
        assert_eq!(registry.provider_map().len(), registry.len());
    }

    #[test]
    fn availability_follows_catalog_order() {
        let registry = unconfigured();
        let catalog = ModelCatalog::builtin();
        let rows = registry.availability(&catalog);
        assert_eq!(rows.len(), catalog.len());
        assert_eq!(rows[0].identifier, "melad-default");
        assert!(rows[0].available);
        let groq = rows.iter().find(|r| r.identifier == "compound-beta").unwrap();
        assert!(!groq.available);
        assert_eq!(groq.provider, None);
    }

    #[test]
    fn identifiers_for_provider() {
        let registry = unconfigured();
        assert_eq!(
            registry.identifiers_for(ids::MISTRAL),
            vec!["melad-mistral", "melad-mistral-vision", "mistral-01"]
        );
    }
}
