//! One-shot assembly of an immutable [`Registry`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::{RegistryOptions, build_http_client};
use crate::credentials::{CredentialSource, CredentialsSnapshot, ProviderCredentials};
use crate::error::RegistryError;
use crate::model::ModelHandle;
use crate::provider::{
    BuildContext, ProviderClient, ProviderFactory, builtin_factories, builtin_specs,
    try_build_client,
};

use super::Registry;
use super::bindings::{ModelBinding, builtin_bindings};
use super::diagnostics::{RegistryDiagnostics, SkipReason, SkippedRegistration};
use super::rules::ProviderRules;

/// Collects factories, bindings and a credentials snapshot, then builds once.
///
/// Factories and bindings are keyed, so the built registry depends only on
/// what was added, never on the order it was added in.
pub struct RegistryBuilder {
    credentials: CredentialsSnapshot,
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
    bindings: BTreeMap<String, ModelBinding>,
    rules: ProviderRules,
    options: RegistryOptions,
}

impl RegistryBuilder {
    /// Empty builder. Credentials for the built-in providers are read from
    /// `source` right away; the source is not consulted again.
    pub fn new(source: impl CredentialSource) -> Self {
        let specs = builtin_specs();
        Self {
            credentials: CredentialsSnapshot::capture(&source, specs.iter()),
            factories: BTreeMap::new(),
            bindings: BTreeMap::new(),
            rules: ProviderRules::new(),
            options: RegistryOptions::default(),
        }
    }

    /// Built-in factories, bindings and naming rules.
    pub fn with_defaults(source: impl CredentialSource) -> Self {
        let mut builder = Self::new(source).rules(ProviderRules::builtin());
        for factory in builtin_factories() {
            builder = builder.register_factory(factory);
        }
        builder.bind_all(builtin_bindings())
    }

    /// Add or replace the factory for `factory.provider_id()`.
    pub fn register_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        let id = factory.provider_id().into_owned();
        if self.factories.insert(id.clone(), factory).is_some() {
            tracing::debug!(provider = %id, "Replacing provider factory");
        }
        self
    }

    /// Override the captured credentials for one provider.
    pub fn credentials(mut self, provider: impl Into<String>, credentials: ProviderCredentials) -> Self {
        self.credentials.set(provider, credentials);
        self
    }

    /// Add a binding; a later binding for the same identifier replaces the earlier one.
    pub fn bind(mut self, binding: ModelBinding) -> Self {
        let identifier = binding.identifier.clone();
        if let Some(previous) = self.bindings.insert(identifier.clone(), binding) {
            tracing::warn!(
                identifier = %identifier,
                previous_provider = %previous.provider,
                "Replacing existing model binding"
            );
        }
        self
    }

    pub fn bind_all(self, bindings: impl IntoIterator<Item = ModelBinding>) -> Self {
        bindings.into_iter().fold(self, Self::bind)
    }

    pub fn remove_binding(mut self, identifier: &str) -> Self {
        self.bindings.remove(identifier);
        self
    }

    /// Replace the classification table.
    pub fn rules(mut self, rules: ProviderRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn options(mut self, options: RegistryOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the registry. Never fails: unconfigured providers and broken
    /// bindings are recorded in the diagnostics and contribute no entries.
    pub fn build(self) -> Registry {
        let http_client = build_http_client(&self.options).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Falling back to a default HTTP client");
            reqwest::Client::default()
        });
        let ctx = BuildContext { http_client };

        let fallback = ProviderCredentials::default();
        let mut clients: BTreeMap<String, Arc<dyn ProviderClient>> = BTreeMap::new();
        let mut statuses = Vec::with_capacity(self.factories.len());
        for (id, factory) in &self.factories {
            let credentials = self.credentials.get(id).unwrap_or(&fallback);
            let (client, status) = try_build_client(factory.as_ref(), credentials, &ctx);
            statuses.push(status);
            if let Some(client) = client {
                clients.insert(id.clone(), client);
            }
        }

        let mut handles = HashMap::with_capacity(self.bindings.len());
        let mut skipped = Vec::new();
        for binding in self.bindings.values() {
            match register(binding, clients.get(&binding.provider), &self.factories) {
                Ok(handle) => {
                    handles.insert(binding.identifier.clone(), handle);
                }
                Err(reason) => skipped.push(SkippedRegistration {
                    identifier: binding.identifier.clone(),
                    provider: binding.provider.clone(),
                    reason,
                }),
            }
        }

        let providers = handles
            .iter()
            .map(|(identifier, handle)| {
                (identifier.clone(), classify(&self.rules, identifier, handle))
            })
            .collect();

        Registry {
            handles,
            providers,
            clients,
            diagnostics: RegistryDiagnostics::new(statuses, skipped),
        }
    }
}

fn register(
    binding: &ModelBinding,
    client: Option<&Arc<dyn ProviderClient>>,
    factories: &BTreeMap<String, Arc<dyn ProviderFactory>>,
) -> Result<ModelHandle, SkipReason> {
    let Some(client) = client else {
        let reason = if factories.contains_key(&binding.provider) {
            SkipReason::ProviderUnconfigured
        } else {
            SkipReason::ProviderUnknown
        };
        tracing::debug!(
            identifier = %binding.identifier,
            provider = %binding.provider,
            "Skipping registration: {}",
            reason
        );
        return Err(reason);
    };

    client.model(&binding.vendor_model).map_err(|source| {
        let err = RegistryError::HandleConstruction {
            identifier: binding.identifier.clone(),
            provider: binding.provider.clone(),
            message: source.to_string(),
        };
        tracing::error!(
            identifier = %binding.identifier,
            provider = %binding.provider,
            error = %err,
            "Failed to construct model handle"
        );
        SkipReason::HandleConstruction(source.to_string())
    })
}

// The matching rule decides. Ambiguous rules and unmatched identifiers fall
// back to the handle's provider tag.
fn classify(rules: &ProviderRules, identifier: &str, handle: &ModelHandle) -> String {
    let tag = handle.provider();
    let Some(rule) = rules.matching(identifier) else {
        tracing::debug!(identifier = %identifier, tag = %tag, "No naming rule matched");
        return tag.to_string();
    };

    let provider = rule.resolve(tag);
    if provider != rule.provider {
        tracing::debug!(
            identifier = %identifier,
            rule = %rule.provider,
            tag = %tag,
            "Provider tag overrides ambiguous naming rule"
        );
    } else if provider != tag {
        tracing::debug!(
            identifier = %identifier,
            rule = %rule.provider,
            tag = %tag,
            "Naming rule disagrees with provider tag"
        );
    }
    provider.to_string()
}
