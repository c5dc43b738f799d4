//! Provider factory trait and the configuration gate.
//!
//! Each vendor is a [`ProviderFactory`]: credentials in, [`ProviderClient`]
//! out. [`try_build_client`] is the only place a factory is invoked, and it
//! guarantees the "`Some` iff every required field is present" contract.

use std::borrow::Cow;
use std::sync::Arc;

use crate::credentials::{CredentialField, ProviderCredentials};
use crate::error::RegistryError;
use crate::model::ModelHandle;
use crate::registry::diagnostics::ProviderStatus;

use super::openai_compatible::{OpenAiCompatibleClient, OpenAiCompatibleConfig};
use super::spec::{ProviderSpec, builtin_specs};

/// A constructed vendor client. Created once, shared read-only afterwards.
pub trait ProviderClient: Send + Sync {
    /// Provider tag stamped on every handle this client produces.
    fn provider_id(&self) -> Cow<'static, str>;

    /// Effective endpoint, if the client talks HTTP.
    fn base_url(&self) -> Option<&str> {
        None
    }

    /// Materialize a handle for a vendor-specific model name.
    fn model(&self, model_name: &str) -> Result<ModelHandle, RegistryError>;
}

/// Shared, cross-provider construction inputs.
#[derive(Clone, Default)]
pub struct BuildContext {
    /// One HTTP client shared by every provider.
    pub http_client: reqwest::Client,
}

/// Turns credentials into a [`ProviderClient`].
///
/// Factories are never asked to build with missing required fields; the
/// gate in [`try_build_client`] handles that.
pub trait ProviderFactory: Send + Sync {
    fn provider_id(&self) -> Cow<'static, str>;

    /// Name used in diagnostics.
    fn display_name(&self) -> Cow<'static, str> {
        self.provider_id()
    }

    /// Fields that must all be present and non-empty.
    fn required_fields(&self) -> &[CredentialField];

    fn create_client(
        &self,
        credentials: &ProviderCredentials,
        ctx: &BuildContext,
    ) -> Result<Arc<dyn ProviderClient>, RegistryError>;
}

/// Build a client when the provider is fully configured.
///
/// Emits one `info` record per provider describing which required fields
/// were found. Partial credentials yield `None`, never a degraded client.
/// A factory error is logged and also yields `None`.
pub fn try_build_client(
    factory: &dyn ProviderFactory,
    credentials: &ProviderCredentials,
    ctx: &BuildContext,
) -> (Option<Arc<dyn ProviderClient>>, ProviderStatus) {
    let provider = factory.provider_id().into_owned();
    let name = factory.display_name();
    let required = factory.required_fields().to_vec();
    let missing = credentials.missing(&required);
    let present: Vec<CredentialField> = required
        .iter()
        .copied()
        .filter(|f| !missing.contains(f))
        .collect();

    let mut status = ProviderStatus {
        provider: provider.clone(),
        name: name.to_string(),
        required: required.clone(),
        present,
        missing: missing.clone(),
        base_url: None,
        initialized: false,
        error: None,
    };

    tracing::info!(
        provider = %provider,
        configured = missing.is_empty(),
        "{}",
        describe(&name, &required, credentials)
    );

    if !missing.is_empty() {
        return (None, status);
    }

    match factory.create_client(credentials, ctx) {
        Ok(client) => {
            status.base_url = client.base_url().map(str::to_string);
            status.initialized = true;
            tracing::debug!(provider = %provider, "{} client initialized", name);
            (Some(client), status)
        }
        Err(err) => {
            tracing::error!(provider = %provider, error = %err, "{} client failed to build", name);
            status.error = Some(err.to_string());
            (None, status)
        }
    }
}

fn describe(name: &str, required: &[CredentialField], credentials: &ProviderCredentials) -> String {
    if required.is_empty() {
        let key = if credentials.has(CredentialField::ApiKey) {
            "SET"
        } else {
            "NOT SET"
        };
        return format!("Configuring {name}: no required credentials (API Key {key}).");
    }

    let mut msg = format!("Configuring {name}:");
    for field in required {
        match field {
            CredentialField::ApiKey => {
                let state = if credentials.has(*field) {
                    "SET"
                } else {
                    "MISSING"
                };
                msg.push_str(&format!(" API Key {state}."));
            }
            CredentialField::BaseUrl => match credentials.base_url.as_deref() {
                Some(url) if credentials.has(*field) => {
                    msg.push_str(&format!(" Base URL SET ({url})."));
                }
                _ => msg.push_str(" Base URL MISSING."),
            },
        }
    }
    msg
}

/// Factory for any vendor speaking the OpenAI chat-completions protocol.
///
/// Every built-in provider is one of these, parameterized by its [`ProviderSpec`].
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProviderFactory {
    spec: ProviderSpec,
}

impl OpenAiCompatibleProviderFactory {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ProviderSpec {
        &self.spec
    }
}

impl ProviderFactory for OpenAiCompatibleProviderFactory {
    fn provider_id(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.spec.id)
    }

    fn display_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.spec.name)
    }

    fn required_fields(&self) -> &[CredentialField] {
        self.spec.required
    }

    fn create_client(
        &self,
        credentials: &ProviderCredentials,
        ctx: &BuildContext,
    ) -> Result<Arc<dyn ProviderClient>, RegistryError> {
        let base_url = match credentials.base_url.as_deref() {
            Some(raw) => self.spec.endpoint.apply(raw),
            None => self
                .spec
                .default_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .ok_or_else(|| RegistryError::MissingCredential {
                    provider: self.spec.id.to_string(),
                    field: CredentialField::BaseUrl,
                })?,
        };

        let mut config = OpenAiCompatibleConfig::new(self.spec.id, base_url)
            .with_api_key(credentials.api_key_copy());
        for (name, value) in &credentials.extra_headers {
            config = config.with_header(name, value)?;
        }

        Ok(Arc::new(OpenAiCompatibleClient::new(
            config,
            ctx.http_client.clone(),
        )))
    }
}

/// One factory per built-in provider.
pub fn builtin_factories() -> Vec<Arc<dyn ProviderFactory>> {
    builtin_specs()
        .into_iter()
        .map(|spec| Arc::new(OpenAiCompatibleProviderFactory::new(spec)) as Arc<dyn ProviderFactory>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ids, spec};

    fn factory(id: &str) -> OpenAiCompatibleProviderFactory {
        OpenAiCompatibleProviderFactory::new(spec::find(id).unwrap())
    }

    #[test]
    fn gated_provider_without_key_is_not_built() {
        let ctx = BuildContext::default();
        let (client, status) =
            try_build_client(&factory(ids::GROQ), &ProviderCredentials::default(), &ctx);
        assert!(client.is_none());
        assert!(!status.initialized);
        assert_eq!(status.missing, vec![CredentialField::ApiKey]);
    }

    #[test]
    fn partial_credentials_do_not_degrade() {
        let ctx = BuildContext::default();
        let creds = ProviderCredentials::new(Some("k"), None);
        let (client, status) = try_build_client(&factory(ids::KLUSTER), &creds, &ctx);
        assert!(client.is_none());
        assert_eq!(status.present, vec![CredentialField::ApiKey]);
        assert_eq!(status.missing, vec![CredentialField::BaseUrl]);
    }

    #[test]
    fn supplied_endpoint_is_normalized() {
        let ctx = BuildContext::default();
        let creds = ProviderCredentials::new(Some("k"), Some("https://api.kluster.ai/v1/"));
        let (client, status) = try_build_client(&factory(ids::KLUSTER), &creds, &ctx);
        let client = client.expect("kluster should build");
        assert_eq!(client.base_url(), Some("https://api.kluster.ai/v1"));
        assert_eq!(status.base_url.as_deref(), Some("https://api.kluster.ai/v1"));
        assert!(status.initialized);
    }

    #[test]
    fn ungated_provider_builds_without_credentials() {
        let ctx = BuildContext::default();
        let (client, status) =
            try_build_client(&factory(ids::GOOGLE), &ProviderCredentials::default(), &ctx);
        let client = client.expect("google is ungated");
        assert_eq!(client.provider_id(), ids::GOOGLE);
        assert!(status.missing.is_empty());
        assert_eq!(
            client.base_url(),
            Some("https://generativelanguage.googleapis.com/v1beta/openai")
        );
    }

    #[test]
    fn fixed_endpoint_is_used_when_none_supplied() {
        let ctx = BuildContext::default();
        let creds = ProviderCredentials::new(Some("tk"), None);
        let (client, _) = try_build_client(&factory(ids::TOGETHER), &creds, &ctx);
        assert_eq!(
            client.unwrap().base_url(),
            Some("https://api.together.xyz/v1")
        );
    }

    #[test]
    fn direct_build_without_base_url_is_missing_credential() {
        let ctx = BuildContext::default();
        let creds = ProviderCredentials::new(Some("k"), None);
        let err = factory(ids::KLUSTER)
            .create_client(&creds, &ctx)
            .err()
            .expect("kluster has no fixed endpoint");
        assert!(matches!(
            err,
            RegistryError::MissingCredential { ref provider, field: CredentialField::BaseUrl }
                if provider == ids::KLUSTER
        ));
    }

    #[test]
    fn factory_error_is_contained() {
        let ctx = BuildContext::default();
        let creds = ProviderCredentials::new(Some("k"), Some("https://glhf.chat/api/openai"))
            .with_header("bad header", "x");
        let (client, status) = try_build_client(&factory(ids::GLHF), &creds, &ctx);
        assert!(client.is_none());
        assert!(!status.initialized);
        assert!(status.error.is_some());
    }

    #[test]
    fn description_never_contains_the_secret() {
        let creds = ProviderCredentials::new(Some("sk-very-secret"), Some("https://h/v1"));
        let msg = describe("Requesty", spec::find(ids::REQUESTY).unwrap().required, &creds);
        assert_eq!(
            msg,
            "Configuring Requesty: API Key SET. Base URL SET (https://h/v1)."
        );
        assert!(!msg.contains("sk-very-secret"));
    }

    #[test]
    fn builtin_factories_cover_every_provider() {
        let built: Vec<String> = builtin_factories()
            .iter()
            .map(|f| f.provider_id().into_owned())
            .collect();
        assert_eq!(built, ids::ALL);
    }
}
