//! Static metadata for the built-in providers.
//!
//! One table drives credential capture, the "is this provider configured"
//! gate, endpoint canonicalization and default headers, so the env var names
//! and base URLs are not re-encoded in several places.

use serde::Serialize;

use super::endpoint::EndpointPolicy;
use super::ids;
use crate::credentials::CredentialField;

const API_KEY: &[CredentialField] = &[CredentialField::ApiKey];
const API_KEY_AND_BASE_URL: &[CredentialField] =
    &[CredentialField::ApiKey, CredentialField::BaseUrl];
const NOTHING: &[CredentialField] = &[];

/// Headers some OpenAI-compatible gateways expect on streaming-capable routes.
const SSE_HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/event-stream"),
    ("Cache-Control", "no-cache"),
    ("Connection", "keep-alive"),
];

/// Static description of one upstream vendor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderSpec {
    /// Canonical provider id (see [`ids`]).
    pub id: &'static str,
    /// Human-readable name used in diagnostics.
    pub name: &'static str,
    /// Environment key holding the secret.
    pub api_key_env: Option<&'static str>,
    /// Environment key holding the base endpoint.
    pub base_url_env: Option<&'static str>,
    /// Fields that must all be present for the provider to be configured.
    pub required: &'static [CredentialField],
    /// Endpoint used when none is supplied.
    pub default_base_url: Option<&'static str>,
    /// Canonicalization applied to a supplied endpoint.
    pub endpoint: EndpointPolicy,
    /// Headers sent with every request.
    pub default_headers: &'static [(&'static str, &'static str)],
}

impl ProviderSpec {
    /// Providers without required fields are always built.
    pub fn is_gated(&self) -> bool {
        !self.required.is_empty()
    }
}

/// Specs for every built-in provider.
pub fn builtin_specs() -> Vec<ProviderSpec> {
    vec![
        // Ungated: clients are built unconditionally and pick up a key if one exists.
        ProviderSpec {
            id: ids::GOOGLE,
            name: "Google Generative AI",
            api_key_env: Some("GOOGLE_GENERATIVE_AI_API_KEY"),
            base_url_env: Some("GOOGLE_GENERATIVE_AI_API_BASE_URL"),
            required: NOTHING,
            default_base_url: Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            // `v1beta/openai` must survive untouched.
            endpoint: EndpointPolicy::Verbatim,
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::COHERE,
            name: "Cohere",
            api_key_env: Some("COHERE_API_KEY"),
            base_url_env: None,
            required: NOTHING,
            default_base_url: Some("https://api.cohere.ai/compatibility/v1"),
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::MISTRAL,
            name: "Mistral",
            api_key_env: Some("MISTRAL_API_KEY"),
            base_url_env: None,
            required: NOTHING,
            default_base_url: Some("https://api.mistral.ai/v1"),
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::GROQ,
            name: "Groq",
            api_key_env: Some("GROQ_API_KEY"),
            base_url_env: None,
            required: API_KEY,
            default_base_url: Some("https://api.groq.com/openai/v1"),
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::OPENROUTER,
            name: "OpenRouter",
            api_key_env: Some("OPENROUTER_API_KEY"),
            base_url_env: None,
            required: API_KEY,
            default_base_url: Some("https://openrouter.ai/api/v1"),
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::DEEPSEEK,
            name: "DeepSeek (Direct/OpenRouter)",
            api_key_env: Some("DEEPSEEK_API_KEY"),
            base_url_env: Some("DEEPSEEK_BASE_URL"),
            required: API_KEY_AND_BASE_URL,
            default_base_url: None,
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::GLHF,
            name: "GLHF",
            api_key_env: Some("OPENAI_COMPATIBLE_API_KEY_GLHF"),
            base_url_env: Some("OPENAI_COMPATIBLE_API_BASE_URL_GLHF"),
            required: API_KEY_AND_BASE_URL,
            default_base_url: None,
            endpoint: EndpointPolicy::default(),
            default_headers: SSE_HEADERS,
        },
        ProviderSpec {
            id: ids::KLUSTER,
            name: "Kluster",
            api_key_env: Some("OPENAI_COMPATIBLE_API_KEY_KLUSTER"),
            base_url_env: Some("OPENAI_COMPATIBLE_API_BASE_URL_KLUSTER"),
            required: API_KEY_AND_BASE_URL,
            default_base_url: None,
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::TRAGON,
            name: "Tragon/Targon",
            api_key_env: Some("TARGON_API_KEY"),
            base_url_env: Some("TARGON_BASE_URL"),
            required: API_KEY_AND_BASE_URL,
            default_base_url: None,
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::TOGETHER,
            name: "Together AI",
            api_key_env: Some("TOGETHER_API_KEY"),
            // Endpoint is fixed.
            base_url_env: None,
            required: API_KEY,
            default_base_url: Some("https://api.together.xyz/v1"),
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
        ProviderSpec {
            id: ids::REQUESTY,
            name: "Requesty",
            api_key_env: Some("REQUESTY_API_KEY"),
            base_url_env: Some("REQUESTY_BASE_URL"),
            required: API_KEY_AND_BASE_URL,
            default_base_url: None,
            endpoint: EndpointPolicy::default(),
            default_headers: &[],
        },
    ]
}

/// Look up a built-in spec by id.
pub fn find(provider_id: &str) -> Option<ProviderSpec> {
    builtin_specs().into_iter().find(|s| s.id == provider_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_id_has_a_spec() {
        let specs = builtin_specs();
        assert_eq!(specs.len(), ids::ALL.len());
        for id in ids::ALL {
            assert!(find(id).is_some(), "missing spec for {id}");
        }
    }

    #[test]
    fn required_base_url_implies_an_env_key() {
        for spec in builtin_specs() {
            if spec.required.contains(&CredentialField::BaseUrl) {
                assert!(spec.base_url_env.is_some(), "{} cannot be configured", spec.id);
            } else {
                assert!(
                    spec.default_base_url.is_some(),
                    "{} has no endpoint at all",
                    spec.id
                );
            }
        }
    }

    #[test]
    fn only_google_cohere_and_mistral_are_ungated() {
        let mut ungated: Vec<&str> = builtin_specs()
            .into_iter()
            .filter(|s| !s.is_gated())
            .map(|s| s.id)
            .collect();
        ungated.sort_unstable();
        assert_eq!(ungated, vec![ids::COHERE, ids::GOOGLE, ids::MISTRAL]);
    }

    #[test]
    fn glhf_carries_sse_headers() {
        let glhf = find(ids::GLHF).unwrap();
        assert!(
            glhf.default_headers
                .iter()
                .any(|(k, v)| *k == "Accept" && *v == "text/event-stream")
        );
    }
}
