//! Identifier → (provider, vendor-model-name) bindings.

use serde::{Deserialize, Serialize};

use crate::provider::ids;

/// One registration: `identifier` is served by `provider`'s `vendor_model`.
///
/// Several identifiers may share a vendor model; each is its own binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelBinding {
    pub identifier: String,
    pub provider: String,
    pub vendor_model: String,
}

impl ModelBinding {
    pub fn new(
        identifier: impl Into<String>,
        provider: impl Into<String>,
        vendor_model: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            provider: provider.into(),
            vendor_model: vendor_model.into(),
        }
    }
}

/// Bindings for the built-in identifiers.
pub fn builtin_bindings() -> Vec<ModelBinding> {
    let rows: &[(&str, &str, &str)] = &[
        ("raycast-melad", ids::GOOGLE, "models/gemini-1.5-flash-latest"),
        ("melad-default", ids::COHERE, "command-r7b-12-2024"),
        ("melad-vision", ids::COHERE, "c4ai-aya-vision-32b"),
        ("melad-follow", ids::COHERE, "command-a-03-2025"),
        ("melad-cmd-a", ids::COHERE, "command-a-03-2025"),
        ("melad-mistral", ids::MISTRAL, "mistral-small-latest"),
        ("melad-mistral-vision", ids::MISTRAL, "mistral-small-vision-latest"),
        ("google-gemini-pro", ids::GOOGLE, "models/gemini-2.0-flash-001"),
        ("google-gemini-1.5-pro", ids::GOOGLE, "models/gemini-1.5-pro-latest"),
        ("google-gemini-1.5-flash", ids::GOOGLE, "models/gemini-1.5-flash-latest"),
        ("google-gemini-2.0-flash", ids::GOOGLE, "models/gemini-2.0-flash-latest"),
        ("google-gemini-2.5-pro", ids::GOOGLE, "models/gemini-2.5-pro-experimental"),
        ("google-gemini-2.0-flash-lite", ids::GOOGLE, "models/gemini-2.0-flash-lite"),
        ("google-gemini-2.0-pro", ids::GOOGLE, "models/gemini-2.0-pro-experimental"),
        ("compound-beta", ids::GROQ, "compound-beta"),
        (
            "groq-deepseek-r1-distill-llama-70b",
            ids::GROQ,
            "deepseek-r1-distill-llama-70b-chat",
        ),
        ("command-r-plus", ids::COHERE, "command-r-plus"),
        ("mistral-01", ids::MISTRAL, "mistral-large-latest"),
        ("openrouter-claude-3-opus", ids::OPENROUTER, "anthropic/claude-3-opus"),
        (
            "openrouter-llama-4-maverick",
            ids::OPENROUTER,
            "meta-llama/llama-4-maverick:free",
        ),
        (
            "deepseek-via-openrouter",
            ids::DEEPSEEK,
            "deepseek/deepseek-chat-v3-0324:free",
        ),
        (
            "compatible-glhf-mistral",
            ids::GLHF,
            "hf:mistralai/Mixtral-8x22B-Instruct-v0.1",
        ),
        (
            "compatible-glhf-maverick",
            ids::GLHF,
            "hf:meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8",
        ),
        (
            "compatible-kluster-deepseek",
            ids::KLUSTER,
            "deepseek-ai/DeepSeek-V3-0324",
        ),
        ("tragon-free", ids::TRAGON, "deepseek-ai/DeepSeek-V3-0324"),
        (
            "together-llama-3.3-70b-turbo",
            ids::TOGETHER,
            "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free",
        ),
        (
            "together-deepseek-r1-distill-llama-70b",
            ids::TOGETHER,
            "deepseek-ai/DeepSeek-R1-Distill-Llama-70B-free",
        ),
        ("requesty-gpt-4o-mini", ids::REQUESTY, "openai/gpt-4o-mini"),
        (
            "requesty-gpt-4.1-nano-2025-04-14",
            ids::REQUESTY,
            "openai/gpt-4.1-nano-2025-04-14",
        ),
    ];

    rows.iter()
        .map(|(identifier, provider, vendor_model)| {
            ModelBinding::new(*identifier, *provider, *vendor_model)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::rules::ProviderRules;
    use std::collections::HashSet;

    #[test]
    fn identifiers_are_unique() {
        let bindings = builtin_bindings();
        let unique: HashSet<&str> = bindings.iter().map(|b| b.identifier.as_str()).collect();
        assert_eq!(unique.len(), bindings.len());
        assert_eq!(bindings.len(), 29);
    }

    #[test]
    fn providers_are_builtin() {
        for b in builtin_bindings() {
            assert!(ids::is_builtin(&b.provider), "{} -> {}", b.identifier, b.provider);
        }
    }

    #[test]
    fn every_identifier_is_classified() {
        let rules = ProviderRules::builtin();
        for b in builtin_bindings() {
            let rule = rules.matching(&b.identifier).unwrap();
            assert_eq!(rule.resolve(&b.provider), b.provider, "{}", b.identifier);
        }
    }

    #[test]
    fn aliases_share_vendor_model() {
        let bindings = builtin_bindings();
        let vendor = |id: &str| {
            bindings
                .iter()
                .find(|b| b.identifier == id)
                .map(|b| b.vendor_model.clone())
        };
        assert_eq!(vendor("melad-follow"), vendor("melad-cmd-a"));
        assert_eq!(vendor("raycast-melad"), vendor("google-gemini-1.5-flash"));
    }
}
