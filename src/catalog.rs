//! Model catalog: presentation metadata for selectable models.
//!
//! The catalog is independent of provider wiring. An identifier may have a
//! descriptor without being registered (its provider is unconfigured) and
//! vice versa.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Icon shown next to a model.
///
/// Serialized as a plain string: paths starting with `/` are static assets,
/// anything else names a UI component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconRef {
    /// Static asset path, e.g. `/groq.svg`.
    Asset(String),
    /// Named UI component, e.g. `MistralIcon`.
    Component(String),
}

impl IconRef {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with('/') {
            Self::Asset(raw)
        } else {
            Self::Component(raw)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Asset(s) | Self::Component(s) => s,
        }
    }
}

impl From<String> for IconRef {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<IconRef> for String {
    fn from(icon: IconRef) -> Self {
        match icon {
            IconRef::Asset(s) | IconRef::Component(s) => s,
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// One selectable model as shown in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Model identifier, unique across the catalog.
    #[serde(rename = "value")]
    pub id: String,
    pub label: String,
    pub icon: IconRef,
    #[serde(default)]
    pub icon_class: String,
    #[serde(default)]
    pub description: String,
    /// Color tag.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub vision: bool,
    #[serde(default)]
    pub experimental: bool,
    /// Grouping category.
    pub category: String,
    /// Extended reasoning.
    #[serde(default)]
    pub thinking: bool,
    /// Informational only; whether a request streams is decided elsewhere.
    #[serde(default = "default_true")]
    pub streaming: bool,
}

impl ModelDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: IconRef::parse(icon),
            icon_class: String::new(),
            description: String::new(),
            color: String::new(),
            vision: false,
            experimental: false,
            category: category.into(),
            thinking: false,
            streaming: true,
        }
    }

    pub fn with_icon_class(mut self, icon_class: impl Into<String>) -> Self {
        self.icon_class = icon_class.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_vision(mut self) -> Self {
        self.vision = true;
        self
    }

    pub fn with_thinking(mut self) -> Self {
        self.thinking = true;
        self
    }

    pub fn experimental(mut self) -> Self {
        self.experimental = true;
        self
    }
}

/// Ordered, identifier-unique list of [`ModelDescriptor`]s.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    descriptors: Vec<ModelDescriptor>,
    index: HashMap<String, usize>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting duplicate identifiers.
    pub fn new(descriptors: Vec<ModelDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (pos, descriptor) in descriptors.iter().enumerate() {
            if index.insert(descriptor.id.clone(), pos).is_some() {
                return Err(RegistryError::DuplicateIdentifier(descriptor.id.clone()));
            }
        }
        Ok(Self { descriptors, index })
    }

    /// Parse a JSON array of descriptors.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let descriptors: Vec<ModelDescriptor> = serde_json::from_str(json)?;
        Self::new(descriptors)
    }

    /// Load a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            entries = catalog.len(),
            "Loaded model catalog"
        );
        Ok(catalog)
    }

    /// Descriptors in display order.
    pub fn list_descriptors(&self) -> &[ModelDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.index.get(id).map(|&pos| &self.descriptors[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// `false` for unknown identifiers.
    pub fn supports_vision(&self, id: &str) -> bool {
        self.get(id).is_some_and(|d| d.vision)
    }

    /// Descriptors grouped by category, categories in first-appearance order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&ModelDescriptor>)> {
        let mut groups: Vec<(&str, Vec<&ModelDescriptor>)> = Vec::new();
        for descriptor in &self.descriptors {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == descriptor.category)
            {
                Some((_, members)) => members.push(descriptor),
                None => groups.push((descriptor.category.as_str(), vec![descriptor])),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// The built-in selection list.
    pub fn builtin() -> Self {
        let descriptors = builtin_descriptors();
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(pos, d)| (d.id.clone(), pos))
            .collect();
        Self { descriptors, index }
    }
}

const ON_DARK: &str = "!text-neutral-900 dark:!text-white";
const MUTED: &str = "!text-neutral-300";

fn builtin_descriptors() -> Vec<ModelDescriptor> {
    vec![
        // Melad aliases
        ModelDescriptor::new("melad-default", "Melad", "/logicon.png", "Stable")
            .with_icon_class(ON_DARK)
            .with_description("Cohere Command R (Fast)")
            .with_color("blue"),
        ModelDescriptor::new("melad-vision", "Melad Vision", "/logicon.png", "Stable")
            .with_icon_class(MUTED)
            .with_description("Cohere Aya Vision")
            .with_color("steel")
            .with_vision(),
        ModelDescriptor::new("melad-cmd-a", "Command A", "/cohere.svg", "Stable")
            .with_icon_class(ON_DARK)
            .with_description("Cohere's Command A model")
            .with_color("purple"),
        // Google
        ModelDescriptor::new("google-gemini-pro", "Gemini Pro", "/gemini-color.svg", "Google")
            .with_icon_class(ON_DARK)
            .with_description("Google's Gemini Pro model")
            .with_color("blue"),
        ModelDescriptor::new(
            "google-gemini-1.5-pro",
            "Gemini 1.5 Pro",
            "/gemini-color.svg",
            "Google",
        )
        .with_icon_class(ON_DARK)
        .with_description("Google's Gemini 1.5 Pro model")
        .with_color("blue")
        .with_vision(),
        ModelDescriptor::new(
            "google-gemini-1.5-flash",
            "Gemini 1.5 Flash",
            "/gemini-color.svg",
            "Google",
        )
        .with_icon_class(ON_DARK)
        .with_description("Fast Gemini 1.5 model")
        .with_color("blue"),
        ModelDescriptor::new(
            "google-gemini-2.0-flash",
            "Gemini 2.0 Flash",
            "/gemini-color.svg",
            "Google",
        )
        .with_icon_class(ON_DARK)
        .with_description("Fast Gemini 2.0 model")
        .with_color("blue"),
        ModelDescriptor::new(
            "google-gemini-2.5-pro",
            "Gemini 2.5 Pro",
            "/gemini-color.svg",
            "Google",
        )
        .with_icon_class(ON_DARK)
        .with_description("Experimental Gemini 2.5")
        .with_color("blue")
        .with_vision(),
        ModelDescriptor::new(
            "google-gemini-2.0-flash-lite",
            "Gemini 2.0 Flash Lite",
            "/gemini-color.svg",
            "Google",
        )
        .with_icon_class(ON_DARK)
        .with_description("Lightweight Gemini 2.0")
        .with_color("blue"),
        ModelDescriptor::new(
            "google-gemini-2.0-pro",
            "Gemini 2.0 Pro",
            "/gemini-color.svg",
            "Google",
        )
        .with_icon_class(ON_DARK)
        .with_description("Experimental Gemini 2.0 Pro")
        .with_color("blue")
        .with_vision(),
        // Requesty router
        ModelDescriptor::new("requesty-gpt-4o-mini", "GPT-4o Mini", "/openai.svg", "OpenAI")
            .with_description("GPT-4o Mini suitable for everyday's")
            .with_color("cyan")
            .with_vision(),
        ModelDescriptor::new(
            "requesty-gpt-4.1-nano-2025-04-14",
            "GPT-4.1 Nano",
            "/openai.svg",
            "OpenAI",
        )
        .with_description("GPT-4.1 Nano latest OpenAI model")
        .with_color("pink")
        .with_vision(),
        // Groq
        ModelDescriptor::new("compound-beta", "Compound Beta", "/groq.svg", "Groq")
            .with_description("Groq Compound Beta")
            .with_color("green"),
        ModelDescriptor::new(
            "groq-deepseek-r1-distill-llama-70b",
            "DeepSeek Llama 70B",
            "/groq.svg",
            "Groq",
        )
        .with_description("DeepSeek R1 Distill Llama 70B via Groq")
        .with_color("green"),
        // Cohere and Mistral
        ModelDescriptor::new("command-r-plus", "Cohere R+", "/cohere.svg", "Cohere")
            .with_icon_class(ON_DARK)
            .with_description("Cohere Command R+ model")
            .with_color("purple"),
        ModelDescriptor::new("mistral-01", "Mistral Large", "MistralIcon", "Mistral")
            .with_icon_class(MUTED)
            .with_description("Mistral Large Latest model")
            .with_color("orange"),
        // OpenRouter
        ModelDescriptor::new(
            "openrouter-llama-4-maverick",
            "Llama 4 Maverick",
            "/ollama.svg",
            "OpenRouter",
        )
        .with_icon_class(ON_DARK)
        .with_description("Meta's Llama 4 Maverick via OpenRouter")
        .with_color("sapphire")
        .with_vision(),
        ModelDescriptor::new(
            "deepseek-via-openrouter",
            "DeepSeek (OpenRouter)",
            "/deepseek.svg",
            "OpenRouter",
        )
        .with_description("DeepSeek Chat via OpenRouter")
        .with_color("blue")
        .with_thinking(),
        // OpenAI-compatible gateways
        ModelDescriptor::new(
            "compatible-glhf-mistral",
            "Mixtral 8x22B (GLHF)",
            "MistralIcon",
            "Compatible",
        )
        .with_icon_class(MUTED)
        .with_description("Mixtral 8x22B via GLHF")
        .with_color("orange"),
        ModelDescriptor::new(
            "compatible-glhf-maverick",
            "Llama Maverick",
            "MistralIcon",
            "Compatible",
        )
        .with_icon_class(MUTED)
        .with_description("Llama Maverick via GLHF")
        .with_color("blue"),
        ModelDescriptor::new(
            "compatible-kluster-deepseek",
            "DeepSeek V3 (Kluster)",
            "/deepseek.svg",
            "Compatible",
        )
        .with_description("DeepSeek V3 via Kluster")
        .with_color("gray"),
        // Together AI
        ModelDescriptor::new(
            "together-deepseek-r1-distill-llama-70b",
            "DeepSeek R1 70B (T)",
            "/deepseek.svg",
            "Compatible",
        )
        .with_description("Distill Llama 70B via Together AI")
        .with_color("teal")
        .with_thinking(),
        ModelDescriptor::new(
            "together-llama-3.3-70b-turbo",
            "Llama 3.3 70B (T)",
            "/meta-color.svg",
            "Compatible",
        )
        .with_description("Llama 3.3 70B Instruct Turbo via Together AI")
        .with_color("teal")
        .with_thinking(),
    ]
}
