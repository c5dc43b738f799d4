//! meladai-registry
//!
//! Resolves opaque model identifiers (e.g. `"melad-default"`, `"compound-beta"`)
//! to ready-to-call chat models, across a dozen upstream vendors whose
//! credentials may or may not be configured.
//!
//! The registry is built exactly once at startup from a credentials snapshot
//! and is immutable afterwards, so it can be shared behind an `Arc` by any
//! number of request handlers without locking.
//!
//! ```rust,ignore
//! use meladai_registry::prelude::*;
//!
//! let registry = RegistryBuilder::with_defaults(EnvCredentials).build();
//! registry.log_summary();
//!
//! if registry.verify_exists("melad-default") {
//!     let model = registry.resolve_handle("melad-default")?;
//!     let reply = model.chat(ChatRequest::user("Hello!")).await?;
//! }
//! ```
#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod provider;
pub mod registry;
pub mod telemetry;

pub use error::{LlmError, RegistryError};

/// Commonly used types.
pub mod prelude {
    pub use crate::catalog::{IconRef, ModelCatalog, ModelDescriptor};
    pub use crate::config::RegistryOptions;
    pub use crate::credentials::{
        CredentialField, CredentialSource, EnvCredentials, ProviderCredentials, StaticCredentials,
    };
    pub use crate::error::{LlmError, RegistryError};
    pub use crate::model::{
        ChatMessage, ChatRequest, ChatResponse, ChatRole, LanguageModel, ModelHandle, Usage,
    };
    pub use crate::provider::{ProviderClient, ProviderFactory, ProviderSpec};
    pub use crate::registry::{
        ModelBinding, ProviderRules, Registry, RegistryBuilder, RegistryDiagnostics,
    };
}
