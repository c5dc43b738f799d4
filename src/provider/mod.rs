//! Provider factory set.
//!
//! Static per-vendor metadata ([`spec`]), endpoint canonicalization
//! ([`endpoint`]), the [`ProviderFactory`] seam and the single
//! OpenAI-compatible client every built-in vendor uses.

pub mod endpoint;
pub mod factory;
pub mod ids;
pub mod openai_compatible;
pub mod spec;

pub use endpoint::{EndpointPolicy, normalize_base_url};
pub use factory::{
    BuildContext, OpenAiCompatibleProviderFactory, ProviderClient, ProviderFactory,
    builtin_factories, try_build_client,
};
pub use openai_compatible::{OpenAiCompatibleClient, OpenAiCompatibleConfig};
pub use spec::{ProviderSpec, builtin_specs};
