//! Provider id constants.
//!
//! Centralizing ids avoids "stringly-typed" routing scattered across the
//! factory table, the binding table and the rule table.

pub const GOOGLE: &str = "google";
pub const COHERE: &str = "cohere";
pub const MISTRAL: &str = "mistral";
pub const GROQ: &str = "groq";
pub const OPENROUTER: &str = "openrouter";
/// DeepSeek routed through an OpenRouter-style endpoint.
pub const DEEPSEEK: &str = "deepseek";
pub const GLHF: &str = "glhf";
pub const KLUSTER: &str = "kluster";
/// Targon (kept under the id the deployment already uses).
pub const TRAGON: &str = "tragon";
pub const TOGETHER: &str = "together";
pub const REQUESTY: &str = "requesty";

/// Every built-in provider id.
pub const ALL: &[&str] = &[
    GOOGLE, COHERE, MISTRAL, GROQ, OPENROUTER, DEEPSEEK, GLHF, KLUSTER, TRAGON, TOGETHER, REQUESTY,
];

pub fn is_builtin(provider_id: &str) -> bool {
    ALL.contains(&provider_id)
}
