//! Base endpoint canonicalization.
//!
//! Users paste endpoints in every shape (`https://host`, `https://host/`,
//! `https://host/v1`, `https://host/v1/`). Appending `/v1` blindly produces
//! `.../v1/v1`, so supplied endpoints are canonicalized before a client is built.

use serde::Serialize;

/// Version segment appended by [`normalize_base_url`].
pub const DEFAULT_VERSION_SUFFIX: &str = "v1";

/// How a provider's supplied base endpoint is canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndpointPolicy {
    /// Strip any trailing `/{suffix}` and slashes, then append exactly one `/{suffix}`.
    VersionSuffix(&'static str),
    /// Keep the path as supplied; only trailing slashes are removed.
    /// Used by google only, whose endpoint ends in `v1beta/openai`.
    Verbatim,
}

impl Default for EndpointPolicy {
    fn default() -> Self {
        Self::VersionSuffix(DEFAULT_VERSION_SUFFIX)
    }
}

impl EndpointPolicy {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Self::VersionSuffix(suffix) => with_version_suffix(raw, suffix),
            Self::Verbatim => raw.trim().trim_end_matches('/').to_string(),
        }
    }
}

/// Canonicalize an endpoint to end in exactly one `/v1`.
///
/// `https://h/`, `https://h/v1` and `https://h/v1/` all become `https://h/v1`.
/// Idempotent.
pub fn normalize_base_url(raw: &str) -> String {
    with_version_suffix(raw, DEFAULT_VERSION_SUFFIX)
}

fn with_version_suffix(raw: &str, suffix: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let segment = format!("/{suffix}");
    let base = trimmed
        .strip_suffix(segment.as_str())
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    format!("{base}{segment}")
}
