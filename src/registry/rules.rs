//! Ordered identifier → provider classification table.

use std::cmp::Reverse;

use serde::Serialize;

use crate::provider::ids;

/// How a rule matches an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "pattern", rename_all = "snake_case")]
pub enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    pub fn matches(&self, identifier: &str) -> bool {
        match self {
            Self::Exact(s) => identifier == s,
            Self::Prefix(p) => identifier.starts_with(p.as_str()),
        }
    }

    // Exact before prefix, then longer patterns first.
    fn specificity(&self) -> (bool, usize) {
        match self {
            Self::Exact(s) => (true, s.len()),
            Self::Prefix(p) => (false, p.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRule {
    pub matcher: Matcher,
    pub provider: String,
    /// The pattern is shared by several vendors; a handle's own provider tag
    /// settles the match.
    pub defer_to_tag: bool,
}

impl ProviderRule {
    /// Provider for an identifier this rule matched, given the handle's tag.
    pub fn resolve<'a>(&'a self, tag: &'a str) -> &'a str {
        if self.defer_to_tag { tag } else { &self.provider }
    }
}

/// Rules evaluated most-specific-first.
///
/// The table is kept sorted on every insertion, so the result of
/// [`ProviderRules::classify`] never depends on the order rules were added in
/// (rules of equal specificity keep insertion order).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderRules {
    rules: Vec<ProviderRule>,
}

impl ProviderRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact(self, identifier: impl Into<String>, provider: impl Into<String>) -> Self {
        self.with_rule(Matcher::Exact(identifier.into()), provider)
    }

    pub fn prefix(self, prefix: impl Into<String>, provider: impl Into<String>) -> Self {
        self.with_rule(Matcher::Prefix(prefix.into()), provider)
    }

    /// Prefix whose identifiers may belong to another vendor than `provider`;
    /// the handle tag decides.
    pub fn ambiguous_prefix(
        mut self,
        prefix: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        self.push(ProviderRule {
            matcher: Matcher::Prefix(prefix.into()),
            provider: provider.into(),
            defer_to_tag: true,
        });
        self
    }

    pub fn with_rule(mut self, matcher: Matcher, provider: impl Into<String>) -> Self {
        self.push(ProviderRule {
            matcher,
            provider: provider.into(),
            defer_to_tag: false,
        });
        self
    }

    pub fn push(&mut self, rule: ProviderRule) {
        self.rules.push(rule);
        self.rules
            .sort_by_key(|r| Reverse(r.matcher.specificity()));
    }

    /// Provider for `identifier` under the first matching rule.
    pub fn classify(&self, identifier: &str) -> Option<&str> {
        self.matching(identifier).map(|r| r.provider.as_str())
    }

    /// First rule matching `identifier`.
    pub fn matching(&self, identifier: &str) -> Option<&ProviderRule> {
        self.rules.iter().find(|r| r.matcher.matches(identifier))
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ProviderRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Naming convention of the built-in identifiers.
    pub fn builtin() -> Self {
        Self::new()
            .exact("raycast-melad", ids::GOOGLE)
            .exact("compound-beta", ids::GROQ)
            .prefix("google-", ids::GOOGLE)
            .ambiguous_prefix("melad-", ids::COHERE)
            .ambiguous_prefix("command-", ids::COHERE)
            .prefix("mistral-", ids::MISTRAL)
            .prefix("groq-", ids::GROQ)
            .prefix("openrouter-", ids::OPENROUTER)
            .prefix("deepseek-via-openrouter", ids::DEEPSEEK)
            .prefix("compatible-glhf-", ids::GLHF)
            .prefix("compatible-kluster-", ids::KLUSTER)
            .prefix("tragon-", ids::TRAGON)
            .prefix("together-", ids::TOGETHER)
            .prefix("requesty-", ids::REQUESTY)
    }
}
