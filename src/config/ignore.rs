//! Ignore rules: assets that keep their original name.
//!
//! An ignored asset is still hashed and its contents are still rewritten;
//! only its own path stays the same, and references to it are left alone.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::ConfigError;

/// Only the root favicon, which browsers request by its fixed name.
pub(crate) const ROOT_FAVICON_PATTERN: &str = r"^/favicon\.ico$";

static ROOT_FAVICON: LazyLock<Regex> = LazyLock::new(|| Regex::new(ROOT_FAVICON_PATTERN).unwrap());

/// Matches original paths (`/css/style.css`) of assets that must not be renamed.
#[derive(Clone)]
pub enum IgnoreRule {
    /// Path suffix: `.html`, `/robots.txt`, `favicon.ico`.
    Suffix(String),
    /// Regular expression over the root-relative path.
    Pattern(Regex),
}

impl IgnoreRule {
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    /// Compile a pattern rule.
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| ConfigError::Pattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Suffix(suffix) => path.ends_with(suffix.as_str()),
            Self::Pattern(regex) => regex.is_match(path),
        }
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suffix(suffix) => write!(f, "Suffix({suffix:?})"),
            Self::Pattern(regex) => write!(f, "Pattern({:?})", regex.as_str()),
        }
    }
}

impl PartialEq for IgnoreRule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Suffix(a), Self::Suffix(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// Ordered rule list; an asset is ignored when any rule matches.
#[derive(Debug, Clone, PartialEq)]
pub struct IgnoreRules(Vec<IgnoreRule>);

impl IgnoreRules {
    /// No rules: every asset is renamed.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn new(rules: Vec<IgnoreRule>) -> Self {
        Self(rules)
    }

    pub fn push(&mut self, rule: IgnoreRule) {
        self.0.push(rule);
    }

    pub fn matches(&self, path: &str) -> bool {
        self.0.iter().any(|rule| rule.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self(vec![IgnoreRule::Pattern(ROOT_FAVICON.clone())])
    }
}

impl FromIterator<IgnoreRule> for IgnoreRules {
    fn from_iter<I: IntoIterator<Item = IgnoreRule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
