//! Revisioning options and the `revmark.toml` configuration file.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── ignore     # IgnoreRule, IgnoreRules
//! ├── util       # find_config_file
//! └── mod.rs     # RevOptions, RevConfig (this file)
//! ```
//!
//! [`RevOptions`] is what the engine consumes; it carries the hook objects
//! and is built in code. [`RevConfig`] is its serializable subset, read
//! from TOML:
//!
//! ```toml
//! hash_length = 8
//! prefix = "https://cdn.example.com/"
//! ignore = [".html", "/robots.txt", { regex = "^/favicon\\.ico$" }]
//!
//! [manifest]
//! enable = true
//! path = "rev-manifest.json"
//! ```

mod error;
mod ignore;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use ignore::{IgnoreRule, IgnoreRules};
pub use util::find_config_file;

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::log;
use crate::resolve::PathTransform;
use crate::revision::FilenameTransform;

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "revmark.toml";

/// Hex characters of the composite hash kept in file names by default.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// A blake3 digest has 64 hex characters.
pub const MAX_HASH_LENGTH: usize = 64;

// ============================================================================
// runtime options
// ============================================================================

/// Options for one [`Revisioner`](crate::revision::Revisioner).
pub struct RevOptions {
    /// Number of hash characters in default file names.
    pub hash_length: usize,
    /// Assets that keep their original name.
    pub ignore: IgnoreRules,
    /// URL prefix for rewritten references (not for stored paths).
    pub prefix: Option<String>,
    /// Replaces the default `<stem>.<hash>.<ext>` naming.
    pub filename_transform: Option<Box<dyn FilenameTransform>>,
    /// Replaces the default reference string at each rewrite site.
    pub path_transform: Option<Box<dyn PathTransform>>,
}

impl Default for RevOptions {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            ignore: IgnoreRules::default(),
            prefix: None,
            filename_transform: None,
            path_transform: None,
        }
    }
}

impl fmt::Debug for RevOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevOptions")
            .field("hash_length", &self.hash_length)
            .field("ignore", &self.ignore)
            .field("prefix", &self.prefix)
            .field("filename_transform", &self.filename_transform.is_some())
            .field("path_transform", &self.path_transform.is_some())
            .finish()
    }
}

impl RevOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash_length(mut self, hash_length: usize) -> Self {
        self.hash_length = hash_length;
        self
    }

    /// Replace the ignore rules (the default favicon rule included).
    pub fn with_ignore(mut self, ignore: IgnoreRules) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_filename_transform(mut self, transform: impl FilenameTransform + 'static) -> Self {
        self.filename_transform = Some(Box::new(transform));
        self
    }

    pub fn with_path_transform(mut self, transform: impl PathTransform + 'static) -> Self {
        self.path_transform = Some(Box::new(transform));
        self
    }

    /// Check every option, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        check_hash_length(self.hash_length, &mut diag);
        check_prefix(self.prefix.as_deref(), &mut diag);
        diag.into_result()
    }
}

fn check_hash_length(hash_length: usize, diag: &mut ConfigDiagnostics) {
    if !(1..=MAX_HASH_LENGTH).contains(&hash_length) {
        diag.error_with_hint(
            "hash_length",
            format!("must be between 1 and {MAX_HASH_LENGTH}, got {hash_length}"),
            format!("the default is {DEFAULT_HASH_LENGTH}"),
        );
    }
}

fn check_prefix(prefix: Option<&str>, diag: &mut ConfigDiagnostics) {
    if prefix.is_some_and(|p| p.trim().is_empty()) {
        diag.error_with_hint(
            "prefix",
            "must not be empty",
            "remove the key to emit plain paths",
        );
    }
}

// ============================================================================
// config file
// ============================================================================

/// Contents of `revmark.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RevConfig {
    pub hash_length: usize,
    pub prefix: Option<String>,
    /// `None` keeps the default rules; a list (even empty) replaces them.
    pub ignore: Option<Vec<IgnoreEntry>>,
    pub manifest: ManifestConfig,
}

impl Default for RevConfig {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            prefix: None,
            ignore: None,
            manifest: ManifestConfig::default(),
        }
    }
}

/// `ignore` list entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IgnoreEntry {
    /// Path suffix.
    Suffix(String),
    /// Regular expression over the root-relative path.
    Pattern { regex: String },
}

impl IgnoreEntry {
    /// Entries equivalent to [`IgnoreRules::default`].
    pub fn defaults() -> Vec<Self> {
        vec![Self::Pattern {
            regex: ignore::ROOT_FAVICON_PATTERN.to_string(),
        }]
    }

    fn compile(&self) -> Result<IgnoreRule, ConfigError> {
        match self {
            Self::Suffix(suffix) => Ok(IgnoreRule::suffix(suffix.as_str())),
            Self::Pattern { regex } => IgnoreRule::pattern(regex),
        }
    }
}

/// `[manifest]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Write the original → revisioned map.
    pub enable: bool,
    /// Relative to the output directory.
    pub path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            enable: false,
            path: PathBuf::from("rev-manifest.json"),
        }
    }
}

impl RevConfig {
    /// Load from a file, warning about unknown keys.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Append ignore entries; with no `ignore` key they extend the defaults.
    pub fn extend_ignore(&mut self, entries: impl IntoIterator<Item = IgnoreEntry>) {
        self.ignore
            .get_or_insert_with(IgnoreEntry::defaults)
            .extend(entries);
    }

    /// Validate and compile into engine options.
    ///
    /// All problems (hash length, prefix, every bad pattern) are collected
    /// into one [`ConfigError::Diagnostics`].
    pub fn into_options(self) -> Result<RevOptions, ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        check_hash_length(self.hash_length, &mut diag);
        check_prefix(self.prefix.as_deref(), &mut diag);

        let ignore = match &self.ignore {
            None => IgnoreRules::default(),
            Some(entries) => {
                let mut rules = IgnoreRules::none();
                for entry in entries {
                    match entry.compile() {
                        Ok(rule) => rules.push(rule),
                        Err(err) => diag.error("ignore", pattern_message(&err)),
                    }
                }
                rules
            }
        };

        diag.into_result()?;
        Ok(RevOptions {
            hash_length: self.hash_length,
            ignore,
            prefix: self.prefix,
            filename_transform: None,
            path_transform: None,
        })
    }
}

fn pattern_message(err: &ConfigError) -> String {
    match err {
        ConfigError::Pattern { pattern, source } => format!("invalid regex `{pattern}`: {source}"),
        other => other.to_string(),
    }
}
