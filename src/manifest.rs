//! Revision manifest: original path → revisioned path.
//!
//! Written next to the outputs so server-side templates can look up the
//! current name of an asset:
//!
//! ```json
//! {
//!   "css/style.css": "css/style.1a2b3c4d.css",
//!   "index.html": "index.5e6f7a8b.html"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::asset::FileRegistry;

/// Sorted map over the renamed assets, paths without the leading `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, String>);

impl Manifest {
    /// Collect every renamed asset; ignored assets are left out.
    pub fn from_registry(registry: &FileRegistry) -> Self {
        Self(
            registry
                .iter()
                .filter(|asset| asset.is_renamed())
                .map(|asset| {
                    (
                        asset.original_path().trim_start_matches('/').to_string(),
                        asset.revisioned_path().trim_start_matches('/').to_string(),
                    )
                })
                .collect(),
        )
    }

    /// Revisioned path of `original` (with or without leading `/`).
    pub fn get(&self, original: &str) -> Option<&str> {
        self.0
            .get(original.trim_start_matches('/'))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
