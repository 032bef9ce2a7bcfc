//! In-memory asset registry.
//!
//! Arena of [`Asset`] records in insertion order, indexed by normalized
//! original path. The registry is the single source of truth for contents,
//! hashes and revisioned paths; the revision phases take it by reference in
//! turn instead of sharing it.

use rustc_hash::FxHashMap;
use std::ops::Index;

use super::{Asset, AssetId};
use crate::error::{Result, RevError};
use crate::hash::ContentHash;
use crate::path::normalize_slashes;

#[derive(Debug, Default)]
pub struct FileRegistry {
    assets: Vec<Asset>,
    index: FxHashMap<String, AssetId>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset under its root-relative path.
    ///
    /// The path is slash-normalized (`css\style.css` → `/css/style.css`).
    pub fn register(&mut self, path: &str, contents: impl Into<Vec<u8>>) -> Result<AssetId> {
        if path.trim_matches(['/', '\\', '.']).is_empty() {
            return Err(RevError::EmptyPath);
        }

        let path = normalize_slashes(path);
        if self.index.contains_key(&path) {
            return Err(RevError::Duplicate(path));
        }

        let id = AssetId::new(self.assets.len());
        self.index.insert(path.clone(), id);
        self.assets.push(Asset::new(id, path, contents.into()));
        Ok(id)
    }

    /// Look up an asset by path (normalized before lookup).
    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.id_of(path).map(|id| &self.assets[id.index()])
    }

    /// Like [`get`](Self::get), but a missing asset is an error.
    pub fn require(&self, path: &str) -> Result<&Asset> {
        self.get(path)
            .ok_or_else(|| RevError::NotFound(normalize_slashes(path)))
    }

    pub fn id_of(&self, path: &str) -> Option<AssetId> {
        self.index.get(&normalize_slashes(path)).copied()
    }

    /// All assets in insertion order.
    #[inline]
    pub fn all(&self) -> &[Asset] {
        &self.assets
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Force the propagation seed of one asset.
    ///
    /// Every asset that references it (transitively) gets a new composite
    /// hash on the next run.
    pub fn set_hash_override(&mut self, path: &str, hash: ContentHash) -> Result<()> {
        self.asset_by_path_mut(path)?.set_hash_override(Some(hash));
        Ok(())
    }

    /// Drop an injected seed, going back to the content hash.
    pub fn clear_hash_override(&mut self, path: &str) -> Result<()> {
        self.asset_by_path_mut(path)?.set_hash_override(None);
        Ok(())
    }

    pub(crate) fn assets_mut(&mut self) -> &mut [Asset] {
        &mut self.assets
    }

    fn asset_by_path_mut(&mut self, path: &str) -> Result<&mut Asset> {
        let id = self
            .id_of(path)
            .ok_or_else(|| RevError::NotFound(normalize_slashes(path)))?;
        Ok(&mut self.assets[id.index()])
    }
}

impl Index<AssetId> for FileRegistry {
    type Output = Asset;

    fn index(&self, id: AssetId) -> &Asset {
        &self.assets[id.index()]
    }
}

impl<'a> IntoIterator for &'a FileRegistry {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
