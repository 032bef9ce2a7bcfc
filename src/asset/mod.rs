//! Asset records and the registry that owns them.

mod kind;
mod registry;

pub use kind::AssetKind;
pub use registry::FileRegistry;

use crate::hash::ContentHash;
use crate::path;

/// Stable index of an asset inside its [`FileRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(usize);

impl AssetId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in registry insertion order.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One managed file.
///
/// The originally registered bytes are never modified; each run rewrites
/// from them into `contents`, so running twice never rewrites twice.
#[derive(Debug, Clone)]
pub struct Asset {
    id: AssetId,
    original_path: String,
    revisioned_path: String,
    kind: AssetKind,
    original_contents: Vec<u8>,
    contents: Vec<u8>,
    content_hash: ContentHash,
    rev_hash: ContentHash,
    hash_override: Option<ContentHash>,
    ignored: bool,
}

impl Asset {
    pub(crate) fn new(id: AssetId, original_path: String, contents: Vec<u8>) -> Self {
        let kind = AssetKind::classify(&original_path, &contents);
        Self {
            id,
            revisioned_path: original_path.clone(),
            original_path,
            kind,
            original_contents: contents.clone(),
            contents,
            content_hash: ContentHash::empty(),
            rev_hash: ContentHash::empty(),
            hash_override: None,
            ignored: false,
        }
    }

    #[inline]
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Root-relative path the asset was registered under (`/css/style.css`).
    #[inline]
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// Output path, including the hash token once names are assigned.
    #[inline]
    pub fn revisioned_path(&self) -> &str {
        &self.revisioned_path
    }

    /// File name of the original path.
    #[inline]
    pub fn file_name(&self) -> &str {
        path::file_name(&self.original_path)
    }

    /// Extension of the original path, without the dot.
    #[inline]
    pub fn extension(&self) -> Option<&str> {
        path::extension(&self.original_path)
    }

    #[inline]
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Bytes as registered.
    #[inline]
    pub fn original_contents(&self) -> &[u8] {
        &self.original_contents
    }

    /// Bytes after the last rewrite (the registered bytes before any run).
    #[inline]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Original contents as text, `None` for binary assets.
    pub fn text(&self) -> Option<&str> {
        if !self.kind.is_text() {
            return None;
        }
        std::str::from_utf8(&self.original_contents).ok()
    }

    /// Digest of the original contents alone.
    #[inline]
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Composite hash embedded in the revisioned path.
    #[inline]
    pub fn rev_hash(&self) -> ContentHash {
        self.rev_hash
    }

    /// Injected replacement for the content hash as propagation seed.
    #[inline]
    pub fn hash_override(&self) -> Option<ContentHash> {
        self.hash_override
    }

    /// Seed used by propagation: the override if set, else the content hash.
    #[inline]
    pub fn seed(&self) -> ContentHash {
        self.hash_override.unwrap_or(self.content_hash)
    }

    /// Whether an ignore rule keeps this asset under its original name.
    #[inline]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Whether the revisioned path differs from the original.
    #[inline]
    pub fn is_renamed(&self) -> bool {
        self.revisioned_path != self.original_path
    }

    // -------------------------------------------------------------------------
    // Phase setters
    // -------------------------------------------------------------------------

    pub(crate) fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    pub(crate) fn set_content_hash(&mut self, hash: ContentHash) {
        self.content_hash = hash;
    }

    pub(crate) fn set_rev_hash(&mut self, hash: ContentHash) {
        self.rev_hash = hash;
    }

    pub(crate) fn set_hash_override(&mut self, hash: Option<ContentHash>) {
        self.hash_override = hash;
    }

    pub(crate) fn set_revisioned_path(&mut self, path: String) {
        self.revisioned_path = path;
    }

    pub(crate) fn set_contents(&mut self, contents: Vec<u8>) {
        self.contents = contents;
    }
}
