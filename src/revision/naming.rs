//! Revisioned file names.

use crate::asset::Asset;
use crate::path::split_extension;

/// Produces the revisioned file name (last path segment) of an asset.
///
/// `hash` is the full hex composite hash; the directory of the original
/// path is kept by the caller. Closures implement this trait:
///
/// ```
/// use revmark::asset::Asset;
/// use revmark::revision::FilenameTransform;
///
/// let hash_first = |asset: &Asset, hash: &str| format!("{}.{}", &hash[..5], asset.file_name());
/// let _: &dyn FilenameTransform = &hash_first;
/// ```
pub trait FilenameTransform: Send + Sync {
    fn file_name(&self, asset: &Asset, hash: &str) -> String;
}

impl<F> FilenameTransform for F
where
    F: Fn(&Asset, &str) -> String + Send + Sync,
{
    fn file_name(&self, asset: &Asset, hash: &str) -> String {
        self(asset, hash)
    }
}

/// `<stem>.<hash prefix>.<ext>`, or `<name>.<hash prefix>` without extension.
///
/// The extension is the last dot-suffix: `app.js.map` becomes
/// `app.js.1a2b3c4d.map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultNaming {
    hash_length: usize,
}

impl DefaultNaming {
    pub fn new(hash_length: usize) -> Self {
        Self { hash_length }
    }

    /// Apply to a bare file name.
    pub fn apply(&self, name: &str, hash: &str) -> String {
        let short = &hash[..self.hash_length.min(hash.len())];
        match split_extension(name) {
            (stem, Some(ext)) => format!("{stem}.{short}.{ext}"),
            (stem, None) => format!("{stem}.{short}"),
        }
    }
}

impl FilenameTransform for DefaultNaming {
    fn file_name(&self, asset: &Asset, hash: &str) -> String {
        self.apply(asset.file_name(), hash)
    }
}
