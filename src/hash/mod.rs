//! Content hashing using blake3.
//!
//! Provides the digest type shared by the whole engine and the fold that
//! turns an asset's own digest plus its references' digests into the
//! composite ("rev") hash embedded in file names.

mod propagate;

pub use propagate::{Propagation, ReferenceGraph, propagate};

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a byte payload.
    #[inline]
    pub fn of(data: impl AsRef<[u8]>) -> Self {
        Self(*blake3::hash(data.as_ref()).as_bytes())
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create a hash representing "no content" (all zeros).
    #[inline]
    pub const fn empty() -> Self {
        Self([0; 32])
    }

    /// Check if this is the empty/zero hash.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 32]
    }

    /// Convert to a lowercase hex string (64 chars).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl Default for ContentHash {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Fold a seed with referenced hashes, in the given order.
///
/// Order matters: the same children in a different order give a different
/// digest, so callers must pass references in discovery order.
pub fn fold<'a>(seed: &ContentHash, children: impl IntoIterator<Item = &'a ContentHash>) -> ContentHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed.as_bytes());
    for child in children {
        hasher.update(child.as_bytes());
    }
    ContentHash::new(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_display() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(format!("{}", hash), "abababababababab");
    }

    #[test]
    fn test_content_hash_hex_roundtrip() {
        let original = ContentHash::of("body { color: red; }");
        let recovered = ContentHash::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, recovered);
        assert!(ContentHash::from_hex("abcd").is_none());
        assert!(ContentHash::from_hex("not hex").is_none());
    }

    #[test]
    fn test_content_hash_of() {
        let h1 = ContentHash::of("body { color: red; }");
        let h2 = ContentHash::of(b"body { color: red; }".to_vec());
        let h3 = ContentHash::of("body { color: blue; }");

        // Same content = same hash
        assert_eq!(h1, h2);
        assert!(!h1.is_empty());

        // Different content = different hash
        assert_ne!(h1, h3);
        assert_eq!(h1.to_hex().len(), 64);
    }

    #[test]
    fn test_fold_depends_on_order() {
        let seed = ContentHash::of("seed");
        let a = ContentHash::of("a");
        let b = ContentHash::of("b");

        assert_eq!(fold(&seed, [&a, &b]), fold(&seed, [&a, &b]));
        assert_ne!(fold(&seed, [&a, &b]), fold(&seed, [&b, &a]));
        assert_ne!(fold(&seed, []), seed);
    }
}
