//! Asset kind definitions.

use crate::path::extension;

/// Media classification of an asset.
///
/// Decides which reference matcher scans the asset; `Binary` assets are
/// hashed and renamed but never scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// HTML, SVG and other XML documents.
    Markup,
    /// CSS.
    Stylesheet,
    /// JavaScript.
    Script,
    /// Source map (`.map`).
    SourceMap,
    /// JSON and web manifests.
    Data,
    /// Any other UTF-8 text.
    Text,
    /// Images, fonts, media, archives, or bytes that are not UTF-8.
    Binary,
}

impl AssetKind {
    /// Classify from the path extension, falling back to the bytes.
    ///
    /// Text kinds whose bytes do not decode as UTF-8 become `Binary`.
    pub fn classify(path: &str, contents: &[u8]) -> Self {
        let ext = extension(path).map(str::to_ascii_lowercase);
        let kind = match ext.as_deref() {
            Some("html" | "htm" | "xhtml" | "svg" | "xml") => Self::Markup,
            Some("css") => Self::Stylesheet,
            Some("js" | "mjs" | "cjs") => Self::Script,
            Some("map") => Self::SourceMap,
            Some("json" | "webmanifest") => Self::Data,
            Some(
                "png" | "jpg" | "jpeg" | "gif" | "webp" | "avif" | "ico" | "bmp" | "tif" | "tiff"
                | "woff" | "woff2" | "ttf" | "otf" | "eot" | "mp3" | "wav" | "ogg" | "flac"
                | "aac" | "m4a" | "mp4" | "m4v" | "webm" | "mov" | "avi" | "pdf" | "zip" | "gz"
                | "br" | "wasm",
            ) => return Self::Binary,
            _ => Self::Text,
        };

        if is_text(contents) { kind } else { Self::Binary }
    }

    /// Whether references inside this asset are scanned.
    #[inline]
    pub fn is_text(self) -> bool {
        !matches!(self, Self::Binary)
    }
}

/// UTF-8 without NUL bytes.
fn is_text(contents: &[u8]) -> bool {
    !contents.contains(&0) && std::str::from_utf8(contents).is_ok()
}
