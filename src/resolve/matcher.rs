//! Boundary rules that decide whether a substring is a path token.
//!
//! References are found by pattern, not by parsing. A representation found
//! in the text only counts as a reference when its neighbours look like the
//! edges of a path token for the asset's media type:
//!
//! | Matcher      | Left edge            | Right edge                 | Structured regions |
//! |--------------|----------------------|----------------------------|--------------------|
//! | `Markup`     | quote, `(`           | quote, `)`, `?`, `#`       | `srcset` lists     |
//! | `Stylesheet` | quote, `(`           | quote, `)`, `?`, `#`       | source map comment |
//! | `Script`     | quote                | quote, `?`, `#`            | source map comment |
//! | `Data`       | quote                | quote, `?`, `#`            | none               |
//!
//! In `Script` and `Data` an escaped quote (`\"`, `\'`) also counts as a
//! quote, so markup embedded in string literals (compiled templates) is
//! scanned too.
//!
//! A bare word with the same spelling as a file stem (`var short = ...`)
//! has no such edges and is left alone.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::asset::AssetKind;

/// `srcset="a.png 1x, b.png 2x"` (also `imagesrcset`, `data-srcset`).
static SRCSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:image)?srcset\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// `//# sourceMappingURL=app.js.map` and `/*# sourceMappingURL=app.css.map */`.
static SOURCE_MAP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?://|/\*)\s*[#@]\s*sourceMappingURL=([^\s'\x22*]+)").unwrap()
});

/// Per-media-type reference matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Markup,
    Stylesheet,
    Script,
    Data,
}

/// A span whose content is a path token by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub range: Range<usize>,
    /// Comma/whitespace separated candidate list (`srcset`).
    pub list: bool,
}

impl Matcher {
    /// Matcher for a media type; binary assets have none.
    pub fn for_kind(kind: AssetKind) -> Option<Self> {
        match kind {
            AssetKind::Markup => Some(Self::Markup),
            AssetKind::Stylesheet => Some(Self::Stylesheet),
            AssetKind::Script => Some(Self::Script),
            AssetKind::SourceMap | AssetKind::Data | AssetKind::Text => Some(Self::Data),
            AssetKind::Binary => None,
        }
    }

    /// Structured regions found in `text`.
    pub fn regions(self, text: &str) -> Vec<Region> {
        match self {
            Self::Markup => srcset_regions(text),
            Self::Stylesheet | Self::Script => source_map_regions(text),
            Self::Data => Vec::new(),
        }
    }

    /// Whether `span` of `text` is bounded like a path token.
    pub fn is_bounded(self, text: &str, span: &Range<usize>, regions: &[Region]) -> bool {
        let before = text[..span.start].chars().next_back();
        let after = self.unescape(&text[span.end..]).chars().next();

        if before.is_some_and(|c| self.opens(c)) && after.is_some_and(|c| self.closes(c)) {
            return true;
        }
        regions.iter().any(|region| region.bounds(text, span))
    }

    fn opens(self, c: char) -> bool {
        is_quote(c) || (self.allows_parens() && c == '(')
    }

    fn closes(self, c: char) -> bool {
        is_quote(c) || is_suffix_start(c) || (self.allows_parens() && c == ')')
    }

    /// Drop the backslash of an escaped quote right after a candidate.
    ///
    /// On the left the quote itself is adjacent to the path, so only the
    /// right edge needs this.
    fn unescape(self, rest: &str) -> &str {
        if !matches!(self, Self::Script | Self::Data) {
            return rest;
        }
        match rest.strip_prefix('\\') {
            Some(tail) if tail.starts_with(is_quote) => tail,
            _ => rest,
        }
    }

    /// CSS `url(...)`, also inside inline styles.
    fn allows_parens(self) -> bool {
        matches!(self, Self::Markup | Self::Stylesheet)
    }
}

impl Region {
    fn bounds(&self, text: &str, span: &Range<usize>) -> bool {
        if span.start < self.range.start || span.end > self.range.end {
            return false;
        }

        let before = text[..span.start].chars().next_back();
        let after = text[span.end..].chars().next();
        let separator = |c: char| c.is_whitespace() || c == ',';

        let left = span.start == self.range.start || (self.list && before.is_some_and(separator));
        let right = span.end == self.range.end
            || after.is_some_and(is_suffix_start)
            || (self.list && after.is_some_and(separator));
        left && right
    }
}

#[inline]
fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

/// Query string or fragment attached to a path (`font.eot?#iefix`).
#[inline]
fn is_suffix_start(c: char) -> bool {
    matches!(c, '?' | '#')
}

fn srcset_regions(text: &str) -> Vec<Region> {
    SRCSET
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|value| Region {
            range: value.range(),
            list: true,
        })
        .collect()
}

fn source_map_regions(text: &str) -> Vec<Region> {
    SOURCE_MAP_URL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|value| Region {
            range: value.range(),
            list: false,
        })
        .collect()
}
