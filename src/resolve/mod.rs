//! Reference discovery and rewriting.
//!
//! Discovery does not parse HTML, CSS or JavaScript. For every registered
//! asset it generates the spellings a context file could use
//! ([`reference_representations`]) and looks for them in the context text;
//! an occurrence only counts when the [`Matcher`] for the context's media
//! type accepts its boundaries.
//!
//! When several candidates overlap, the earliest wins, then the longest,
//! then the most specific form (see `ReferenceForm::precedence`).

pub mod matcher;
mod rewrite;

pub use matcher::Matcher;
pub use rewrite::{PathTransform, RewriteSite, Rewriter};

use std::cmp::Reverse;
use std::ops::Range;

use crate::asset::{Asset, AssetId, FileRegistry};
use crate::path::{Representation, file_name, reference_representations, strip_extension};

/// One bounded occurrence of a representation inside a context asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch {
    /// Byte range in the context's original text.
    pub span: Range<usize>,
    /// Referenced asset.
    pub target: AssetId,
    /// Spelling that matched.
    pub representation: Representation,
}

/// Finds references to registered assets inside one context asset.
pub struct ReferenceResolver<'a> {
    registry: &'a FileRegistry,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(registry: &'a FileRegistry) -> Self {
        Self { registry }
    }

    /// All references in `context`, in content order, non-overlapping.
    ///
    /// Targets ignored for renaming are still reported (they are part of the
    /// reference graph); the rewriter skips them. Binary assets have none.
    pub fn discover(&self, context: &Asset) -> Vec<ReferenceMatch> {
        let Some(matcher) = Matcher::for_kind(context.kind()) else {
            return Vec::new();
        };
        let Some(text) = context.text() else {
            return Vec::new();
        };

        let regions = matcher.regions(text);
        let mut candidates = Vec::new();

        for target in self.registry.iter() {
            // Every spelling ends with the file name or its extension-less stem
            let stem = strip_extension(file_name(target.original_path()));
            if !text.contains(stem) {
                continue;
            }

            for representation in reference_representations(target.original_path(), context.original_path()) {
                for start in occurrences(text, &representation.text) {
                    let span = start..start + representation.text.len();
                    if matcher.is_bounded(text, &span, &regions) {
                        candidates.push(ReferenceMatch {
                            span,
                            target: target.id(),
                            representation: representation.clone(),
                        });
                    }
                }
            }
        }

        resolve_overlaps(candidates)
    }
}

/// Start offsets of every occurrence of `needle`, overlapping ones included.
fn occurrences<'t>(text: &'t str, needle: &'t str) -> impl Iterator<Item = usize> + 't {
    let step = needle.chars().next().map_or(1, char::len_utf8);
    let mut from = 0;
    std::iter::from_fn(move || {
        if needle.is_empty() || from > text.len() {
            return None;
        }
        let at = from + text[from..].find(needle)?;
        from = at + step;
        Some(at)
    })
}

/// Keep the earliest, longest, most specific candidate at each position.
fn resolve_overlaps(mut candidates: Vec<ReferenceMatch>) -> Vec<ReferenceMatch> {
    candidates.sort_by_key(|m| {
        (
            m.span.start,
            Reverse(m.span.end),
            m.representation.form.precedence(),
            m.representation.stripped,
            m.target,
        )
    });

    let mut kept: Vec<ReferenceMatch> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.last().is_none_or(|last| candidate.span.start >= last.span.end) {
            kept.push(candidate);
        }
    }
    kept
}
