//! Substitution of revisioned names into context contents.

use std::fmt;

use super::ReferenceMatch;
use crate::asset::{Asset, FileRegistry};
use crate::path::{dirname, join_url, strip_extension};

/// Everything a [`PathTransform`] gets to see about one rewrite.
#[derive(Clone, Copy)]
pub struct RewriteSite<'a> {
    /// Default replacement: the target's revisioned path, spelled the way
    /// the original reference was spelled.
    pub revisioned: &'a str,
    /// Reference text as it appears in the context.
    pub original: &'a str,
    /// Asset being rewritten.
    pub context: &'a Asset,
    /// Asset the reference points at.
    pub target: &'a Asset,
}

impl fmt::Debug for RewriteSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteSite")
            .field("revisioned", &self.revisioned)
            .field("original", &self.original)
            .field("context", &self.context.original_path())
            .field("target", &self.target.original_path())
            .finish()
    }
}

/// Builds the final string for each rewritten reference.
///
/// The returned string replaces the default entirely; a configured prefix
/// is not applied on top of it.
///
/// Closures implement this trait:
///
/// ```
/// use revmark::resolve::{PathTransform, RewriteSite};
///
/// let cdn = |site: &RewriteSite<'_>| format!("//cdn.example.com{}", site.revisioned);
/// let _: &dyn PathTransform = &cdn;
/// ```
pub trait PathTransform: Send + Sync {
    fn transform(&self, site: &RewriteSite<'_>) -> String;
}

impl<F> PathTransform for F
where
    F: Fn(&RewriteSite<'_>) -> String + Send + Sync,
{
    fn transform(&self, site: &RewriteSite<'_>) -> String {
        self(site)
    }
}

/// Rewrites discovered references using revisioned paths from the registry.
pub struct Rewriter<'a> {
    registry: &'a FileRegistry,
    prefix: Option<&'a str>,
    transform: Option<&'a dyn PathTransform>,
}

impl<'a> Rewriter<'a> {
    pub fn new(registry: &'a FileRegistry) -> Self {
        Self {
            registry,
            prefix: None,
            transform: None,
        }
    }

    /// URL prefix for every rewritten reference.
    pub fn with_prefix(mut self, prefix: Option<&'a str>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_transform(mut self, transform: Option<&'a dyn PathTransform>) -> Self {
        self.transform = transform;
        self
    }

    /// Replacement text for one match, or `None` when the target keeps its name.
    pub fn replacement(&self, context: &Asset, original: &str, m: &ReferenceMatch) -> Option<String> {
        let target = &self.registry[m.target];
        if target.is_ignored() {
            return None;
        }

        let context_dir = dirname(context.revisioned_path());
        let revisioned = m.representation.render(target.revisioned_path(), context_dir);

        if let Some(transform) = self.transform {
            return Some(transform.transform(&RewriteSite {
                revisioned: &revisioned,
                original,
                context,
                target,
            }));
        }

        match self.prefix {
            Some(prefix) => {
                let absolute = target.revisioned_path();
                let absolute = if m.representation.stripped {
                    strip_extension(absolute)
                } else {
                    absolute
                };
                Some(join_url(prefix, absolute))
            }
            None => Some(revisioned),
        }
    }

    /// Rewrite the original text of `context`.
    ///
    /// `matches` must be sorted and non-overlapping, as returned by
    /// discovery. Returns the new text and the number of substitutions, or
    /// `None` for binary assets.
    pub fn rewrite(&self, context: &Asset, matches: &[ReferenceMatch]) -> Option<(String, usize)> {
        let text = context.text()?;
        let mut out = String::with_capacity(text.len() + matches.len() * 9);
        let mut cursor = 0;
        let mut count = 0;

        for m in matches {
            let original = &text[m.span.clone()];
            let Some(replacement) = self.replacement(context, original, m) else {
                continue;
            };
            out.push_str(&text[cursor..m.span.start]);
            out.push_str(&replacement);
            cursor = m.span.end;
            count += 1;
        }
        out.push_str(&text[cursor..]);

        Some((out, count))
    }
}
