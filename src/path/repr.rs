//! Reference representations.
//!
//! A file can point at another file in several equivalent ways. For a
//! context file `/third/index.html` the asset `/third/script.js` may be
//! written as:
//!
//! | Form           | Text                |
//! |----------------|---------------------|
//! | `Absolute`     | `/third/script.js`  |
//! | `RootRelative` | `third/script.js`   |
//! | `Relative`     | `script.js`         |
//! | `DotRelative`  | `./script.js`       |
//!
//! When the referenced file is outside the context directory, the relative
//! forms are replaced by a single `Traversal` form (`../other/index.html`).
//! Script-to-script references additionally get every form without the
//! extension, since module loaders resolve `require('./util')`.
//!
//! The order of the returned sequence is part of the contract.

use super::{
    descend, dirname, is_script_path, is_within, normalize_slashes, strip_extension,
};

/// Shape of a textual reference, independent of the file it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceForm {
    /// `/a/b/c.ext`
    Absolute,
    /// `a/b/c.ext`
    RootRelative,
    /// `c.ext` or `sub/c.ext`, below the context directory
    Relative,
    /// `./c.ext` or `./sub/c.ext`
    DotRelative,
    /// `../../a/b/c.ext`
    Traversal,
}

impl ReferenceForm {
    /// Forms used when the referenced file sits in (or below) the context directory.
    const NESTED: [Self; 4] = [
        Self::Absolute,
        Self::RootRelative,
        Self::Relative,
        Self::DotRelative,
    ];

    /// Forms used when the path has to climb out of the context directory.
    const CLIMBING: [Self; 3] = [Self::Absolute, Self::RootRelative, Self::Traversal];

    /// Spell `target` in this form, as seen from `context_dir`.
    ///
    /// Both paths are normalized first. Relative forms fall back to a
    /// traversal when `target` is not below `context_dir`.
    pub fn render(self, target: &str, context_dir: &str) -> String {
        let target = normalize_slashes(target);
        let context_dir = normalize_slashes(context_dir);

        match self {
            Self::Absolute => target,
            Self::RootRelative => target[1..].to_string(),
            Self::Relative => match descend(&context_dir, &target) {
                Some(rel) => rel.to_string(),
                None => traversal(&context_dir, &target),
            },
            Self::DotRelative => match descend(&context_dir, &target) {
                Some(rel) => format!("./{rel}"),
                None => traversal(&context_dir, &target),
            },
            Self::Traversal => traversal(&context_dir, &target),
        }
    }

    /// Tie-break when two targets claim the same text: the reading a
    /// browser or module loader would apply wins over the root-relative one.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Self::Absolute => 0,
            Self::DotRelative => 1,
            Self::Relative => 2,
            Self::Traversal => 3,
            Self::RootRelative => 4,
        }
    }
}

/// One textual spelling of a referenced asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub text: String,
    pub form: ReferenceForm,
    /// The extension was dropped (`./util` for `./util.js`).
    pub stripped: bool,
}

impl Representation {
    /// Spell a (revisioned) target the same way this representation did.
    pub fn render(&self, target: &str, context_dir: &str) -> String {
        let text = self.form.render(target, context_dir);
        if self.stripped {
            strip_extension(&text).to_string()
        } else {
            text
        }
    }
}

/// All spellings `context` may use for `referenced`, in contract order.
///
/// Both arguments are root-relative asset paths.
pub fn reference_representations(referenced: &str, context: &str) -> Vec<Representation> {
    let referenced = normalize_slashes(referenced);
    let context = normalize_slashes(context);
    let context_dir = dirname(&context);

    let forms: &[ReferenceForm] = if is_within(dirname(&referenced), context_dir) {
        &ReferenceForm::NESTED
    } else {
        &ReferenceForm::CLIMBING
    };

    let strip_variants: &[bool] = if is_script_path(&referenced) && is_script_path(&context) {
        &[false, true]
    } else {
        &[false]
    };

    let mut reprs: Vec<Representation> = Vec::with_capacity(forms.len() * strip_variants.len());
    for &stripped in strip_variants {
        for &form in forms {
            let repr = Representation {
                text: String::new(),
                form,
                stripped,
            };
            let text = repr.render(&referenced, context_dir);
            if text.is_empty() || reprs.iter().any(|r| r.text == text) {
                continue;
            }
            reprs.push(Representation { text, ..repr });
        }
    }
    reprs
}

/// `../` for every level between `context_dir` and the common ancestor,
/// followed by the descent to `target`.
fn traversal(context_dir: &str, target: &str) -> String {
    let from: Vec<&str> = context_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();
    let target_dir_len = to.len().saturating_sub(1);

    let common = from
        .iter()
        .zip(&to[..target_dir_len])
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = "../".repeat(from.len() - common);
    out.push_str(&to[common..].join("/"));
    out
}
