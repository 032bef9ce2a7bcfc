//! Path and URL utilities for root-relative asset paths.
//!
//! Pure functions, no filesystem access. Asset paths always use `/` as the
//! separator and start with a single leading `/` (the asset root).
//!
//! - [`normalize_slashes`], [`join_path`], [`join_url`], [`relative_path`]
//! - [`repr`]: the textual spellings one asset may use to point at another

pub mod repr;

pub use repr::{ReferenceForm, Representation, reference_representations};

/// Extensions that module loaders resolve without the extension.
const SCRIPT_EXTENSIONS: &[&str] = &["js"];

/// Normalize separators to `/` with exactly one leading slash.
///
/// Backslashes become slashes, repeated separators collapse and `.`
/// segments are dropped.
///
/// # Examples
/// ```
/// use revmark::path::normalize_slashes;
/// assert_eq!(normalize_slashes("\\first\\second"), "/first/second");
/// assert_eq!(normalize_slashes("first//second/"), "/first/second");
/// ```
pub fn normalize_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split(['/', '\\']) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Join a directory and a file name into a normalized asset path.
///
/// # Examples
/// ```
/// use revmark::path::join_path;
/// assert_eq!(join_path("first\\second", "images.png"), "/first/second/images.png");
/// ```
pub fn join_path(dir: &str, file: &str) -> String {
    normalize_slashes(&format!("{dir}/{file}"))
}

/// Join a URL prefix and a path with exactly one `/` between them.
///
/// The prefix is kept verbatim otherwise, so scheme-relative (`//cdn/`) and
/// absolute (`https://cdn/`) prefixes both work.
///
/// # Examples
/// ```
/// use revmark::path::join_url;
/// assert_eq!(join_url("http://example.com/", "/index.html"), "http://example.com/index.html");
/// assert_eq!(join_url("//cdn.example.com", "img/a.png"), "//cdn.example.com/img/a.png");
/// ```
pub fn join_url(prefix: &str, path: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Express `full` relative to `base`.
///
/// The result keeps a leading `/` unless `strip_leading_slash` is set.
/// When `full` does not live under `base` it is returned normalized.
///
/// # Examples
/// ```
/// use revmark::path::relative_path;
/// assert_eq!(relative_path("/base", "/base/sub/index.html", false), "/sub/index.html");
/// assert_eq!(relative_path("/base/sub", "/base/sub/index.html", true), "index.html");
/// ```
pub fn relative_path(base: &str, full: &str, strip_leading_slash: bool) -> String {
    let base = normalize_slashes(base);
    let full = normalize_slashes(full);

    let rel = descend(&base, &full).unwrap_or(&full[1..]);
    if strip_leading_slash {
        rel.to_string()
    } else {
        format!("/{rel}")
    }
}

/// Path of `full` below directory `dir`, without a leading slash.
///
/// Both arguments must already be normalized. Returns `None` when `full` is
/// not inside `dir`.
pub(crate) fn descend<'a>(dir: &str, full: &'a str) -> Option<&'a str> {
    if dir == "/" {
        return Some(full.trim_start_matches('/'));
    }
    full.strip_prefix(dir)?.strip_prefix('/')
}

/// Whether normalized directory `dir` is `ancestor` or lies below it.
pub(crate) fn is_within(dir: &str, ancestor: &str) -> bool {
    ancestor == "/"
        || dir == ancestor
        || dir
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Directory part of a normalized asset path (`/` for top-level files).
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(pos) => &path[..pos],
    }
}

/// Last segment of a path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a file name into stem and extension (without the dot).
///
/// Dotfiles such as `.htaccess` have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], Some(&name[pos + 1..])),
        _ => (name, None),
    }
}

/// Extension of the last path segment.
pub fn extension(path: &str) -> Option<&str> {
    split_extension(file_name(path)).1
}

/// Remove the extension of the last path segment, keeping the directories.
pub fn strip_extension(path: &str) -> &str {
    match extension(path) {
        Some(ext) => &path[..path.len() - ext.len() - 1],
        None => path,
    }
}

/// Whether module-style references to this path may omit the extension.
pub fn is_script_path(path: &str) -> bool {
    extension(path).is_some_and(|ext| {
        SCRIPT_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    })
}
