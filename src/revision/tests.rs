//! End-to-end scenarios over a small site.
//!
//! ```text
//! /index.html ──► /css/style.css ──► /img/image1.jpg, /img/image2.jpg, /font/*
//!      │                ▲
//!      ├──► /nested/index.html
//!      ├──► /view/main.html ──► /view/core/footer.html
//!      └──► /img/*, /lib/require.js, /script/main.js, /favicon.ico
//!
//! /application.js ──► /short.js, /layout.js, /view/gps.html,
//!                     /img/image1.jpg, /application.js.map
//! ```

use regex::Regex;

use super::*;
use crate::config::{IgnoreRule, IgnoreRules};
use crate::path::{file_name, join_url, split_extension};
use crate::resolve::RewriteSite;

const JPEG: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
const PNG: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <link rel="shortcut icon" href="/favicon.ico">
  <link rel="stylesheet" href="/css/style.css">
  <link rel="canonical" href='/index.html'>
  <script src="/lib/require.js"></script>
</head>
<body ng-app>
  <div ng-include="'/view/main.html'"></div>
  <img src="/img/image1.jpg" alt="double quotes">
  <img src='/img/image2.jpg' alt='single quotes'>
  <img src="/img/image3.jpg">
  <a href="/img/image3.jpg">full size</a>
  <img srcset="/img/image-1x.png 1x, /img/image-2x.png 2x, img/image-3x.png 3x, ./img/image-4x.png 4x">
  <a href="nested/index.html">nested</a>
  <script src="/script/main.js"></script>
</body>
</html>
"#;

const NESTED_HTML: &str = r#"<link rel="stylesheet" href="../css/style.css">"#;

const STYLE_CSS: &str = r#"@font-face {
  font-family: 'font1';
  src: url('../font/font1.eot');
  src: url('../font/font1.eot?#iefix') format('embedded-opentype'),
       url('../font/font1.woff') format('woff'),
       url('../font/font1 space.ttf') format('truetype'),
       url('../font/font1.svg#font1') format('svg');
}
body { background: url(../img/image1.jpg) no-repeat; }
.logo { background-image: url("/img/image2.jpg"); }
"#;

const APPLICATION_JS: &str = r#"var short = require('./short');
var layout = require('./layout');

angular.module('app').config(function ($routeProvider) {
  $routeProvider.when('/gps', { templateUrl: '/view/gps.html' });
});

var template = '<img src="/img/image1.jpg">';
//# sourceMappingURL=application.js.map
"#;

const VIEW_MAIN_HTML: &str = r#"<div ng-include="'view/core/footer.html'"></div>
<img src="/img/image1.jpg">
"#;

fn fixture() -> Vec<(&'static str, Vec<u8>)> {
    let image = |n: u8| [JPEG.as_slice(), &[n]].concat();
    let png = |n: u8| [PNG.as_slice(), &[n]].concat();
    vec![
        ("/index.html", INDEX_HTML.into()),
        ("/nested/index.html", NESTED_HTML.into()),
        ("/css/style.css", STYLE_CSS.into()),
        ("/application.js", APPLICATION_JS.into()),
        (
            "/application.js.map",
            r#"{"version":3,"sources":["application.src.js"],"names":[],"mappings":"AAAA"}"#.into(),
        ),
        ("/short.js", "module.exports = { size: 1 };".into()),
        ("/layout.js", "module.exports = { columns: 12 };".into()),
        ("/lib/require.js", "var requirejs, require, define;".into()),
        ("/script/main.js", "console.log(\"boot\");".into()),
        ("/view/main.html", VIEW_MAIN_HTML.into()),
        ("/view/core/footer.html", "<footer>footer</footer>".into()),
        ("/view/gps.html", "<p>gps</p>".into()),
        ("/img/image1.jpg", image(1)),
        ("/img/image2.jpg", image(2)),
        ("/img/image3.jpg", image(3)),
        ("/img/image-1x.png", png(1)),
        ("/img/image-2x.png", png(2)),
        ("/img/image-3x.png", png(3)),
        ("/img/image-4x.png", png(4)),
        ("/font/font1.eot", vec![0x01, 0x02, 0x00, 0x03]),
        ("/font/font1.woff", b"wOFF\0\x01".to_vec()),
        ("/font/font1 space.ttf", vec![0x00, 0x01, 0x00, 0x00]),
        ("/font/font1.svg", r#"<svg><font id="font1"/></svg>"#.into()),
        ("/favicon.ico", vec![0x00, 0x00, 0x01, 0x00]),
    ]
}

fn load(options: RevOptions) -> Revisioner {
    let mut rev = Revisioner::new(options).unwrap();
    for (path, contents) in fixture() {
        rev.register(path, contents).unwrap();
    }
    rev
}

fn run(options: RevOptions) -> Revisioner {
    let mut rev = load(options);
    rev.run();
    rev
}

fn text(rev: &Revisioner, path: &str) -> String {
    String::from_utf8(rev.get(path).unwrap().contents().to_vec()).unwrap()
}

fn revisioned(rev: &Revisioner, path: &str) -> String {
    rev.get(path).unwrap().revisioned_path().to_string()
}

/// Revisioned file name, as it appears in relative references.
fn rev_name(rev: &Revisioner, path: &str) -> String {
    file_name(rev.get(path).unwrap().revisioned_path()).to_string()
}

fn short_hash(rev: &Revisioner, path: &str) -> String {
    rev.get(path).unwrap().rev_hash().to_hex()[..8].to_string()
}

fn count(haystack: &str, pattern: &str) -> usize {
    Regex::new(pattern).unwrap().find_iter(haystack).count()
}

// ============================================================================
// hashing
// ============================================================================

#[test]
fn test_hash_changes_with_child_reference() {
    let mut rev = run(RevOptions::default());
    let style_before = revisioned(&rev, "/css/style.css");
    let index_before = revisioned(&rev, "/index.html");
    let layout_before = revisioned(&rev, "/layout.js");

    rev.set_hash_override("/img/image1.jpg", ContentHash::of("changed"))
        .unwrap();
    assert_eq!(rev.state(), RevisionState::Loaded);
    rev.run();

    assert_ne!(revisioned(&rev, "/css/style.css"), style_before);
    // index.html only sees image1 through style.css
    assert_ne!(revisioned(&rev, "/index.html"), index_before);
    assert_eq!(revisioned(&rev, "/layout.js"), layout_before);

    rev.clear_hash_override("/img/image1.jpg").unwrap();
    rev.run();
    assert_eq!(revisioned(&rev, "/css/style.css"), style_before);
}

#[test]
fn test_images_are_not_corrupted() {
    let rev = run(RevOptions::default());
    let image = rev.get("/img/image1.jpg").unwrap();
    assert_eq!(&image.contents()[..4], &[0xFF, 0xD8, 0xFF, 0xE0]);
    assert_eq!(image.contents(), image.original_contents());
}

#[test]
fn test_fixture_converges() {
    let mut rev = load(RevOptions::default());
    let report = rev.run();
    assert!(report.converged);
    assert_eq!(report.assets, 24);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.renamed, 23);
    assert_eq!(rev.state(), RevisionState::Done);
}

// ============================================================================
// naming options
// ============================================================================

#[test]
fn test_default_names() {
    let rev = run(RevOptions::default());
    let renamed = Regex::new(r"\.[0-9a-f]{8}\.[a-z]{2,4}$").unwrap();
    for (path, _) in rev.outputs() {
        assert!(
            renamed.is_match(path) || path == "/favicon.ico",
            "unexpected output name {path}"
        );
    }
    assert_eq!(
        revisioned(&rev, "/application.js.map"),
        format!("/application.js.{}.map", short_hash(&rev, "/application.js.map"))
    );
}

#[test]
fn test_hash_length() {
    let rev = run(RevOptions::default().with_hash_length(4));
    let path = revisioned(&rev, "/index.html");
    assert!(Regex::new(r"\.[a-z0-9]{4}\.[a-z]{2,4}$").unwrap().is_match(&path));
}

#[test]
fn test_transform_filename() {
    let options = RevOptions::default()
        .with_ignore(IgnoreRules::none())
        .with_filename_transform(|asset: &Asset, hash: &str| {
            let (stem, ext) = split_extension(asset.file_name());
            format!("{}.{}.{}", &hash[..5], stem, ext.unwrap_or_default())
        });
    let rev = run(options);

    let pattern = Regex::new(r"^[a-z0-9]{5}\..*\.[a-z]{2,4}$").unwrap();
    for (path, _) in rev.outputs() {
        assert!(pattern.is_match(file_name(path)), "unexpected output name {path}");
    }

    // References follow the custom names
    let image = rev_name(&rev, "/img/image1.jpg");
    assert!(text(&rev, "/index.html").contains(&format!("\"/img/{image}\"")));
}

// ============================================================================
// ignore rules
// ============================================================================

#[test]
fn test_favicon_not_renamed_by_default() {
    let rev = run(RevOptions::default());
    assert_eq!(revisioned(&rev, "/favicon.ico"), "/favicon.ico");
    assert!(text(&rev, "/index.html").contains(r#"href="/favicon.ico""#));
}

#[test]
fn test_nested_index_renamed() {
    let ignore = IgnoreRules::new(vec![IgnoreRule::pattern(r"^/index\.html").unwrap()]);
    let rev = run(RevOptions::default().with_ignore(ignore));

    assert_eq!(revisioned(&rev, "/index.html"), "/index.html");
    assert_ne!(revisioned(&rev, "/nested/index.html"), "/nested/index.html");
    // An explicit list replaces the favicon default
    assert_ne!(revisioned(&rev, "/favicon.ico"), "/favicon.ico");
}

#[test]
fn test_ignored_html_still_rewritten() {
    let ignore = IgnoreRules::new(vec![IgnoreRule::suffix(".html")]);
    let rev = run(RevOptions::default().with_ignore(ignore));

    for (path, _) in rev.outputs() {
        if path.ends_with(".html") {
            assert!(rev.get(path).is_some(), "html file {path} was renamed");
        }
    }

    let index = text(&rev, "/index.html");
    assert_eq!(count(&index, r#""/css/style\.[a-z0-9]{8}\.css""#), 1);
    // References to ignored assets stay as they are
    assert!(index.contains(r#"href='/index.html'"#));
    assert!(index.contains(r#"'/view/main.html'"#));
}

#[test]
fn test_ignored_js_references_untouched() {
    let ignore = IgnoreRules::new(vec![IgnoreRule::suffix(".js")]);
    let rev = run(RevOptions::default().with_ignore(ignore));

    let index = text(&rev, "/index.html");
    assert!(index.contains(r#""/lib/require.js""#));
    assert!(index.contains(r#""/script/main.js""#));

    let application = text(&rev, "/application.js");
    assert!(application.contains("require('./short')"));
    assert_eq!(revisioned(&rev, "/application.js"), "/application.js");

    // The source map is not a script: it is renamed and its reference rewritten
    let map = rev_name(&rev, "/application.js.map");
    assert!(application.contains(&format!("sourceMappingURL={map}")));
}

#[test]
fn test_ignored_fonts() {
    let ignore = IgnoreRules::new(vec![IgnoreRule::suffix(".woff")]);
    let rev = run(RevOptions::default().with_ignore(ignore));
    assert_eq!(revisioned(&rev, "/font/font1.woff"), "/font/font1.woff");
    assert!(text(&rev, "/css/style.css").contains("url('../font/font1.woff')"));
}

// ============================================================================
// root html
// ============================================================================

#[test]
fn test_self_reference() {
    let rev = run(RevOptions::default());
    let index = text(&rev, "/index.html");
    assert_eq!(count(&index, r"'/index\.[a-z0-9]{8}\.html'"), 1);
    assert!(index.contains(&format!("'{}'", revisioned(&rev, "/index.html"))));
}

#[test]
fn test_prefix() {
    let rev = run(RevOptions::default().with_prefix("http://example.com/"));
    let index = text(&rev, "/index.html");

    assert_eq!(count(&index, r"'http://example\.com/index\.[a-z0-9]{8}\.html'"), 1);
    // Relative spellings are emitted in absolute form under the prefix
    assert!(index.contains(&format!(
        "\"http://example.com/nested/{}\"",
        rev_name(&rev, "/nested/index.html")
    )));
    // Stored paths carry no prefix
    assert!(revisioned(&rev, "/index.html").starts_with("/index."));
}

#[test]
fn test_transform_path() {
    let options = RevOptions::default().with_path_transform(|site: &RewriteSite<'_>| {
        join_url("//images.example.com/", &site.revisioned.replace("img/", ""))
    });
    let rev = run(options);

    let index = text(&rev, "/index.html");
    assert_eq!(count(&index, r"//images\.example\.com/image1\.[a-z0-9]{8}\.jpg"), 1);
}

#[test]
fn test_references_in_root_html() {
    let rev = run(RevOptions::default());
    let index = text(&rev, "/index.html");

    for path in [
        "/css/style.css",
        "/view/main.html",
        "/script/main.js",
        "/lib/require.js",
        "/img/image1.jpg",
        "/img/image2.jpg",
    ] {
        let expected = revisioned(&rev, path);
        assert!(index.contains(&expected), "{expected} missing from index.html");
    }
    assert!(index.contains(&format!("'{}'", revisioned(&rev, "/img/image2.jpg"))));
    assert!(index.contains(&format!(
        "\"nested/{}\"",
        rev_name(&rev, "/nested/index.html")
    )));
}

#[test]
fn test_srcset() {
    let rev = run(RevOptions::default());
    let index = text(&rev, "/index.html");
    assert_eq!(count(&index, r"image-[0-4]x\.[a-z0-9]{8}\.png"), 4);
    assert!(index.contains(&format!(
        " ./img/{} 4x\"",
        rev_name(&rev, "/img/image-4x.png")
    )));
}

#[test]
fn test_all_occurrences_replaced() {
    let rev = run(RevOptions::default());
    let index = text(&rev, "/index.html");
    assert_eq!(count(&index, r"/img/image3\.[a-z0-9]{8}\.jpg"), 2);
    assert!(!index.contains("/img/image3.jpg"));
}

// ============================================================================
// views, css, js
// ============================================================================

#[test]
fn test_angular_view() {
    let rev = run(RevOptions::default());
    let view = text(&rev, "/view/main.html");
    assert!(view.contains(&rev_name(&rev, "/img/image1.jpg")));
    assert!(view.contains(&format!(
        "'view/core/{}'",
        rev_name(&rev, "/view/core/footer.html")
    )));
}

#[test]
fn test_css_fonts() {
    let rev = run(RevOptions::default());
    let css = text(&rev, "/css/style.css");

    for path in [
        "/font/font1.eot",
        "/font/font1.woff",
        "/font/font1 space.ttf",
        "/font/font1.svg",
    ] {
        let name = rev_name(&rev, path);
        assert!(css.contains(&name), "{name} missing from style.css");
    }

    let eot = rev_name(&rev, "/font/font1.eot");
    assert!(css.contains(&format!("url('../font/{eot}?#iefix')")));
    assert_eq!(css.matches(eot.as_str()).count(), 2);
    let svg = rev_name(&rev, "/font/font1.svg");
    assert!(css.contains(&format!("url('../font/{svg}#font1')")));
    assert!(css.contains("font-family: 'font1';"));
}

#[test]
fn test_css_images() {
    let rev = run(RevOptions::default());
    let css = text(&rev, "/css/style.css");
    assert!(css.contains(&format!("url(../img/{})", rev_name(&rev, "/img/image1.jpg"))));
    assert!(css.contains(&format!("url(\"{}\")", revisioned(&rev, "/img/image2.jpg"))));
}

#[test]
fn test_nested_html_traversal() {
    let rev = run(RevOptions::default());
    let nested = text(&rev, "/nested/index.html");
    assert_eq!(
        nested,
        format!(
            r#"<link rel="stylesheet" href="../css/{}">"#,
            rev_name(&rev, "/css/style.css")
        )
    );
}

#[test]
fn test_js_references() {
    let rev = run(RevOptions::default());
    let js = text(&rev, "/application.js");

    // Extension-less module references stay extension-less
    assert!(js.contains(&format!("require('./short.{}')", short_hash(&rev, "/short.js"))));
    assert!(js.contains(&format!("require('./layout.{}')", short_hash(&rev, "/layout.js"))));
    // A variable named like a file is not a reference
    assert!(js.starts_with("var short = "));

    assert!(js.contains(&format!("templateUrl: '{}'", revisioned(&rev, "/view/gps.html"))));
    assert!(js.contains(&rev_name(&rev, "/img/image1.jpg")));
    assert!(js.contains(&format!(
        "//# sourceMappingURL={}\n",
        rev_name(&rev, "/application.js.map")
    )));
    // Unregistered routes are left alone
    assert!(js.contains("when('/gps'"));
}

// ============================================================================
// runs
// ============================================================================

#[test]
fn test_idempotent_runs() {
    let mut rev = load(RevOptions::default());
    let first_report = rev.run();
    let first: Vec<(String, Vec<u8>)> = rev
        .outputs()
        .map(|(path, contents)| (path.to_string(), contents.to_vec()))
        .collect();

    let second_report = rev.run();
    let second: Vec<(String, Vec<u8>)> = rev
        .outputs()
        .map(|(path, contents)| (path.to_string(), contents.to_vec()))
        .collect();

    assert_eq!(first_report, second_report);
    assert_eq!(first, second);
}

#[test]
fn test_outputs_in_registration_order() {
    let rev = run(RevOptions::default());
    let originals: Vec<_> = rev.registry().iter().map(Asset::original_path).collect();
    let expected: Vec<_> = fixture().into_iter().map(|(path, _)| path).collect();
    assert_eq!(originals, expected);
    assert_eq!(rev.outputs().count(), expected.len());
}

#[test]
fn test_cycles_terminate() {
    let mut rev = Revisioner::new(RevOptions::default()).unwrap();
    rev.register("/a.js", "require('./b');").unwrap();
    rev.register("/b.js", "require('./a');").unwrap();
    rev.register("/index.html", r#"<script src="/a.js"></script>"#)
        .unwrap();

    let report = rev.run();
    assert!(!report.converged);
    assert_eq!(report.renamed, 3);
    assert_eq!(report.references, 3);

    // Rewritten references still point at the final names
    assert_eq!(text(&rev, "/a.js"), format!("require('./b.{}');", short_hash(&rev, "/b.js")));
    assert_eq!(text(&rev, "/b.js"), format!("require('./a.{}');", short_hash(&rev, "/a.js")));

    // Deterministic across runs
    let names: Vec<_> = rev.outputs().map(|(p, _)| p.to_string()).collect();
    rev.run();
    let again: Vec<_> = rev.outputs().map(|(p, _)| p.to_string()).collect();
    assert_eq!(names, again);
}

#[test]
fn test_invalid_options_rejected() {
    let err = Revisioner::new(RevOptions::default().with_hash_length(0)).unwrap_err();
    assert!(matches!(err, ConfigError::Diagnostics(_)));
}

#[test]
fn test_manifest_matches_outputs() {
    let rev = run(RevOptions::default());
    let manifest = rev.manifest();
    assert_eq!(manifest.len(), 23);
    assert_eq!(
        manifest.get("/css/style.css").map(|p| format!("/{p}")),
        Some(revisioned(&rev, "/css/style.css"))
    );
}

#[test]
fn test_cycle_names_ignore_unrelated_assets() {
    let pages = |extra: &[(&str, &[u8])]| {
        let mut rev = Revisioner::new(RevOptions::default()).unwrap();
        for (path, contents) in extra {
            rev.register(path, contents.to_vec()).unwrap();
        }
        rev.register("/index.html", r#"<a href="/about.html">about</a>"#)
            .unwrap();
        rev.register("/about.html", r#"<a href="/index.html">home</a>"#)
            .unwrap();
        let report = rev.run();
        assert!(!report.converged);
        (revisioned(&rev, "/index.html"), revisioned(&rev, "/about.html"))
    };

    let alone = pages(&[]);
    let crowded = pages(&[
        ("/img/unrelated.png", PNG.as_slice()),
        ("/robots.txt", b"User-agent: *".as_slice()),
    ]);
    assert_eq!(alone, crowded);
}

#[test]
fn test_compiled_template_references() {
    let mut rev = Revisioner::new(RevOptions::default()).unwrap();
    rev.register(
        "/app.js",
        r#"var a = "<img src=\"/img/a.jpg\">"; var b = '<a href=\'view/gps.html\'>';"#,
    )
    .unwrap();
    rev.register("/img/a.jpg", JPEG.to_vec()).unwrap();
    rev.register("/view/gps.html", "<p>gps</p>").unwrap();

    let report = rev.run();
    assert_eq!(report.references, 2);
    assert_eq!(
        text(&rev, "/app.js"),
        format!(
            r#"var a = "<img src=\"{}\">"; var b = '<a href=\'{}\'>';"#,
            revisioned(&rev, "/img/a.jpg"),
            revisioned(&rev, "/view/gps.html").trim_start_matches('/'),
        )
    );
}
