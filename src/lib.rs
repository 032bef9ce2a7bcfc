//! Content-hash revisioning for interrelated static assets.
//!
//! Every asset gets a cache-busting name derived from its content and the
//! content of everything it references, and every textual reference to a
//! renamed asset is rewritten to the new name.
//!
//! # Modules
//!
//! | Module       | Purpose                                              |
//! |--------------|------------------------------------------------------|
//! | `asset`      | Asset records and the registry that owns them        |
//! | `path`       | Slash normalization, reference representations       |
//! | `hash`       | blake3 content hash, composite hash propagation      |
//! | `resolve`    | Reference discovery and rewriting                    |
//! | `revision`   | Phases and the `Revisioner` that drives them         |
//! | `config`     | Options, `revmark.toml`, validation diagnostics      |
//! | `manifest`   | Original → revisioned path map                       |
//! | `logger`     | `log!` / `debug!` output                             |

pub mod asset;
pub mod config;
pub mod error;
pub mod hash;
pub mod logger;
pub mod manifest;
pub mod path;
pub mod resolve;
pub mod revision;

pub use asset::{Asset, AssetId, AssetKind, FileRegistry};
pub use config::{ConfigError, IgnoreRule, IgnoreRules, RevConfig, RevOptions};
pub use error::RevError;
pub use hash::ContentHash;
pub use manifest::Manifest;
pub use resolve::{PathTransform, RewriteSite};
pub use revision::{DefaultNaming, FilenameTransform, RevisionState, Revisioner, RunReport};
