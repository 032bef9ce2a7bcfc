//! Revisioning orchestrator.
//!
//! A [`Revisioner`] owns the registry and the options and drives the phases
//! in a fixed order:
//!
//! ```text
//! Idle ──register──► Loaded ──run──► HashesComputed ──► NamesAssigned
//!                      ▲                                     │
//!                      │                                     ▼
//!                 hash override ◄──── Done ◄──── ContentsRewritten
//! ```
//!
//! Every name is assigned before any content is rewritten, so a rewritten
//! reference always sees the final name of its target. `run` can be called
//! again at any time (for example after [`Revisioner::set_hash_override`]);
//! it always starts over from the registered bytes.

mod naming;
pub mod phase;

#[cfg(test)]
mod tests;

pub use naming::{DefaultNaming, FilenameTransform};

use crate::asset::{Asset, FileRegistry};
use crate::config::{ConfigError, RevOptions};
use crate::debug;
use crate::error::Result;
use crate::hash::ContentHash;
use crate::logger::RunSummary;
use crate::manifest::Manifest;

/// Progress of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevisionState {
    /// Nothing registered yet.
    Idle,
    /// Assets registered (or a hash override changed), not yet run.
    Loaded,
    HashesComputed,
    NamesAssigned,
    ContentsRewritten,
    /// Outputs are ready.
    Done,
}

/// Counters of one [`Revisioner::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    pub assets: usize,
    pub renamed: usize,
    pub ignored: usize,
    /// References replaced in contents.
    pub references: usize,
    /// Most hash passes any one reference cycle needed.
    pub passes: usize,
    /// False when a reference cycle was still changing at its pass ceiling.
    pub converged: bool,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            assets: self.assets,
            renamed: self.renamed,
            ignored: self.ignored,
            references: self.references,
        }
    }
}

/// Revisioning engine: register assets, run, take outputs.
///
/// # Example
///
/// ```
/// use revmark::config::RevOptions;
/// use revmark::revision::Revisioner;
///
/// let mut rev = Revisioner::new(RevOptions::default()).unwrap();
/// rev.register("/index.html", r#"<link href="/css/style.css">"#).unwrap();
/// rev.register("/css/style.css", "body {}").unwrap();
/// rev.run();
///
/// let style = rev.get("/css/style.css").unwrap().revisioned_path().to_string();
/// let html = String::from_utf8(rev.get("/index.html").unwrap().contents().to_vec()).unwrap();
/// assert!(html.contains(&style));
/// ```
#[derive(Debug)]
pub struct Revisioner {
    options: RevOptions,
    registry: FileRegistry,
    state: RevisionState,
}

impl Revisioner {
    /// Validate options and create an empty engine.
    pub fn new(options: RevOptions) -> std::result::Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            registry: FileRegistry::new(),
            state: RevisionState::Idle,
        })
    }

    /// Register an asset under its root-relative path.
    pub fn register(&mut self, path: &str, contents: impl Into<Vec<u8>>) -> Result<()> {
        self.registry.register(path, contents)?;
        self.state = RevisionState::Loaded;
        Ok(())
    }

    /// Replace an asset's propagation seed; takes effect on the next run.
    pub fn set_hash_override(&mut self, path: &str, hash: ContentHash) -> Result<()> {
        self.registry.set_hash_override(path, hash)?;
        self.state = RevisionState::Loaded;
        Ok(())
    }

    pub fn clear_hash_override(&mut self, path: &str) -> Result<()> {
        self.registry.clear_hash_override(path)?;
        self.state = RevisionState::Loaded;
        Ok(())
    }

    #[inline]
    pub fn state(&self) -> RevisionState {
        self.state
    }

    #[inline]
    pub fn options(&self) -> &RevOptions {
        &self.options
    }

    #[inline]
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Look up an asset by original path.
    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.registry.get(path)
    }

    /// Hash, name and rewrite every registered asset.
    pub fn run(&mut self) -> RunReport {
        let ignored = phase::classify(&mut self.registry, &self.options.ignore);

        let discovery = phase::discover(&self.registry);
        let propagation = phase::compute_hashes(&mut self.registry, &discovery.graph);
        self.state = RevisionState::HashesComputed;

        let default_naming = DefaultNaming::new(self.options.hash_length);
        let naming: &dyn FilenameTransform = match &self.options.filename_transform {
            Some(transform) => &**transform,
            None => &default_naming,
        };
        let renamed = phase::assign_names(&mut self.registry, naming);
        self.state = RevisionState::NamesAssigned;

        let references = phase::rewrite_contents(
            &mut self.registry,
            &discovery,
            self.options.prefix.as_deref(),
            self.options.path_transform.as_deref(),
        );
        self.state = RevisionState::ContentsRewritten;

        let report = RunReport {
            assets: self.registry.len(),
            renamed,
            ignored,
            references,
            passes: propagation.passes,
            converged: propagation.converged,
        };
        debug!(
            "rev";
            "{} assets, {} renamed, {} references rewritten, {} hash passes",
            report.assets,
            report.renamed,
            report.references,
            report.passes
        );

        self.state = RevisionState::Done;
        report
    }

    /// `(revisioned_path, contents)` for every asset, in registration order.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.registry
            .iter()
            .map(|asset| (asset.revisioned_path(), asset.contents()))
    }

    /// Original → revisioned map of the renamed assets.
    pub fn manifest(&self) -> Manifest {
        Manifest::from_registry(&self.registry)
    }

    pub fn into_registry(self) -> FileRegistry {
        self.registry
    }
}
