//! Revision phases.
//!
//! Each phase is a free function over the registry so it can be run and
//! tested on its own. [`Revisioner::run`](super::Revisioner::run) chains
//! them:
//!
//! ```text
//! classify → discover → compute_hashes → assign_names → rewrite_contents
//! ```
//!
//! Per-asset work (content hashing, discovery, rewriting) fans out with
//! rayon over a shared view of the registry; writes are applied
//! sequentially afterwards.

use rayon::prelude::*;

use super::FilenameTransform;
use crate::asset::FileRegistry;
use crate::config::IgnoreRules;
use crate::hash::{ContentHash, Propagation, ReferenceGraph, propagate};
use crate::path::{dirname, join_path};
use crate::resolve::{PathTransform, ReferenceMatch, ReferenceResolver, Rewriter};

/// Mark assets matched by an ignore rule. Returns the number ignored.
pub fn classify(registry: &mut FileRegistry, ignore: &IgnoreRules) -> usize {
    let mut ignored = 0;
    for asset in registry.assets_mut() {
        let hit = ignore.matches(asset.original_path());
        asset.set_ignored(hit);
        ignored += usize::from(hit);
    }
    ignored
}

/// References found in every asset.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Matches per asset, indexed by `AssetId`, in content order.
    pub matches: Vec<Vec<ReferenceMatch>>,
    /// Edges in discovery order, without self edges.
    pub graph: ReferenceGraph,
}

impl Discovery {
    /// Total number of matches, self references included.
    pub fn reference_count(&self) -> usize {
        self.matches.iter().map(Vec::len).sum()
    }
}

/// Scan every text asset for references to registered assets.
pub fn discover(registry: &FileRegistry) -> Discovery {
    let resolver = ReferenceResolver::new(registry);
    let matches: Vec<Vec<ReferenceMatch>> = registry
        .all()
        .par_iter()
        .map(|asset| resolver.discover(asset))
        .collect();

    let mut graph = ReferenceGraph::new(registry.len());
    for (asset, found) in registry.iter().zip(&matches) {
        for m in found {
            graph.add_edge(asset.id(), m.target);
        }
    }

    Discovery { matches, graph }
}

/// Hash original contents, then propagate composite hashes over `graph`.
pub fn compute_hashes(registry: &mut FileRegistry, graph: &ReferenceGraph) -> Propagation {
    let content_hashes: Vec<ContentHash> = registry
        .all()
        .par_iter()
        .map(|asset| ContentHash::of(asset.original_contents()))
        .collect();
    for (asset, hash) in registry.assets_mut().iter_mut().zip(content_hashes) {
        asset.set_content_hash(hash);
    }

    let seeds: Vec<ContentHash> = registry.iter().map(|asset| asset.seed()).collect();
    let result = propagate(&seeds, graph);
    for (asset, hash) in registry.assets_mut().iter_mut().zip(&result.hashes) {
        asset.set_rev_hash(*hash);
    }
    result
}

/// Give every asset its revisioned path. Returns the number renamed.
///
/// Ignored assets keep their original path.
pub fn assign_names(registry: &mut FileRegistry, naming: &dyn FilenameTransform) -> usize {
    let paths: Vec<String> = registry
        .all()
        .par_iter()
        .map(|asset| {
            if asset.is_ignored() {
                return asset.original_path().to_string();
            }
            let name = naming.file_name(asset, &asset.rev_hash().to_hex());
            join_path(dirname(asset.original_path()), &name)
        })
        .collect();

    let mut renamed = 0;
    for (asset, path) in registry.assets_mut().iter_mut().zip(paths) {
        asset.set_revisioned_path(path);
        renamed += usize::from(asset.is_renamed());
    }
    renamed
}

/// Replace every non-ignored reference with its revisioned spelling.
///
/// Rewriting always starts from the original contents, so running the
/// phase again gives the same output. Returns the number of substitutions.
pub fn rewrite_contents(
    registry: &mut FileRegistry,
    discovery: &Discovery,
    prefix: Option<&str>,
    transform: Option<&dyn PathTransform>,
) -> usize {
    let rewritten: Vec<Option<(String, usize)>> = {
        let rewriter = Rewriter::new(registry)
            .with_prefix(prefix)
            .with_transform(transform);
        registry
            .all()
            .par_iter()
            .zip(discovery.matches.par_iter())
            .map(|(asset, matches)| rewriter.rewrite(asset, matches))
            .collect()
    };

    let mut total = 0;
    for (asset, result) in registry.assets_mut().iter_mut().zip(rewritten) {
        let contents = match result {
            Some((text, count)) => {
                total += count;
                text.into_bytes()
            }
            None => asset.original_contents().to_vec(),
        };
        asset.set_contents(contents);
    }
    total
}
