//! Composite hash propagation over the reference graph.
//!
//! The composite hash of an asset is `fold(seed, composite(children))`, where
//! the seed is its content hash (or an injected override). HTML, CSS and JS
//! routinely reference each other in cycles, so the graph is split into
//! strongly connected components and settled component by component, sinks
//! first:
//!
//! - a component without a cycle is one asset, folded once over its
//!   already-final children;
//! - a cycle is iterated Jacobi-style from its members' seeds, at most
//!   `members` passes, with edges leaving the cycle read as final values.
//!
//! A cycle's hashes therefore depend only on its members and what they
//! reference, never on unrelated assets in the registry. Every call starts
//! from the seeds, so identical inputs always produce identical hashes.

use super::{ContentHash, fold};
use crate::asset::AssetId;

/// Directed reference graph: edges go from referencing asset to referenced asset.
///
/// # Invariants
/// - Edge lists keep discovery order
/// - No self edges, no duplicate edges
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    edges: Vec<Vec<AssetId>>,
}

impl ReferenceGraph {
    /// Graph with `len` assets and no edges.
    pub fn new(len: usize) -> Self {
        Self {
            edges: vec![Vec::new(); len],
        }
    }

    /// Append an edge, ignoring self references and repeats.
    pub fn add_edge(&mut self, from: AssetId, to: AssetId) {
        if from == to {
            return;
        }
        let list = &mut self.edges[from.index()];
        if !list.contains(&to) {
            list.push(to);
        }
    }

    /// Assets referenced by `id`, in discovery order.
    #[inline]
    pub fn references(&self, id: AssetId) -> &[AssetId] {
        &self.edges[id.index()]
    }

    /// Number of assets in the graph.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Strongly connected components, each after every component it references.
    ///
    /// Iterative Tarjan; members of a component are sorted by id.
    pub fn components(&self) -> Vec<Vec<AssetId>> {
        const UNVISITED: usize = usize::MAX;

        let len = self.edges.len();
        let mut index = vec![UNVISITED; len];
        let mut low = vec![0; len];
        let mut on_stack = vec![false; len];
        let mut stack = Vec::new();
        let mut components = Vec::new();
        let mut next = 0;

        for root in 0..len {
            if index[root] != UNVISITED {
                continue;
            }
            index[root] = next;
            low[root] = next;
            next += 1;
            stack.push(root);
            on_stack[root] = true;

            // (node, position of the next edge to follow)
            let mut work = vec![(root, 0)];
            while let Some((v, pos)) = work.pop() {
                if let Some(w) = self.edges[v].get(pos).map(|w| w.index()) {
                    work.push((v, pos + 1));
                    if index[w] == UNVISITED {
                        index[w] = next;
                        low[w] = next;
                        next += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        work.push((w, 0));
                    } else if on_stack[w] {
                        low[v] = low[v].min(index[w]);
                    }
                    continue;
                }

                if let Some(&(parent, _)) = work.last() {
                    low[parent] = low[parent].min(low[v]);
                }
                if low[v] == index[v] {
                    let mut component = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        component.push(AssetId::new(w));
                        if w == v {
                            break;
                        }
                    }
                    component.sort();
                    components.push(component);
                }
            }
        }
        components
    }
}

/// Result of a propagation run.
#[derive(Debug, Clone)]
pub struct Propagation {
    /// Composite hash per asset, indexed by `AssetId`.
    pub hashes: Vec<ContentHash>,
    /// Most passes any single component needed.
    pub passes: usize,
    /// False when some cycle was still changing at its pass ceiling.
    pub converged: bool,
    /// Members of the cycles that did not settle.
    pub unstable: Vec<AssetId>,
}

/// Compute composite hashes for every asset.
///
/// `seeds[i]` is the seed of asset `i`; the graph must have the same length.
pub fn propagate(seeds: &[ContentHash], graph: &ReferenceGraph) -> Propagation {
    debug_assert_eq!(seeds.len(), graph.len());

    let mut hashes = seeds.to_vec();
    let mut passes = 0;
    let mut unstable = Vec::new();

    for component in graph.components() {
        let (used, settled) = match component.as_slice() {
            [id] => {
                hashes[id.index()] = fold_one(*id, seeds, graph, &hashes);
                (1, true)
            }
            members => settle_cycle(members, seeds, graph, &mut hashes),
        };
        passes = passes.max(used);
        if !settled {
            unstable.extend(component);
        }
    }

    unstable.sort();
    if !unstable.is_empty() {
        crate::debug!(
            "hash";
            "{} asset(s) in reference cycles keep the hash of their last pass",
            unstable.len()
        );
    }

    Propagation {
        hashes,
        passes,
        converged: unstable.is_empty(),
        unstable,
    }
}

#[inline]
fn fold_one(id: AssetId, seeds: &[ContentHash], graph: &ReferenceGraph, hashes: &[ContentHash]) -> ContentHash {
    let children = graph.references(id).iter().map(|child| &hashes[child.index()]);
    fold(&seeds[id.index()], children)
}

/// Jacobi passes over one cycle; returns (passes, settled).
///
/// `members.len()` passes carry every member's seed to every other member.
fn settle_cycle(
    members: &[AssetId],
    seeds: &[ContentHash],
    graph: &ReferenceGraph,
    hashes: &mut [ContentHash],
) -> (usize, bool) {
    let ceiling = members.len();
    for pass in 1..=ceiling {
        // Every recomputation reads the previous pass's values
        let updates: Vec<(usize, ContentHash)> = members
            .iter()
            .map(|&id| (id.index(), fold_one(id, seeds, graph, hashes)))
            .filter(|(i, hash)| hashes[*i] != *hash)
            .collect();

        if updates.is_empty() {
            return (pass, true);
        }
        for (i, hash) in updates {
            hashes[i] = hash;
        }
    }
    (ceiling, false)
}
