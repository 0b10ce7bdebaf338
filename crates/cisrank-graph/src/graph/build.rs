//! Graph construction from scanner components.
//!
//! # Edge Direction
//!
//! An edge `A → B` means "A **depends on** B". For each component `A` and
//! each ID `B` in `A.depends_on` we insert `A → B`, but only when `B` is
//! itself a component of the same repository. References to the standard
//! library, third-party packages, or anything else the scanner could not
//! resolve are dropped silently; that is a policy, not an error.
//!
//! # Representations
//!
//! - [`DependencyGraph`]: the boundary type. Ordered maps and sets make every
//!   traversal deterministic without extra sorting.
//! - [`IndexedGraph`]: a petgraph view with dense node indices, used by the
//!   centrality metrics where per-node work arrays matter.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap};

use cisrank_core::ComponentSet;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

/// Adjacency map: component ID → IDs it depends on.
pub type DependencyGraph = BTreeMap<String, BTreeSet<String>>;

/// Return a copy of `graph` that is closed over every referenced node.
///
/// Nodes that only appear as dependency targets are added as keys with an
/// empty successor set. The input is not modified, and applying the function
/// twice yields the same graph as applying it once.
#[must_use]
pub fn normalize(graph: &DependencyGraph) -> DependencyGraph {
    let mut normalized = graph.clone();
    for deps in graph.values() {
        for dep in deps {
            if !normalized.contains_key(dep) {
                normalized.insert(dep.clone(), BTreeSet::new());
            }
        }
    }
    normalized
}

/// Build the repository-internal dependency graph.
///
/// Keys are exactly the component IDs. Successors are each component's
/// `depends_on` restricted to IDs present in `components`.
#[must_use]
#[instrument(skip(components), fields(components = components.len()))]
pub fn build_from_components(components: &ComponentSet) -> DependencyGraph {
    let mut dropped = 0usize;

    let graph: DependencyGraph = components
        .iter()
        .map(|(id, component)| {
            let deps: BTreeSet<String> = component
                .depends_on
                .iter()
                .filter(|dep| {
                    let internal = components.contains_key(dep.as_str());
                    if !internal {
                        dropped += 1;
                    }
                    internal
                })
                .cloned()
                .collect();
            (id.clone(), deps)
        })
        .collect();

    debug!(
        nodes = graph.len(),
        edges = edge_count(&graph),
        external_refs_dropped = dropped,
        "built dependency graph"
    );

    graph
}

/// Total number of edges in `graph`.
#[must_use]
pub fn edge_count(graph: &DependencyGraph) -> usize {
    graph.values().map(BTreeSet::len).sum()
}

// ---------------------------------------------------------------------------
// IndexedGraph
// ---------------------------------------------------------------------------

/// A petgraph view of a [`DependencyGraph`].
///
/// Nodes are inserted in ascending ID order, so `NodeIndex(i)` is the `i`-th
/// smallest ID and results are reproducible across runs.
#[derive(Debug, Clone)]
pub struct IndexedGraph {
    /// Directed graph: nodes = component IDs, edges = dependencies.
    pub graph: DiGraph<String, ()>,
    /// Mapping from component ID to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl IndexedGraph {
    /// Build the indexed view. The input is normalized first so dangling
    /// targets become nodes.
    #[must_use]
    pub fn from_dependency_graph(graph: &DependencyGraph) -> Self {
        let normalized = normalize(graph);
        let edge_total = edge_count(&normalized);

        let mut di = DiGraph::<String, ()>::with_capacity(normalized.len(), edge_total);
        let mut node_map = HashMap::with_capacity(normalized.len());

        for id in normalized.keys() {
            let idx = di.add_node(id.clone());
            node_map.insert(id.clone(), idx);
        }

        for (from, deps) in &normalized {
            let from_idx = node_map[from.as_str()];
            for dep in deps {
                di.add_edge(from_idx, node_map[dep.as_str()], ());
            }
        }

        Self {
            graph: di,
            node_map,
        }
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Component ID stored at `idx`.
    #[must_use]
    pub fn id(&self, idx: NodeIndex) -> &str {
        self.graph
            .node_weight(idx)
            .map_or("", String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
