//! Degree centrality.
//!
//! With edges pointing from dependent to dependency, **in-degree** counts the
//! components that depend on a node and **out-degree** counts the
//! dependencies it declares.

use std::collections::HashMap;

use petgraph::{Direction, visit::IntoNodeIdentifiers};

use crate::graph::build::IndexedGraph;

/// Per-component degree counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DegreeCentrality {
    /// Dependents per component ID.
    pub in_degree: HashMap<String, usize>,
    /// Dependencies per component ID.
    pub out_degree: HashMap<String, usize>,
}

/// Compute in- and out-degree for every node of `ig`.
#[must_use]
pub fn degree_centrality(ig: &IndexedGraph) -> DegreeCentrality {
    let g = &ig.graph;
    let mut in_degree = HashMap::with_capacity(g.node_count());
    let mut out_degree = HashMap::with_capacity(g.node_count());

    for idx in g.node_identifiers() {
        let id = ig.id(idx).to_string();
        in_degree.insert(id.clone(), g.neighbors_directed(idx, Direction::Incoming).count());
        out_degree.insert(id, g.neighbors_directed(idx, Direction::Outgoing).count());
    }

    DegreeCentrality {
        in_degree,
        out_degree,
    }
}
