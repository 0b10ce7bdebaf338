//! Basic graph statistics for the dependency graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Number of components (nodes).
//! - **edge_count**: Number of repo-internal dependency edges.
//! - **avg_in_degree / avg_out_degree**: `edge_count / node_count`. The two
//!   are equal on any directed graph but are reported separately because
//!   that is how the summary reads.
//! - **max_in_degree**: Most dependents on a single component.
//! - **max_out_degree**: Most dependencies declared by a single component.
//! - **density**: `edge_count / (node_count * (node_count - 1))`. Zero for
//!   graphs with fewer than two nodes.
//! - **isolated_node_count**: Components with no edges in either direction.
//! - **weakly_connected_component_count**: Disjoint subgraphs when edge
//!   direction is ignored.

use petgraph::{
    Direction,
    algo::connected_components,
    graph::NodeIndex,
    visit::IntoNodeIdentifiers,
};
use serde::Serialize;

use crate::graph::build::{DependencyGraph, IndexedGraph};

/// Summary statistics for a dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub avg_in_degree: f64,
    pub avg_out_degree: f64,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    /// Ranges from 0.0 (no edges) to 1.0 (every ordered pair connected).
    pub density: f64,
    pub isolated_node_count: usize,
    pub weakly_connected_component_count: usize,
}

impl GraphStats {
    /// Compute statistics from a [`DependencyGraph`].
    ///
    /// The graph is normalized first, so dangling targets count as nodes.
    #[must_use]
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        Self::from_indexed(&IndexedGraph::from_dependency_graph(graph))
    }

    /// Compute statistics from an already indexed graph.
    #[must_use]
    pub fn from_indexed(ig: &IndexedGraph) -> Self {
        let g = &ig.graph;
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let degree = |idx: NodeIndex, dir: Direction| g.neighbors_directed(idx, dir).count();

        let max_in_degree = g
            .node_identifiers()
            .map(|idx| degree(idx, Direction::Incoming))
            .max()
            .unwrap_or(0);

        let max_out_degree = g
            .node_identifiers()
            .map(|idx| degree(idx, Direction::Outgoing))
            .max()
            .unwrap_or(0);

        let isolated_node_count = g
            .node_identifiers()
            .filter(|&idx| {
                degree(idx, Direction::Incoming) == 0 && degree(idx, Direction::Outgoing) == 0
            })
            .count();

        let avg = average_degree(node_count, edge_count);

        Self {
            node_count,
            edge_count,
            avg_in_degree: avg,
            avg_out_degree: avg,
            max_in_degree,
            max_out_degree,
            density: compute_density(node_count, edge_count),
            isolated_node_count,
            weakly_connected_component_count: connected_components(g),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn average_degree(node_count: usize, edge_count: usize) -> f64 {
    if node_count == 0 {
        return 0.0;
    }
    edge_count as f64 / node_count as f64
}

/// Directed density: `e / (n * (n - 1))`. Self-loops can push this above
/// 1.0 on tiny graphs; the value is clamped.
#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    (edge_count as f64 / max_edges).min(1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
