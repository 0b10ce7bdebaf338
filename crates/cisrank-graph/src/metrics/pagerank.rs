//! PageRank by power iteration.
//!
//! # Algorithm
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) / out_degree(u)   for each u → v
//!       + d * Σ PR(z) / N                             for each dangling z
//! ```
//!
//! where `d` is the damping factor (default 0.85). Edges point from dependent
//! to dependency, so rank flows toward the components everything else relies
//! on. Dangling components (no dependencies) spread their whole mass
//! uniformly, which keeps the ranks summing to 1.
//!
//! Iteration stops when the L1 norm of the rank delta drops below the
//! tolerance or after `max_iter` rounds, whichever comes first.

use std::collections::HashMap;

use petgraph::{
    Direction,
    visit::{IntoNodeIdentifiers, NodeIndexable},
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::build::IndexedGraph;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Probability of following a dependency edge instead of teleporting.
    /// Default: 0.85.
    pub damping: f64,
    /// Stop when the L1 norm of the rank delta is below this.
    /// Default: 1e-8.
    pub tolerance: f64,
    /// Default: 50.
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-8,
            max_iter: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone, Serialize)]
pub struct PageRankResult {
    /// Component ID → rank. Sums to 1 for a non-empty graph.
    pub scores: HashMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the L1 delta fell below the tolerance within `max_iter`.
    pub converged: bool,
}

/// Compute PageRank for every node of `ig`.
///
/// An empty graph yields empty scores with `converged = true`.
#[must_use]
#[instrument(skip(ig, config), fields(nodes = ig.node_count(), damping = config.damping))]
#[allow(clippy::cast_precision_loss)]
pub fn compute_pagerank(ig: &IndexedGraph, config: &PageRankConfig) -> PageRankResult {
    let g = &ig.graph;
    let n = g.node_count();

    if n == 0 {
        return PageRankResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    // Out-neighbour lists in dense index space, computed once.
    let successors: Vec<Vec<usize>> = g
        .node_identifiers()
        .map(|node| {
            g.neighbors_directed(node, Direction::Outgoing)
                .map(|w| g.to_index(w))
                .collect()
        })
        .collect();

    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        iterations += 1;

        let dangling_mass: f64 = successors
            .iter()
            .zip(&ranks)
            .filter(|(succ, _)| succ.is_empty())
            .map(|(_, rank)| rank)
            .sum();

        new_ranks.fill(config.damping.mul_add(dangling_mass / n_f64, base));

        for (idx, succ) in successors.iter().enumerate() {
            if succ.is_empty() {
                continue;
            }
            let share = config.damping * ranks[idx] / succ.len() as f64;
            for &w in succ {
                new_ranks[w] += share;
            }
        }

        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    debug!(iterations, converged, "pagerank finished");

    let scores = g
        .node_identifiers()
        .map(|idx| (ig.id(idx).to_string(), ranks[g.to_index(idx)]))
        .collect();

    PageRankResult {
        scores,
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
