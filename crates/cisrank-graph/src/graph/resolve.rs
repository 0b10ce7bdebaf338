//! Cycle resolution by deterministic edge removal.
//!
//! # Policy
//!
//! Each round runs [`detect_cycles`] and removes exactly one edge per cycle
//! group:
//!
//! 1. If any member has a self-loop, drop the self-loop of the smallest such
//!    member.
//! 2. Otherwise drop `u → v` where `u` is the smallest member with a
//!    successor inside the group and `v` is the smallest such successor.
//!
//! Rounds repeat until no cycles remain, capped at `max(10, 2 × nodes)`.
//!
//! This is a greedy approximation of a minimum feedback arc set. It is
//! deterministic and usually removes few edges, but it is not optimal.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::graph::build::{DependencyGraph, normalize};
use crate::graph::cycles::{detect_cycles, has_self_loop};

/// Outcome of [`resolve_cycles_with_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleResolution {
    /// The resolved graph (normalized). Acyclic when `converged` is true.
    pub graph: DependencyGraph,
    /// Removed `(dependent, dependency)` edges, in removal order.
    pub removed_edges: Vec<(String, String)>,
    /// Detection rounds that removed at least one edge.
    pub rounds: usize,
    /// `false` when the round cap was hit or a round made no progress.
    pub converged: bool,
}

/// Upper bound on resolution rounds for a graph with `node_count` nodes.
#[must_use]
pub fn max_rounds(node_count: usize) -> usize {
    10.max(node_count.saturating_mul(2))
}

/// Make `graph` acyclic, returning only the resolved graph.
///
/// See [`resolve_cycles_with_report`] for the removal policy.
#[must_use]
pub fn resolve_cycles(graph: &DependencyGraph) -> DependencyGraph {
    resolve_cycles_with_report(graph).graph
}

/// Make `graph` acyclic and report which edges were removed.
///
/// Never fails: if the round budget runs out, the partially resolved graph is
/// returned with `converged = false` and a warning is logged.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.len()))]
pub fn resolve_cycles_with_report(graph: &DependencyGraph) -> CycleResolution {
    let mut resolved = normalize(graph);
    let mut removed_edges: Vec<(String, String)> = Vec::new();
    let budget = max_rounds(resolved.len());

    for round in 0..budget {
        let cycles = detect_cycles(&resolved);
        if cycles.is_empty() {
            if removed_edges.is_empty() {
                debug!("no cycles detected in the dependency graph");
            } else {
                info!(
                    removed = removed_edges.len(),
                    edges = %format_edges(&removed_edges),
                    "resolved cycles"
                );
            }
            return CycleResolution {
                graph: resolved,
                removed_edges,
                rounds: round,
                converged: true,
            };
        }

        info!(round, groups = cycles.len(), "detected cycle groups");

        let mut changed = false;
        for (group_no, group) in cycles.iter().enumerate() {
            debug!(group = group_no + 1, members = %group.join(", "), "cycle group");

            if let Some((u, v)) = pick_edge_to_remove(&resolved, group) {
                info!(from = %u, to = %v, "breaking cycle by removing dependency");
                if let Some(deps) = resolved.get_mut(&u) {
                    deps.remove(&v);
                }
                removed_edges.push((u, v));
                changed = true;
            }
        }

        if !changed {
            warn!("cycle resolution stopped making progress; returning partially-resolved graph");
            return CycleResolution {
                graph: resolved,
                removed_edges,
                rounds: round,
                converged: false,
            };
        }
    }

    let converged = detect_cycles(&resolved).is_empty();
    if !converged {
        warn!(
            rounds = budget,
            "cycle resolution exceeded max rounds; returning partially-resolved graph"
        );
    }

    CycleResolution {
        graph: resolved,
        removed_edges,
        rounds: budget,
        converged,
    }
}

/// Choose the edge that breaks `group`, per the module-level policy.
///
/// `group` members are sorted (as returned by [`detect_cycles`]).
fn pick_edge_to_remove(graph: &DependencyGraph, group: &[String]) -> Option<(String, String)> {
    let members: BTreeSet<&str> = group.iter().map(String::as_str).collect();

    if let Some(u) = members.iter().find(|u| has_self_loop(graph, u)) {
        return Some(((*u).to_string(), (*u).to_string()));
    }

    members.iter().find_map(|u| {
        graph.get(*u).and_then(|deps| {
            deps.iter()
                .find(|v| members.contains(v.as_str()))
                .map(|v| ((*u).to_string(), v.clone()))
        })
    })
}

fn format_edges(edges: &[(String, String)]) -> String {
    edges
        .iter()
        .map(|(u, v)| format!("{u}->{v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
