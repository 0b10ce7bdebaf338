//! Dependency-first orderings.
//!
//! Both orderings resolve cycles first (a no-op on acyclic input) and then
//! guarantee that for every surviving edge `A → B` ("A depends on B"), `B`
//! appears before `A`.
//!
//! - [`topological_sort`]: Kahn's algorithm with a min-heap, so ready nodes
//!   leave in ascending ID order. Breadth-oriented: leaf dependencies first,
//!   then everything that only needs leaves, and so on.
//! - [`dependency_first_dfs`]: DFS postorder from every node in ascending
//!   order, successors ascending. Follows call-chains depth-first.
//!
//! The two orders generally differ; each satisfies the precedence invariant.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashSet};

use tracing::{instrument, warn};

use crate::graph::build::{DependencyGraph, normalize};
use crate::graph::resolve::resolve_cycles;

/// Topological order, dependencies first, ties broken by ascending ID.
///
/// If cycle resolution did not fully converge, nodes that never become ready
/// are appended in ascending order and a warning is logged.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.len()))]
pub fn topological_sort(graph: &DependencyGraph) -> Vec<String> {
    let acyclic = normalize(&resolve_cycles(graph));

    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut pending: BTreeMap<&str, usize> = BTreeMap::new();

    for (node, deps) in &acyclic {
        pending.insert(node.as_str(), deps.len());
        for dep in deps {
            dependents.entry(dep.as_str()).or_default().insert(node.as_str());
        }
    }

    let mut ready: BinaryHeap<Reverse<&str>> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| Reverse(*node))
        .collect();

    let mut result: Vec<String> = Vec::with_capacity(acyclic.len());

    while let Some(Reverse(node)) = ready.pop() {
        result.push(node.to_string());
        let Some(waiting) = dependents.get(node) else {
            continue;
        };
        for dependent in waiting {
            if let Some(count) = pending.get_mut(dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }
    }

    if result.len() != acyclic.len() {
        warn!(
            scheduled = result.len(),
            total = acyclic.len(),
            "topological sort incomplete after cycle resolution; appending remaining nodes"
        );
        let emitted: HashSet<&str> = result.iter().map(String::as_str).collect();
        let remaining: Vec<String> = acyclic
            .keys()
            .filter(|node| !emitted.contains(node.as_str()))
            .cloned()
            .collect();
        result.extend(remaining);
    }

    result
}

/// Depth-first postorder, dependencies first.
///
/// Every node is used as a DFS root in ascending order, so coverage does not
/// depend on where the graph's entry points are. Uses an explicit stack.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.len()))]
pub fn dependency_first_dfs(graph: &DependencyGraph) -> Vec<String> {
    let acyclic = normalize(&resolve_cycles(graph));

    let mut visited: HashSet<&str> = HashSet::with_capacity(acyclic.len());
    let mut visiting: HashSet<&str> = HashSet::new();
    let mut result: Vec<String> = Vec::with_capacity(acyclic.len());

    // Frame: (node, iterator over its sorted successors).
    let mut frames: Vec<(&str, std::collections::btree_set::Iter<'_, String>)> = Vec::new();

    for root in acyclic.keys() {
        if visited.contains(root.as_str()) {
            continue;
        }
        visiting.insert(root.as_str());
        frames.push((root.as_str(), acyclic[root].iter()));

        while let Some((node, successors)) = frames.last_mut() {
            let node = *node;
            let next = successors.find(|dep| {
                !visited.contains(dep.as_str()) && !visiting.contains(dep.as_str())
            });

            if let Some(dep) = next {
                visiting.insert(dep.as_str());
                let deps = acyclic.get(dep).map_or_else(|| EMPTY.iter(), BTreeSet::iter);
                frames.push((dep.as_str(), deps));
            } else {
                frames.pop();
                visiting.remove(node);
                visited.insert(node);
                result.push(node.to_string());
            }
        }
    }

    result
}

static EMPTY: BTreeSet<String> = BTreeSet::new();

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
