//! Cycle detection via Tarjan's strongly connected components.
//!
//! A *cycle group* is an SCC with more than one member, or a single node
//! that depends on itself. Groups are emitted in the order Tarjan's DFS
//! completes them while visiting roots in ascending ID order; members of each
//! group are sorted.
//!
//! The DFS keeps its own frame stack instead of recursing, so graphs with
//! dependency chains tens of thousands of nodes deep do not overflow the
//! thread stack.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use tracing::trace;

use crate::graph::build::{DependencyGraph, normalize};

/// Find all dependency cycles in `graph`.
///
/// The graph is normalized internally, so dangling targets are fine.
/// Runs in O(V + E). An acyclic or empty graph yields an empty list.
#[must_use]
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let normalized = normalize(graph);
    let nodes: Vec<&str> = normalized.keys().map(String::as_str).collect();
    let position: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let adjacency: Vec<Vec<usize>> = normalized
        .values()
        .map(|deps| deps.iter().map(|dep| position[dep.as_str()]).collect())
        .collect();

    let components = Tarjan::new(&adjacency).run();

    let cycles: Vec<Vec<String>> = components
        .into_iter()
        .filter(|component| match component.as_slice() {
            [only] => adjacency[*only].contains(only),
            members => members.len() > 1,
        })
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|i| nodes[i].to_string())
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();

    trace!(groups = cycles.len(), "cycle detection finished");
    cycles
}

/// Return `true` if `node` lists itself as a dependency.
#[must_use]
pub fn has_self_loop(graph: &DependencyGraph, node: &str) -> bool {
    graph.get(node).is_some_and(|deps| deps.contains(node))
}

// ---------------------------------------------------------------------------
// Iterative Tarjan
// ---------------------------------------------------------------------------

const UNVISITED: usize = usize::MAX;

/// Work arrays for one Tarjan run over a dense adjacency list.
struct Tarjan<'a> {
    adjacency: &'a [Vec<usize>],
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    /// DFS frames: `(node, next successor offset)`.
    frames: Vec<(usize, usize)>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl<'a> Tarjan<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            index: vec![UNVISITED; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            frames: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<usize>> {
        for root in 0..self.adjacency.len() {
            if self.index[root] == UNVISITED {
                self.enter(root);
                self.drain_frames();
            }
        }
        self.components
    }

    fn enter(&mut self, v: usize) {
        self.index[v] = self.next_index;
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        self.frames.push((v, 0));
    }

    fn drain_frames(&mut self) {
        while let Some(&(v, offset)) = self.frames.last() {
            if let Some(&w) = self.adjacency[v].get(offset) {
                if let Some(frame) = self.frames.last_mut() {
                    frame.1 += 1;
                }

                if self.index[w] == UNVISITED {
                    self.enter(w);
                } else if self.on_stack[w] {
                    self.lowlink[v] = self.lowlink[v].min(self.index[w]);
                }
                continue;
            }

            // All successors of v explored.
            self.frames.pop();
            if let Some(&(parent, _)) = self.frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }

            if self.lowlink[v] == self.index[v] {
                let mut component = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(entries: &[(&str, &[&str])]) -> DependencyGraph {
        entries
            .iter()
            .map(|(id, deps)| {
                (
                    (*id).to_string(),
                    deps.iter().map(|d| (*d).to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_graph_has_no_cycles() {
        assert!(detect_cycles(&DependencyGraph::new()).is_empty());
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let g = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]);
        assert!(detect_cycles(&g).is_empty());
    }

    #[test]
    fn two_node_cycle() {
        let g = graph(&[("A", &["B"]), ("B", &["A"])]);
        assert_eq!(detect_cycles(&g), vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = graph(&[("A", &["A"])]);
        assert_eq!(detect_cycles(&g), vec![vec!["A".to_string()]]);
        assert!(has_self_loop(&g, "A"));
    }

    #[test]
    fn single_node_without_loop_is_not_a_cycle() {
        let g = graph(&[("A", &[])]);
        assert!(detect_cycles(&g).is_empty());
        assert!(!has_self_loop(&g, "A"));
        assert!(!has_self_loop(&g, "missing"));
    }

    #[test]
    fn disjoint_cycles_reported_separately() {
        // A ⇄ B, C → D → E → C, F isolated, G → A (not part of any cycle)
        let g = graph(&[
            ("A", &["B"]),
            ("B", &["A"]),
            ("C", &["D"]),
            ("D", &["E"]),
            ("E", &["C"]),
            ("F", &[]),
            ("G", &["A"]),
        ]);

        let mut cycles = detect_cycles(&g);
        cycles.sort();
        assert_eq!(
            cycles,
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["C".to_string(), "D".to_string(), "E".to_string()],
            ]
        );
    }

    #[test]
    fn nested_cycles_collapse_into_one_group() {
        // A → B → C → A and B → D → B share B, so all four form one SCC.
        let g = graph(&[("A", &["B"]), ("B", &["C", "D"]), ("C", &["A"]), ("D", &["B"])]);
        let cycles = detect_cycles(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn dangling_targets_are_handled() {
        let g = graph(&[("A", &["B", "X"]), ("B", &["A"])]);
        assert_eq!(detect_cycles(&g), vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let n = 50_000;
        let ids: Vec<String> = (0..n).map(|i| format!("n{i:06}")).collect();
        let mut g = DependencyGraph::new();
        for pair in ids.windows(2) {
            g.insert(pair[0].clone(), std::iter::once(pair[1].clone()).collect());
        }
        // Close the loop: last → first.
        g.insert(
            ids[n - 1].clone(),
            std::iter::once(ids[0].clone()).collect(),
        );

        let cycles = detect_cycles(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), n);
    }
}
