//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. High-betweenness components are bridges:
//! many dependency chains pass through them.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted directed graphs:
//!
//! 1. For each source `s`, BFS to count shortest paths (`sigma`) and record
//!    distances and predecessor lists.
//! 2. Accumulate dependency scores (`delta`) in reverse BFS order.
//! 3. Sum the dependency scores across all sources.
//!
//! # Modes
//!
//! Exact Brandes is O(V·E), which is too slow for large repositories, so the
//! source set can be sampled:
//!
//! | `samples` | Mode                                           |
//! |-----------|------------------------------------------------|
//! | `< 0`     | disabled, every score is 0.0                   |
//! | `0`       | exact, every node is a source                  |
//! | `k > 0`   | `k` distinct sources, rescaled by N/k          |
//!
//! A sample size of `N` or more covers every node, so it runs (and reports)
//! as exact.
//!
//! Sampling is seeded, so a given `(graph, samples, seed)` always yields the
//! same scores. Scores are **not** normalized.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use petgraph::{Direction, visit::NodeIndexable};
use rand::{SeedableRng, rngs::StdRng, seq::index};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::build::IndexedGraph;

const UNVISITED: i64 = -1;

/// How betweenness was (or will be) computed for a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "samples")]
pub enum BetweennessMode {
    Disabled,
    Exact,
    /// Number of sampled sources, always below the node count.
    Sampled(usize),
}

impl BetweennessMode {
    /// Resolve a raw `samples` setting against a graph with `node_count`
    /// nodes. Sample counts that reach `node_count` resolve to exact.
    #[must_use]
    pub fn from_samples(samples: i64, node_count: usize) -> Self {
        match usize::try_from(samples) {
            Err(_) => Self::Disabled,
            Ok(k) if k == 0 || k >= node_count => Self::Exact,
            Ok(k) => Self::Sampled(k),
        }
    }
}

impl fmt::Display for BetweennessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("disabled"),
            Self::Exact => f.write_str("exact"),
            Self::Sampled(k) => write!(f, "sampled({k})"),
        }
    }
}

/// Compute betweenness centrality for every node of `ig`.
///
/// See the module docs for how `samples` selects the mode. `seed` only
/// matters in sampled mode.
#[must_use]
#[instrument(skip(ig), fields(nodes = ig.node_count(), edges = ig.edge_count()))]
pub fn compute_betweenness(ig: &IndexedGraph, samples: i64, seed: u64) -> HashMap<String, f64> {
    let g = &ig.graph;
    let n = g.node_count();

    if n == 0 {
        return HashMap::new();
    }

    let mode = BetweennessMode::from_samples(samples, n);
    if mode == BetweennessMode::Disabled {
        return g.node_indices().map(|idx| (ig.id(idx).to_string(), 0.0)).collect();
    }

    let sources: Vec<usize> = match mode {
        BetweennessMode::Sampled(k) => {
            let mut rng = StdRng::seed_from_u64(seed);
            index::sample(&mut rng, n, k).into_vec()
        }
        _ => (0..n).collect(),
    };

    #[allow(clippy::cast_precision_loss)]
    let scale = n as f64 / sources.len() as f64;

    debug!(%mode, sources = sources.len(), scale, "running brandes");

    let adjacency: Vec<Vec<usize>> = g
        .node_indices()
        .map(|v| {
            g.neighbors_directed(v, Direction::Outgoing)
                .map(|w| g.to_index(w))
                .collect()
        })
        .collect();

    let mut cb = vec![0.0_f64; n];
    let mut ws = BrandesWorkspace::new(n);

    for &s in &sources {
        ws.accumulate_from(s, &adjacency, &mut cb);
    }

    g.node_indices()
        .map(|idx| (ig.id(idx).to_string(), cb[g.to_index(idx)] * scale))
        .collect()
}

// ---------------------------------------------------------------------------
// Reusable per-source work buffers
// ---------------------------------------------------------------------------

/// Buffers for one single-source Brandes pass.
///
/// Allocated once per graph. After each source only the entries that were
/// touched are reset, so sparse BFS trees cost O(touched) instead of O(N).
struct BrandesWorkspace {
    queue: VecDeque<usize>,
    /// Nodes in BFS discovery order; popped farthest-first.
    stack: Vec<usize>,
    predecessors: Vec<Vec<usize>>,
    sigma: Vec<f64>,
    dist: Vec<i64>,
    delta: Vec<f64>,
    touched: Vec<usize>,
}

impl BrandesWorkspace {
    fn new(n: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(n),
            stack: Vec::with_capacity(n),
            predecessors: vec![Vec::new(); n],
            sigma: vec![0.0; n],
            dist: vec![UNVISITED; n],
            delta: vec![0.0; n],
            touched: Vec::with_capacity(n),
        }
    }

    /// Add the dependency contributions of source `s` into `cb`.
    fn accumulate_from(&mut self, s: usize, adjacency: &[Vec<usize>], cb: &mut [f64]) {
        self.dist[s] = 0;
        self.sigma[s] = 1.0;
        self.touched.push(s);
        self.queue.push_back(s);

        while let Some(v) = self.queue.pop_front() {
            self.stack.push(v);
            let dv = self.dist[v];
            for &w in &adjacency[v] {
                if self.dist[w] == UNVISITED {
                    self.dist[w] = dv + 1;
                    self.queue.push_back(w);
                    self.touched.push(w);
                }
                if self.dist[w] == dv + 1 {
                    self.sigma[w] += self.sigma[v];
                    self.predecessors[w].push(v);
                }
            }
        }

        while let Some(w) = self.stack.pop() {
            let coeff = (1.0 + self.delta[w]) / self.sigma[w];
            for &v in &self.predecessors[w] {
                self.delta[v] += self.sigma[v] * coeff;
            }
            if w != s {
                cb[w] += self.delta[w];
            }
        }

        self.reset();
    }

    fn reset(&mut self) {
        for &v in &self.touched {
            self.dist[v] = UNVISITED;
            self.sigma[v] = 0.0;
            self.delta[v] = 0.0;
            self.predecessors[v].clear();
        }
        self.touched.clear();
        self.queue.clear();
        self.stack.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
