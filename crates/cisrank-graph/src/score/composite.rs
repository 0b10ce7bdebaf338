//! Composite Core Influence Score.
//!
//! ```text
//! CIS(v) = alpha * n(in_degree) + beta * n(out_degree) + gamma * n(betweenness) + n(pagerank)
//! ```
//!
//! where `n` is per-metric min-max normalization over all nodes. The
//! PageRank term always has weight 1.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::build::{DependencyGraph, IndexedGraph};
use crate::metrics::betweenness::{BetweennessMode, compute_betweenness};
use crate::metrics::degree::degree_centrality;
use crate::metrics::pagerank::{PageRankConfig, compute_pagerank};

/// Weights for the normalized in-degree, out-degree and betweenness terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CisWeights {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for CisWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            gamma: 1.0,
        }
    }
}

/// Raw metrics and final score for one component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeMetrics {
    pub in_degree: usize,
    pub out_degree: usize,
    /// Raw (possibly rescaled) Brandes score.
    pub betweenness: f64,
    pub pagerank: f64,
    pub score: f64,
}

/// Everything [`compute_metrics`] needs besides the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    pub weights: CisWeights,
    /// `< 0` disabled, `0` exact, `> 0` sampled sources.
    pub betweenness_samples: i64,
    pub betweenness_seed: u64,
    pub pagerank: PageRankConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            weights: CisWeights::default(),
            betweenness_samples: 200,
            betweenness_seed: 0,
            pagerank: PageRankConfig::default(),
        }
    }
}

/// Per-component metrics plus how they were computed.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub metrics: BTreeMap<String, NodeMetrics>,
    pub betweenness_mode: BetweennessMode,
    pub pagerank_iterations: usize,
    pub pagerank_converged: bool,
}

/// Combine already-normalized metric values into a CIS.
#[must_use]
pub fn cis_score(in_n: f64, out_n: f64, bc_n: f64, pr_n: f64, weights: &CisWeights) -> f64 {
    weights
        .gamma
        .mul_add(bc_n, weights.beta.mul_add(out_n, weights.alpha * in_n))
        + pr_n
}

/// Min-max normalization that maps raw metric values to `[0, 1]`.
///
/// If all values are equal (including a single-element slice), all outputs are
/// `0.0`.
#[must_use]
pub fn normalize_metric(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range.abs() <= f64::EPSILON {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|&value| normalize_unit((value - min) / range))
        .collect()
}

fn normalize_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    value.clamp(0.0, 1.0)
}

/// Compute degree, betweenness, PageRank and the CIS for every node.
///
/// Runs on the graph as given: cycles are not resolved first.
#[must_use]
#[instrument(skip(graph, config), fields(nodes = graph.len()))]
#[allow(clippy::cast_precision_loss)]
pub fn compute_metrics(graph: &DependencyGraph, config: &MetricsConfig) -> MetricsReport {
    let ig = IndexedGraph::from_dependency_graph(graph);
    let n = ig.node_count();

    let degrees = degree_centrality(&ig);
    let bc = compute_betweenness(&ig, config.betweenness_samples, config.betweenness_seed);
    let pr = compute_pagerank(&ig, &config.pagerank);

    // Dense, ID-sorted columns so normalization sees every node once.
    let ids: Vec<&str> = ig.graph.node_indices().map(|idx| ig.id(idx)).collect();
    let in_deg: Vec<usize> = ids.iter().map(|id| degrees.in_degree[*id]).collect();
    let out_deg: Vec<usize> = ids.iter().map(|id| degrees.out_degree[*id]).collect();
    let bc_raw: Vec<f64> = ids.iter().map(|id| bc.get(*id).copied().unwrap_or(0.0)).collect();
    let pr_raw: Vec<f64> = ids
        .iter()
        .map(|id| pr.scores.get(*id).copied().unwrap_or(0.0))
        .collect();

    let in_n = normalize_metric(&in_deg.iter().map(|d| *d as f64).collect::<Vec<_>>());
    let out_n = normalize_metric(&out_deg.iter().map(|d| *d as f64).collect::<Vec<_>>());
    let bc_n = normalize_metric(&bc_raw);
    let pr_n = normalize_metric(&pr_raw);

    let metrics: BTreeMap<String, NodeMetrics> = (0..n)
        .map(|i| {
            let score = cis_score(in_n[i], out_n[i], bc_n[i], pr_n[i], &config.weights);
            (
                ids[i].to_string(),
                NodeMetrics {
                    in_degree: in_deg[i],
                    out_degree: out_deg[i],
                    betweenness: bc_raw[i],
                    pagerank: pr_raw[i],
                    score,
                },
            )
        })
        .collect();

    debug!(
        nodes = metrics.len(),
        pagerank_iterations = pr.iterations,
        pagerank_converged = pr.converged,
        "computed component metrics"
    );

    MetricsReport {
        metrics,
        betweenness_mode: BetweennessMode::from_samples(config.betweenness_samples, n),
        pagerank_iterations: pr.iterations,
        pagerank_converged: pr.converged,
    }
}
