//! Centrality metrics for the dependency graph.
//!
//! # Overview
//!
//! Each metric answers a different question about component importance:
//!
//! - **Degree** (`degree`): How many components depend on this one, and how
//!   many does it depend on?
//! - **Betweenness centrality** (`betweenness`): Which components sit on the
//!   shortest dependency paths between others?
//! - **PageRank** (`pagerank`): Which components accumulate importance from
//!   everything that (transitively) depends on them?
//!
//! # Usage
//!
//! All metrics take an [`IndexedGraph`](crate::graph::IndexedGraph) built
//! from the unresolved (possibly cyclic) dependency graph and return scores
//! keyed by component ID.
//!
//! ```rust,ignore
//! use cisrank_graph::graph::IndexedGraph;
//! use cisrank_graph::metrics::{betweenness::compute_betweenness, pagerank::compute_pagerank};
//!
//! let ig = IndexedGraph::from_dependency_graph(&graph);
//! let bc = compute_betweenness(&ig, 200, 0);
//! let pr = compute_pagerank(&ig, &PageRankConfig::default());
//! ```

pub mod betweenness;
pub mod degree;
pub mod pagerank;
