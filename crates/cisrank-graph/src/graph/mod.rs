//! Dependency graph module.
//!
//! # Overview
//!
//! The graph uses the natural dependency direction: an edge `A → B` means
//! "A depends on B". Graphs cross module boundaries as a plain
//! [`DependencyGraph`] (`BTreeMap` of sorted successor sets) so every
//! traversal that iterates keys or successors is deterministic.
//!
//! ## Pipeline
//!
//! ```text
//! ComponentSet (scanner JSON)
//!        ↓  build::build_from_components()
//! DependencyGraph (repo-internal edges, may contain cycles)
//!   ├─ cycles::detect_cycles() / resolve::resolve_cycles()
//!   │      ↓
//!   │  acyclic DependencyGraph
//!   │      ↓  order::topological_sort() / order::dependency_first_dfs()
//!   │  Vec<String> (dependencies first)
//!   │
//!   └─ build::IndexedGraph::from_dependency_graph()
//!          ↓  crate::metrics / crate::score
//!      NodeMetrics per component
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use cisrank_graph::graph::{build_from_components, topological_sort};
//!
//! let graph = build_from_components(&components);
//! let order = topological_sort(&graph);
//! ```

pub mod build;
pub mod cycles;
pub mod order;
pub mod resolve;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{DependencyGraph, IndexedGraph, build_from_components, normalize};
pub use cycles::detect_cycles;
pub use order::{dependency_first_dfs, topological_sort};
pub use resolve::{CycleResolution, resolve_cycles, resolve_cycles_with_report};
pub use stats::GraphStats;
