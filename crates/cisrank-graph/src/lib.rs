#![forbid(unsafe_code)]
//! cisrank-graph library.
//!
//! The dependency graph engine: graph model, cycle detection/resolution,
//! deterministic orderings, centrality metrics, and the Core Influence Score.
//!
//! Everything here is a pure, synchronous function of its inputs. Repeated
//! calls with identical inputs (including the betweenness seed) produce
//! identical outputs.
//!
//! # Conventions
//!
//! - **Errors**: algorithms are infallible; odd-but-valid graphs degrade
//!   gracefully and report through `tracing`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod graph;
pub mod metrics;
pub mod score;
