#![forbid(unsafe_code)]
//! cisrank-core library.
//!
//! Holds the pieces shared by the graph engine and the CLI: the component
//! records produced by the external scanner, machine-readable error codes,
//! and the optional `cisrank.toml` configuration.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` errors at the I/O edge, `anyhow::Result`
//!   where a context chain is more useful than a variant.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod error;
pub mod model;

pub use model::component::{Component, ComponentSet, ComponentType};
