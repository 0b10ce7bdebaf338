//! `cisrank order`: dependency-first orderings of all components.

use std::io::Write;
use std::path::PathBuf;

use cisrank_graph::graph::{
    GraphStats, build_from_components, dependency_first_dfs, topological_sort,
};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::cmd::load_input;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `cisrank order`.
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Component JSON produced by the scanner.
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Entries of each order to preview in human output.
    #[arg(long, default_value_t = 25)]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct OrderOutput {
    input: String,
    components: usize,
    stats: GraphStats,
    topological: Vec<String>,
    dependency_first: Vec<String>,
    #[serde(skip)]
    limit: usize,
}

/// Execute `cisrank order`.
pub fn run_order(args: &OrderArgs, output: OutputMode) -> anyhow::Result<()> {
    let components = load_input(&args.input, output)?;
    let graph = build_from_components(&components);

    let payload = OrderOutput {
        input: args.input.display().to_string(),
        components: components.len(),
        stats: GraphStats::from_graph(&graph),
        topological: topological_sort(&graph),
        dependency_first: dependency_first_dfs(&graph),
        limit: args.limit,
    };
    info!(nodes = payload.stats.node_count, "computed orderings");

    render_mode(output, &payload, render_order_text, render_order_pretty)
}

fn write_preview(w: &mut dyn Write, order: &[String], limit: usize) -> std::io::Result<()> {
    for id in order.iter().take(limit) {
        writeln!(w, "{id}")?;
    }
    if order.len() > limit {
        writeln!(w, "... ({} total)", order.len())?;
    }
    Ok(())
}

fn render_order_text(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Repo: {}", payload.input)?;
    writeln!(w, "Components: {}", payload.components)?;
    writeln!(w, "Graph nodes: {}", payload.stats.node_count)?;

    writeln!(w, "\n=== Topological order (kahn-style, deps-first) ===")?;
    write_preview(w, &payload.topological, payload.limit)?;

    writeln!(w, "\n=== Dependency-first DFS order ===")?;
    write_preview(w, &payload.dependency_first, payload.limit)
}

fn render_order_pretty(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let stats = &payload.stats;
    pretty_section(w, "Dependency graph")?;
    pretty_kv(w, "Input", &payload.input)?;
    pretty_kv(w, "Components", payload.components.to_string())?;
    pretty_kv(w, "Graph nodes", stats.node_count.to_string())?;
    pretty_kv(w, "Edges", stats.edge_count.to_string())?;
    pretty_kv(
        w,
        "Max in/out degree",
        format!("{} / {}", stats.max_in_degree, stats.max_out_degree),
    )?;
    pretty_kv(w, "Isolated nodes", stats.isolated_node_count.to_string())?;
    pretty_kv(
        w,
        "Weak components",
        stats.weakly_connected_component_count.to_string(),
    )?;

    writeln!(w)?;
    pretty_section(w, "Topological order (Kahn, dependencies first)")?;
    write_preview(w, &payload.topological, payload.limit)?;

    writeln!(w)?;
    pretty_section(w, "Dependency-first DFS order")?;
    write_preview(w, &payload.dependency_first, payload.limit)
}
