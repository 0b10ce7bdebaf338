//! `cisrank cycles`: list dependency cycles and the edges that break them.

use std::io::Write;
use std::path::PathBuf;

use cisrank_core::error::ErrorCode;
use cisrank_graph::graph::{build_from_components, detect_cycles, resolve_cycles_with_report};
use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::cmd::load_input;
use crate::output::{OutputMode, render_mode};

/// Arguments for `cisrank cycles`.
#[derive(Args, Debug)]
pub struct CyclesArgs {
    /// Component JSON produced by the scanner.
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
struct RemovedEdge {
    from: String,
    to: String,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    cycles: Vec<Vec<String>>,
    removed_edges: Vec<RemovedEdge>,
    rounds: usize,
    converged: bool,
}

/// Execute `cisrank cycles`.
pub fn run_cycles(args: &CyclesArgs, output: OutputMode) -> anyhow::Result<()> {
    let components = load_input(&args.input, output)?;
    let graph = build_from_components(&components);

    let cycles = detect_cycles(&graph);
    let resolution = resolve_cycles_with_report(&graph);
    if !resolution.converged {
        warn!(
            code = ErrorCode::CycleResolutionIncomplete.code(),
            rounds = resolution.rounds,
            "cycles remain after the round limit"
        );
    }

    let payload = CyclesOutput {
        cycles,
        removed_edges: resolution
            .removed_edges
            .into_iter()
            .map(|(from, to)| RemovedEdge { from, to })
            .collect(),
        rounds: resolution.rounds,
        converged: resolution.converged,
    };

    render_mode(output, &payload, render_cycles_human, render_cycles_human)
}

fn render_cycles_human(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No dependency cycles found.")?;
        return Ok(());
    }

    writeln!(w, "Dependency cycles ({})", payload.cycles.len())?;

    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "\nCycle {}:", idx + 1)?;
        for id in cycle {
            writeln!(w, "  - {id}")?;
        }
    }

    writeln!(w, "\nRemoved edges ({}):", payload.removed_edges.len())?;
    for edge in &payload.removed_edges {
        writeln!(w, "  {} -> {}", edge.from, edge.to)?;
    }

    if payload.converged {
        writeln!(w, "\nResolved in {} round(s).", payload.rounds)?;
    } else {
        writeln!(
            w,
            "\nStill cyclic after {} rounds; orderings fall back to sorted IDs for the remainder.",
            payload.rounds
        )?;
    }

    Ok(())
}
