#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cisrank: dependency ordering and Core Influence Score filtering",
    long_about = None
)]
struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Project config file (defaults to ./cisrank.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Scoring",
        about = "Keep the most influential components",
        long_about = "Rank components by Core Influence Score (weighted in-degree, out-degree, \
                      betweenness and PageRank) and write the top percent to a new JSON file.",
        after_help = "EXAMPLES:\n    # Keep the top 20% of components\n    cisrank filter --input deps.json --output core.json --top-percent 20\n\n    # Exact betweenness, print the top 10% with a summary\n    cisrank filter --input deps.json --output core.json --betweenness-samples 0 --print-top-percent 10\n\n    # Emit a machine-readable summary\n    cisrank filter --input deps.json --output core.json --format json"
    )]
    Filter(cmd::filter::FilterArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Print dependency-first orderings",
        long_about = "Break cycles, then print the Kahn topological order and the \
                      dependency-first DFS order of all components.",
        after_help = "EXAMPLES:\n    # Preview the first 25 entries of each order\n    cisrank order --input deps.json\n\n    # Preview more entries\n    cisrank order --input deps.json --limit 100\n\n    # Full orders as JSON\n    cisrank order --input deps.json --format json"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Graph",
        about = "List dependency cycles",
        long_about = "List strongly connected components with more than one member (and self-loops), \
                      plus the edges the resolver removes to make the graph acyclic.",
        after_help = "EXAMPLES:\n    # Show cycles and removed edges\n    cisrank cycles --input deps.json\n\n    # Emit machine-readable output\n    cisrank cycles --input deps.json --format json"
    )]
    Cycles(cmd::cycles::CyclesArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CISRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "cisrank=debug,info"
        } else {
            "cisrank=info,warn"
        })
    });

    let format = env::var("CISRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let project_root = env::current_dir()?;
    debug!(?output, root = %project_root.display(), "starting");

    match cli.command {
        Commands::Filter(ref args) => {
            cmd::filter::run_filter(args, cli.config.as_deref(), output, &project_root)
        }
        Commands::Order(ref args) => cmd::order::run_order(args, output),
        Commands::Cycles(ref args) => cmd::cycles::run_cycles(args, output),
    }
}
