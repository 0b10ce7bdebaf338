//! `cisrank filter`: keep the top components by Core Influence Score.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use cisrank_core::config::{ProjectConfig, load_project_config};
use cisrank_core::error::ErrorCode;
use cisrank_core::model::component::{SelectedComponents, write_components};
use cisrank_graph::graph::{GraphStats, build_from_components};
use cisrank_graph::metrics::pagerank::PageRankConfig;
use cisrank_graph::score::{
    CisWeights, MetricsConfig, NodeMetrics, compute_metrics, rank_by_score, select_top_percent,
    top_percent_count,
};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::cmd::{io_error, load_input};
use crate::output::{
    CliError, OutputMode, display_float, pretty_kv, pretty_section, render_error, render_mode,
};

/// Arguments for `cisrank filter`.
///
/// Scoring flags left unset fall back to `cisrank.toml`, then to built-in
/// defaults.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Component JSON produced by the scanner.
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write the selected components.
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Keep the top P% of components by score (0-100) [default: 100].
    #[arg(long, value_name = "P")]
    pub top_percent: Option<f64>,

    /// Weight for normalized in-degree [default: 1.0].
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Weight for normalized out-degree [default: 1.0].
    #[arg(long, allow_negative_numbers = true)]
    pub beta: Option<f64>,

    /// Weight for normalized betweenness [default: 1.0].
    #[arg(long, allow_negative_numbers = true)]
    pub gamma: Option<f64>,

    /// Betweenness sampling: 0 exact, >0 sampled sources, <0 disabled [default: 200].
    #[arg(long, value_name = "K", allow_negative_numbers = true)]
    pub betweenness_samples: Option<i64>,

    /// Seed for betweenness source sampling [default: 0].
    #[arg(long, value_name = "SEED")]
    pub betweenness_seed: Option<u64>,

    /// PageRank damping factor [default: 0.85].
    #[arg(long, value_name = "D", allow_negative_numbers = true)]
    pub pagerank_damping: Option<f64>,

    /// Maximum PageRank iterations [default: 50].
    #[arg(long, value_name = "N")]
    pub pagerank_iters: Option<usize>,

    /// Print the top P% (capped at --top-percent) with a summary; 0 disables.
    #[arg(long, value_name = "P", default_value_t = 0.0)]
    pub print_top_percent: f64,

    /// (Deprecated) Print the top K components. Prefer --print-top-percent.
    #[arg(long, value_name = "K")]
    pub print_top: Option<usize>,
}

/// Effective scoring settings after merging flags over config.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct FilterSettings {
    top_percent: f64,
    weights: CisWeights,
    betweenness_samples: i64,
    betweenness_seed: u64,
    pagerank_damping: f64,
    pagerank_iters: usize,
    #[serde(skip)]
    pagerank_tolerance: f64,
}

impl FilterSettings {
    fn resolve(args: &FilterArgs, config: &ProjectConfig) -> Self {
        Self {
            top_percent: args.top_percent.unwrap_or(config.scoring.top_percent),
            weights: CisWeights {
                alpha: args.alpha.unwrap_or(config.scoring.alpha),
                beta: args.beta.unwrap_or(config.scoring.beta),
                gamma: args.gamma.unwrap_or(config.scoring.gamma),
            },
            betweenness_samples: args
                .betweenness_samples
                .unwrap_or(config.betweenness.samples),
            betweenness_seed: args.betweenness_seed.unwrap_or(config.betweenness.seed),
            pagerank_damping: args.pagerank_damping.unwrap_or(config.pagerank.damping),
            pagerank_iters: args.pagerank_iters.unwrap_or(config.pagerank.max_iter),
            pagerank_tolerance: config.pagerank.tolerance,
        }
    }

    const fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            weights: self.weights,
            betweenness_samples: self.betweenness_samples,
            betweenness_seed: self.betweenness_seed,
            pagerank: PageRankConfig {
                damping: self.pagerank_damping,
                tolerance: self.pagerank_tolerance,
                max_iter: self.pagerank_iters,
            },
        }
    }
}

/// How many ranked rows to print, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PrintRequest {
    /// Percent-based, drawn from the selected set.
    Percent { requested: f64, effective: f64, count: usize },
    /// Fixed count from the full ranking.
    Count { count: usize },
}

#[derive(Debug, Serialize)]
struct RankedRow {
    rank: usize,
    id: String,
    #[serde(flatten)]
    metrics: NodeMetrics,
}

#[derive(Debug, Serialize)]
struct FilterSummary {
    input: String,
    output: String,
    total_components: usize,
    stats: GraphStats,
    kept: usize,
    settings: FilterSettings,
    betweenness_mode: String,
    pagerank_iterations: usize,
    pagerank_converged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    print: Option<PrintRequest>,
    top: Vec<RankedRow>,
}

/// Execute `cisrank filter`.
pub fn run_filter(
    args: &FilterArgs,
    config_path: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = match load_project_config(config_path, project_root) {
        Ok(config) => config,
        Err(err) => {
            render_error(
                output,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };

    let settings = FilterSettings::resolve(args, &config);
    if let Err(err) = validate(args, &settings) {
        render_error(output, &err)?;
        anyhow::bail!("{}", err.message);
    }

    let components = load_input(&args.input, output)?;

    let graph = build_from_components(&components);
    let report = compute_metrics(&graph, &settings.metrics_config());
    if !report.pagerank_converged && !report.metrics.is_empty() {
        warn!(
            iterations = report.pagerank_iterations,
            "PageRank stopped before converging"
        );
    }

    let selected = select_top_percent(&report.metrics, settings.top_percent);
    let written = SelectedComponents::new(&components, &selected);
    if let Err(err) = write_components(&args.output, &written) {
        render_error(output, &io_error(&err))?;
        return Err(err.into());
    }
    info!(
        total = components.len(),
        kept = written.len(),
        output = %args.output.display(),
        "filtered components"
    );

    let ranked = rank_by_score(&report.metrics);
    let print = print_request(args, &settings, ranked.len(), selected.len());
    let rows = print.map_or_else(Vec::new, |request| {
        printable_rows(request, &ranked, &selected, &report.metrics)
    });

    if print.is_none() && !output.is_json() {
        return Ok(());
    }

    let summary = FilterSummary {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        total_components: ranked.len(),
        stats: GraphStats::from_graph(&graph),
        kept: selected.len(),
        betweenness_mode: report.betweenness_mode.to_string(),
        pagerank_iterations: report.pagerank_iterations,
        pagerank_converged: report.pagerank_converged,
        settings,
        print,
        top: rows,
    };

    render_mode(output, &summary, render_summary_text, render_summary_pretty)
}

/// Reject bad flag combinations before anything is written.
fn validate(args: &FilterArgs, settings: &FilterSettings) -> Result<(), CliError> {
    if args.print_top.is_some() && args.print_top_percent > 0.0 {
        return Err(CliError::from_code(
            ErrorCode::ConflictingArguments,
            "use only one of --print-top or --print-top-percent",
        ));
    }

    let weights = [
        ("alpha", settings.weights.alpha),
        ("beta", settings.weights.beta),
        ("gamma", settings.weights.gamma),
    ];
    for (name, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(CliError::from_code(
                ErrorCode::InvalidArgument,
                format!("--{name} must be a non-negative number, got {value}"),
            ));
        }
    }

    if !(0.0..=1.0).contains(&settings.pagerank_damping) {
        return Err(CliError::from_code(
            ErrorCode::InvalidArgument,
            format!(
                "--pagerank-damping must lie in [0, 1], got {}",
                settings.pagerank_damping
            ),
        ));
    }

    if settings.top_percent.is_nan() || args.print_top_percent.is_nan() {
        return Err(CliError::from_code(
            ErrorCode::InvalidArgument,
            "percent values must be numbers",
        ));
    }

    Ok(())
}

fn print_request(
    args: &FilterArgs,
    settings: &FilterSettings,
    total: usize,
    selected: usize,
) -> Option<PrintRequest> {
    if total == 0 {
        return None;
    }

    if args.print_top_percent > 0.0 {
        let requested = args.print_top_percent;
        let effective = requested.min(settings.top_percent);
        let cap = if selected == 0 { total } else { selected };
        let count = top_percent_count(total, effective).min(cap);
        return Some(PrintRequest::Percent {
            requested,
            effective,
            count,
        });
    }

    match args.print_top {
        Some(k) if k > 0 => Some(PrintRequest::Count {
            count: k.min(total),
        }),
        _ => None,
    }
}

/// Percent requests stay inside the filtered set; count requests read the
/// full ranking.
fn printable_rows(
    request: PrintRequest,
    ranked: &[String],
    selected: &[String],
    metrics: &BTreeMap<String, NodeMetrics>,
) -> Vec<RankedRow> {
    let (candidates, count): (Vec<&String>, usize) = match request {
        PrintRequest::Percent { count, .. } => {
            let keep: HashSet<&str> = selected.iter().map(String::as_str).collect();
            (
                ranked.iter().filter(|id| keep.contains(id.as_str())).collect(),
                count,
            )
        }
        PrintRequest::Count { count } => (ranked.iter().collect(), count),
    };

    candidates
        .into_iter()
        .take(count)
        .filter_map(|id| metrics.get(id).map(|m| (id, *m)))
        .enumerate()
        .map(|(i, (id, metrics))| RankedRow {
            rank: i + 1,
            id: id.clone(),
            metrics,
        })
        .collect()
}

fn print_line(summary: &FilterSummary) -> Option<String> {
    match summary.print? {
        PrintRequest::Percent {
            requested,
            effective,
            count,
        } => Some(format!(
            "{}% (effective={}%, count={count})",
            display_float(requested),
            display_float(effective)
        )),
        PrintRequest::Count { count } => Some(count.to_string()),
    }
}

fn summary_fields(summary: &FilterSummary) -> Vec<(&'static str, String)> {
    let s = &summary.settings;
    let mut fields = vec![
        ("Total components", summary.total_components.to_string()),
        ("Repo-internal edges", summary.stats.edge_count.to_string()),
        (
            "Avg in/out degree",
            format!(
                "{:.2} / {:.2}",
                summary.stats.avg_in_degree, summary.stats.avg_out_degree
            ),
        ),
        (
            "Max in/out degree",
            format!(
                "{} / {}",
                summary.stats.max_in_degree, summary.stats.max_out_degree
            ),
        ),
        (
            "Kept top-percent",
            format!("{}%  (kept={})", display_float(s.top_percent), summary.kept),
        ),
        (
            "Weights (a,b,g)",
            format!(
                "{}, {}, {}",
                display_float(s.weights.alpha),
                display_float(s.weights.beta),
                display_float(s.weights.gamma)
            ),
        ),
        ("Betweenness mode", summary.betweenness_mode.clone()),
        (
            "PageRank damping/iters",
            format!("{} / {}", display_float(s.pagerank_damping), s.pagerank_iters),
        ),
    ];
    if let Some(line) = print_line(summary) {
        let key = match summary.print {
            Some(PrintRequest::Count { .. }) => "Print top-count",
            _ => "Print top-percent",
        };
        fields.push((key, line));
    }
    fields
}

fn write_row(w: &mut dyn Write, row: &RankedRow) -> std::io::Result<()> {
    let m = &row.metrics;
    writeln!(
        w,
        "{:>3}. {} | score={:.6} | in={} out={} bc={:.6} pr={:.6}",
        row.rank, row.id, m.score, m.in_degree, m.out_degree, m.betweenness, m.pagerank
    )
}

fn render_summary_text(summary: &FilterSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "CIS filtering summary")?;
    for (key, value) in summary_fields(summary) {
        writeln!(w, "- {key:<23}: {value}")?;
    }
    writeln!(w)?;
    writeln!(w, "Top components by CIS score:")?;
    for row in &summary.top {
        write_row(w, row)?;
    }
    Ok(())
}

fn render_summary_pretty(summary: &FilterSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "CIS filtering summary")?;
    pretty_kv(w, "Input", &summary.input)?;
    pretty_kv(w, "Output", &summary.output)?;
    for (key, value) in summary_fields(summary) {
        pretty_kv(w, key, value)?;
    }
    if !summary.pagerank_converged && summary.total_components > 0 {
        pretty_kv(
            w,
            "PageRank",
            format!(
                "not converged after {} iterations",
                summary.pagerank_iterations
            ),
        )?;
    }
    writeln!(w)?;
    pretty_section(w, "Top components by CIS score")?;
    if summary.top.is_empty() {
        writeln!(w, "(none)")?;
    }
    for row in &summary.top {
        write_row(w, row)?;
    }
    Ok(())
}
