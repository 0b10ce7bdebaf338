//! Core Influence Score (CIS): composite scoring and top-percent selection.

pub mod composite;
pub mod select;

pub use composite::{
    CisWeights, MetricsConfig, MetricsReport, NodeMetrics, cis_score, compute_metrics,
    normalize_metric,
};
pub use select::{rank_by_score, select_top_percent, top_percent_count};
