//! Ranking and top-percent selection over computed metrics.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::score::composite::NodeMetrics;

/// All IDs ordered by score descending, ties broken by ascending ID.
#[must_use]
pub fn rank_by_score(metrics: &BTreeMap<String, NodeMetrics>) -> Vec<String> {
    let mut ranked: Vec<(&String, f64)> = metrics.iter().map(|(id, m)| (id, m.score)).collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| by_score_desc(*a, *b).then_with(|| a_id.cmp(b_id)));
    ranked.into_iter().map(|(id, _)| id.clone()).collect()
}

/// Number of components kept by a `percent` selection over `total` items:
/// `ceil(total * percent / 100)` clamped to `[1, total]`.
///
/// Callers handle `percent <= 0` and `percent >= 100` themselves.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn top_percent_count(total: usize, percent: f64) -> usize {
    if total == 0 {
        return 0;
    }
    let raw = (total as f64 * (percent / 100.0)).ceil();
    let k = if raw.is_finite() && raw > 0.0 {
        raw as usize
    } else {
        0
    };
    k.clamp(1, total)
}

/// Select the top `percent` of components by score.
///
/// - `percent <= 0`: nothing.
/// - `percent >= 100`: every ID, ascending.
/// - otherwise: the first [`top_percent_count`] entries of [`rank_by_score`].
#[must_use]
pub fn select_top_percent(metrics: &BTreeMap<String, NodeMetrics>, percent: f64) -> Vec<String> {
    if percent <= 0.0 {
        return Vec::new();
    }
    if percent >= 100.0 {
        return metrics.keys().cloned().collect();
    }

    let k = top_percent_count(metrics.len(), percent);
    let mut ranked = rank_by_score(metrics);
    ranked.truncate(k);
    ranked
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
