//! Result ranking.

use std::cmp::Ordering;

use tracing::info;

use crate::models::{CalculationResult, PairAggregate};

/// Orders two aggregates for ranking: higher `total_days` first, then the
/// canonical pair `(low, high)` ascending so equal totals rank the same way
/// on every run.
pub fn ranking_order(a: &PairAggregate, b: &PairAggregate) -> Ordering {
    b.total_days
        .cmp(&a.total_days)
        .then_with(|| a.pair().cmp(&b.pair()))
}

/// Ranks aggregates into a [`CalculationResult`].
///
/// The input is left untouched; the result holds its own ordered copy.
///
/// # Example
///
/// ```
/// use overlap_engine::calculation::rank_pairs;
///
/// let result = rank_pairs(&[]);
/// assert!(result.top_pair.is_none());
/// assert!(result.all_pairs.is_empty());
/// ```
pub fn rank_pairs(aggregates: &[PairAggregate]) -> CalculationResult {
    let mut all_pairs = aggregates.to_vec();
    all_pairs.sort_by(ranking_order);

    let top_pair = all_pairs.first().cloned();
    if let Some(top) = &top_pair {
        info!(
            employee_a = top.employee_id_low,
            employee_b = top.employee_id_high,
            total_days = top.total_days,
            "Top pair"
        );
    }

    CalculationResult {
        top_pair,
        all_pairs,
    }
}
