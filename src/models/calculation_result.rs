//! Calculation result model.
//!
//! This module contains the [`CalculationResult`] type returned by the
//! pipeline entry point.

use serde::{Deserialize, Serialize};

use super::PairAggregate;

/// The ranked outcome of one calculation.
///
/// `top_pair` is `None` exactly when `all_pairs` is empty, i.e. when no two
/// employees ever shared a project with overlapping dates.
///
/// # Example
///
/// ```
/// use overlap_engine::models::CalculationResult;
///
/// let result = CalculationResult::empty();
/// assert!(result.top_pair.is_none());
/// assert!(result.all_pairs.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The pair with the highest total, if any pair exists.
    pub top_pair: Option<PairAggregate>,
    /// Every pair, ordered by total days descending.
    pub all_pairs: Vec<PairAggregate>,
}

impl CalculationResult {
    /// Result for an input in which nobody collaborated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of distinct pairs found.
    pub fn pair_count(&self) -> usize {
        self.all_pairs.len()
    }

    /// Returns true when no pair was found.
    pub fn is_empty(&self) -> bool {
        self.all_pairs.is_empty()
    }
}
