//! Calculation logic for the overlap engine.
//!
//! This module contains the steps that turn parsed records into a ranked
//! result: date normalization of each record, pairwise overlap computation
//! grouped by project, and ranking of the per-pair totals. The
//! [`compute_pairs`] entry point runs them in order.

mod normalization;
mod overlap;
mod pipeline;
mod ranking;

pub use normalization::{DATE_FROM_FIELD, DATE_TO_FIELD, normalize_record, normalize_records};
pub use overlap::{
    MAX_OVERLAP_DAYS, accumulate_pairs, compute_overlap, compute_pair_overlaps, group_by_project,
};
pub use pipeline::{compute_assignments, compute_pairs};
pub use ranking::{rank_pairs, ranking_order};
