//! Core data models for the overlap engine.
//!
//! This module contains all the domain models used throughout the engine.

mod assignment;
mod calculation_result;
mod pair;

pub use assignment::{EmployeeId, NormalizedAssignment, ProjectId, RawRecord};
pub use calculation_result::CalculationResult;
pub use pair::{EmployeePair, OverlapRecord, PairAggregate};
