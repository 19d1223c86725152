//! Employee collaboration engine
//!
//! This crate reads timesheet exports (employee, project, start date, end
//! date) and finds, for every pair of employees who shared a project, how
//! many days their assignments overlapped, ranking the pairs by total days.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod cancellation;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod telemetry;
