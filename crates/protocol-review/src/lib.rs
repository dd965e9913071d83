//! Core library for the ethics-protocol review service: reviewer assignment
//! policy, workload-aware reviewer ranking, overdue detection, and audited
//! reassignment, plus the configuration and telemetry plumbing shared with
//! the API binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
