//! Reliability Maturity Index (RMI) scoring for industrial maintenance audits.
//!
//! The [`scoring`] module holds the deterministic engine. [`cmms`] and [`observations`]
//! turn maintenance-system exports and field checklists into ordinary responses,
//! [`question_bank`] carries the standard audit questions, and
//! [`assessment`] wraps the engine in a read-snapshot-then-compute service.

pub mod assessment;
pub mod cmms;
pub mod config;
pub mod error;
pub mod observations;
pub mod question_bank;
pub mod scoring;
pub mod telemetry;
