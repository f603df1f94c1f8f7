//! Record quality signals
//!
//! This crate provides the per-record signals used to decide which of
//! several duplicate identity records is kept: institutional e-mail trust,
//! import-batch provenance and field completeness.

pub mod completeness;
pub mod error;
pub mod import_batch;
pub mod signals;
pub mod trust;

pub use error::{Error, Result};
pub use signals::{SignalConfig, Signals};
