//! Natural-key duplicate resolution for identity records
//!
//! This crate groups records by a natural key (the `rut`), keeps the best
//! ranked record of every group, and sweeps bulk-imported records, producing
//! the ordered set of record paths to delete.

pub mod deletion_set;
pub mod error;
pub mod grouping;
pub mod pass;
pub mod ranking;

pub use deletion_set::{Deletion, DeletionReason, DeletionSet};
pub use error::{Error, Result};
pub use pass::{
    resolve, DedupPass, GroupDecision, Member, MissingPathPolicy, PassConfig, PassStats,
    Resolution,
};
pub use ranking::{RankKey, Ranker};
