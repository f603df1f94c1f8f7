//! Ranking of duplicate records
//!
//! Each record gets a [`RankKey`] compared lexicographically: institutional
//! e-mail first, then provenance outside the import batch, then the number
//! of filled fields. Higher is better. Records with equal keys keep their
//! input order, so the earliest-encountered record wins a full tie.

use rutdedup_filters::Signals;
use rutdedup_formats::Record;
use serde::Serialize;

/// Comparable rank of a single record
///
/// Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RankKey {
    /// E-mail contains the institutional domain
    pub trusted: bool,
    /// Id does not carry the import-batch prefix
    pub native: bool,
    /// Number of truthy fields
    pub completeness: usize,
}

/// A record paired with its rank
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub record: &'a Record,
    pub rank: RankKey,
}

/// Scores records from the configured signals
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    signals: Signals,
}

impl Ranker {
    pub fn new(signals: Signals) -> Self {
        Self { signals }
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn rank(&self, record: &Record) -> RankKey {
        RankKey {
            trusted: self.signals.is_trusted(record),
            native: !self.signals.is_import_batch(record),
            completeness: self.signals.completeness(record),
        }
    }

    /// Rank a group, best first
    ///
    /// The sort is stable, so ties keep the order of `members`.
    pub fn rank_group<'a>(&self, members: &[&'a Record]) -> Vec<Ranked<'a>> {
        let mut ranked: Vec<Ranked<'a>> = members
            .iter()
            .map(|&record| Ranked {
                record,
                rank: self.rank(record),
            })
            .collect();

        ranked.sort_by(|a, b| b.rank.cmp(&a.rank));
        ranked
    }
}
