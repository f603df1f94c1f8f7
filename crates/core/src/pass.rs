//! The deduplication-and-filter pass
//!
//! Given the full record collection, decide which record paths to delete:
//!
//! 1. group records by natural key (first-seen order, keyless records left out)
//! 2. rank every group with more than one member and keep only its best record
//! 3. sweep the full input, in order, for import-batch ids not already scheduled
//!
//! The result is deterministic for a given input order.

use crate::deletion_set::{DeletionReason, DeletionSet};
use crate::grouping::group_by_key;
use crate::ranking::{RankKey, Ranker};
use crate::{Error, Result};
use rutdedup_filters::{SignalConfig, Signals};
use rutdedup_formats::Record;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Field holding the record locator in exported collections
pub const DEFAULT_PATH_FIELD: &str = "__path__";

/// Field holding the natural key
pub const DEFAULT_KEY_FIELD: &str = "rut";

/// What to do with a record that has no usable path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPathPolicy {
    /// Warn and leave the record out of the pass
    #[default]
    Skip,
    /// Fail the whole pass
    Abort,
}

/// Configuration for a resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Natural-key field used for grouping
    pub key_field: String,
    /// Field holding the record locator
    pub path_field: String,
    #[serde(flatten)]
    pub signals: SignalConfig,
    pub missing_path: MissingPathPolicy,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            key_field: DEFAULT_KEY_FIELD.to_string(),
            path_field: DEFAULT_PATH_FIELD.to_string(),
            signals: SignalConfig::default(),
            missing_path: MissingPathPolicy::default(),
        }
    }
}

/// Statistics for a resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Records handed to the pass
    pub total_records: usize,
    /// Records left out because they had no path
    pub skipped_missing_path: usize,
    /// Records carrying a natural key
    pub keyed_records: usize,
    /// Distinct natural-key values
    pub distinct_keys: usize,
    /// Keys shared by more than one record
    pub duplicate_groups: usize,
    /// Paths scheduled because they lost a group ranking
    pub deleted_duplicates: usize,
    /// Paths scheduled only by the import-batch sweep
    pub deleted_import_batch: usize,
}

impl PassStats {
    pub fn total_deleted(&self) -> usize {
        self.deleted_duplicates + self.deleted_import_batch
    }

    /// Records that survive the pass
    pub fn retained(&self) -> usize {
        self.total_records - self.skipped_missing_path - self.total_deleted()
    }
}

/// A ranked group member
#[derive(Debug, Clone)]
pub struct Member<'a> {
    pub path: String,
    pub rank: RankKey,
    pub record: &'a Record,
}

/// Outcome for one natural key with duplicates
#[derive(Debug, Clone)]
pub struct GroupDecision<'a> {
    pub key: String,
    pub kept: Member<'a>,
    /// Losing members, best first
    pub removed: Vec<Member<'a>>,
}

impl<'a> GroupDecision<'a> {
    pub fn member_count(&self) -> usize {
        self.removed.len() + 1
    }

    /// All members, best first
    pub fn members(&self) -> impl Iterator<Item = &Member<'a>> {
        std::iter::once(&self.kept).chain(self.removed.iter())
    }
}

/// Result of a resolution pass
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub deletions: DeletionSet,
    pub decisions: Vec<GroupDecision<'a>>,
    pub stats: PassStats,
}

/// A configured resolution pass
#[derive(Debug, Clone)]
pub struct DedupPass {
    config: PassConfig,
    ranker: Ranker,
}

impl DedupPass {
    pub fn new(config: PassConfig) -> Result<Self> {
        if config.key_field.is_empty() {
            return Err(Error::InvalidConfig("key field must not be empty".to_string()));
        }
        if config.path_field.is_empty() {
            return Err(Error::InvalidConfig("path field must not be empty".to_string()));
        }

        let signals = Signals::new(&config.signals)?;
        info!(
            "Resolving duplicates by '{}' (trust domain: {:?}, import prefix: {:?})",
            config.key_field,
            signals.trust_domain(),
            signals.import_prefix()
        );

        Ok(Self {
            config,
            ranker: Ranker::new(signals),
        })
    }

    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    fn path_of(&self, record: &Record) -> Option<String> {
        record
            .truthy_str(&self.config.path_field)
            .map(|path| path.into_owned())
    }

    /// Run the pass over the whole collection
    pub fn run<'a>(&self, records: &'a [Record]) -> Result<Resolution<'a>> {
        let mut stats = PassStats {
            total_records: records.len(),
            ..Default::default()
        };

        let mut eligible: Vec<(&'a Record, String)> = Vec::with_capacity(records.len());
        for record in records {
            match self.path_of(record) {
                Some(path) => eligible.push((record, path)),
                None => match self.config.missing_path {
                    MissingPathPolicy::Abort => {
                        return Err(Error::MissingPath {
                            source_line: record.source_line,
                            field: self.config.path_field.clone(),
                        });
                    }
                    MissingPathPolicy::Skip => {
                        warn!(
                            "Skipping record #{}: no '{}' field",
                            record.source_line, self.config.path_field
                        );
                        stats.skipped_missing_path += 1;
                    }
                },
            }
        }

        let groups = group_by_key(eligible.iter().map(|(r, _)| *r), &self.config.key_field);
        stats.keyed_records = groups.iter().map(|g| g.members.len()).sum();
        stats.distinct_keys = groups.len();

        let mut deletions = DeletionSet::new();
        let mut decisions = Vec::new();

        for group in groups.iter().filter(|g| g.is_duplicate()) {
            stats.duplicate_groups += 1;

            let mut ranked = self
                .ranker
                .rank_group(&group.members)
                .into_iter()
                .filter_map(|r| {
                    self.path_of(r.record).map(|path| Member {
                        path,
                        rank: r.rank,
                        record: r.record,
                    })
                });

            let Some(kept) = ranked.next() else {
                continue;
            };
            let removed: Vec<Member<'a>> = ranked.collect();

            debug!(
                "Found {} docs for {} {}, keeping {}",
                group.members.len(),
                self.config.key_field,
                group.key,
                kept.path
            );

            for member in &removed {
                let reason = DeletionReason::Duplicate {
                    key: group.key.clone(),
                };
                if deletions.insert(member.path.as_str(), reason) {
                    stats.deleted_duplicates += 1;
                }
            }

            decisions.push(GroupDecision {
                key: group.key.clone(),
                kept,
                removed,
            });
        }

        for (record, path) in &eligible {
            if self.ranker.signals().is_import_batch(record)
                && deletions.insert(path.as_str(), DeletionReason::ImportBatch)
            {
                stats.deleted_import_batch += 1;
            }
        }

        info!(
            "Scheduled {} deletions ({} duplicates, {} import-batch) from {} records",
            deletions.len(),
            stats.deleted_duplicates,
            stats.deleted_import_batch,
            stats.total_records
        );

        Ok(Resolution {
            deletions,
            decisions,
            stats,
        })
    }
}

/// Run a pass with the given configuration
pub fn resolve<'a>(records: &'a [Record], config: &PassConfig) -> Result<Resolution<'a>> {
    DedupPass::new(config.clone())?.run(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Record::from_value(v, i + 1).unwrap())
            .collect()
    }

    fn deleted(values: Vec<Value>) -> Vec<String> {
        let input = records(values);
        resolve(&input, &PassConfig::default())
            .unwrap()
            .deletions
            .into_paths()
    }

    #[test]
    fn test_trusted_native_record_wins() {
        let result = deleted(vec![
            json!({"rut": "A", "id": "import-1", "__path__": "p1"}),
            json!({"rut": "A", "id": "x", "email": "a@cftestatal.cl", "__path__": "p2"}),
        ]);

        assert_eq!(result, vec!["p1"]);
    }

    #[test]
    fn test_singleton_import_record_is_swept() {
        let input = records(vec![json!({"rut": "B", "id": "import-2", "__path__": "p3"})]);
        let resolution = resolve(&input, &PassConfig::default()).unwrap();

        assert_eq!(resolution.stats.deleted_duplicates, 0);
        assert_eq!(resolution.stats.deleted_import_batch, 1);
        assert_eq!(
            resolution.deletions.iter().next().unwrap().reason,
            DeletionReason::ImportBatch
        );
        assert_eq!(resolution.deletions.into_paths(), vec!["p3"]);
    }

    #[test]
    fn test_full_tie_deletes_later_record() {
        let values = vec![
            json!({"rut": "C", "__path__": "p4"}),
            json!({"rut": "C", "__path__": "p5"}),
        ];

        let first = deleted(values.clone());
        for _ in 0..5 {
            assert_eq!(deleted(values.clone()), first);
        }
        assert_eq!(first, vec!["p5"]);
    }

    #[test]
    fn test_institutional_email_wins_regardless_of_other_fields() {
        let result = deleted(vec![
            json!({
                "rut": "D",
                "__path__": "rich",
                "id": "manual-1",
                "nombre": "Ana",
                "cargo": "Docente",
                "telefono": "555"
            }),
            json!({
                "rut": "D",
                "__path__": "trusted",
                "id": "import-3",
                "email": "foo@cftestatalaricayparinacota.cl"
            }),
        ]);

        // "trusted" also carries the import prefix, so the sweep adds it too.
        assert_eq!(result, vec!["rich", "trusted"]);
    }

    #[test]
    fn test_no_duplicate_paths_when_both_rules_match() {
        let input = records(vec![
            json!({"rut": "E", "id": "import-1", "__path__": "p1"}),
            json!({"rut": "E", "id": "y", "__path__": "p2"}),
        ]);

        let resolution = resolve(&input, &PassConfig::default()).unwrap();

        assert_eq!(resolution.deletions.len(), 1);
        assert_eq!(resolution.stats.deleted_duplicates, 1);
        assert_eq!(resolution.stats.deleted_import_batch, 0);
        assert_eq!(
            resolution.deletions.iter().next().unwrap().reason,
            DeletionReason::Duplicate { key: "E".to_string() }
        );
    }

    #[test]
    fn test_exactly_one_survivor_per_duplicate_key() {
        let input = records(vec![
            json!({"rut": "A", "__path__": "a1"}),
            json!({"rut": "B", "__path__": "b1"}),
            json!({"rut": "A", "__path__": "a2", "email": "x@cftestatal.cl"}),
            json!({"rut": "A", "__path__": "a3", "nombre": "Ana"}),
            json!({"rut": "B", "__path__": "b2"}),
            json!({"rut": "C", "__path__": "c1"}),
        ]);

        let resolution = resolve(&input, &PassConfig::default()).unwrap();

        for key in ["A", "B"] {
            let survivors = input
                .iter()
                .filter(|r| r.data["rut"] == key)
                .filter(|r| {
                    let path = r.data["__path__"].as_str().unwrap();
                    !resolution.deletions.contains(path)
                })
                .count();
            assert_eq!(survivors, 1, "key {}", key);
        }

        assert!(!resolution.deletions.contains("c1"));
        assert_eq!(
            resolution.deletions.paths().collect::<Vec<_>>(),
            vec!["a3", "a1", "b2"]
        );
        assert_eq!(resolution.decisions.len(), 2);
        assert_eq!(resolution.decisions[0].kept.path, "a2");
        assert_eq!(resolution.decisions[0].member_count(), 3);
    }

    #[test]
    fn test_keyless_records_only_swept() {
        let result = deleted(vec![
            json!({"__path__": "n1", "id": "x"}),
            json!({"__path__": "n2", "id": "x"}),
            json!({"__path__": "n3", "rut": "", "id": "import-5"}),
        ]);

        assert_eq!(result, vec!["n3"]);
    }

    #[test]
    fn test_sweep_follows_input_order_after_group_deletions() {
        let result = deleted(vec![
            json!({"__path__": "s1", "id": "import-1"}),
            json!({"rut": "A", "__path__": "a1", "id": "k"}),
            json!({"rut": "A", "__path__": "a2", "id": "k", "extra": 1}),
            json!({"__path__": "s2", "id": "import-2"}),
        ]);

        assert_eq!(result, vec!["a1", "s1", "s2"]);
    }

    #[test]
    fn test_missing_path_is_skipped() {
        let input = records(vec![
            json!({"rut": "A", "id": "import-1"}),
            json!({"rut": "A", "__path__": "p1"}),
            json!({"rut": "A", "__path__": ""}),
        ]);

        let resolution = resolve(&input, &PassConfig::default()).unwrap();

        assert_eq!(resolution.stats.skipped_missing_path, 2);
        assert_eq!(resolution.stats.duplicate_groups, 0);
        assert!(resolution.deletions.is_empty());
        assert_eq!(resolution.stats.retained(), 1);
    }

    #[test]
    fn test_missing_path_aborts_when_configured() {
        let input = records(vec![
            json!({"rut": "A", "__path__": "p1"}),
            json!({"rut": "A"}),
        ]);
        let config = PassConfig {
            missing_path: MissingPathPolicy::Abort,
            ..Default::default()
        };

        let result = resolve(&input, &config);
        assert!(matches!(result, Err(Error::MissingPath { source_line: 2, .. })));
    }

    #[test]
    fn test_custom_signals() {
        let input = records(vec![
            json!({"rut": "A", "id": "legacy-1", "__path__": "p1"}),
            json!({"rut": "A", "id": "manual-2", "email": "b@example.org", "__path__": "p2"}),
            json!({"rut": "B", "id": "import-1", "__path__": "p3"}),
        ]);
        let config = PassConfig {
            signals: SignalConfig {
                trust_domain: "example.org".to_string(),
                import_prefix: "legacy-".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let resolution = resolve(&input, &config).unwrap();
        assert_eq!(resolution.deletions.into_paths(), vec!["p1"]);
    }

    #[test]
    fn test_invalid_config() {
        let config = PassConfig {
            key_field: String::new(),
            ..Default::default()
        };
        assert!(matches!(DedupPass::new(config), Err(Error::InvalidConfig(_))));

        let config = PassConfig {
            signals: SignalConfig {
                trust_domain: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(DedupPass::new(config), Err(Error::Filter(_))));
    }

    #[test]
    fn test_stats() {
        let input = records(vec![
            json!({"rut": "A", "__path__": "a1"}),
            json!({"rut": "A", "__path__": "a2"}),
            json!({"rut": "B", "__path__": "b1", "id": "import-1"}),
            json!({"__path__": "n1"}),
        ]);

        let stats = resolve(&input, &PassConfig::default()).unwrap().stats;

        assert_eq!(
            stats,
            PassStats {
                total_records: 4,
                skipped_missing_path: 0,
                keyed_records: 3,
                distinct_keys: 2,
                duplicate_groups: 1,
                deleted_duplicates: 1,
                deleted_import_batch: 1,
            }
        );
        assert_eq!(stats.total_deleted(), 2);
        assert_eq!(stats.retained(), 2);
    }

    #[test]
    fn test_pass_config_deserializes_flat() {
        let config: PassConfig = serde_json::from_value(json!({
            "key_field": "dni",
            "import_prefix": "bulk-",
            "missing_path": "abort"
        }))
        .unwrap();

        assert_eq!(config.key_field, "dni");
        assert_eq!(config.path_field, DEFAULT_PATH_FIELD);
        assert_eq!(config.signals.import_prefix, "bulk-");
        assert_eq!(config.signals.trust_domain, "cftestatal");
        assert_eq!(config.missing_path, MissingPathPolicy::Abort);
    }
}
