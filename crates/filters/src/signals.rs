//! Combined signal configuration

use crate::completeness::completeness;
use crate::import_batch::{ImportBatchFilter, DEFAULT_IMPORT_PREFIX};
use crate::trust::{TrustDomainFilter, DEFAULT_TRUST_DOMAIN};
use crate::Result;
use rutdedup_formats::Record;
use serde::{Deserialize, Serialize};

/// Configuration for the record signals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Fragment of the institutional e-mail domain
    pub trust_domain: String,
    /// Id prefix of the bulk import batch
    pub import_prefix: String,
    /// Field holding the e-mail address
    pub email_field: String,
    /// Field holding the record id
    pub id_field: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            trust_domain: DEFAULT_TRUST_DOMAIN.to_string(),
            import_prefix: DEFAULT_IMPORT_PREFIX.to_string(),
            email_field: "email".to_string(),
            id_field: "id".to_string(),
        }
    }
}

/// The three per-record signals, built from a [`SignalConfig`]
#[derive(Debug, Clone, Default)]
pub struct Signals {
    trust: TrustDomainFilter,
    import: ImportBatchFilter,
}

impl Signals {
    pub fn new(config: &SignalConfig) -> Result<Self> {
        Ok(Self {
            trust: TrustDomainFilter::with_field(&config.trust_domain, &config.email_field)?,
            import: ImportBatchFilter::with_field(&config.import_prefix, &config.id_field)?,
        })
    }

    pub fn is_trusted(&self, record: &Record) -> bool {
        self.trust.is_trusted(record)
    }

    pub fn is_import_batch(&self, record: &Record) -> bool {
        self.import.is_import_batch(record)
    }

    pub fn completeness(&self, record: &Record) -> usize {
        completeness(record)
    }

    pub fn trust_domain(&self) -> &str {
        self.trust.domain()
    }

    pub fn import_prefix(&self) -> &str {
        self.import.prefix()
    }
}
