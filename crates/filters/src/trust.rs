//! Institutional e-mail trust signal

use crate::{Error, Result};
use rutdedup_formats::Record;

/// Default institutional domain fragment
pub const DEFAULT_TRUST_DOMAIN: &str = "cftestatal";

/// Matches records whose e-mail contains the institutional domain fragment
#[derive(Debug, Clone)]
pub struct TrustDomainFilter {
    domain: String,
    field_name: String,
}

impl TrustDomainFilter {
    /// Create a filter over the `email` field
    pub fn new(domain: impl Into<String>) -> Result<Self> {
        Self::with_field(domain, "email")
    }

    /// Create a filter over a custom e-mail field
    pub fn with_field(domain: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let domain = domain.into();
        if domain.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "trust domain must not be empty".to_string(),
            ));
        }

        Ok(Self {
            domain,
            field_name: field_name.into(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// True when the e-mail field is present and contains the domain fragment
    pub fn is_trusted(&self, record: &Record) -> bool {
        record
            .field_str(&self.field_name)
            .map(|email| email.contains(self.domain.as_str()))
            .unwrap_or(false)
    }
}

impl Default for TrustDomainFilter {
    fn default() -> Self {
        Self {
            domain: DEFAULT_TRUST_DOMAIN.to_string(),
            field_name: "email".to_string(),
        }
    }
}
