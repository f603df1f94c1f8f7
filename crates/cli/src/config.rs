//! Configuration file support
//!
//! Settings are layered: built-in defaults, then the config file, then
//! environment variables and command-line flags (both handled by clap and
//! applied here as [`PassOverrides`]).

use anyhow::{Context, Result};
use rutdedup_core::{MissingPathPolicy, PassConfig};
use rutdedup_formats::Format;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete tool configuration as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub ranking: PassConfig,
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    /// Record format; detected from the file extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct PassOverrides {
    pub trust_domain: Option<String>,
    pub import_prefix: Option<String>,
    pub key_field: Option<String>,
    pub path_field: Option<String>,
    pub strict: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: PathBuf,
    pub format: Option<Format>,
    pub pass: PassConfig,
}

impl AppConfig {
    /// Load configuration from a file (YAML or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            _ => Err(anyhow::anyhow!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                extension
            )),
        }
    }

    /// Load the file if one was given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let content = match extension {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    extension
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Starter configuration written by `init-config`
    pub fn starter() -> Self {
        Self {
            input: Some(InputConfig {
                path: "employees.yaml".to_string(),
                format: None,
            }),
            ranking: PassConfig::default(),
        }
    }

    /// Combine the file configuration with command-line values
    pub fn into_settings(
        self,
        input: Option<PathBuf>,
        format: Option<Format>,
        overrides: &PassOverrides,
    ) -> Result<Settings> {
        let (config_path, config_format) = match self.input {
            Some(input) => (Some(PathBuf::from(input.path)), input.format),
            None => (None, None),
        };

        let input = input
            .or(config_path)
            .context("No input given: pass --input or set input.path in the config file")?;

        let format = match (format, config_format) {
            (Some(format), _) => Some(format),
            (None, Some(name)) => Some(
                name.parse::<Format>()
                    .with_context(|| format!("Invalid input.format in config: {}", name))?,
            ),
            (None, None) => None,
        };

        let mut pass = self.ranking;
        overrides.apply(&mut pass);

        Ok(Settings {
            input,
            format,
            pass,
        })
    }
}

impl PassOverrides {
    pub fn apply(&self, pass: &mut PassConfig) {
        if let Some(domain) = &self.trust_domain {
            pass.signals.trust_domain = domain.clone();
        }
        if let Some(prefix) = &self.import_prefix {
            pass.signals.import_prefix = prefix.clone();
        }
        if let Some(field) = &self.key_field {
            pass.key_field = field.clone();
        }
        if let Some(field) = &self.path_field {
            pass.path_field = field.clone();
        }
        if self.strict {
            pass.missing_path = MissingPathPolicy::Abort;
        }
    }
}
