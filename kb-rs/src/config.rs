/**
 * config.rs
 * Parser for knowledge-base configuration files (YAML format)
 *
 * Format:
 * ```yaml
 * store:
 *   backend: memory          # or: remote
 *   sources:
 *     - data/kb/authors.ttl
 *   format: turtle
 *   # remote backend only:
 *   endpoint: https://example.org/sparql
 *   updateEndpoint: https://example.org/sparql-auth
 *   readOnly: true
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{KbError, Result};

/// Default public endpoint hosting the HuCit data (read-only)
pub const DEFAULT_ENDPOINT: &str =
    "https://api.druid.datalegend.net/datasets/mromanello/hucit/services/hucit/sparql";

/// Store backend selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Remote,
}

/// Triple-store connection parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub backend: Backend,
    /// RDF source files loaded at startup (memory backend)
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// Serialization format of the source files
    #[serde(default = "default_format")]
    pub format: String,
    /// SPARQL query endpoint (remote backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Separate SPARQL update endpoint, when the service splits them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_endpoint: Option<String>,
    /// Reject updates before sending them to the endpoint
    #[serde(default)]
    pub read_only: bool,
}

fn default_format() -> String {
    "turtle".to_string()
}

/// Knowledge-base configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KbConfig {
    pub store: StoreConfig,
}

impl Default for KbConfig {
    /// Points at the public read-only endpoint, so a `KnowledgeBase` built
    /// without a configuration file can read but never write.
    fn default() -> Self {
        KbConfig {
            store: StoreConfig {
                backend: Backend::Remote,
                sources: Vec::new(),
                format: default_format(),
                endpoint: Some(DEFAULT_ENDPOINT.to_string()),
                update_endpoint: None,
                read_only: true,
            },
        }
    }
}

impl KbConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(KbError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let config: KbConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build an in-memory configuration over the given RDF sources
    pub fn in_memory<P: Into<PathBuf>>(sources: Vec<P>, format: &str) -> Self {
        KbConfig {
            store: StoreConfig {
                backend: Backend::Memory,
                sources: sources.into_iter().map(Into::into).collect(),
                format: format.to_string(),
                endpoint: None,
                update_endpoint: None,
                read_only: false,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        match self.store.backend {
            Backend::Remote => {
                if self.store.endpoint.is_none() {
                    return Err(KbError::Config(
                        "remote backend requires 'endpoint'".to_string(),
                    ));
                }
            }
            Backend::Memory => {
                if self.store.endpoint.is_some() {
                    return Err(KbError::Config(
                        "memory backend does not take an 'endpoint'".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
