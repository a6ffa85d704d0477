//! Import settings: built-in defaults, an optional YAML file, and overrides.
//!
//! Precedence is defaults, then the YAML file, then whatever the caller
//! applies on top (the CLI flags).

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::document::DocumentMetadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017/";
pub const DEFAULT_DATABASE: &str = "fayda-omo-db";
pub const DEFAULT_COLLECTION: &str = "mCBS";

/// Where documents end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Stop a bulk insert at the first failing document
    pub ordered: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            ordered: false,
        }
    }
}

/// Everything one import run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub input: PathBuf,
    pub store: StoreConfig,
    pub metadata: DocumentMetadata,
    pub batch_size: usize,
}

impl ImportConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            store: StoreConfig::default(),
            metadata: DocumentMetadata::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Fold the values present in a YAML file over this config.
    pub fn apply_yaml(&mut self, yaml: &ImportYamlConfig) {
        if let Some(input) = &yaml.input {
            self.input = input.clone();
        }
        if let Some(batch_size) = yaml.batch_size {
            self.batch_size = batch_size;
        }

        let store = &yaml.store;
        if let Some(uri) = &store.uri {
            self.store.uri = uri.clone();
        }
        if let Some(database) = &store.database {
            self.store.database = database.clone();
        }
        if let Some(collection) = &store.collection {
            self.store.collection = collection.clone();
        }
        if let Some(ordered) = store.ordered {
            self.store.ordered = ordered;
        }

        if let Some(source) = &yaml.metadata.source {
            self.metadata.source = source.clone();
        }
        if let Some(branch) = &yaml.metadata.branch {
            self.metadata.branch = branch.clone();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("batch size must be at least 1");
        }
        if self.store.database.trim().is_empty() {
            anyhow::bail!("database name must not be empty");
        }
        if self.store.collection.trim().is_empty() {
            anyhow::bail!("collection name must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreYamlConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub ordered: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataYamlConfig {
    pub source: Option<String>,
    pub branch: Option<String>,
}

/// On-disk form of the import settings; every key is optional.
///
/// ```yaml
/// input: backup.sql
/// batch_size: 500
/// store:
///   uri: mongodb://db.internal:27017/
///   database: fayda-omo-db
///   collection: mCBS
/// metadata:
///   source: CoreBanking_Backup_2022
///   branch: Shebedino
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportYamlConfig {
    pub input: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub store: StoreYamlConfig,
    pub metadata: MetadataYamlConfig,
}

impl ImportYamlConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ImportYamlConfig = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }
}
