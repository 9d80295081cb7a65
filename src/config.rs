use crate::error::Result;
use crate::structs::OutputFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline configuration, read once at startup and passed to the adapters.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub source_database: DatabaseConfig,
    pub destination_database: DatabaseConfig,
    pub api: ApiConfig,
    pub sources: SourcesConfig,
    pub object_store: ObjectStoreConfig,
    #[serde(default)]
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Stores API endpoints and the key sent in the `x-api-key` header.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub key: String,
    pub number_stores_url: String,
    /// Store `n` is fetched from `{store_details_url}/{n}`.
    pub store_details_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_users_table")]
    pub users_table: String,
    #[serde(default = "default_orders_table")]
    pub orders_table: String,
    /// Path or URL of the card details PDF, or a directory of one CSV per page.
    pub card_details_pdf: String,
    pub products: ObjectLocation,
    pub date_details_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectStoreConfig {
    /// Objects live at `{root}/{bucket}/{key}`.
    Local { root: PathBuf },
    /// Objects are fetched from a URL with `{bucket}` and `{key}` placeholders.
    Http { url_template: String },
}

/// Optional file copies of every loaded table.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_users_table() -> String {
    "legacy_users".to_string()
}

fn default_orders_table() -> String {
    "orders_table".to_string()
}

impl PipelineConfig {
    /// Reads and parses a YAML configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid YAML for this struct.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
