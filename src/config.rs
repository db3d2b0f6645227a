//! Uploader configuration
//!
//! Settings for the archive uploader, loadable from a YAML file:
//!
//! ```yaml
//! bucket: my-raw-bucket
//! project: my-gcp-project
//! base_url: https://github.com/DataTalksClub/nyc-tlc-data/releases/download
//! download_dir: ./downloads
//! items:
//!   - { year: 2019, service: green }
//!   - { year: 2019, service: fhv }
//! ```
//!
//! Every key is optional. Command-line flags (and `GCP_GCS_BUCKET`) take
//! precedence over the file, the file over the built-in defaults.

use crate::error::{Error, Result};
use crate::storage::CloudDestination;
use crate::upload::WorkItem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bucket used when none is configured
pub const DEFAULT_BUCKET: &str = "data-raw-lake-nguyen-486008";

/// Project used when none is configured
pub const DEFAULT_PROJECT: &str = "de-zoomcamp-2026-486008";

/// Release download root of the public trip-record archive
pub const DEFAULT_BASE_URL: &str = "https://github.com/DataTalksClub/nyc-tlc-data/releases/download";

// ============================================================================
// Config file
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Target GCS bucket name
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// GCP project id (informational; credentials decide the project)
    #[serde(default = "default_project")]
    pub project: String,

    /// Archive root; files live at `{base_url}/{service}/{file}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory for the local copy of each downloaded file
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Full destination URL (`gs://bucket/prefix` or a local path),
    /// used instead of `bucket` when set
    #[serde(default)]
    pub destination: Option<String>,

    /// `(year, service)` run list
    #[serde(default = "WorkItem::default_items")]
    pub items: Vec<WorkItem>,
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            project: default_project(),
            base_url: default_base_url(),
            download_dir: default_download_dir(),
            destination: None,
            items: WorkItem::default_items(),
        }
    }
}

impl UploaderConfig {
    /// Parse a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// The config file at `path` (or the defaults) with `overrides` applied
    pub fn resolve(path: Option<&Path>, overrides: UploaderOverrides) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        }
        .merge(overrides)
    }

    /// Apply command-line overrides on top of this config
    pub fn merge(mut self, overrides: UploaderOverrides) -> Result<Self> {
        if let Some(bucket) = overrides.bucket {
            self.bucket = bucket;
        }
        if let Some(project) = overrides.project {
            self.project = project;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(dir) = overrides.download_dir {
            self.download_dir = dir;
        }
        if overrides.destination.is_some() {
            self.destination = overrides.destination;
        }
        if !overrides.items.is_empty() {
            self.items = overrides.items;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.destination.is_none() && self.bucket.trim().is_empty() {
            return Err(Error::config("bucket must not be empty"));
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }

    /// Build the storage destination: `destination` if set, else the bucket
    pub fn cloud_destination(&self) -> Result<CloudDestination> {
        match &self.destination {
            Some(url) => CloudDestination::parse(url),
            None => CloudDestination::for_bucket(&self.bucket),
        }
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Values given on the command line; `None` and empty mean "not given"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploaderOverrides {
    pub bucket: Option<String>,
    pub project: Option<String>,
    pub base_url: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub destination: Option<String>,
    pub items: Vec<WorkItem>,
}
