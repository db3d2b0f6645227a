//! CLI commands and argument parsing

use crate::config::{UploaderConfig, UploaderOverrides};
use crate::database::{ConnectionParams, DEFAULT_CHUNK_SIZE};
use crate::error::{Error, Result};
use crate::upload::WorkItem;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NYC taxi trip data: archive uploader and Postgres table loader
#[derive(Parser, Debug)]
#[command(name = "taxi-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy monthly trip archives from the web into a GCS bucket
    WebToGcs {
        /// Uploader configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Work item as YEAR:SERVICE, repeatable (e.g. --item 2019:green)
        #[arg(long = "item", value_name = "YEAR:SERVICE")]
        items: Vec<WorkItem>,

        /// Target bucket [default: data-raw-lake-nguyen-486008]
        #[arg(long, env = "GCP_GCS_BUCKET")]
        bucket: Option<String>,

        /// GCP project id [default: de-zoomcamp-2026-486008]
        #[arg(long)]
        project: Option<String>,

        /// Destination URL used instead of the bucket
        /// Supports: gs://bucket/prefix, /local/path, file:///path
        #[arg(long)]
        destination: Option<String>,

        /// Archive root URL
        #[arg(long)]
        base_url: Option<String>,

        /// Directory for local copies [default: .]
        #[arg(long)]
        download_dir: Option<PathBuf>,
    },

    /// Load a CSV or Parquet file into a Postgres table
    Ingest {
        /// Username for Postgres
        #[arg(long, default_value = "root")]
        pg_user: String,

        /// Password for Postgres
        #[arg(long, default_value = "root")]
        pg_pass: String,

        /// Hostname for Postgres
        #[arg(long, default_value = "localhost")]
        pg_host: String,

        /// Port for Postgres
        #[arg(long, default_value_t = 5432)]
        pg_port: u16,

        /// Database name for Postgres
        #[arg(long, default_value = "ny_taxi")]
        pg_db: String,

        /// Path or URL of the .csv or .parquet file
        #[arg(long)]
        url: String,

        /// Name of the table to replace
        #[arg(long)]
        target_table: String,

        /// Rows per INSERT statement
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Write to this DuckDB file instead of Postgres
        #[arg(long)]
        duckdb: Option<PathBuf>,
    },
}

impl Commands {
    /// Uploader settings of a `web-to-gcs` command
    ///
    /// Flags and `GCP_GCS_BUCKET` win over the config file, the file over
    /// the built-in defaults.
    pub fn uploader_config(&self) -> Result<UploaderConfig> {
        let Self::WebToGcs {
            config,
            items,
            bucket,
            project,
            destination,
            base_url,
            download_dir,
        } = self
        else {
            return Err(Error::config("not a web-to-gcs command"));
        };

        let overrides = UploaderOverrides {
            bucket: bucket.clone(),
            project: project.clone(),
            base_url: base_url.clone(),
            download_dir: download_dir.clone(),
            destination: destination.clone(),
            items: items.clone(),
        };
        UploaderConfig::resolve(config.as_deref(), overrides)
    }

    /// Connection parameters of an `ingest` command
    pub fn connection_params(&self) -> Option<ConnectionParams> {
        match self {
            Self::Ingest {
                pg_user,
                pg_pass,
                pg_host,
                pg_port,
                pg_db,
                ..
            } => Some(ConnectionParams {
                user: pg_user.clone(),
                password: pg_pass.clone(),
                host: pg_host.clone(),
                port: *pg_port,
                database: pg_db.clone(),
            }),
            Self::WebToGcs { .. } => None,
        }
    }
}
