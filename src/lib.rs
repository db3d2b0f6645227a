// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # taxi-ingest
//!
//! Two small utilities for NYC taxi trip data.
//!
//! - **Archive uploader**: copies the monthly `*.csv.gz` trip files of each
//!   `(year, service)` from a public web archive into a GCS bucket, keyed
//!   `{service}/{file}`. Months the archive does not have are skipped.
//! - **Table loader**: reads one `.csv` or `.parquet` file (local path or
//!   URL) and replaces a Postgres table with its rows, using batched
//!   multi-row `INSERT` statements.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taxi_ingest::database::PostgresSink;
//! use taxi_ingest::http::HttpClient;
//! use taxi_ingest::ingest::IngestJob;
//! use taxi_ingest::database::ConnectionParams;
//!
//! let params = ConnectionParams::default();
//! let http = HttpClient::new()?;
//! let report = IngestJob::new("yellow_tripdata_2021-01.parquet", "yellow_taxi_data")
//!     .run(&http, || PostgresSink::connect(&params))
//!     .await?;
//! println!("{} rows", report.rows);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! web-to-gcs:  WorkItem ─► TransferUnit x12 ─► HttpClient ─► local file ─► CloudDestination
//! ingest:      SourceFormat ─► read_source ─► Dataset ─► write_table ─► TableSink
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// HTTP client for archive and source downloads
pub mod http;

/// Object storage destinations
pub mod storage;

/// Archive-to-storage uploader
pub mod upload;

/// Uploader configuration file
pub mod config;

/// Source file detection and reading
pub mod source;

/// Table replacement and batched inserts
pub mod database;

/// Table loader orchestration
pub mod ingest;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
