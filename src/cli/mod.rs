//! CLI module
//!
//! Command-line interface for both utilities.
//!
//! # Commands
//!
//! - `web-to-gcs` - Copy monthly trip archives into a storage bucket
//! - `ingest` - Replace a Postgres table with a CSV or Parquet file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
