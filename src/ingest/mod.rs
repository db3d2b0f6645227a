//! Ingest module
//!
//! The table loader: read a `.csv` or `.parquet` file from a local path or
//! URL, then replace a database table with its contents.

mod job;

pub use job::{IngestJob, IngestReport};

#[cfg(test)]
mod tests;
