//! One load of a source file into a table

use crate::database::{write_table, TableSink, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::http::HttpClient;
use crate::source::{read_source, SourceFormat, SourceLocation};
use std::future::Future;
use tracing::info;

/// What to load and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestJob {
    /// Local path or http(s) URL
    pub source: String,
    pub target_table: String,
    pub chunk_size: usize,
}

/// Outcome of a completed load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub table: String,
    pub rows: usize,
    pub statements: usize,
}

impl IngestJob {
    pub fn new(source: impl Into<String>, target_table: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target_table: target_table.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Load the source and replace the target table with it
    ///
    /// `connect` is only called once the dataset is in memory, so an
    /// unsupported format or unreadable source never opens a connection.
    pub async fn run<F, Fut, S>(&self, http: &HttpClient, connect: F) -> Result<IngestReport>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S>>,
        S: TableSink,
    {
        let format = SourceFormat::detect(&self.source)?;
        let location = SourceLocation::parse(&self.source)?;

        info!("Starting ingestion for {location}...");
        let dataset = read_source(&location, format, http).await?;
        info!(
            "Loaded {} rows, columns: {}",
            dataset.num_rows(),
            dataset.column_names().join(", ")
        );

        let mut sink = connect().await?;
        info!("Writing to {} on {}", self.target_table, sink.describe());
        let summary = write_table(&mut sink, &self.target_table, &dataset, self.chunk_size).await?;

        println!("done ingesting to {}", self.target_table);
        Ok(IngestReport {
            table: summary.table,
            rows: summary.rows,
            statements: summary.statements,
        })
    }
}
