//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::database::{ConnectionParams, DuckDbSink, PostgresSink};
use crate::error::Result;
use crate::http::HttpClient;
use crate::ingest::{IngestJob, IngestReport};
use crate::upload::Uploader;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::WebToGcs { .. } => self.web_to_gcs().await,
            Commands::Ingest {
                url,
                target_table,
                chunk_size,
                duckdb,
                ..
            } => {
                let job = IngestJob::new(url.clone(), target_table.clone())
                    .with_chunk_size(*chunk_size);
                let params = self.cli.command.connection_params().unwrap_or_default();
                let report = self.ingest(&job, &params, duckdb.as_deref()).await?;
                info!(
                    "{}: {} rows in {} statements",
                    report.table, report.rows, report.statements
                );
                println!("Mission accomplished!");
                Ok(())
            }
        }
    }

    /// Resolve the uploader settings and transfer every work item
    async fn web_to_gcs(&self) -> Result<()> {
        let config = self.cli.command.uploader_config()?;

        let destination = config.cloud_destination()?;
        info!(
            "Uploading to {}://{} (project {})",
            destination.scheme(),
            destination.location(),
            config.project
        );

        let uploader = Uploader::new(
            HttpClient::new()?,
            destination,
            config.base_url.clone(),
            config.download_dir.clone(),
        );
        let report = uploader.run(&config.items).await?;
        if report.transferred() == 0 {
            info!("No archive files were available for the requested items");
        }
        Ok(())
    }

    /// Load the source into Postgres, or into a DuckDB file when given
    async fn ingest(
        &self,
        job: &IngestJob,
        params: &ConnectionParams,
        duckdb: Option<&Path>,
    ) -> Result<IngestReport> {
        let http = HttpClient::new()?;
        match duckdb {
            Some(path) => job.run(&http, || async { DuckDbSink::open(path) }).await,
            None => job.run(&http, || PostgresSink::connect(params)).await,
        }
    }
}
