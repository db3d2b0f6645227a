//! Archive-to-storage transfer loop

use super::types::{TransferUnit, UnitOutcome, UploadReport, WorkItem};
use crate::error::Result;
use crate::http::{Fetched, HttpClient};
use crate::storage::CloudDestination;
use std::path::PathBuf;
use tracing::{info, warn};

/// Downloads monthly archive files and uploads them unmodified
#[derive(Debug)]
pub struct Uploader {
    http: HttpClient,
    destination: CloudDestination,
    base_url: String,
    download_dir: PathBuf,
}

impl Uploader {
    pub fn new(
        http: HttpClient,
        destination: CloudDestination,
        base_url: impl Into<String>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            http,
            destination,
            base_url: base_url.into(),
            download_dir: download_dir.into(),
        }
    }

    /// Run every work item in order
    pub async fn run(&self, items: &[WorkItem]) -> Result<UploadReport> {
        let mut report = UploadReport::default();
        for item in items {
            report.extend(self.web_to_storage(item).await?);
        }
        info!(
            "Finished: {} uploaded, {} not found, {} bytes",
            report.transferred(),
            report.skipped(),
            report.bytes()
        );
        Ok(report)
    }

    /// Transfer months 1 to 12 of one `(year, service)` item
    ///
    /// A non-success status skips the month. Any other failure is returned
    /// immediately, leaving earlier months uploaded.
    pub async fn web_to_storage(&self, item: &WorkItem) -> Result<UploadReport> {
        let mut report = UploadReport::default();
        for unit in item.units() {
            let outcome = self.transfer(&unit).await?;
            report.entries.push((unit, outcome));
        }
        Ok(report)
    }

    async fn transfer(&self, unit: &TransferUnit) -> Result<UnitOutcome> {
        let file_name = unit.file_name();
        info!("Processing: {file_name}");

        let bytes = match self.http.fetch(&unit.url(&self.base_url)).await? {
            Fetched::Body(bytes) => bytes,
            Fetched::Unavailable(status) => {
                warn!(status = status.as_u16(), "File not found on GitHub: {file_name}");
                return Ok(UnitOutcome::Skipped {
                    status: status.as_u16(),
                });
            }
        };

        tokio::fs::create_dir_all(&self.download_dir).await?;
        let local_path = unit.local_path(&self.download_dir);
        tokio::fs::write(&local_path, &bytes).await?;
        info!("Local: {file_name} downloaded.");

        let object_key = unit.object_key();
        let full_path = self.destination.upload_file(&object_key, &local_path).await?;
        info!(path = %full_path, "GCS: {object_key} uploaded.");

        Ok(UnitOutcome::Transferred {
            object_key,
            local_path,
            bytes: bytes.len(),
        })
    }
}
