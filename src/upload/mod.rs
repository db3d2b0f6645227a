//! Archive-to-storage uploader
//!
//! For each `(year, service)` work item, downloads the twelve monthly
//! `{service}_tripdata_{year}-{MM}.csv.gz` files from the release archive,
//! keeps them on local disk and uploads them byte-for-byte to object
//! storage under `{service}/`.
//!
//! Months the archive does not serve are skipped. Downloads are not
//! cleaned up and re-runs transfer everything again.

mod types;
mod uploader;

pub use types::{TransferUnit, UnitOutcome, UploadReport, WorkItem, MONTHS};
pub use uploader::Uploader;
