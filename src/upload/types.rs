//! Work items and transfer units for the archive uploader

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Months covered by one work item
pub const MONTHS: std::ops::RangeInclusive<u8> = 1..=12;

/// One `(year, service)` entry of the uploader's run list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Four-digit year, e.g. 2019
    pub year: u16,
    /// Service label, e.g. `green`, `yellow`, `fhv`
    pub service: String,
}

impl WorkItem {
    /// Create a work item, validating both parts
    pub fn new(year: u16, service: impl Into<String>) -> Result<Self> {
        let item = Self {
            year,
            service: service.into(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Check year and service label
    pub fn validate(&self) -> Result<()> {
        if !(1000..=9999).contains(&self.year) {
            return Err(Error::invalid_item(
                self.to_string(),
                "year must have four digits",
            ));
        }
        if self.service.is_empty() {
            return Err(Error::invalid_item(self.to_string(), "service is empty"));
        }
        if !self
            .service
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::invalid_item(
                self.to_string(),
                "service may only contain letters, digits, '_' or '-'",
            ));
        }
        Ok(())
    }

    /// The twelve monthly transfer units of this item, in order
    pub fn units(&self) -> impl Iterator<Item = TransferUnit> + '_ {
        MONTHS.map(move |month| TransferUnit {
            service: self.service.clone(),
            year: self.year,
            month,
        })
    }

    /// The run list used when nothing else is configured
    pub fn default_items() -> Vec<WorkItem> {
        [(2019, "green"), (2020, "green"), (2019, "yellow"), (2020, "yellow")]
            .into_iter()
            .map(|(year, service)| WorkItem {
                year,
                service: service.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.year, self.service)
    }
}

impl FromStr for WorkItem {
    type Err = Error;

    /// Parse `YEAR:SERVICE`, e.g. `2019:green`
    fn from_str(s: &str) -> Result<Self> {
        let (year, service) = s
            .split_once(':')
            .ok_or_else(|| Error::invalid_item(s, "expected YEAR:SERVICE"))?;
        let year: u16 = year
            .trim()
            .parse()
            .map_err(|_| Error::invalid_item(s, format!("'{year}' is not a year")))?;
        Self::new(year, service.trim()).map_err(|e| match e {
            Error::InvalidWorkItem { message, .. } => Error::invalid_item(s, message),
            other => other,
        })
    }
}

/// One monthly file: `(service, year, month)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferUnit {
    pub service: String,
    pub year: u16,
    /// 1-based month
    pub month: u8,
}

impl TransferUnit {
    /// `{service}_tripdata_{year}-{MM}.csv.gz`
    pub fn file_name(&self) -> String {
        format!(
            "{}_tripdata_{}-{:02}.csv.gz",
            self.service, self.year, self.month
        )
    }

    /// `{base_url}/{service}/{file_name}`
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.service,
            self.file_name()
        )
    }

    /// Storage object key, `{service}/{file_name}`
    pub fn object_key(&self) -> String {
        format!("{}/{}", self.service, self.file_name())
    }

    /// Local download path under `dir`
    pub fn local_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

/// What happened to one transfer unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Downloaded and uploaded
    Transferred {
        object_key: String,
        local_path: PathBuf,
        bytes: usize,
    },
    /// The archive answered with a non-success status
    Skipped { status: u16 },
}

/// Per-unit results of a run, in processing order
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub entries: Vec<(TransferUnit, UnitOutcome)>,
}

impl UploadReport {
    /// Number of files that reached the destination
    pub fn transferred(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, UnitOutcome::Transferred { .. }))
            .count()
    }

    /// Number of months the archive did not serve
    pub fn skipped(&self) -> usize {
        self.entries.len() - self.transferred()
    }

    /// Total bytes uploaded
    pub fn bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, o)| match o {
                UnitOutcome::Transferred { bytes, .. } => *bytes,
                UnitOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    /// Append another report's entries
    pub fn extend(&mut self, other: UploadReport) {
        self.entries.extend(other.entries);
    }
}
