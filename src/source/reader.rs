//! Full in-memory source reading
//!
//! The whole file is fetched (or read) into one buffer, then decoded into
//! Arrow record batches.

use super::format::{SourceFormat, SourceLocation};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Rows per decoded record batch
const DECODE_BATCH_SIZE: usize = 8192;

/// A fully materialized table: schema plus every row
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Dataset {
    /// Build a dataset; every batch must carry the fields of `schema`
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self> {
        if let Some(batch) = batches
            .iter()
            .find(|b| b.schema().fields() != schema.fields())
        {
            return Err(Error::config(format!(
                "Record batch schema {:?} does not match dataset schema {:?}",
                batch.schema(),
                schema
            )));
        }
        Ok(Self { schema, batches })
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total rows across all batches
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }
}

/// Load `location` fully and decode it as `format`
pub async fn read_source(
    location: &SourceLocation,
    format: SourceFormat,
    http: &HttpClient,
) -> Result<Dataset> {
    let bytes = match location {
        SourceLocation::Remote(url) => http.get_bytes(url.as_str()).await?,
        SourceLocation::Local(path) => match tokio::fs::read(path).await {
            Ok(data) => Bytes::from(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound {
                    path: path.display().to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        },
    };

    debug!("Read {} bytes from {}", bytes.len(), location);

    let dataset = match format {
        SourceFormat::Csv => read_csv(bytes)?,
        SourceFormat::Parquet => read_parquet(bytes)?,
    };

    debug!(
        "Decoded {} rows x {} columns",
        dataset.num_rows(),
        dataset.schema().fields().len()
    );
    Ok(dataset)
}

/// Decode CSV with a header row, inferring column types over every row
pub fn read_csv(bytes: Bytes) -> Result<Dataset> {
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(Cursor::new(bytes.as_ref()), None)?;
    let schema = Arc::new(schema);

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(DECODE_BATCH_SIZE)
        .build(Cursor::new(bytes))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Dataset::new(schema, batches)
}

/// Decode every row group of a Parquet file
pub fn read_parquet(bytes: Bytes) -> Result<Dataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(bytes)?.with_batch_size(DECODE_BATCH_SIZE);
    let file_schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    // Decoded batches drop the file's key-value metadata
    let schema = batches
        .first()
        .map_or(file_schema, RecordBatch::schema);
    Dataset::new(schema, batches)
}
