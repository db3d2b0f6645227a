//! Source module
//!
//! Reads one CSV or Parquet file, local or over HTTP, fully into memory
//! as Arrow record batches.
//!
//! # Format detection
//!
//! The format comes from the file suffix only:
//! - `.csv` - header row, column types inferred from the data
//! - `.parquet` - schema taken from the file
//!
//! Anything else is rejected before the file is touched.

mod format;
mod reader;

pub use format::{SourceFormat, SourceLocation};
pub use reader::{read_csv, read_parquet, read_source, Dataset};
