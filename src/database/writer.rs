//! Replace-if-exists table writer

use super::sink::TableSink;
use super::sql::{create_table_sql, drop_table_sql, insert_sql, RowRenderer, SqlDialect};
use crate::error::{Error, Result};
use crate::source::Dataset;
use arrow::record_batch::RecordBatch;
use arrow::util::display::FormatOptions;
use tracing::{debug, info};

/// Rows per INSERT statement unless configured otherwise
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Result of writing a dataset to a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub table: String,
    pub rows: usize,
    /// INSERT statements issued
    pub statements: usize,
}

/// Drop and recreate `table` from the dataset's schema, then insert every
/// row in multi-row statements of at most `chunk_size` rows
///
/// Statements run outside any transaction; on failure the rows already
/// inserted stay in place.
pub async fn write_table<S: TableSink + ?Sized>(
    sink: &mut S,
    table: &str,
    dataset: &Dataset,
    chunk_size: usize,
) -> Result<WriteSummary> {
    if chunk_size == 0 {
        return Err(Error::config("chunk size must be at least 1"));
    }
    if dataset.schema().fields().is_empty() {
        return Err(Error::config(format!(
            "Cannot create table {table}: the source has no columns"
        )));
    }

    let schema = dataset.schema();
    sink.execute(&drop_table_sql(table)).await?;
    let create = create_table_sql(table, schema);
    debug!("{create}");
    sink.execute(&create).await?;

    let options = FormatOptions::default();
    let dialect = sink.dialect();
    let mut pending: Vec<String> = Vec::with_capacity(chunk_size.min(dataset.num_rows()));
    let mut summary = WriteSummary {
        table: table.to_string(),
        rows: 0,
        statements: 0,
    };

    for batch in dataset.batches() {
        for row in render_rows(batch, &options, dialect)? {
            pending.push(row);
            if pending.len() == chunk_size {
                flush(sink, table, dataset, &mut pending, &mut summary).await?;
            }
        }
    }
    if !pending.is_empty() {
        flush(sink, table, dataset, &mut pending, &mut summary).await?;
    }

    info!(
        "Wrote {} rows to {} in {} statements",
        summary.rows, table, summary.statements
    );
    Ok(summary)
}

/// Render a whole batch up front so no formatter is held across an await
fn render_rows(
    batch: &RecordBatch,
    options: &FormatOptions<'_>,
    dialect: SqlDialect,
) -> Result<Vec<String>> {
    let renderer = RowRenderer::new(batch, options, dialect)?;
    Ok((0..batch.num_rows()).map(|row| renderer.row(row)).collect())
}

async fn flush<S: TableSink + ?Sized>(
    sink: &mut S,
    table: &str,
    dataset: &Dataset,
    pending: &mut Vec<String>,
    summary: &mut WriteSummary,
) -> Result<()> {
    let sql = insert_sql(table, dataset.schema(), pending);
    sink.execute(&sql).await?;
    summary.rows += pending.len();
    summary.statements += 1;
    debug!("Inserted chunk {} ({} rows)", summary.statements, pending.len());
    pending.clear();
    Ok(())
}
