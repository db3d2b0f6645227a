//! Database module
//!
//! Writes an in-memory dataset to a table with a replace-if-exists
//! strategy: drop, recreate from the dataset's Arrow schema, then insert
//! all rows as batched multi-row `INSERT` statements.
//!
//! Table structure comes only from the dataset's column types at write
//! time; there is no schema declaration step and no migration.
//!
//! Two sinks execute the SQL:
//! - [`PostgresSink`] - PostgreSQL through tokio-postgres
//! - [`DuckDbSink`] - an embedded DuckDB file or in-memory database

mod connection;
mod sink;
mod sql;
mod writer;

pub use connection::ConnectionParams;
pub use sink::{DuckDbSink, PostgresSink, TableSink};
pub use sql::{
    create_table_sql, drop_table_sql, insert_sql, quote_ident, quote_literal, sql_type, SqlDialect,
};
pub use writer::{write_table, WriteSummary, DEFAULT_CHUNK_SIZE};
