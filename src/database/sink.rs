//! Database connections that execute generated SQL

use super::connection::ConnectionParams;
use super::sql::SqlDialect;
use crate::error::Result;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};

/// Executes SQL statements against a concrete database
#[async_trait]
pub trait TableSink: Send {
    /// Run one statement, returning the number of rows it affected
    async fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Short description for log lines
    fn describe(&self) -> String;

    /// Literal syntax the generated INSERTs must use
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }
}

/// PostgreSQL via tokio-postgres, without TLS
pub struct PostgresSink {
    client: Client,
    target: String,
}

impl PostgresSink {
    /// Connect using the five connection parameters
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let target = params.redacted();
        info!("Connecting to {target}");

        let (client, connection) = tokio_postgres::connect(&params.connection_string(), NoTls).await?;

        // The connection object performs the actual I/O and must be polled
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {e}");
            }
        });

        Ok(Self { client, target })
    }
}

#[async_trait]
impl TableSink for PostgresSink {
    async fn execute(&mut self, sql: &str) -> Result<u64> {
        Ok(self.client.execute(sql, &[]).await?)
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// Embedded DuckDB database file, or in-memory
pub struct DuckDbSink {
    conn: Connection,
    target: String,
}

impl DuckDbSink {
    /// Open (or create) a DuckDB database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            target: format!("duckdb://{}", path.display()),
        })
    }

    /// Open a fresh in-memory DuckDB database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            target: "duckdb://:memory:".to_string(),
        })
    }

    /// The underlying connection, for queries outside the loader
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl TableSink for DuckDbSink {
    async fn execute(&mut self, sql: &str) -> Result<u64> {
        debug!("DuckDB: {} bytes of SQL", sql.len());
        let affected = self.conn.execute(sql, [])?;
        Ok(affected as u64)
    }

    fn describe(&self) -> String {
        self.target.clone()
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::DuckDb
    }
}
