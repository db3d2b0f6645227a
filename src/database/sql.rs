//! SQL text generation for table replacement and multi-row inserts
//!
//! The generated SQL is accepted by both PostgreSQL and DuckDB.

use crate::error::Result;
use arrow::array::{Array, ArrayRef, BooleanArray};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};

/// Quote an identifier, doubling embedded double quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal, doubling embedded single quotes
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Column type used for an Arrow type
pub fn sql_type(data_type: &DataType) -> String {
    match data_type {
        DataType::Boolean => "BOOLEAN".to_string(),
        DataType::Int8 | DataType::Int16 | DataType::UInt8 => "SMALLINT".to_string(),
        DataType::Int32 | DataType::UInt16 => "INTEGER".to_string(),
        DataType::Int64 | DataType::UInt32 => "BIGINT".to_string(),
        DataType::UInt64 => "NUMERIC(20, 0)".to_string(),
        DataType::Float16 | DataType::Float32 => "REAL".to_string(),
        DataType::Float64 => "DOUBLE PRECISION".to_string(),
        DataType::Decimal128(precision, scale) | DataType::Decimal256(precision, scale) => {
            format!("NUMERIC({precision}, {scale})")
        }
        DataType::Date32 | DataType::Date64 => "DATE".to_string(),
        DataType::Time32(_) | DataType::Time64(_) => "TIME".to_string(),
        DataType::Timestamp(_, None) => "TIMESTAMP".to_string(),
        DataType::Timestamp(_, Some(_)) => "TIMESTAMPTZ".to_string(),
        DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::FixedSizeBinary(_) => "BYTEA".to_string(),
        DataType::Dictionary(_, value) => sql_type(value),
        _ => "TEXT".to_string(),
    }
}

/// `DROP TABLE IF EXISTS "table"`
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

/// `CREATE TABLE "table" (...)`, one nullable column per field
pub fn create_table_sql(table: &str, schema: &Schema) -> String {
    let columns = schema
        .fields()
        .iter()
        .map(|f| format!("{} {}", quote_ident(f.name()), sql_type(f.data_type())))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({columns})", quote_ident(table))
}

/// `INSERT INTO "table" ("a", "b") VALUES ` with the row tuples appended
pub fn insert_sql(table: &str, schema: &Schema, rows: &[String]) -> String {
    let columns = schema
        .fields()
        .iter()
        .map(|f| quote_ident(f.name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({columns}) VALUES {}",
        quote_ident(table),
        rows.join(", ")
    )
}

/// Databases whose literal syntax differs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    /// Binary as `'\x<hex>'` (bytea hex format)
    #[default]
    Postgres,
    /// Binary as `'\xDE\xAD'::BLOB`
    DuckDb,
}

/// How one column's cells are written as SQL literals
enum CellStyle {
    Boolean,
    /// Integers and decimals, written bare
    Numeric,
    /// Floats, bare unless NaN or infinite
    Float,
    Binary,
    Quoted,
}

impl CellStyle {
    fn for_type(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => Self::Boolean,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => Self::Numeric,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => Self::Float,
            DataType::Binary
            | DataType::LargeBinary
            | DataType::BinaryView
            | DataType::FixedSizeBinary(_) => Self::Binary,
            DataType::Dictionary(_, value) => Self::for_type(value),
            _ => Self::Quoted,
        }
    }
}

/// Renders the rows of one record batch as `(v1, v2, ...)` tuples
pub struct RowRenderer<'a> {
    columns: Vec<Column<'a>>,
    dialect: SqlDialect,
}

struct Column<'a> {
    array: &'a ArrayRef,
    formatter: ArrayFormatter<'a>,
    style: CellStyle,
    /// Logical nulls: covers `Null` arrays and dictionary values
    nulls: Option<NullBuffer>,
}

impl<'a> RowRenderer<'a> {
    pub fn new(
        batch: &'a RecordBatch,
        options: &'a FormatOptions<'a>,
        dialect: SqlDialect,
    ) -> Result<Self> {
        let columns = batch
            .columns()
            .iter()
            .map(|array| -> Result<_> {
                Ok(Column {
                    array,
                    formatter: ArrayFormatter::try_new(array.as_ref(), options)?,
                    style: CellStyle::for_type(array.data_type()),
                    nulls: array.logical_nulls(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns, dialect })
    }

    /// The SQL tuple for row `row`
    pub fn row(&self, row: usize) -> String {
        let cells = self
            .columns
            .iter()
            .map(|column| {
                if column.nulls.as_ref().is_some_and(|n| n.is_null(row)) {
                    return "NULL".to_string();
                }
                let formatter = &column.formatter;
                match column.style {
                    CellStyle::Boolean => render_bool(column.array, row, formatter),
                    CellStyle::Numeric => formatter.value(row).to_string(),
                    CellStyle::Float => render_float(&formatter.value(row).to_string()),
                    CellStyle::Binary => {
                        render_binary(&formatter.value(row).to_string(), self.dialect)
                    }
                    CellStyle::Quoted => quote_literal(&formatter.value(row).to_string()),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("({cells})")
    }
}

fn render_bool(array: &ArrayRef, row: usize, formatter: &ArrayFormatter<'_>) -> String {
    let value = match array.as_any().downcast_ref::<BooleanArray>() {
        Some(values) => values.value(row),
        // Dictionary-encoded booleans
        None => formatter.value(row).to_string() == "true",
    };
    let literal = if value { "TRUE" } else { "FALSE" };
    literal.to_string()
}

/// `hex` is the formatter's lowercase hex rendering of the bytes
fn render_binary(hex: &str, dialect: SqlDialect) -> String {
    match dialect {
        SqlDialect::Postgres => format!("'\\x{hex}'"),
        SqlDialect::DuckDb => {
            let escaped: String = hex
                .as_bytes()
                .chunks(2)
                .map(|pair| format!("\\x{}", String::from_utf8_lossy(pair)))
                .collect();
            format!("'{escaped}'::BLOB")
        }
    }
}

fn render_float(text: &str) -> String {
    match text {
        "NaN" => "'NaN'".to_string(),
        "inf" => "'Infinity'".to_string(),
        "-inf" => "'-Infinity'".to_string(),
        _ => text.to_string(),
    }
}
