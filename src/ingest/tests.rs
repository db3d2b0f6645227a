//! Tests for the table loader

use super::*;
use crate::database::DuckDbSink;
use crate::error::Error;
use crate::http::HttpClient;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PEOPLE: &str = "id,name\n1,Alice\n2,Bob\n3,Carol\n";

fn row_count(sink: &DuckDbSink, table: &str) -> i64 {
    sink.connection()
        .query_row(&format!("SELECT count(*) FROM \"{table}\""), [], |r| r.get(0))
        .unwrap()
}

#[tokio::test]
async fn test_unsupported_format_never_connects() {
    let http = HttpClient::new().unwrap();
    let job = IngestJob::new("data.json", "t");
    let connected = AtomicBool::new(false);

    let result = job
        .run(&http, || async {
            connected.store(true, Ordering::SeqCst);
            DuckDbSink::open_in_memory()
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
    assert_eq!(
        err.to_string(),
        "Unsupported file format '.json'. Please use .csv or .parquet"
    );
    assert!(!connected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_missing_local_file_never_connects() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.csv");
    let http = HttpClient::new().unwrap();
    let connected = AtomicBool::new(false);

    let result = IngestJob::new(missing.to_string_lossy(), "t")
        .run(&http, || async {
            connected.store(true, Ordering::SeqCst);
            DuckDbSink::open_in_memory()
        })
        .await;

    assert!(matches!(result, Err(Error::FileNotFound { .. })));
    assert!(!connected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_local_csv_into_duckdb_file() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("people.csv");
    std::fs::write(&csv, PEOPLE).unwrap();
    let db = dir.path().join("ny_taxi.duckdb");
    let http = HttpClient::new().unwrap();

    let report = IngestJob::new(csv.to_string_lossy(), "people")
        .run(&http, || async { DuckDbSink::open(&db) })
        .await
        .unwrap();

    assert_eq!(
        report,
        IngestReport {
            table: "people".to_string(),
            rows: 3,
            statements: 1,
        }
    );
    let sink = DuckDbSink::open(&db).unwrap();
    assert_eq!(row_count(&sink, "people"), 3);
}

#[tokio::test]
async fn test_remote_csv_with_small_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/people.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PEOPLE))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("remote.duckdb");
    let http = HttpClient::new().unwrap();

    let report = IngestJob::new(format!("{}/files/people.csv", server.uri()), "people")
        .with_chunk_size(2)
        .run(&http, || async { DuckDbSink::open(&db) })
        .await
        .unwrap();

    assert_eq!(report.rows, 3);
    assert_eq!(report.statements, 2);
}

#[tokio::test]
async fn test_remote_failure_never_connects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let http = HttpClient::new().unwrap();
    let connected = AtomicBool::new(false);
    let result = IngestJob::new(format!("{}/missing.parquet", server.uri()), "t")
        .run(&http, || async {
            connected.store(true, Ordering::SeqCst);
            DuckDbSink::open_in_memory()
        })
        .await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 404, .. })));
    assert!(!connected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_connect_failure_is_returned() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("people.csv");
    std::fs::write(&csv, PEOPLE).unwrap();
    let http = HttpClient::new().unwrap();

    let result = IngestJob::new(csv.to_string_lossy(), "people")
        .run(&http, || async {
            Err::<DuckDbSink, _>(Error::config("database unavailable"))
        })
        .await;

    assert!(matches!(result, Err(Error::Config { .. })));
}
