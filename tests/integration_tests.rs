//! Integration tests using a mock archive server
//!
//! Runs both commands end to end through the CLI runner: argument parsing,
//! HTTP downloads, local storage and DuckDB tables.

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use std::path::Path;
use std::sync::Arc;
use taxi_ingest::cli::{Cli, Runner};
use taxi_ingest::Error;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runner(args: &[&str]) -> Runner {
    let mut argv = vec!["taxi-ingest"];
    argv.extend_from_slice(args);
    Runner::new(Cli::try_parse_from(argv).unwrap())
}

fn query_i64(db: &Path, sql: &str) -> i64 {
    let conn = duckdb::Connection::open(db).unwrap();
    conn.query_row(sql, [], |r| r.get(0)).unwrap()
}

fn write_trips_parquet(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("VendorID", DataType::Int64, true),
        Field::new("store_and_fwd_flag", DataType::Utf8, true),
        Field::new("fare_amount", DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![Some(1), Some(2), None, Some(2)])),
            Arc::new(StringArray::from(vec![Some("N"), Some("Y"), Some("N"), None])),
            Arc::new(Float64Array::from(vec![7.5, 12.0, 3.25, 52.0])),
        ],
    )
    .unwrap();

    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

// ============================================================================
// web-to-gcs
// ============================================================================

#[tokio::test]
async fn test_web_to_gcs_into_local_destination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/green/green_tripdata_2019-01.csv.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x1f\x8bjanuary".to_vec()))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/green/green_tripdata_2019-07.csv.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x1f\x8bjuly".to_vec()))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let bucket = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    let base_url = server.uri();
    let bucket_dir = bucket.path().to_string_lossy().into_owned();
    let download_dir = downloads.path().to_string_lossy().into_owned();

    runner(&[
        "web-to-gcs",
        "--item",
        "2019:green",
        "--destination",
        bucket_dir.as_str(),
        "--base-url",
        base_url.as_str(),
        "--download-dir",
        download_dir.as_str(),
    ])
    .run()
    .await
    .unwrap();

    let uploaded = bucket.path().join("green/green_tripdata_2019-01.csv.gz");
    assert_eq!(std::fs::read(uploaded).unwrap(), b"\x1f\x8bjanuary");
    assert_eq!(
        std::fs::read(bucket.path().join("green/green_tripdata_2019-07.csv.gz")).unwrap(),
        b"\x1f\x8bjuly"
    );
    assert!(!bucket
        .path()
        .join("green/green_tripdata_2019-02.csv.gz")
        .exists());

    let local: Vec<_> = std::fs::read_dir(downloads.path()).unwrap().collect();
    assert_eq!(local.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 12);
}

#[tokio::test]
async fn test_web_to_gcs_config_file_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = dir.path().join("uploader.yaml");
    std::fs::write(
        &config,
        format!(
            "base_url: {}\ndestination: {}\ndownload_dir: {}\nitems:\n  - {{ year: 2020, service: fhv }}\n  - {{ year: 2021, service: fhv }}\n",
            server.uri(),
            dir.path().join("bucket").display(),
            dir.path().join("dl").display(),
        ),
    )
    .unwrap();
    let config_path = config.to_string_lossy().into_owned();

    runner(&["web-to-gcs", "--config", config_path.as_str()])
        .run()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 24);
    assert_eq!(requests[0].url.path(), "/fhv/fhv_tripdata_2020-01.csv.gz");
    assert_eq!(requests[23].url.path(), "/fhv/fhv_tripdata_2021-12.csv.gz");
}

// ============================================================================
// ingest
// ============================================================================

#[tokio::test]
async fn test_ingest_remote_csv_into_duckdb() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/misc/taxi_zone_lookup.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "LocationID,Borough,Zone,service_zone\n\
             1,EWR,Newark Airport,EWR\n\
             2,Queens,Jamaica Bay,Boro Zone\n\
             3,Bronx,Allerton/Pelham Gardens,Boro Zone\n",
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("ny_taxi.duckdb");
    let url = format!("{}/misc/taxi_zone_lookup.csv", server.uri());
    let db_arg = db.to_string_lossy().into_owned();

    runner(&[
        "ingest",
        "--url",
        url.as_str(),
        "--target-table",
        "zones",
        "--duckdb",
        db_arg.as_str(),
    ])
    .run()
    .await
    .unwrap();

    assert_eq!(query_i64(&db, r#"SELECT count(*) FROM "zones""#), 3);
    assert_eq!(
        query_i64(&db, r#"SELECT "LocationID" FROM "zones" WHERE "Zone" = 'Jamaica Bay'"#),
        2
    );
}

#[tokio::test]
async fn test_ingest_local_parquet_twice_replaces() {
    let dir = TempDir::new().unwrap();
    let parquet = dir.path().join("yellow_tripdata_2021-01.parquet");
    write_trips_parquet(&parquet);
    let db = dir.path().join("ny_taxi.duckdb");
    let source = parquet.to_string_lossy().into_owned();
    let db_arg = db.to_string_lossy().into_owned();
    let args = [
        "ingest",
        "--url",
        source.as_str(),
        "--target-table",
        "yellow_taxi_data",
        "--chunk-size",
        "3",
        "--duckdb",
        db_arg.as_str(),
    ];

    runner(&args).run().await.unwrap();
    runner(&args).run().await.unwrap();

    assert_eq!(
        query_i64(&db, r#"SELECT count(*) FROM "yellow_taxi_data""#),
        4
    );
    assert_eq!(
        query_i64(
            &db,
            r#"SELECT count(*) FROM "yellow_taxi_data" WHERE "VendorID" IS NULL"#
        ),
        1
    );
}

#[tokio::test]
async fn test_ingest_unsupported_extension_fails_before_connecting() {
    // Nothing listens on port 9, so reaching the database would fail differently
    let result = runner(&[
        "ingest",
        "--url",
        "trips.json",
        "--target-table",
        "t",
        "--pg-port",
        "9",
    ])
    .run()
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
    assert_eq!(
        err.to_string(),
        "Unsupported file format '.json'. Please use .csv or .parquet"
    );
}

// ============================================================================
// PostgreSQL (only with POSTGRES_TEST_URL)
// ============================================================================

/// Get test connection string from environment or skip
fn get_test_connection() -> Option<url::Url> {
    std::env::var("POSTGRES_TEST_URL")
        .ok()
        .and_then(|s| url::Url::parse(&s).ok())
}

#[tokio::test]
async fn test_ingest_into_postgres() {
    let Some(conn) = get_test_connection() else {
        println!("Skipping: POSTGRES_TEST_URL not set");
        return;
    };

    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("people.csv");
    std::fs::write(&csv, "id,name\n1,Alice\n2,Bob\n3,Carol\n").unwrap();
    let source = csv.to_string_lossy().into_owned();
    let port = conn.port().unwrap_or(5432).to_string();

    runner(&[
        "ingest",
        "--pg-user",
        conn.username(),
        "--pg-pass",
        conn.password().unwrap_or_default(),
        "--pg-host",
        conn.host_str().unwrap_or("localhost"),
        "--pg-port",
        port.as_str(),
        "--pg-db",
        conn.path().trim_start_matches('/'),
        "--url",
        source.as_str(),
        "--target-table",
        "taxi_ingest_it_people",
    ])
    .run()
    .await
    .unwrap();

    let (client, connection) = tokio_postgres::connect(conn.as_str(), tokio_postgres::NoTls)
        .await
        .unwrap();
    tokio::spawn(connection);
    let row = client
        .query_one(r#"SELECT count(*) FROM "taxi_ingest_it_people""#, &[])
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), 3);
    client
        .execute(r#"DROP TABLE "taxi_ingest_it_people""#, &[])
        .await
        .unwrap();
}
