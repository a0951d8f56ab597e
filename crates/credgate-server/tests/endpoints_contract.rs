// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use credgate_model::Record;
use credgate_server::{AppState, FakeRecordSource, ServerConfig, UpstreamError};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn record(fields: &[(&str, &str)]) -> Record {
    let mut record = Record::default();
    for (column, value) in fields {
        let slot = match *column {
            "NAME" => &mut record.name,
            "CITY" => &mut record.city,
            "CREDENTIAL" => &mut record.credential,
            "COUNTY" => &mut record.county,
            "ISSUE DATE" => &mut record.issue_date,
            "EXP DATE" => &mut record.exp_date,
            "STATUS" => &mut record.status,
            other => panic!("unexpected fixture column {other}"),
        };
        *slot = Some((*value).to_string());
    }
    record
}

fn fixture_records() -> Vec<Record> {
    vec![
        record(&[
            ("NAME", "Delta"),
            ("CITY", "Dover"),
            ("CREDENTIAL", "CPA"),
            ("COUNTY", "Kent"),
            ("ISSUE DATE", "2023-04-10"),
            ("STATUS", "Active"),
        ]),
        record(&[
            ("NAME", "alpha"),
            ("CITY", "Lewes"),
            ("CREDENTIAL", "CPA"),
            ("ISSUE DATE", "2023-04-22"),
            ("EXP DATE", "2023-06-30"),
            ("STATUS", "Lapsed"),
        ]),
        record(&[
            ("NAME", "Bravo"),
            ("CREDENTIAL", "EA"),
            ("ISSUE DATE", "2023-05-01"),
            ("EXP DATE", "2024-01-15"),
            ("STATUS", "Lapsed-Ethics"),
        ]),
        record(&[("NAME", "Charlie"), ("CITY", "Dover")]),
    ]
}

async fn spawn_app(source: Arc<FakeRecordSource>) -> (std::net::SocketAddr, TempDir) {
    let static_root = tempfile::tempdir().expect("tempdir");
    std::fs::write(static_root.path().join("index.html"), "<html>spa</html>").expect("seed index");
    let server = ServerConfig {
        static_root: static_root.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let app = credgate_server::build_router(AppState::new(source, server));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    (addr, static_root)
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

fn assert_cors_headers(head: &str) {
    let head = head.to_lowercase();
    assert!(head.contains("access-control-allow-origin: *"), "{head}");
    assert!(
        head.contains("access-control-allow-methods: get, post, options"),
        "{head}"
    );
    assert!(
        head.contains("access-control-allow-headers: content-type, x-token"),
        "{head}"
    );
}

#[tokio::test]
async fn certifications_returns_the_raw_snapshot() {
    let source = Arc::new(FakeRecordSource::serving(fixture_records()));
    let (addr, _static_root) = spawn_app(source).await;

    let (status, head, body) = send_raw(addr, "GET", "/api/certifications").await;
    assert_eq!(status, 200);
    assert!(head.to_lowercase().contains("content-type: application/json"));
    assert_cors_headers(&head);

    let records: serde_json::Value = serde_json::from_str(&body).expect("records json");
    let list = records.as_array().expect("array body");
    assert_eq!(list.len(), 4);
    assert_eq!(list[0]["NAME"], "Delta");
    assert_eq!(list[3]["CREDENTIAL"], serde_json::Value::Null);
}

#[tokio::test]
async fn summary_counts_groupings_with_unknown_fallback() {
    let source = Arc::new(FakeRecordSource::serving(fixture_records()));
    let (addr, _static_root) = spawn_app(source).await;

    let (status, _, body) = send_raw(addr, "GET", "/api/summary").await;
    assert_eq!(status, 200);
    let summary: serde_json::Value = serde_json::from_str(&body).expect("summary json");
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["byCredential"]["CPA"], 2);
    assert_eq!(summary["byCredential"]["Unknown"], 1);
    assert_eq!(summary["byCounty"]["Kent"], 1);
    assert_eq!(summary["byCounty"]["Unknown"], 3);
    assert_eq!(summary["byCity"]["Dover"], 2);
}

#[tokio::test]
async fn monthly_trends_buckets_are_sorted_and_counted() {
    let source = Arc::new(FakeRecordSource::serving(fixture_records()));
    let (addr, _static_root) = spawn_app(source).await;

    let (status, _, body) = send_raw(addr, "GET", "/api/monthly-trends").await;
    assert_eq!(status, 200);
    let trends: serde_json::Value = serde_json::from_str(&body).expect("trends json");
    assert_eq!(trends["2023-04"]["newlyCertified"]["CPA"], 2);
    assert_eq!(trends["2023-05"]["newlyCertified"]["EA"], 1);
    assert_eq!(trends["2023-06"]["lapsed"], 1);
    assert_eq!(trends["2024-01"]["lapsed"], 1);
    // Lapsed-Ethics: the violation lands in the issue month.
    assert_eq!(trends["2023-05"]["ethicsViolations"], 1);

    // Raw body order mirrors the map's ascending keys.
    let april = body.find("2023-04").expect("2023-04 bucket");
    let june = body.find("2023-06").expect("2023-06 bucket");
    assert!(april < june);
}

#[tokio::test]
async fn table_data_sorts_pages_and_echoes_draw() {
    let source = Arc::new(FakeRecordSource::serving(fixture_records()));
    let (addr, _static_root) = spawn_app(source).await;

    let path = "/api/table-data?draw=9&start=0&length=2&order%5B0%5D%5Bcolumn%5D=2&order%5B0%5D%5Bdir%5D=asc";
    let (status, _, body) = send_raw(addr, "GET", path).await;
    assert_eq!(status, 200);
    let envelope: serde_json::Value = serde_json::from_str(&body).expect("envelope json");
    assert_eq!(envelope["draw"], "9");
    assert_eq!(envelope["recordsTotal"], 4);
    assert_eq!(envelope["recordsFiltered"], 4);
    assert_eq!(envelope["data"][0]["NAME"], "alpha");
    assert_eq!(envelope["data"][1]["NAME"], "Bravo");
}

#[tokio::test]
async fn table_data_filters_across_all_columns() {
    let source = Arc::new(FakeRecordSource::serving(fixture_records()));
    let (addr, _static_root) = spawn_app(source).await;

    let (status, _, body) =
        send_raw(addr, "GET", "/api/table-data?search%5Bvalue%5D=dover").await;
    assert_eq!(status, 200);
    let envelope: serde_json::Value = serde_json::from_str(&body).expect("envelope json");
    assert_eq!(envelope["recordsTotal"], 4);
    assert_eq!(envelope["recordsFiltered"], 2);
    assert_eq!(envelope["draw"], serde_json::Value::Null);
}

#[tokio::test]
async fn table_data_rejects_malformed_params() {
    let source = Arc::new(FakeRecordSource::serving(fixture_records()));
    let (addr, _static_root) = spawn_app(source.clone()).await;

    let (status, _, body) = send_raw(addr, "GET", "/api/table-data?start=abc").await;
    assert_eq!(status, 400);
    let error: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(error["error"], "invalid query parameter: start");
    // Param rejection happens before any upstream fetch.
    assert_eq!(source.fetch_count(), 0);
}

#[tokio::test]
async fn unknown_api_path_returns_the_exact_not_found_body() {
    let source = Arc::new(FakeRecordSource::serving(Vec::new()));
    let (addr, _static_root) = spawn_app(source).await;

    let (status, head, body) = send_raw(addr, "GET", "/api/xyz").await;
    assert_eq!(status, 404);
    assert_cors_headers(&head);
    assert_eq!(body, r#"{"error":"API endpoint not found"}"#);
}

#[tokio::test]
async fn wrong_method_on_a_known_api_path_is_not_found() {
    let source = Arc::new(FakeRecordSource::serving(Vec::new()));
    let (addr, _static_root) = spawn_app(source.clone()).await;

    let (status, _, body) = send_raw(addr, "POST", "/api/summary").await;
    assert_eq!(status, 404);
    assert_eq!(body, r#"{"error":"API endpoint not found"}"#);
    assert_eq!(source.fetch_count(), 0);
}

#[tokio::test]
async fn options_preflight_answers_without_an_upstream_call() {
    let source = Arc::new(FakeRecordSource::serving(fixture_records()));
    let (addr, _static_root) = spawn_app(source.clone()).await;

    let (status, head, body) = send_raw(addr, "OPTIONS", "/api/certifications").await;
    assert_eq!(status, 204);
    assert_cors_headers(&head);
    assert!(body.is_empty());
    assert_eq!(source.fetch_count(), 0);
}

#[tokio::test]
async fn upstream_failure_surfaces_as_a_500_envelope() {
    let source = Arc::new(FakeRecordSource::failing(UpstreamError::status(
        502,
        "bad gateway".to_string(),
    )));
    let (addr, _static_root) = spawn_app(source).await;

    let (status, head, body) = send_raw(addr, "GET", "/api/summary").await;
    assert_eq!(status, 500);
    assert_cors_headers(&head);
    let error: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(error["error"], "Failed to fetch certification records");
    assert!(error["details"]
        .as_str()
        .expect("details string")
        .contains("502"));
}
