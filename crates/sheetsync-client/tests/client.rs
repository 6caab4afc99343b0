use std::io::Write;

use serde_json::{Map, Value, json};
use sheetsync_client::*;
use sheetsync_fake::{RecordStore, start_background};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn start_server(store: &RecordStore) -> RecordClient {
    let base_url = start_background(store.clone()).unwrap();
    RecordClient::new(ClientConfig {
        base_url,
        timeout: Some(std::time::Duration::from_secs(5)),
    })
}

fn seed_data(store: &RecordStore, count: usize) {
    for i in 0..count {
        store.insert(object(json!({
            "ID": format!("ACCT-{i:02}"),
            "Name": format!("Company {i}"),
            "Revenue": (i as f64 + 1.0) * 1000.0,
        })));
    }
}

// ── fetch_page ──────────────────────────────────────────────────

#[test]
fn fetch_page_decodes_rows() {
    let store = RecordStore::new();
    seed_data(&store, 25);
    let client = start_server(&store);

    let page = client.fetch_page(0, 10).unwrap();
    assert_eq!(page.total_count, 25);
    assert_eq!(page.rows.len(), 10);
    assert!(page.rejected.is_empty());

    let first = &page.rows[0];
    assert_eq!(first.record_id().as_str(), "1");
    assert_eq!(first.columns().collect::<Vec<_>>(), vec!["ID", "Name", "Revenue"]);
    assert_eq!(first.get("Revenue"), Some("1000"));

    let last = client.fetch_page(2, 10).unwrap();
    assert_eq!(last.rows.len(), 5);
}

#[test]
fn fetch_page_is_idempotent() {
    let store = RecordStore::new();
    seed_data(&store, 12);
    let client = start_server(&store);

    let a = client.fetch_page(1, 10).unwrap();
    let b = client.fetch_page(1, 10).unwrap();
    assert_eq!(a, b);
}

#[test]
fn fetch_page_rejects_only_the_bad_row() {
    let store = RecordStore::new();
    seed_data(&store, 1);
    store.insert_raw("{broken");
    seed_data(&store, 1);
    let client = start_server(&store);

    let page = client.fetch_page(0, 10).unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rejected.len(), 1);
    assert_eq!(page.rejected[0].record_id(), Some(&RecordId::from(2)));
}

#[test]
fn fetch_page_surfaces_server_text() {
    let store = RecordStore::new();
    let client = start_server(&store);

    let err = client.fetch_page(0, 0).unwrap_err();
    assert_eq!(
        err,
        ClientError::Transport("page size must not be less than one".into())
    );
}

// ── delete_record ───────────────────────────────────────────────

#[test]
fn delete_record_removes_remotely() {
    let store = RecordStore::new();
    seed_data(&store, 3);
    let client = start_server(&store);

    client.delete_record(&RecordId::from(2)).unwrap();
    assert_eq!(store.ids(), vec![1, 3]);

    let err = client.delete_record(&RecordId::from(2)).unwrap_err();
    assert_eq!(err, ClientError::Transport("record not found: 2".into()));
}

// ── upload ──────────────────────────────────────────────────────

#[test]
fn upload_sends_multipart_file() {
    let store = RecordStore::new();
    let client = start_server(&store);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "ID,Name\nA,Ann\nB,Bob\n").unwrap();
    let upload = UploadFile::from_path(file.path()).unwrap();

    client.upload(&upload).unwrap();
    assert_eq!(store.len(), 2);

    let page = client.fetch_page(0, 10).unwrap();
    assert_eq!(page.rows[1].get("Name"), Some("Bob"));
}

#[test]
fn upload_failure_carries_server_text() {
    let store = RecordStore::new();
    let client = start_server(&store);

    let err = client.upload(&UploadFile::new("empty.csv", "")).unwrap_err();
    assert_eq!(err, ClientError::Transport("file is empty".into()));
}

#[test]
fn unreachable_service_is_a_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RecordClient::new(ClientConfig {
        base_url: format!("http://{addr}/api/excel"),
        timeout: Some(std::time::Duration::from_secs(2)),
    });
    let err = client.fetch_page(0, 10).unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
}
