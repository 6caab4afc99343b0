use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};
use sheetsync_cli::console::run;
use sheetsync_client::{
    ClientConfig, ClientError, RecordClient, RecordId, RecordPage, RecordService, UploadFile,
};
use sheetsync_fake::{RecordStore, start_background};
use sheetsync_view::ViewConfig;
use tokio::io::BufReader;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn seed_data(store: &RecordStore, count: usize) {
    for i in 0..count {
        store.insert(object(json!({
            "ID": format!("ACCT-{i:02}"),
            "Name": format!("Company {i}"),
        })));
    }
}

async fn run_script(store: &RecordStore, script: &str) -> String {
    let base_url = start_background(store.clone()).unwrap();
    let client = Arc::new(RecordClient::new(ClientConfig {
        base_url,
        timeout: Some(Duration::from_secs(5)),
    }));
    let mut out = Vec::new();
    run(
        &ViewConfig::default(),
        client,
        BufReader::new(script.as_bytes()),
        &mut out,
    )
    .await
    .unwrap();
    String::from_utf8(out).unwrap()
}

/// The `json` command's last snapshot in the output.
fn last_snapshot(output: &str) -> Value {
    let start = output.rfind("\n{").map(|i| i + 1).unwrap_or(0);
    let end = output.rfind('}').unwrap() + 1;
    serde_json::from_str(&output[start..end]).unwrap()
}

// ── Upload ──────────────────────────────────────────────────────

#[tokio::test]
async fn upload_from_path_then_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.csv");
    let mut text = String::from("ID,Name\n");
    for i in 0..25 {
        text.push_str(&format!("ROW-{i:02},Person {i}\n"));
    }
    std::fs::write(&path, text).unwrap();

    let store = RecordStore::new();
    let script = format!("upload {}\nwait\nnext\nwait\n", path.display());
    let output = run_script(&store, &script).await;

    assert!(output.contains("Selected people.csv"));
    assert!(output.contains("File uploaded and saved successfully."));
    assert!(output.contains("Total IDs: 25"));
    assert!(output.contains("Page 1 of 3"));
    assert!(output.contains("Page 2 of 3"));
    assert!(output.contains("| ROW-10 "));
    assert_eq!(store.len(), 25);
}

#[tokio::test]
async fn upload_without_file_is_refused() {
    let store = RecordStore::new();
    let output = run_script(&store, "upload\nupload /definitely/not/here.csv\n").await;

    assert!(output.contains("Please choose a file!"));
    assert!(output.contains("Could not read /definitely/not/here.csv"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn rejected_upload_shows_server_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();

    let store = RecordStore::new();
    let output = run_script(&store, &format!("file {}\nupload\n", path.display())).await;

    assert!(output.contains("Upload failed: file is empty"));
}

// ── Navigation ──────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_navigation_settles_on_latest_page() {
    let store = RecordStore::new();
    seed_data(&store, 25);

    // Both fetches are in flight together.
    let output = run_script(&store, "view\nwait\nnext\nnext\nwait\njson\n").await;
    let snapshot = last_snapshot(&output);

    assert_eq!(snapshot["page"], 3);
    assert_eq!(snapshot["in_flight"], 0);
    assert_eq!(snapshot["rows"][0][0], "ACCT-20");
    assert_eq!(snapshot["rows"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn search_filters_loaded_page() {
    let store = RecordStore::new();
    seed_data(&store, 15);

    let output = run_script(&store, "view\nwait\nsearch acct-03\nsearch acct-12\n").await;

    assert!(output.contains("Total IDs: 1\n"));
    assert!(output.contains("| ACCT-03 "));
    assert!(output.contains("No record found for 'acct-12'."));
}

// ── Delete ──────────────────────────────────────────────────────

#[tokio::test]
async fn delete_by_position() {
    let store = RecordStore::new();
    seed_data(&store, 12);

    let output = run_script(&store, "view\nwait\ndelete 2\nwait\njson\n").await;
    let snapshot = last_snapshot(&output);

    assert!(output.contains("Record 2 deleted."));
    assert_eq!(store.len(), 11);
    assert_eq!(snapshot["total_count"], 11);
    assert_eq!(snapshot["rows"][1][0], "ACCT-02");
}

#[tokio::test]
async fn delete_outside_page_is_refused() {
    let store = RecordStore::new();
    seed_data(&store, 3);

    let output = run_script(&store, "view\nwait\ndelete 9\n").await;

    assert!(output.contains("No row 9 on this page."));
    assert_eq!(store.len(), 3);
}

// ── Failures ────────────────────────────────────────────────────

/// Fetches blow up inside the worker instead of returning an error.
struct CrashingService;

impl RecordService for CrashingService {
    fn upload(&self, _file: &UploadFile) -> Result<(), ClientError> {
        Ok(())
    }

    fn fetch_page(&self, _offset: usize, _size: usize) -> Result<RecordPage, ClientError> {
        panic!("worker crashed");
    }

    fn delete_record(&self, _id: &RecordId) -> Result<(), ClientError> {
        Ok(())
    }
}

#[tokio::test]
async fn crashed_request_is_reported_and_input_still_ends() {
    let mut out = Vec::new();
    let script = "view\nwait\njson\n";
    run(
        &ViewConfig::default(),
        Arc::new(CrashingService),
        BufReader::new(script.as_bytes()),
        &mut out,
    )
    .await
    .unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("Error fetching data: connection error: request task failed"));
    let snapshot = last_snapshot(&output);
    assert_eq!(snapshot["in_flight"], 0);
    assert_eq!(snapshot["ready"], false);
}
