use ::http::{Method, Request, StatusCode};
use serde_json::json;
use sheetsync_fake::*;

fn seeded(count: usize) -> RecordHttp {
    let store = RecordStore::new();
    for i in 0..count {
        let row = json!({ "ID": format!("ID-{i:02}"), "Name": format!("Company {i}") });
        if let serde_json::Value::Object(map) = row {
            store.insert(map);
        }
    }
    RecordHttp::new(store)
}

fn get(uri: &str) -> Request<Vec<u8>> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Vec::new())
        .unwrap()
}

fn upload_request(csv: &str) -> Request<Vec<u8>> {
    let body = format!(
        "--b0\r\nContent-Disposition: form-data; name=\"file\"; filename=\"t.csv\"\r\n\r\n{csv}\r\n--b0--\r\n"
    );
    Request::builder()
        .method(Method::POST)
        .uri("/api/excel/upload")
        .header("content-type", "multipart/form-data; boundary=b0")
        .body(body.into_bytes())
        .unwrap()
}

// ── GET /data ───────────────────────────────────────────────────

#[test]
fn data_returns_spring_page() {
    let handler = seeded(25);

    let resp = handler.handle(get("/api/excel/data?page=1&size=10"));
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["totalElements"], 25);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["number"], 1);
    let content = body["content"].as_array().unwrap();
    assert_eq!(content.len(), 10);
    assert_eq!(content[0]["id"], 11);

    let row_data: serde_json::Value =
        serde_json::from_str(content[0]["rowData"].as_str().unwrap()).unwrap();
    assert_eq!(row_data["ID"], "ID-10");
}

#[test]
fn data_rejects_bad_parameters() {
    let handler = seeded(1);

    let resp = handler.handle(get("/api/excel/data?page=abc&size=10"));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.body(), b"invalid parameter 'page': abc");

    let resp = handler.handle(get("/api/excel/data?page=0&size=0"));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn unknown_route_is_not_found() {
    let handler = seeded(1);
    assert_eq!(handler.handle(get("/api/excel/nope")).status(), StatusCode::NOT_FOUND);
    assert_eq!(handler.handle(get("/data")).status(), StatusCode::NOT_FOUND);
}

// ── POST /upload ────────────────────────────────────────────────

#[test]
fn upload_appends_rows() {
    let handler = seeded(0);

    let resp = handler.handle(upload_request("ID,Qty\nA,1\nB,2\nC,3"));
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(handler.store().len(), 3);

    let resp = handler.handle(get("/api/excel/data?page=0&size=2"));
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["totalElements"], 3);
    assert_eq!(body["content"].as_array().unwrap().len(), 2);
}

#[test]
fn upload_without_file_is_bad_request() {
    let handler = seeded(0);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/excel/upload")
        .header("content-type", "text/plain")
        .body(b"ID\nA".to_vec())
        .unwrap();
    let resp = handler.handle(req);
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = handler.handle(upload_request(""));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.body(), b"file is empty");
    assert!(handler.store().is_empty());
}

// ── DELETE /delete ──────────────────────────────────────────────

#[test]
fn delete_removes_record() {
    let handler = seeded(3);

    let req = Request::builder()
        .method(Method::DELETE)
        .uri("/api/excel/delete?id=2")
        .body(Vec::new())
        .unwrap();
    let resp = handler.handle(req);
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(handler.store().ids(), vec![1, 3]);
}

#[test]
fn delete_unknown_record_is_not_found() {
    let handler = seeded(1);

    let req = Request::builder()
        .method(Method::DELETE)
        .uri("/api/excel/delete?id=42")
        .body(Vec::new())
        .unwrap();
    let resp = handler.handle(req);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.body(), b"record not found: 42");
}

#[test]
fn query_values_are_url_decoded() {
    let handler = seeded(12);

    let req = Request::builder()
        .method(Method::DELETE)
        .uri("/api/excel/delete?other=a+b&id=%31%31")
        .body(Vec::new())
        .unwrap();
    assert_eq!(handler.handle(req).status(), StatusCode::OK);
    assert!(!handler.store().ids().contains(&11));

    let resp = handler.handle(get("/api/excel/data?size=%35&page=1"));
    assert_eq!(resp.status(), StatusCode::OK);
    let page: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(page["size"], 5);
    assert_eq!(page["content"].as_array().unwrap().len(), 5);
}
