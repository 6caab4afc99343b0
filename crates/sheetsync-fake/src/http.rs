use http::{Method, Request, Response, StatusCode};
use url::form_urlencoded;

use crate::error::RecordError;
use crate::ingest::{csv_rows, file_part};
use crate::store::RecordStore;

pub const DEFAULT_PREFIX: &str = "/api/excel";

pub struct RecordHttp {
    prefix: String,
    store: RecordStore,
}

impl RecordHttp {
    pub fn new(store: RecordStore) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: RecordStore, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn handle(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let Some(route) = req.uri().path().strip_prefix(self.prefix.as_str()) else {
            return text_response(StatusCode::NOT_FOUND, "not found");
        };

        match (req.method(), route.trim_end_matches('/')) {
            (&Method::POST, "/upload") => self.upload(&req),
            (&Method::GET, "/data") => self.data(&req),
            (&Method::DELETE, "/delete") => self.delete(&req),
            _ => text_response(StatusCode::NOT_FOUND, "not found"),
        }
    }

    fn upload(&self, req: &Request<Vec<u8>>) -> Response<Vec<u8>> {
        let content_type = req
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let rows = match file_part(content_type, req.body()).and_then(csv_rows) {
            Ok(rows) => rows,
            Err(e) => return error_response(&e),
        };
        let inserted = self.store.insert_many(rows).len();
        eprintln!("upload stored {inserted} records");
        text_response(StatusCode::OK, "File uploaded and saved successfully.")
    }

    fn data(&self, req: &Request<Vec<u8>>) -> Response<Vec<u8>> {
        let page = match query_usize(req, "page", 0).and_then(|page| {
            let size = query_usize(req, "size", 10)?;
            self.store.page(page, size)
        }) {
            Ok(page) => page,
            Err(e) => return error_response(&e),
        };

        match serde_json::to_vec(&page) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => text_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        }
    }

    fn delete(&self, req: &Request<Vec<u8>>) -> Response<Vec<u8>> {
        let Some(id) = query_param(req, "id") else {
            return text_response(StatusCode::BAD_REQUEST, "missing parameter 'id'");
        };
        match self.store.delete(&id) {
            Ok(()) => text_response(StatusCode::OK, "Record deleted successfully."),
            Err(e) => error_response(&e),
        }
    }
}

fn query_param<T>(req: &Request<T>, key: &str) -> Option<String> {
    let query = req.uri().query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn query_usize<T>(req: &Request<T>, key: &str, default: usize) -> Result<usize, RecordError> {
    match query_param(req, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| RecordError::BadRequest(format!("invalid parameter '{key}': {raw}"))),
    }
}

pub(crate) fn text_response(status: StatusCode, body: &str) -> Response<Vec<u8>> {
    let mut response = Response::new(body.as_bytes().to_vec());
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Vec<u8>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

fn error_response(e: &RecordError) -> Response<Vec<u8>> {
    text_response(e.status_code(), &e.to_string())
}
