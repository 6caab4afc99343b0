//! In-memory stand-in for the spreadsheet record service.
//!
//! Speaks the same three routes as the real backend (`POST /upload`,
//! `GET /data`, `DELETE /delete`) so the client and view crates can be
//! exercised end to end without it.

mod error;
pub mod http;
mod ingest;
mod server;
mod store;

pub use error::RecordError;
pub use http::{DEFAULT_PREFIX, RecordHttp};
pub use ingest::{csv_rows, file_part};
pub use server::{RecordServer, start_background};
pub use store::{PageBody, RecordStore, StoredRecord};
