mod client;
mod error;
mod multipart;
mod page;
mod row;
mod service;

pub use client::{ClientConfig, DEFAULT_BASE_URL, RecordClient};
pub use error::{ClientError, DecodeError};
pub use multipart::{MultipartBody, UploadFile, encode_file_part};
pub use page::{PageEnvelope, RecordEnvelope, RecordPage, decode_page, decode_row};
pub use row::{RecordId, Row, coerce_cell};
pub use service::RecordService;
