use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    NotFound(String),
    BadRequest(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::NotFound(id) => write!(f, "record not found: {id}"),
            RecordError::BadRequest(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RecordError {}

impl RecordError {
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            RecordError::NotFound(_) => http::StatusCode::NOT_FOUND,
            RecordError::BadRequest(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}
