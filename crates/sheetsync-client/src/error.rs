use std::fmt;

use crate::row::RecordId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The service answered with a non-success status. Carries the response
    /// body text verbatim.
    Transport(String),
    /// The request never produced a response (refused, DNS, TLS, timeout).
    Connection(String),
    /// The response body could not be read as a page envelope.
    Serialization(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "{msg}"),
            ClientError::Connection(msg) => write!(f, "connection error: {msg}"),
            ClientError::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ureq::Error> for ClientError {
    fn from(e: ureq::Error) -> Self {
        ClientError::Connection(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

/// A single record whose payload could not be turned into a [`Row`].
///
/// Rejections are per record: the rest of the page is still usable.
///
/// [`Row`]: crate::Row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Malformed { record_id: RecordId, message: String },
    NotAnObject { record_id: RecordId },
    DuplicateId { record_id: RecordId },
    /// The `content` entry at `position` has no string or number id.
    InvalidId { position: usize },
}

impl DecodeError {
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            DecodeError::Malformed { record_id, .. }
            | DecodeError::NotAnObject { record_id }
            | DecodeError::DuplicateId { record_id } => Some(record_id),
            DecodeError::InvalidId { .. } => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed { record_id, message } => {
                write!(f, "record {record_id}: malformed row data: {message}")
            }
            DecodeError::NotAnObject { record_id } => {
                write!(f, "record {record_id}: row data is not a key-value mapping")
            }
            DecodeError::DuplicateId { record_id } => {
                write!(f, "record {record_id}: duplicate record id in page")
            }
            DecodeError::InvalidId { position } => {
                write!(f, "record at position {position}: missing or invalid id")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
