use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, DecodeError};
use crate::row::{RecordId, Row};

/// Page envelope as the record service sends it. Records stay raw until
/// [`decode_page`] so one bad record cannot fail the whole page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    #[serde(default)]
    pub content: Vec<Value>,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEnvelope {
    pub id: RecordId,
    #[serde(default)]
    pub row_data: Option<Value>,
}

impl RecordEnvelope {
    /// Splits one raw `content` entry into id and payload. Fails when the
    /// entry has no usable id; a missing payload is left to [`decode_row`].
    pub fn from_value(position: usize, value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut object) = value else {
            return Err(DecodeError::InvalidId { position });
        };
        let id = object
            .remove("id")
            .and_then(|id| serde_json::from_value::<RecordId>(id).ok())
            .ok_or(DecodeError::InvalidId { position })?;
        Ok(Self {
            id,
            row_data: object.remove("rowData"),
        })
    }
}

/// A decoded page: the rows that survived decoding, the service's total
/// count, and the records that had to be rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    pub rows: Vec<Row>,
    pub total_count: u64,
    pub rejected: Vec<DecodeError>,
}

impl RecordPage {
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        let envelope: PageEnvelope = serde_json::from_str(body)?;
        Ok(decode_page(envelope))
    }
}

pub fn decode_page(envelope: PageEnvelope) -> RecordPage {
    let mut seen = HashSet::with_capacity(envelope.content.len());
    let mut rows = Vec::with_capacity(envelope.content.len());
    let mut rejected = Vec::new();

    for (position, value) in envelope.content.into_iter().enumerate() {
        let record = match RecordEnvelope::from_value(position, value) {
            Ok(record) => record,
            Err(e) => {
                rejected.push(e);
                continue;
            }
        };
        if !seen.insert(record.id.clone()) {
            rejected.push(DecodeError::DuplicateId {
                record_id: record.id,
            });
            continue;
        }
        match decode_row(record) {
            Ok(row) => rows.push(row),
            Err(e) => rejected.push(e),
        }
    }

    RecordPage {
        rows,
        total_count: envelope.total_elements.unwrap_or(0),
        rejected,
    }
}

/// Decodes the `rowData` payload of one record and merges it with the id.
pub fn decode_row(record: RecordEnvelope) -> Result<Row, DecodeError> {
    let RecordEnvelope { id, row_data } = record;
    let Some(row_data) = row_data else {
        return Err(DecodeError::Malformed {
            record_id: id,
            message: "missing rowData".to_string(),
        });
    };
    let decoded = match row_data {
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(value) => value,
            Err(e) => {
                return Err(DecodeError::Malformed {
                    record_id: id,
                    message: e.to_string(),
                });
            }
        },
        other => other,
    };

    match decoded {
        Value::Object(object) => Ok(Row::from_object(id, object)),
        _ => Err(DecodeError::NotAnObject { record_id: id }),
    }
}
