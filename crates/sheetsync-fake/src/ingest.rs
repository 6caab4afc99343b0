use serde_json::{Map, Number, Value};

use crate::error::RecordError;

/// Pulls the `file` part out of a `multipart/form-data` body.
pub fn file_part<'a>(content_type: &str, body: &'a [u8]) -> Result<&'a [u8], RecordError> {
    let boundary = content_type
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("boundary="))
        .map(|b| b.trim_matches('"'))
        .filter(|b| !b.is_empty())
        .ok_or_else(|| RecordError::BadRequest("expected multipart/form-data".into()))?;
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut rest = body;
    while let Some(start) = find(rest, delimiter) {
        rest = &rest[start + delimiter.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        let Some(header_end) = find(rest, b"\r\n\r\n") else {
            break;
        };
        let headers = String::from_utf8_lossy(&rest[..header_end]);
        let content = &rest[header_end + 4..];
        let Some(end) = find(content, delimiter) else {
            break;
        };
        let content = content[..end]
            .strip_suffix(b"\r\n")
            .unwrap_or(&content[..end]);

        let is_file = headers.lines().any(|line| {
            line.to_ascii_lowercase().starts_with("content-disposition")
                && line.contains("name=\"file\"")
        });
        if is_file {
            return Ok(content);
        }
        rest = &rest[header_end + 4 + end..];
    }

    Err(RecordError::BadRequest("missing multipart field 'file'".into()))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Parses CSV text with a header row into one JSON object per data row.
///
/// Numeric and boolean looking cells become JSON numbers and booleans so the
/// stored payloads carry mixed types, like a parsed workbook would. Short
/// rows are padded with empty cells; extra cells are dropped.
pub fn csv_rows(bytes: &[u8]) -> Result<Vec<Map<String, Value>>, RecordError> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if header.iter().all(|column| column.trim().is_empty()) {
        return Err(RecordError::BadRequest("file is empty".into()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(
            header
                .iter()
                .enumerate()
                .map(|(i, column)| (column.clone(), typed_cell(record.get(i).unwrap_or(""))))
                .collect(),
        );
    }
    Ok(rows)
}

fn csv_error(e: csv::Error) -> RecordError {
    RecordError::BadRequest(format!("unreadable CSV: {e}"))
}

fn typed_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    match trimmed {
        "true" | "TRUE" => Value::Bool(true),
        "false" | "FALSE" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}
