use std::time::Duration;

use tracing::{debug, warn};
use ureq::Agent;

use crate::error::ClientError;
use crate::multipart::{UploadFile, encode_file_part};
use crate::page::RecordPage;
use crate::row::RecordId;
use crate::service::RecordService;

pub const DEFAULT_BASE_URL: &str = "https://localhost:8080/api/excel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` means requests may hang; nothing is retried either way.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// HTTP client for the record service.
#[derive(Clone)]
pub struct RecordClient {
    agent: Agent,
    base_url: String,
}

impl RecordClient {
    pub fn new(config: ClientConfig) -> Self {
        // Non-2xx statuses come back as responses so the body text can be
        // surfaced to the user.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .into();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{route}", self.base_url)
    }
}

fn read_body(mut response: ureq::http::Response<ureq::Body>) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.body_mut().read_to_string()?;
    if status.is_success() {
        Ok(body)
    } else {
        debug!(status = status.as_u16(), "record service returned an error");
        Err(ClientError::Transport(body))
    }
}

impl RecordService for RecordClient {
    fn upload(&self, file: &UploadFile) -> Result<(), ClientError> {
        let multipart = encode_file_part(file);
        debug!(file = %file.name, bytes = file.bytes.len(), "uploading");
        let response = self
            .agent
            .post(&self.url("upload"))
            .header("Content-Type", &multipart.content_type)
            .send(&multipart.body[..])?;
        read_body(response).map(|_| ())
    }

    fn fetch_page(&self, offset: usize, size: usize) -> Result<RecordPage, ClientError> {
        debug!(offset, size, "fetching page");
        let response = self
            .agent
            .get(&self.url("data"))
            .query("page", offset.to_string())
            .query("size", size.to_string())
            .call()?;
        let body = read_body(response)?;
        let page = RecordPage::from_json(&body)?;
        for rejected in &page.rejected {
            warn!(error = %rejected, "rejected row");
        }
        Ok(page)
    }

    fn delete_record(&self, id: &RecordId) -> Result<(), ClientError> {
        debug!(record = %id, "deleting");
        let response = self
            .agent
            .delete(&self.url("delete"))
            .query("id", id.as_str())
            .call()?;
        read_body(response).map(|_| ())
    }
}
