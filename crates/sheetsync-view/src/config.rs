use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How page responses that finish out of order are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Responses older than the newest applied one, or for an offset the
    /// view has since left, are dropped.
    #[default]
    Sequenced,
    /// Whatever finishes last is shown, even if it was requested first.
    LastWriteWins,
}

impl FromStr for ResponseOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequenced" => Ok(ResponseOrdering::Sequenced),
            "last-write-wins" | "lww" => Ok(ResponseOrdering::LastWriteWins),
            other => Err(format!("unknown response ordering: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub page_size: usize,
    /// Column the search box matches against.
    pub identifier_column: String,
    pub ordering: ResponseOrdering,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            identifier_column: "ID".to_string(),
            ordering: ResponseOrdering::Sequenced,
        }
    }
}
