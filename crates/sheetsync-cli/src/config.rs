use std::time::Duration;

use sheetsync_client::{ClientConfig, DEFAULT_BASE_URL};
use sheetsync_view::{ResponseOrdering, ViewConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub client: ClientConfig,
    pub view: ViewConfig,
}

impl CliConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset variables fall back to defaults; set but unparsable ones are
    /// errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = ViewConfig::default();

        let base_url = lookup("SHEETSYNC_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let page_size = match lookup("SHEETSYNC_PAGE_SIZE") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(format!("SHEETSYNC_PAGE_SIZE must be a positive integer: {raw}")),
            },
            None => defaults.page_size,
        };
        let identifier_column =
            lookup("SHEETSYNC_ID_COLUMN").unwrap_or(defaults.identifier_column);
        let ordering = match lookup("SHEETSYNC_ORDERING") {
            Some(raw) => raw.parse::<ResponseOrdering>()?,
            None => defaults.ordering,
        };
        let timeout = match lookup("SHEETSYNC_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => return Err(format!("SHEETSYNC_TIMEOUT_SECS must be an integer: {raw}")),
            },
            None => Some(Duration::from_secs(30)),
        };

        Ok(Self {
            client: ClientConfig { base_url, timeout },
            view: ViewConfig {
                page_size,
                identifier_column,
                ordering,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<CliConfig, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.view, ViewConfig::default());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("SHEETSYNC_URL", "http://10.0.0.5:9000/api/excel"),
            ("SHEETSYNC_PAGE_SIZE", "25"),
            ("SHEETSYNC_ID_COLUMN", "Account"),
            ("SHEETSYNC_ORDERING", "last-write-wins"),
            ("SHEETSYNC_TIMEOUT_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.client.base_url, "http://10.0.0.5:9000/api/excel");
        assert_eq!(config.client.timeout, None);
        assert_eq!(config.view.page_size, 25);
        assert_eq!(config.view.identifier_column, "Account");
        assert_eq!(config.view.ordering, ResponseOrdering::LastWriteWins);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("SHEETSYNC_PAGE_SIZE", "0")]).is_err());
        assert!(config(&[("SHEETSYNC_PAGE_SIZE", "ten")]).is_err());
        assert!(config(&[("SHEETSYNC_ORDERING", "random")]).is_err());
        assert!(config(&[("SHEETSYNC_TIMEOUT_SECS", "-1")]).is_err());
    }
}
