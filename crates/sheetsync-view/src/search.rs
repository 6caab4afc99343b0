use serde::Serialize;
use sheetsync_client::Row;

use crate::window::PageWindow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchState {
    term: String,
    active: bool,
}

impl SearchState {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whitespace-only terms leave search inactive.
    pub fn set(&mut self, term: &str) {
        self.term = term.to_string();
        self.active = !term.trim().is_empty();
    }

    pub fn clear(&mut self) {
        self.term.clear();
        self.active = false;
    }
}

/// Rows to display after applying a search term to the loaded window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered<'a> {
    pub rows: Vec<&'a Row>,
    pub active: bool,
}

impl Filtered<'_> {
    /// An active search that matched nothing. Non-fatal.
    pub fn is_empty_result(&self) -> bool {
        self.active && self.rows.is_empty()
    }
}

/// Case-insensitive substring match on one identifier column, limited to the
/// rows already loaded. Never reaches the record service.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    column: String,
}

impl SearchFilter {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn apply<'a>(&self, term: &str, window: &'a PageWindow) -> Filtered<'a> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Filtered {
                rows: window.rows().iter().collect(),
                active: false,
            };
        }

        Filtered {
            rows: window
                .rows()
                .iter()
                .filter(|row| self.matches(&needle, row))
                .collect(),
            active: true,
        }
    }

    fn matches(&self, needle: &str, row: &Row) -> bool {
        row.get(&self.column)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    }
}
