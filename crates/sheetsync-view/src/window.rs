use sheetsync_client::{RecordId, Row};

/// The loaded page of rows plus the service's total at the last fetch.
///
/// `offset` is a page index. `total_count` is only authoritative right after
/// a fetch; local deletes adjust it ahead of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    offset: usize,
    size: usize,
    rows: Vec<Row>,
    total_count: u64,
}

impl PageWindow {
    pub fn new(size: usize) -> Self {
        Self {
            offset: 0,
            size: size.max(1),
            rows: Vec::new(),
            total_count: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count, self.size)
    }

    /// Largest valid offset; 0 when there is nothing to page through.
    pub fn last_page(&self) -> usize {
        self.total_pages().saturating_sub(1)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.rows.iter().any(|r| r.record_id() == id)
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub(crate) fn replace(&mut self, rows: Vec<Row>, total_count: u64) {
        self.rows = rows;
        self.total_count = total_count;
    }

    pub(crate) fn remove(&mut self, id: &RecordId) -> Option<Row> {
        let position = self.rows.iter().position(|r| r.record_id() == id)?;
        Some(self.rows.remove(position))
    }

    pub(crate) fn decrement_total(&mut self) {
        self.total_count = self.total_count.saturating_sub(1);
    }

    pub(crate) fn clear(&mut self) {
        self.offset = 0;
        self.rows.clear();
        self.total_count = 0;
    }
}

/// `ceil(total / size)`; zero pages means no pagination controls.
pub fn total_pages(total: u64, size: usize) -> usize {
    total.div_ceil(size.max(1) as u64) as usize
}
