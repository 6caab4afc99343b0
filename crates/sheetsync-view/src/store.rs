use sheetsync_client::{ClientError, DecodeError, RecordId, RecordPage, RecordService, Row};
use tracing::debug;

use crate::config::ResponseOrdering;
use crate::error::ViewError;
use crate::window::PageWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    /// Offset changed through prev/next.
    Navigate,
    /// Current offset reloaded on request (empty search).
    Refresh,
    /// Re-read after a delete.
    Reconcile,
    /// First page after a successful upload.
    Upload,
    /// Explicit "view data": page 0 with search cleared.
    ViewData,
}

/// A page fetch that has been issued but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub offset: usize,
    pub size: usize,
    pub reason: FetchReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageApplied {
    Replaced { rejected: Vec<DecodeError> },
    /// Superseded by a newer response or a navigation; the window is unchanged.
    Stale,
}

/// Owns the page window. Offset is set by navigation; loads never move it.
pub struct PagedDataStore {
    window: PageWindow,
    ordering: ResponseOrdering,
    next_seq: u64,
    // Responses with a sequence number below this are stale.
    discard_below: u64,
}

impl PagedDataStore {
    pub fn new(page_size: usize, ordering: ResponseOrdering) -> Self {
        Self {
            window: PageWindow::new(page_size),
            ordering,
            next_seq: 0,
            discard_below: 0,
        }
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn offset(&self) -> usize {
        self.window.offset()
    }

    pub fn page_size(&self) -> usize {
        self.window.size()
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Moves the window to `offset` as given. Callers clamp.
    pub fn set_offset(&mut self, offset: usize) {
        self.window.set_offset(offset);
    }

    pub fn request_page(&mut self, offset: usize, reason: FetchReason) -> PageRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!(seq, offset, ?reason, "page requested");
        PageRequest {
            seq,
            offset,
            size: self.window.size(),
            reason,
        }
    }

    fn is_stale(&self, request: &PageRequest) -> bool {
        match self.ordering {
            ResponseOrdering::LastWriteWins => false,
            ResponseOrdering::Sequenced => {
                request.seq < self.discard_below || request.offset != self.window.offset()
            }
        }
    }

    /// Replaces rows and total wholesale, or leaves the window untouched when
    /// the fetch failed or was superseded.
    pub fn apply_page(
        &mut self,
        request: PageRequest,
        result: Result<RecordPage, ClientError>,
    ) -> Result<PageApplied, ViewError> {
        if self.is_stale(&request) {
            debug!(seq = request.seq, offset = request.offset, "stale page discarded");
            return Ok(PageApplied::Stale);
        }

        let page = result?;
        if self.ordering == ResponseOrdering::Sequenced {
            self.discard_below = request.seq + 1;
        }
        debug!(
            seq = request.seq,
            offset = request.offset,
            rows = page.rows.len(),
            total = page.total_count,
            "page applied"
        );
        self.window.replace(page.rows, page.total_count);
        Ok(PageApplied::Replaced {
            rejected: page.rejected,
        })
    }

    pub fn load_page<S: RecordService + ?Sized>(
        &mut self,
        service: &S,
        offset: usize,
        reason: FetchReason,
    ) -> Result<PageApplied, ViewError> {
        let request = self.request_page(offset, reason);
        let result = service.fetch_page(request.offset, request.size);
        self.apply_page(request, result)
    }

    pub(crate) fn remove_row(&mut self, id: &RecordId) -> Option<Row> {
        self.window.remove(id)
    }

    pub(crate) fn decrement_total(&mut self) {
        self.window.decrement_total();
    }

    /// Pulls the offset back inside `0..total_pages` once a load shows the
    /// set has shrunk. Returns the fetch for the new offset, if there is
    /// anything left to show.
    pub fn clamp_offset(&mut self, reason: FetchReason) -> Option<PageRequest> {
        let last_page = self.window.last_page();
        let offset = self.window.offset();
        if offset <= last_page {
            return None;
        }

        debug!(from = offset, to = last_page, "offset past the last page");
        self.window.set_offset(last_page);
        if self.window.total_count() == 0 {
            return None;
        }
        Some(self.request_page(last_page, reason))
    }

    /// Every fetch issued so far is stale from now on.
    pub(crate) fn supersede_outstanding(&mut self) {
        self.discard_below = self.next_seq;
    }

    /// Drops the window and marks every outstanding fetch stale.
    pub(crate) fn reset(&mut self) {
        self.window.clear();
        self.supersede_outstanding();
    }
}
