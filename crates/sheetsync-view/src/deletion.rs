use sheetsync_client::{ClientError, RecordId, RecordService, Row};
use tracing::{debug, info};

use crate::error::ViewError;
use crate::store::{FetchReason, PageApplied, PageRequest, PagedDataStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub record_id: RecordId,
}

/// A delete the service confirmed, with the fetch that reconciles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCommitted {
    pub removed: Option<Row>,
    pub reconcile: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: Option<Row>,
    /// The optimistic removal stays in place when reconciliation fails.
    pub reconcile_error: Option<ViewError>,
}

/// Optimistic delete: remote delete, local removal and count adjustment,
/// then a fresh read of the current offset.
#[derive(Debug, Default)]
pub struct DeletionCoordinator {
    pending: Vec<RecordId>,
}

impl DeletionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[RecordId] {
        &self.pending
    }

    /// `None` while a delete for the same record is still in flight.
    pub fn request(&mut self, record_id: RecordId) -> Option<DeleteRequest> {
        if self.pending.contains(&record_id) {
            debug!(record = %record_id, "delete already in flight");
            return None;
        }
        self.pending.push(record_id.clone());
        Some(DeleteRequest { record_id })
    }

    pub fn apply_delete(
        &mut self,
        store: &mut PagedDataStore,
        request: DeleteRequest,
        result: Result<(), ClientError>,
    ) -> Result<DeleteCommitted, ViewError> {
        self.pending.retain(|id| id != &request.record_id);
        result?;

        // Anything fetched before the delete may still contain the row.
        store.supersede_outstanding();
        let removed = store.remove_row(&request.record_id);
        store.decrement_total();
        info!(
            record = %request.record_id,
            total = store.window().total_count(),
            "record deleted"
        );

        let reconcile = store.request_page(store.offset(), FetchReason::Reconcile);
        Ok(DeleteCommitted { removed, reconcile })
    }

    pub fn delete<S: RecordService + ?Sized>(
        &mut self,
        store: &mut PagedDataStore,
        service: &S,
        record_id: RecordId,
    ) -> Result<DeleteOutcome, ViewError> {
        let Some(request) = self.request(record_id) else {
            return Err(ViewError::Validation("delete already in progress".into()));
        };
        let result = service.delete_record(&request.record_id);
        let committed = self.apply_delete(store, request, result)?;

        let mut next = Some(committed.reconcile);
        let mut reconcile_error = None;
        while let Some(request) = next.take() {
            let result = service.fetch_page(request.offset, request.size);
            match store.apply_page(request, result) {
                Ok(PageApplied::Replaced { .. }) => {
                    next = store.clamp_offset(FetchReason::Reconcile);
                }
                Ok(PageApplied::Stale) => {}
                Err(e) => reconcile_error = Some(e),
            }
        }

        Ok(DeleteOutcome {
            removed: committed.removed,
            reconcile_error,
        })
    }
}
