use sheetsync_client::{ClientError, RecordService, UploadFile};
use tracing::info;

use crate::error::ViewError;
use crate::search::SearchState;
use crate::store::{FetchReason, PageApplied, PageRequest, PagedDataStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: UploadFile,
}

/// Holds the picked file and whether a record set is ready to browse.
#[derive(Debug, Default)]
pub struct UploadController {
    selected: Option<UploadFile>,
    ready: bool,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.selected = file;
    }

    pub fn selected(&self) -> Option<&UploadFile> {
        self.selected.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn request(&self) -> Result<UploadRequest, ViewError> {
        match &self.selected {
            Some(file) => Ok(UploadRequest { file: file.clone() }),
            None => Err(ViewError::Validation("Please choose a file!".into())),
        }
    }

    /// On success the old window is discarded, search is cleared and page 0
    /// is requested. On failure nothing changes.
    pub fn apply_upload(
        &mut self,
        store: &mut PagedDataStore,
        search: &mut SearchState,
        request: UploadRequest,
        result: Result<(), ClientError>,
    ) -> Result<PageRequest, ViewError> {
        result?;
        info!(file = %request.file.name, "upload accepted");

        self.ready = true;
        store.reset();
        search.clear();
        Ok(store.request_page(0, FetchReason::Upload))
    }

    pub fn upload<S: RecordService + ?Sized>(
        &mut self,
        store: &mut PagedDataStore,
        search: &mut SearchState,
        service: &S,
    ) -> Result<PageApplied, ViewError> {
        let request = self.request()?;
        let result = service.upload(&request.file);
        let first_page = self.apply_upload(store, search, request, result)?;
        let result = service.fetch_page(first_page.offset, first_page.size);
        store.apply_page(first_page, result)
    }
}
