use serde::Serialize;
use sheetsync_client::{ClientError, DecodeError, RecordId, RecordPage, RecordService, Row, UploadFile};
use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::deletion::{DeleteRequest, DeletionCoordinator};
use crate::error::ViewError;
use crate::search::{Filtered, SearchFilter, SearchState};
use crate::store::{FetchReason, PageApplied, PageRequest, PagedDataStore};
use crate::upload::{UploadController, UploadRequest};
use crate::window::{PageWindow, total_pages};

/// A remote call the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Upload(UploadRequest),
    Fetch(PageRequest),
    Delete(DeleteRequest),
}

/// The finished form of an [`Effect`], fed back through
/// [`ViewController::complete`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Uploaded(UploadRequest, Result<(), ClientError>),
    Fetched(PageRequest, Result<RecordPage, ClientError>),
    Deleted(DeleteRequest, Result<(), ClientError>),
}

impl Effect {
    /// Performs the call. Blocks for as long as the service does.
    pub fn run<S: RecordService + ?Sized>(self, service: &S) -> Completion {
        match self {
            Effect::Upload(request) => {
                let result = service.upload(&request.file);
                Completion::Uploaded(request, result)
            }
            Effect::Fetch(request) => {
                let result = service.fetch_page(request.offset, request.size);
                Completion::Fetched(request, result)
            }
            Effect::Delete(request) => {
                let result = service.delete_record(&request.record_id);
                Completion::Deleted(request, result)
            }
        }
    }

    /// The completion for a call that never produced a result of its own.
    pub fn fail(self, error: ClientError) -> Completion {
        match self {
            Effect::Upload(request) => Completion::Uploaded(request, Err(error)),
            Effect::Fetch(request) => Completion::Fetched(request, Err(error)),
            Effect::Delete(request) => Completion::Deleted(request, Err(error)),
        }
    }
}

/// Something the user should be told that is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Uploaded { file: String },
    Deleted { record_id: RecordId },
    NoMatches { term: String },
    RowsRejected(Vec<DecodeError>),
}

/// What an intent or completion produced: calls to make and things to tell.
#[derive(Debug, Default, PartialEq)]
pub struct Step {
    pub effects: Vec<Effect>,
    pub notices: Vec<Notice>,
}

impl Step {
    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            notices: Vec::new(),
        }
    }

    fn notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}

/// Observable state handed to whatever renders the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub record_ids: Vec<RecordId>,
    pub total_count: u64,
    /// 1-based.
    pub page: usize,
    pub total_pages: usize,
    pub search_term: String,
    pub ready: bool,
    pub in_flight: usize,
}

/// Composition root. Owns all view state; routes intents to the store,
/// search filter, deletion coordinator and upload controller, and never
/// performs I/O itself.
pub struct ViewController {
    store: PagedDataStore,
    filter: SearchFilter,
    search: SearchState,
    deletion: DeletionCoordinator,
    upload: UploadController,
    in_flight: usize,
}

impl ViewController {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            store: PagedDataStore::new(config.page_size, config.ordering),
            filter: SearchFilter::new(config.identifier_column.clone()),
            search: SearchState::default(),
            deletion: DeletionCoordinator::new(),
            upload: UploadController::new(),
            in_flight: 0,
        }
    }

    // ── Intents ─────────────────────────────────────────────────

    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.upload.select_file(file);
    }

    pub fn upload(&mut self) -> Result<Step, ViewError> {
        let request = self.upload.request()?;
        Ok(self.emit(Step::effect(Effect::Upload(request))))
    }

    pub fn view_data(&mut self) -> Step {
        self.search.clear();
        self.store.set_offset(0);
        let request = self.store.request_page(0, FetchReason::ViewData);
        self.emit(Step::effect(Effect::Fetch(request)))
    }

    /// A blank term reloads the current offset; anything else filters the
    /// loaded rows only.
    pub fn search(&mut self, term: &str) -> Step {
        self.search.set(term);
        if !self.search.is_active() {
            let request = self.store.request_page(self.store.offset(), FetchReason::Refresh);
            return self.emit(Step::effect(Effect::Fetch(request)));
        }

        let filtered = self.filtered();
        debug!(term, matched = filtered.rows.len(), "search applied");
        if filtered.rows.is_empty() {
            return Step::default().notice(Notice::NoMatches {
                term: term.trim().to_string(),
            });
        }
        Step::default()
    }

    pub fn next(&mut self) -> Step {
        self.navigate(self.store.offset().saturating_add(1))
    }

    pub fn prev(&mut self) -> Step {
        self.navigate(self.store.offset().saturating_sub(1))
    }

    pub fn delete(&mut self, record_id: RecordId) -> Step {
        match self.deletion.request(record_id) {
            Some(request) => self.emit(Step::effect(Effect::Delete(request))),
            None => Step::default(),
        }
    }

    /// Applies a finished remote call. Errors leave state as it was, apart
    /// from a delete's optimistic removal once the service confirmed it.
    pub fn complete(&mut self, completion: Completion) -> Result<Step, ViewError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let step = match completion {
            Completion::Uploaded(request, result) => {
                let file = request.file.name.clone();
                let first_page = self.upload.apply_upload(
                    &mut self.store,
                    &mut self.search,
                    request,
                    result,
                )?;
                Step::effect(Effect::Fetch(first_page)).notice(Notice::Uploaded { file })
            }
            Completion::Fetched(request, result) => self.page_arrived(request, result)?,
            Completion::Deleted(request, result) => {
                let record_id = request.record_id.clone();
                let committed = self.deletion.apply_delete(&mut self.store, request, result)?;
                Step::effect(Effect::Fetch(committed.reconcile))
                    .notice(Notice::Deleted { record_id })
            }
        };
        Ok(self.emit(step))
    }

    fn page_arrived(
        &mut self,
        request: PageRequest,
        result: Result<RecordPage, ClientError>,
    ) -> Result<Step, ViewError> {
        let rejected = match self.store.apply_page(request, result)? {
            PageApplied::Stale => return Ok(Step::default()),
            PageApplied::Replaced { rejected } => rejected,
        };

        let mut step = Step::default();
        if !rejected.is_empty() {
            warn!(count = rejected.len(), "rows rejected from page");
            step.notices.push(Notice::RowsRejected(rejected));
        }
        if request.reason == FetchReason::ViewData {
            self.upload.mark_ready();
        }
        // Any load can reveal that the set shrank below the current page.
        if let Some(follow_up) = self.store.clamp_offset(request.reason) {
            step.effects.push(Effect::Fetch(follow_up));
        }
        Ok(step)
    }

    // Controls are hidden at one page or fewer, so navigation does nothing.
    fn navigate(&mut self, requested: usize) -> Step {
        let pages = self.total_pages();
        if pages <= 1 {
            return Step::default();
        }
        let target = requested.min(pages - 1);
        if target == self.store.offset() {
            return Step::default();
        }

        self.store.set_offset(target);
        if !self.upload.is_ready() {
            return Step::default();
        }
        let request = self.store.request_page(target, FetchReason::Navigate);
        self.emit(Step::effect(Effect::Fetch(request)))
    }

    fn emit(&mut self, step: Step) -> Step {
        self.in_flight += step.effects.len();
        step
    }

    // ── Observable state ────────────────────────────────────────

    pub fn window(&self) -> &PageWindow {
        self.store.window()
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.upload.selected()
    }

    pub fn is_ready(&self) -> bool {
        self.upload.is_ready()
    }

    pub fn offset(&self) -> usize {
        self.store.offset()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn filtered(&self) -> Filtered<'_> {
        self.filter.apply(self.search.term(), self.store.window())
    }

    pub fn display_rows(&self) -> Vec<&Row> {
        self.filtered().rows
    }

    /// The service's total, or the match count while a search is active.
    pub fn display_count(&self) -> u64 {
        let filtered = self.filtered();
        if filtered.active {
            filtered.rows.len() as u64
        } else {
            self.store.window().total_count()
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.display_count(), self.store.page_size())
    }

    pub fn pagination_visible(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let rows = self.display_rows();
        let columns = rows
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default();

        ViewSnapshot {
            columns,
            rows: rows
                .iter()
                .map(|row| row.values().map(str::to_string).collect())
                .collect(),
            record_ids: rows.iter().map(|row| row.record_id().clone()).collect(),
            total_count: self.display_count(),
            page: self.store.offset() + 1,
            total_pages: self.total_pages(),
            search_term: self.search.term().to_string(),
            ready: self.upload.is_ready(),
            in_flight: self.in_flight,
        }
    }
}
