use std::collections::VecDeque;

use sheetsync_client::{RecordId, RecordService, UploadFile};

use crate::config::ViewConfig;
use crate::controller::{Notice, Step, ViewController};
use crate::error::ViewError;

/// Drives a [`ViewController`] against a service one call at a time.
///
/// Every intent runs until no effects remain, so responses always arrive in
/// request order. Use the controller directly when calls should overlap.
pub struct Session<S> {
    controller: ViewController,
    service: S,
}

impl<S: RecordService> Session<S> {
    pub fn new(config: &ViewConfig, service: S) -> Self {
        Self {
            controller: ViewController::new(config),
            service,
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Runs queued effects to completion. Keeps draining after a failure and
    /// returns the first error once the queue is empty.
    pub fn run(&mut self, step: Step) -> Result<Vec<Notice>, ViewError> {
        let mut notices = step.notices;
        let mut queue: VecDeque<_> = step.effects.into();
        let mut first_error = None;

        while let Some(effect) = queue.pop_front() {
            let completion = effect.run(&self.service);
            match self.controller.complete(completion) {
                Ok(next) => {
                    notices.extend(next.notices);
                    queue.extend(next.effects);
                }
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(notices),
        }
    }

    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.controller.select_file(file);
    }

    pub fn upload(&mut self) -> Result<Vec<Notice>, ViewError> {
        let step = self.controller.upload()?;
        self.run(step)
    }

    pub fn view_data(&mut self) -> Result<Vec<Notice>, ViewError> {
        let step = self.controller.view_data();
        self.run(step)
    }

    pub fn search(&mut self, term: &str) -> Result<Vec<Notice>, ViewError> {
        let step = self.controller.search(term);
        self.run(step)
    }

    pub fn next(&mut self) -> Result<Vec<Notice>, ViewError> {
        let step = self.controller.next();
        self.run(step)
    }

    pub fn prev(&mut self) -> Result<Vec<Notice>, ViewError> {
        let step = self.controller.prev();
        self.run(step)
    }

    pub fn delete(&mut self, record_id: RecordId) -> Result<Vec<Notice>, ViewError> {
        let step = self.controller.delete(record_id);
        self.run(step)
    }
}
