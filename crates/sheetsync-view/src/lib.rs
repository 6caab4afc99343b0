//! Client-side view of a remote, paginated, mutable record set.
//!
//! [`ViewController`] owns the state and turns user intents into
//! [`Effect`]s; whoever drives it performs those calls (concurrently or not)
//! and feeds the results back as [`Completion`]s. [`Session`] is the
//! sequential driver.

mod config;
mod controller;
mod deletion;
mod error;
mod search;
mod session;
mod store;
mod upload;
mod window;

pub use config::{ResponseOrdering, ViewConfig};
pub use controller::{Completion, Effect, Notice, Step, ViewController, ViewSnapshot};
pub use deletion::{DeleteCommitted, DeleteOutcome, DeleteRequest, DeletionCoordinator};
pub use error::ViewError;
pub use search::{Filtered, SearchFilter, SearchState};
pub use session::Session;
pub use store::{FetchReason, PageApplied, PageRequest, PagedDataStore};
pub use upload::{UploadController, UploadRequest};
pub use window::{PageWindow, total_pages};
