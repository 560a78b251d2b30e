//! Job application wizard client.
//!
//! Drives a candidate through the six application steps against the
//! applications backend, keeping a resumable session on disk.

pub mod api_client;
pub mod cli;
pub mod config;
pub mod errors;
pub mod mapper;
pub mod models;
pub mod outcome;
pub mod session_store;
pub mod wizard;

pub use api_client::{ApplicationApi, HttpApplicationApi};
pub use errors::{ApiError, ApiResult};
pub use outcome::{resolve_outcome, Outcome};
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use wizard::{ApplicationWizard, RecordingHost, WizardHost};
