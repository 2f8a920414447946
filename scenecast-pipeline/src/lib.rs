//! Pipeline plumbing shared by the CLI and any future frontends.
//!
//! - [`runner`] — the produce-then-apply stage state machine
//! - [`artifact_store`] — key/version storage for binary payloads
//! - [`export`] — the terminal JSON snapshot
//! - [`error`] — [`PipelineError`]

pub mod artifact_store;
pub mod error;
pub mod export;
pub mod runner;

pub use artifact_store::ArtifactStore;
pub use error::PipelineError;
pub use export::{build_export, export_session, EXPORT_KEY};
pub use runner::{run_stage, StageOutcome, StageState};
