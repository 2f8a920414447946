//! Scenecast core library — scene ledger, apply engine, session persistence.
//!
//! Public API surface:
//! - [`types`] — scene records, update batches, field groups, artifacts
//! - [`ledger`] — [`SceneLedger`]
//! - [`apply`] — [`apply_batch`] and the validation boundary
//! - [`session`] — load / save / init
//! - [`error`] — [`SessionError`]

pub mod apply;
pub mod error;
pub mod ledger;
pub mod session;
pub mod types;

pub use apply::{apply_batch, ApplyReport, ScenePatch, SkipReason, SkippedUpdate};
pub use error::SessionError;
pub use ledger::SceneLedger;
pub use session::Session;
pub use types::{
    ArtifactKind, ArtifactRef, DurationValue, FieldGroup, SceneRecord, SceneUpdate, SessionName,
    UpdateBatch, SCENE_FIELDS,
};
