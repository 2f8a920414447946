//! Error types for scenecast-producers.

use thiserror::Error;

use scenecast_core::FieldGroup;

/// Failure in an external collaborator (model, synthesis, import).
///
/// Always surfaced to the caller as a status; never silently swallowed and
/// never allowed to corrupt the ledger.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Underlying I/O failure while reaching the collaborator.
    #[error("collaborator I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The collaborator ran but returned an unusable result.
    #[error("collaborator failure: {0}")]
    Failed(String),
}

impl CollaboratorError {
    pub fn failed(message: impl Into<String>) -> Self {
        CollaboratorError::Failed(message.into())
    }
}

/// The producer's raw output could not be parsed as a wire batch.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("producer output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("producer output has no 'updates' array")]
    MissingUpdates,
}

/// All errors a stage producer can report.
///
/// Fatal to the stage, never to the session: the runner records the failure
/// and the ledger is left untouched.
#[derive(Debug, Error)]
pub enum ProduceError {
    /// An upstream field group is absent — a stage-ordering violation. The
    /// message names the stage to run first.
    #[error("cannot run the {stage} stage: {message}")]
    Precondition { stage: FieldGroup, message: String },

    /// External collaborator failure (network, service, I/O).
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Output unparseable as patches — treated as zero valid patches;
    /// the caller may retry or regenerate.
    #[error("malformed producer output: {0}")]
    Malformed(#[from] WireError),
}

impl ProduceError {
    pub(crate) fn precondition(stage: FieldGroup, message: impl Into<String>) -> Self {
        ProduceError::Precondition {
            stage,
            message: message.into(),
        }
    }
}
