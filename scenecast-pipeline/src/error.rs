//! Error types for scenecast-pipeline.

use std::path::PathBuf;

use thiserror::Error;

use scenecast_core::SessionError;

/// All errors that can arise from the runner, artifact store and export.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An error from session persistence.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (artifact metadata, export).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The referenced artifact version does not exist in the store.
    #[error("artifact '{key}' v{version} not found")]
    ArtifactNotFound { key: String, version: u32 },

    /// Export requires a stored voiceover audio artifact.
    #[error("no audio artifact on the session; run the synthesis stage first")]
    MissingAudio,

    /// The audio artifact is not the expected `audio/mpeg`.
    #[error("unexpected audio mime type '{mime}'; expected audio/mpeg")]
    UnexpectedAudioMime { mime: String },

    /// Export refuses a ledger with no scenes at all.
    #[error("no scenes to export; run the narration stage first")]
    NoScenes,

    /// Every exported scene must carry its visual.
    #[error("scene {index} has no html; run the visual stage first")]
    MissingHtml { index: usize },
}

/// Convenience constructor for [`PipelineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.into(),
        source,
    }
}
