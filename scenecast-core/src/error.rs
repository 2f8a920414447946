//! Error types for scenecast-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parse error on load — includes the file path for context.
    #[error("failed to parse session at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.scenecast/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The session file did not exist at the expected path.
    #[error("session not found at {path}")]
    SessionNotFound { path: PathBuf },

    /// `init` refused to clobber an existing session.
    #[error("session already exists at {path}")]
    SessionExists { path: PathBuf },
}
