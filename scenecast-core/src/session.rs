//! Per-session JSON persistence.
//!
//! # Storage layout
//!
//! ```text
//! ~/.scenecast/
//!   sessions/
//!     <session_name>/
//!       session.json          (mode 0600, created on init)
//!       artifacts/            (binary payloads — see scenecast-pipeline)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::ledger::SceneLedger;
use crate::types::{ArtifactRef, SessionName};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// All persistent state for one authoring session.
///
/// The scene ledger lives here and is threaded explicitly through every
/// pipeline stage — no ambient globals. Artifact payloads are stored outside
/// the session file; only [`ArtifactRef`] handles appear inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub name: SessionName,
    #[serde(default)]
    pub scenes: SceneLedger,
    /// Grounded source material (slides, docs, markdown) — populated by the
    /// grounding step, never by a ledger producer.
    #[serde(default)]
    pub grounding: Vec<ArtifactRef>,
    /// The synthesized voiceover audio, once generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<ArtifactRef>,
    /// The terminal export snapshot, once built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ArtifactRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    fn new(name: SessionName) -> Self {
        let now = Utc::now();
        Self {
            name,
            scenes: SceneLedger::new(),
            grounding: Vec::new(),
            audio: None,
            export: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.scenecast/sessions/<session>/`
///
/// Creates the directory (mode `0700`) if it does not yet exist.
pub fn session_dir_at(home: &Path, name: &SessionName) -> Result<PathBuf, SessionError> {
    let dir = home.join(".scenecast").join("sessions").join(&name.0);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

/// `<home>/.scenecast/sessions/<session>/session.json` — pure, no I/O.
pub fn session_path_at(home: &Path, name: &SessionName) -> PathBuf {
    home.join(".scenecast")
        .join("sessions")
        .join(&name.0)
        .join("session.json")
}

/// `<home>/.scenecast/sessions/<session>/artifacts/` — pure, no I/O.
pub fn artifacts_dir_at(home: &Path, name: &SessionName) -> PathBuf {
    home.join(".scenecast")
        .join("sessions")
        .join(&name.0)
        .join("artifacts")
}

/// Lists the names of all session directories, sorted.
pub fn list_sessions_at(home: &Path) -> Result<Vec<SessionName>, SessionError> {
    let dir = home.join(".scenecast").join("sessions");
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut names: Vec<SessionName> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| SessionName::from(e.file_name().to_string_lossy().into_owned()))
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(names)
}

/// `list_sessions_at` convenience wrapper.
pub fn list_sessions() -> Result<Vec<SessionName>, SessionError> {
    list_sessions_at(&home()?)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load a session from `<home>/.scenecast/sessions/<session>/session.json`.
///
/// Returns `SessionError::SessionNotFound` if absent,
/// `SessionError::Parse` (with path context) if malformed JSON.
pub fn load_at(home: &Path, name: &SessionName) -> Result<Session, SessionError> {
    let path = session_path_at(home, name);
    if !path.exists() {
        return Err(SessionError::SessionNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_json::from_str(&contents).map_err(|e| SessionError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load(name: &SessionName) -> Result<Session, SessionError> {
    load_at(&home()?, name)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a session, bumping `updated_at`.
///
/// Write flow: serialize → `session.json.tmp` sibling → `chmod 0600` →
/// `rename`. The `.tmp` lives in the same directory as the target (same
/// filesystem — no EXDEV on macOS).
pub fn save_at(home: &Path, session: &mut Session) -> Result<(), SessionError> {
    session_dir_at(home, &session.name)?; // create dir + 0700 if absent
    session.updated_at = Utc::now();

    let path = session_path_at(home, &session.name);
    let tmp_path = path.with_file_name("session.json.tmp");

    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(&tmp_path, json)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(session: &mut Session) -> Result<(), SessionError> {
    save_at(&home()?, session)
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Create a new session with an empty ledger.
///
/// Returns `SessionError::SessionExists` if the session file is already
/// present — init never clobbers state.
pub fn init_at(home: &Path, name: SessionName) -> Result<Session, SessionError> {
    let path = session_path_at(home, &name);
    if path.exists() {
        return Err(SessionError::SessionExists { path });
    }
    let mut session = Session::new(name);
    save_at(home, &mut session)?;
    Ok(session)
}

/// `init_at` convenience wrapper.
pub fn init(name: SessionName) -> Result<Session, SessionError> {
    init_at(&home()?, name)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, SessionError> {
    dirs::home_dir().ok_or(SessionError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::apply::apply_batch;
    use crate::types::{FieldGroup, SceneUpdate, UpdateBatch};

    fn make_home() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    fn name() -> SessionName {
        SessionName::from("intro_python")
    }

    #[test]
    fn session_path_is_correct() {
        let home = make_home();
        let path = session_path_at(home.path(), &name());
        assert!(path.ends_with(".scenecast/sessions/intro_python/session.json"));
    }

    #[test]
    fn session_dir_created_with_perms() {
        let home = make_home();
        let dir = session_dir_at(home.path(), &name()).expect("session_dir_at");
        assert!(dir.exists());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o700);
        }
    }

    #[test]
    fn init_save_load_roundtrip() {
        let home = make_home();
        let mut session = init_at(home.path(), name()).expect("init");
        assert!(session.scenes.is_empty());

        let batch = UpdateBatch::with_updates(
            FieldGroup::Narration,
            vec![SceneUpdate::narration(0, "c0", "s0")],
        );
        apply_batch(&mut session.scenes, &batch);
        save_at(home.path(), &mut session).expect("save");

        let loaded = load_at(home.path(), &name()).expect("load");
        assert_eq!(loaded.scenes.len(), 1);
        assert_eq!(
            loaded.scenes.get(0).unwrap().comment.as_deref(),
            Some("c0")
        );
    }

    #[test]
    fn init_refuses_existing_session() {
        let home = make_home();
        init_at(home.path(), name()).expect("first init");
        let err = init_at(home.path(), name()).unwrap_err();
        assert!(matches!(err, SessionError::SessionExists { .. }));
    }

    #[test]
    fn load_missing_session_returns_not_found() {
        let home = make_home();
        let err = load_at(home.path(), &name()).unwrap_err();
        assert!(matches!(err, SessionError::SessionNotFound { .. }));
    }

    #[test]
    fn atomic_save_cleans_up_tmp() {
        let home = make_home();
        init_at(home.path(), name()).expect("init");
        let tmp = session_path_at(home.path(), &name()).with_file_name("session.json.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[test]
    fn list_sessions_sorted() {
        let home = make_home();
        init_at(home.path(), SessionName::from("b_session")).unwrap();
        init_at(home.path(), SessionName::from("a_session")).unwrap();
        let names = list_sessions_at(home.path()).expect("list");
        assert_eq!(
            names,
            vec![
                SessionName::from("a_session"),
                SessionName::from("b_session")
            ]
        );
    }

    #[test]
    fn list_sessions_empty_when_no_dir() {
        let home = make_home();
        assert!(list_sessions_at(home.path()).expect("list").is_empty());
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(SessionError::HomeNotFound
            .to_string()
            .contains("home directory"));
    }
}
