//! Filesystem artifact store — large payloads the ledger never holds inline.
//!
//! ## Layout
//!
//! ```text
//! <session dir>/artifacts/
//!   <key>/
//!     v1        (payload bytes)
//!     v1.json   (the ArtifactRef, as metadata sidecar)
//!     v2
//!     v2.json
//! ```
//!
//! Versions are immutable once written; `save` always allocates the next
//! version for a key. Writes are atomic (tmp sibling + rename).

use std::path::{Path, PathBuf};

use scenecast_core::{ArtifactKind, ArtifactRef};

use crate::error::{io_err, PipelineError};

/// Handle to one session's artifact directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open (lazily) the store rooted at `root`. No I/O until first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn payload_path(&self, key: &str, version: u32) -> PathBuf {
        self.key_dir(key).join(format!("v{version}"))
    }

    fn meta_path(&self, key: &str, version: u32) -> PathBuf {
        self.key_dir(key).join(format!("v{version}.json"))
    }

    /// Store a payload under `key`, allocating the next version.
    pub fn save(
        &self,
        key: &str,
        bytes: &[u8],
        mime_type: &str,
        kind: ArtifactKind,
    ) -> Result<ArtifactRef, PipelineError> {
        let dir = self.key_dir(key);
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;

        let version = self.latest_version(key)? + 1;
        let artifact = ArtifactRef {
            key: key.to_owned(),
            version,
            mime_type: mime_type.to_owned(),
            kind,
        };

        let payload = self.payload_path(key, version);
        atomic_write(&payload, bytes)?;

        let meta = self.meta_path(key, version);
        atomic_write(&meta, serde_json::to_string_pretty(&artifact)?.as_bytes())?;

        tracing::debug!("stored artifact '{key}' v{version} ({} bytes)", bytes.len());
        Ok(artifact)
    }

    /// Load the payload bytes for a reference.
    pub fn load(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, PipelineError> {
        let path = self.payload_path(&artifact.key, artifact.version);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PipelineError::ArtifactNotFound {
                    key: artifact.key.clone(),
                    version: artifact.version,
                })
            }
            Err(e) => Err(io_err(&path, e)),
        }
    }

    /// All stored references, sorted by key then version.
    pub fn list(&self) -> Result<Vec<ArtifactRef>, PipelineError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }
        let mut refs = Vec::new();
        for key_entry in std::fs::read_dir(&self.root).map_err(|e| io_err(&self.root, e))? {
            let key_entry = key_entry.map_err(|e| io_err(&self.root, e))?;
            if !key_entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let dir = key_entry.path();
            for file in std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
                let file = file.map_err(|e| io_err(&dir, e))?;
                let name = file.file_name();
                if !name.to_string_lossy().ends_with(".json") {
                    continue;
                }
                let contents =
                    std::fs::read_to_string(file.path()).map_err(|e| io_err(file.path(), e))?;
                let artifact: ArtifactRef = serde_json::from_str(&contents)?;
                refs.push(artifact);
            }
        }
        refs.sort_by(|a, b| a.key.cmp(&b.key).then(a.version.cmp(&b.version)));
        Ok(refs)
    }

    fn latest_version(&self, key: &str) -> Result<u32, PipelineError> {
        let dir = self.key_dir(key);
        if !dir.exists() {
            return Ok(0);
        }
        let mut latest = 0;
        for entry in std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(v) = name
                .strip_prefix('v')
                .filter(|rest| !rest.contains('.'))
                .and_then(|rest| rest.parse::<u32>().ok())
            {
                latest = latest.max(v);
            }
        }
        Ok(latest)
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, ArtifactStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = ArtifactStore::new(dir.path().join("artifacts"));
        (dir, store)
    }

    #[test]
    fn save_load_roundtrip() {
        let (_dir, store) = store();
        let artifact = store
            .save("deck.md", b"# Slides", "text/markdown", ArtifactKind::Markdown)
            .expect("save");
        assert_eq!(artifact.version, 1);
        assert_eq!(store.load(&artifact).expect("load"), b"# Slides");
    }

    #[test]
    fn versions_increment_and_stay_immutable() {
        let (_dir, store) = store();
        let v1 = store
            .save("audio.mp3", b"one", "audio/mpeg", ArtifactKind::Audio)
            .expect("v1");
        let v2 = store
            .save("audio.mp3", b"two", "audio/mpeg", ArtifactKind::Audio)
            .expect("v2");
        assert_eq!((v1.version, v2.version), (1, 2));
        assert_eq!(store.load(&v1).expect("load v1"), b"one");
        assert_eq!(store.load(&v2).expect("load v2"), b"two");
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let (_dir, store) = store();
        let ghost = ArtifactRef {
            key: "ghost".into(),
            version: 7,
            mime_type: "application/json".into(),
            kind: ArtifactKind::Json,
        };
        let err = store.load(&ghost).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactNotFound { version: 7, .. }));
    }

    #[test]
    fn list_is_sorted_by_key_then_version() {
        let (_dir, store) = store();
        store
            .save("b.json", b"{}", "application/json", ArtifactKind::Json)
            .unwrap();
        store
            .save("a.md", b"x", "text/markdown", ArtifactKind::Markdown)
            .unwrap();
        store
            .save("a.md", b"y", "text/markdown", ArtifactKind::Markdown)
            .unwrap();

        let refs = store.list().expect("list");
        let summary: Vec<_> = refs.iter().map(|r| (r.key.as_str(), r.version)).collect();
        assert_eq!(summary, vec![("a.md", 1), ("a.md", 2), ("b.json", 1)]);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (_dir, store) = store();
        assert!(store.list().expect("list").is_empty());
    }
}
