//! Terminal export — the read-only snapshot handed to the video player.
//!
//! Output shape:
//!
//! ```text
//! {
//!   "scenes": [ { "comment": …, "speech": …, "elevenlabs": …,
//!                 "duration": …, "html": … }, … ],
//!   "audio": "data:audio/mpeg;base64,<…>"
//! }
//! ```
//!
//! Audio bytes live in the artifact store and are embedded as a base64 data
//! URI only at export time. The export JSON is itself saved back to the
//! store and referenced from the session.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;

use scenecast_core::{ArtifactKind, ArtifactRef, SceneRecord, Session};

use crate::artifact_store::ArtifactStore;
use crate::error::PipelineError;

/// Artifact key for the final snapshot.
pub const EXPORT_KEY: &str = "final_video_export.json";

const AUDIO_MIME: &str = "audio/mpeg";

#[derive(Debug, Serialize)]
struct ExportBundle<'a> {
    scenes: &'a [SceneRecord],
    audio: String,
}

/// Assemble the export JSON without persisting it.
///
/// Fails if the ledger is empty, any scene lacks `html`, or the session has
/// no `audio/mpeg` artifact.
pub fn build_export(session: &Session, store: &ArtifactStore) -> Result<Value, PipelineError> {
    let records = session.scenes.records();
    if records.is_empty() {
        return Err(PipelineError::NoScenes);
    }
    for (index, record) in records.iter().enumerate() {
        if record.html.is_none() {
            return Err(PipelineError::MissingHtml { index });
        }
    }

    let audio_ref = session.audio.as_ref().ok_or(PipelineError::MissingAudio)?;
    if audio_ref.mime_type != AUDIO_MIME {
        return Err(PipelineError::UnexpectedAudioMime {
            mime: audio_ref.mime_type.clone(),
        });
    }

    let audio_bytes = store.load(audio_ref)?;
    let bundle = ExportBundle {
        scenes: records,
        audio: format!("data:{AUDIO_MIME};base64,{}", BASE64.encode(audio_bytes)),
    };
    Ok(serde_json::to_value(bundle)?)
}

/// Build the export, save it to the store, and record the reference on the
/// session. The caller is responsible for persisting the session afterwards.
pub fn export_session(
    session: &mut Session,
    store: &ArtifactStore,
) -> Result<ArtifactRef, PipelineError> {
    let bundle = build_export(session, store)?;
    let bytes = serde_json::to_vec_pretty(&bundle)?;
    let artifact = store.save(EXPORT_KEY, &bytes, "application/json", ArtifactKind::Json)?;
    tracing::info!(
        "exported {} scene(s) as '{}' v{}",
        session.scenes.len(),
        artifact.key,
        artifact.version
    );
    session.export = Some(artifact.clone());
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use scenecast_core::{
        apply_batch, session, DurationValue, FieldGroup, SceneUpdate, SessionName, UpdateBatch,
    };

    use super::*;

    fn apply(session: &mut Session, group: FieldGroup, updates: Vec<SceneUpdate>) {
        apply_batch(
            &mut session.scenes,
            &UpdateBatch::with_updates(group, updates),
        );
    }

    fn complete_session(home: &TempDir, store: &ArtifactStore) -> Session {
        let mut s = session::init_at(home.path(), SessionName::from("export_test")).unwrap();
        apply(
            &mut s,
            FieldGroup::Narration,
            vec![SceneUpdate::narration(0, "intro", "hello")],
        );
        apply(
            &mut s,
            FieldGroup::Duration,
            vec![SceneUpdate::duration(0, DurationValue::Seconds(2.0))],
        );
        apply(
            &mut s,
            FieldGroup::Visual,
            vec![SceneUpdate::html(0, "<div>intro</div>")],
        );
        s.audio = Some(
            store
                .save("voiceover.mp3", b"mp3bytes", "audio/mpeg", ArtifactKind::Audio)
                .unwrap(),
        );
        s
    }

    #[test]
    fn export_embeds_audio_data_uri() {
        let home = TempDir::new().unwrap();
        let store = ArtifactStore::new(home.path().join("artifacts"));
        let session = complete_session(&home, &store);

        let bundle = build_export(&session, &store).expect("export");
        let audio = bundle["audio"].as_str().unwrap();
        assert!(audio.starts_with("data:audio/mpeg;base64,"));
        assert_eq!(
            audio.trim_start_matches("data:audio/mpeg;base64,"),
            BASE64.encode(b"mp3bytes")
        );
        assert_eq!(bundle["scenes"][0]["html"], "<div>intro</div>");
        assert_eq!(bundle["scenes"][0]["duration"], "2s");
    }

    #[test]
    fn export_session_persists_and_records_reference() {
        let home = TempDir::new().unwrap();
        let store = ArtifactStore::new(home.path().join("artifacts"));
        let mut session = complete_session(&home, &store);

        let artifact = export_session(&mut session, &store).expect("export");
        assert_eq!(artifact.key, EXPORT_KEY);
        assert_eq!(session.export, Some(artifact.clone()));

        let bytes = store.load(&artifact).expect("load");
        let value: Value = serde_json::from_slice(&bytes).expect("parse");
        assert!(value["scenes"].is_array());
    }

    #[test]
    fn missing_html_fails_with_scene_index() {
        let home = TempDir::new().unwrap();
        let store = ArtifactStore::new(home.path().join("artifacts"));
        let mut session = complete_session(&home, &store);
        apply(
            &mut session,
            FieldGroup::Narration,
            vec![SceneUpdate::narration(1, "extra", "scene")],
        );

        let err = build_export(&session, &store).unwrap_err();
        assert!(matches!(err, PipelineError::MissingHtml { index: 1 }));
    }

    #[test]
    fn missing_audio_fails() {
        let home = TempDir::new().unwrap();
        let store = ArtifactStore::new(home.path().join("artifacts"));
        let mut session = complete_session(&home, &store);
        session.audio = None;
        assert!(matches!(
            build_export(&session, &store).unwrap_err(),
            PipelineError::MissingAudio
        ));
    }

    #[test]
    fn wrong_audio_mime_fails() {
        let home = TempDir::new().unwrap();
        let store = ArtifactStore::new(home.path().join("artifacts"));
        let mut session = complete_session(&home, &store);
        session.audio = Some(
            store
                .save("cover.pdf", b"%PDF", "application/pdf", ArtifactKind::Pdf)
                .unwrap(),
        );
        assert!(matches!(
            build_export(&session, &store).unwrap_err(),
            PipelineError::UnexpectedAudioMime { .. }
        ));
    }

    #[test]
    fn empty_ledger_refuses_export() {
        let home = TempDir::new().unwrap();
        let store = ArtifactStore::new(home.path().join("artifacts"));
        let mut session =
            session::init_at(home.path(), SessionName::from("empty_export")).unwrap();
        session.audio = Some(
            store
                .save("voiceover.mp3", b"x", "audio/mpeg", ArtifactKind::Audio)
                .unwrap(),
        );
        assert!(matches!(
            build_export(&session, &store).unwrap_err(),
            PipelineError::NoScenes
        ));
    }
}
