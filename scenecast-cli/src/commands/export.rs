//! `scenecast export --session <name> --audio <mp3>` — the terminal snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scenecast_core::{session, ArtifactKind};
use scenecast_pipeline::export_session;

/// Attach the voiceover audio and build the final export JSON.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Session to export.
    #[arg(long, short = 's')]
    pub session: String,

    /// Path to the synthesized voiceover (mp3).
    #[arg(long)]
    pub audio: PathBuf,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let mut session = super::load_session(&home, &self.session)?;
        let store = super::artifact_store(&home, &session);

        let bytes = std::fs::read(&self.audio)
            .with_context(|| format!("failed to read audio '{}'", self.audio.display()))?;
        let key = self
            .audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("audio path has no file name")?;
        session.audio = Some(
            store
                .save(&key, &bytes, "audio/mpeg", ArtifactKind::Audio)
                .with_context(|| format!("failed to store audio '{key}'"))?,
        );

        let artifact = export_session(&mut session, &store)
            .with_context(|| format!("export failed for session '{}'", self.session))?;
        session::save_at(&home, &mut session)
            .with_context(|| format!("failed to save session '{}'", self.session))?;

        println!(
            "✓ Exported {} scene(s) as '{}' v{}",
            session.scenes.len(),
            artifact.key,
            artifact.version
        );
        println!(
            "  Saved to: ~/.scenecast/sessions/{}/artifacts/{}/v{}",
            session.name, artifact.key, artifact.version
        );
        Ok(())
    }
}
