//! `scenecast narrate --session <name>` — the narration stage.

use anyhow::{bail, Context, Result};
use clap::Args;

use scenecast_core::ArtifactKind;
use scenecast_producers::NarrationProducer;

use crate::collab::HeadingNarrator;

/// Split the latest grounded markdown into commented scenes.
#[derive(Args, Debug)]
pub struct NarrateArgs {
    /// Session to narrate.
    #[arg(long, short = 's')]
    pub session: String,
}

impl NarrateArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let session = super::load_session(&home, &self.session)?;

        // Most recently grounded markdown wins.
        let Some(grounding) = session
            .grounding
            .iter()
            .rev()
            .find(|a| a.kind == ArtifactKind::Markdown)
        else {
            bail!(
                "session '{}' has no grounded markdown; run `scenecast ground` first",
                self.session
            );
        };

        let store = super::artifact_store(&home, &session);
        let bytes = store
            .load(grounding)
            .with_context(|| format!("failed to load grounding '{}'", grounding.key))?;
        let markdown = String::from_utf8(bytes)
            .with_context(|| format!("grounding '{}' is not valid UTF-8", grounding.key))?;

        let producer = NarrationProducer::new(HeadingNarrator::new(markdown));
        super::run_stage_command(&self.session, &producer)
    }
}
