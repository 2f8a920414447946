//! `scenecast annotate --session <name>` — the annotation stage.

use anyhow::Result;
use clap::Args;

use scenecast_producers::AnnotationProducer;

use crate::collab::TagAnnotator;

/// Add expressive markers to every scene's speech.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Session to annotate.
    #[arg(long, short = 's')]
    pub session: String,
}

impl AnnotateArgs {
    pub fn run(self) -> Result<()> {
        let producer = AnnotationProducer::new(TagAnnotator);
        super::run_stage_command(&self.session, &producer)
    }
}
