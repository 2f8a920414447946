//! `scenecast visualize --session <name>` — the visual stage.

use anyhow::Result;
use clap::Args;

use scenecast_producers::VisualProducer;

use crate::collab::TextCardVisuals;

/// Render one HTML slide per scene.
#[derive(Args, Debug)]
pub struct VisualizeArgs {
    /// Session to visualize.
    #[arg(long, short = 's')]
    pub session: String,
}

impl VisualizeArgs {
    pub fn run(self) -> Result<()> {
        let producer = VisualProducer::new(TextCardVisuals);
        super::run_stage_command(&self.session, &producer)
    }
}
