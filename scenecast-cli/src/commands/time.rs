//! `scenecast time --session <name> [--wpm N | --auto]` — the timing stage.

use anyhow::Result;
use clap::Args;

use scenecast_producers::DurationProducer;

use crate::collab::{AutoTiming, WordRateTiming};

/// Estimate per-scene audio durations.
#[derive(Args, Debug)]
pub struct TimeArgs {
    /// Session to time.
    #[arg(long, short = 's')]
    pub session: String,

    /// Speaking rate used for the estimate.
    #[arg(long, default_value_t = 150)]
    pub wpm: u32,

    /// Defer every duration to synthesis metadata ("auto") instead.
    #[arg(long, conflicts_with = "wpm")]
    pub auto: bool,
}

impl TimeArgs {
    pub fn run(self) -> Result<()> {
        if self.auto {
            let producer = DurationProducer::new(AutoTiming);
            super::run_stage_command(&self.session, &producer)
        } else {
            let producer = DurationProducer::new(WordRateTiming::new(self.wpm));
            super::run_stage_command(&self.session, &producer)
        }
    }
}
