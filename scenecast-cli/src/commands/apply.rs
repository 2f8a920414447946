//! `scenecast apply <file> --session <name> --group <group>`
//!
//! Applies a raw update-batch document — the `{"updates":[…]}` wire shape,
//! optionally fenced — straight through the runner. This is how co-created
//! content (e.g. hand-edited HTML slides) reaches the ledger: the same
//! per-patch validation applies as for any producer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scenecast_producers::WireBatchProducer;

use crate::FieldGroupArg;

/// Apply a wire-format update batch from a file.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to a file containing `{"updates":[…]}` (markdown fences allowed).
    pub file: PathBuf,

    /// Session to apply the batch to.
    #[arg(long, short = 's')]
    pub session: String,

    /// Field group the batch writes: narration | annotation | duration | visual.
    #[arg(long, short = 'g')]
    pub group: FieldGroupArg,
}

impl ApplyArgs {
    pub fn run(self) -> Result<()> {
        let text = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read '{}'", self.file.display()))?;
        let producer = WireBatchProducer::new(self.group.into(), text);
        super::run_stage_command(&self.session, &producer)
    }
}
