//! Subcommand implementations. One `Args` struct with a `run()` per command.

pub mod annotate;
pub mod apply;
pub mod export;
pub mod ground;
pub mod init;
pub mod narrate;
pub mod status;
pub mod time;
pub mod visualize;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;

use scenecast_core::{session, ApplyReport, Session, SessionName};
use scenecast_pipeline::{run_stage, ArtifactStore, StageOutcome};
use scenecast_producers::StageProducer;

/// Home directory, resolved once per command.
pub(crate) fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

pub(crate) fn load_session(home: &Path, name: &str) -> Result<Session> {
    session::load_at(home, &SessionName::from(name))
        .with_context(|| format!("failed to load session '{name}' — run `scenecast init` first"))
}

pub(crate) fn artifact_store(home: &Path, session: &Session) -> ArtifactStore {
    ArtifactStore::new(session::artifacts_dir_at(home, &session.name))
}

/// Load the session, run exactly one stage, persist, and report.
///
/// A production failure prints the actionable message and exits nonzero
/// without saving; the session file on disk is untouched.
pub(crate) fn run_stage_command(name: &str, producer: &dyn StageProducer) -> Result<()> {
    let home = home()?;
    let mut session = load_session(&home, name)?;

    match run_stage(&mut session.scenes, producer) {
        StageOutcome::Applied { report } => {
            session::save_at(&home, &mut session)
                .with_context(|| format!("failed to save session '{name}'"))?;
            print_report(producer.name(), &report);
            Ok(())
        }
        StageOutcome::ProductionFailed { error } => {
            bail!("{} stage failed: {error}", producer.name());
        }
    }
}

pub(crate) fn print_report(stage: &str, report: &ApplyReport) {
    println!(
        "{} {stage} applied ({} updated, {} created, {} skipped)",
        "✓".green().bold(),
        report.updated,
        report.created,
        report.skipped.len()
    );
    for skip in &report.skipped {
        let index = skip
            .update
            .index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "?".to_owned());
        println!(
            "  {} scene {index}: {}",
            "skipped".yellow(),
            skip.reason
        );
    }
}
