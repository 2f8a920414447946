//! Scenecast — tutorial-video scene pipeline CLI.
//!
//! # Usage
//!
//! ```text
//! scenecast init <name>
//! scenecast ground <path|url> --session <name>
//! scenecast narrate --session <name>
//! scenecast annotate --session <name>
//! scenecast time --session <name> [--wpm N | --auto]
//! scenecast visualize --session <name>
//! scenecast apply <file> --session <name> --group narration|annotation|duration|visual
//! scenecast status [--session <name>] [--json]
//! scenecast export --session <name> --audio <mp3>
//! ```

mod collab;
mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    annotate::AnnotateArgs, apply::ApplyArgs, export::ExportArgs, ground::GroundArgs,
    init::InitArgs, narrate::NarrateArgs, status::StatusArgs, time::TimeArgs,
    visualize::VisualizeArgs,
};
use scenecast_core::FieldGroup;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "scenecast",
    version,
    about = "Turn grounded source material into a narrated scene-by-scene video package",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new authoring session with an empty scene ledger.
    Init(InitArgs),

    /// Import grounding material (markdown/PDF, local file or URL).
    Ground(GroundArgs),

    /// Narration stage: split grounded markdown into commented scenes.
    Narrate(NarrateArgs),

    /// Annotation stage: add expressive markers to each scene's speech.
    Annotate(AnnotateArgs),

    /// Timing stage: estimate per-scene audio durations.
    Time(TimeArgs),

    /// Visual stage: render one HTML slide per scene.
    Visualize(VisualizeArgs),

    /// Apply a raw update-batch file (e.g. co-created HTML) to the ledger.
    Apply(ApplyArgs),

    /// Show per-scene field coverage for one or all sessions.
    Status(StatusArgs),

    /// Attach the voiceover audio and build the final export JSON.
    Export(ExportArgs),
}

// ---------------------------------------------------------------------------
// Shared FieldGroup argument — parsed from CLI strings, converts to core type
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `FieldGroup` from CLI args.
#[derive(Debug, Clone)]
pub struct FieldGroupArg(pub FieldGroup);

impl FromStr for FieldGroupArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "narration" => Ok(Self(FieldGroup::Narration)),
            "annotation" => Ok(Self(FieldGroup::Annotation)),
            "duration" => Ok(Self(FieldGroup::Duration)),
            "visual" => Ok(Self(FieldGroup::Visual)),
            other => Err(format!(
                "unknown field group '{other}'; expected: narration, annotation, duration, visual"
            )),
        }
    }
}

impl fmt::Display for FieldGroupArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<FieldGroupArg> for FieldGroup {
    fn from(g: FieldGroupArg) -> Self {
        g.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Ground(args) => args.run(),
        Commands::Narrate(args) => args.run(),
        Commands::Annotate(args) => args.run(),
        Commands::Time(args) => args.run(),
        Commands::Visualize(args) => args.run(),
        Commands::Apply(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Export(args) => args.run(),
    }
}
