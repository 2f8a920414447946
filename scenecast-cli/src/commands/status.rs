//! `scenecast status` — per-scene field coverage across sessions.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use scenecast_core::{session, Session, SessionName, SCENE_FIELDS};

/// Arguments for `scenecast status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show a single session instead of all of them.
    #[arg(long, short = 's')]
    pub session: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let names = match self.session {
            Some(name) => vec![SessionName::from(name)],
            None => session::list_sessions_at(&home).context("failed to list sessions")?,
        };

        let mut reports = Vec::with_capacity(names.len());
        for name in &names {
            let s = session::load_at(&home, name)
                .with_context(|| format!("failed to load session '{name}'"))?;
            reports.push(build_report(&s));
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).context("failed to serialize status")?
            );
            return Ok(());
        }

        if reports.is_empty() {
            println!("No sessions. Run `scenecast init <name>` first.");
            return Ok(());
        }
        for report in reports {
            print_report(report);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SessionReport {
    session: String,
    scenes: usize,
    grounding_docs: usize,
    has_audio: bool,
    exported: bool,
    updated_at: String,
    coverage: Vec<SceneCoverage>,
}

#[derive(Debug, Serialize)]
struct SceneCoverage {
    index: usize,
    comment: bool,
    speech: bool,
    elevenlabs: bool,
    duration: bool,
    html: bool,
}

#[derive(Tabled)]
struct CoverageRow {
    #[tabled(rename = "scene")]
    index: usize,
    #[tabled(rename = "comment")]
    comment: String,
    #[tabled(rename = "speech")]
    speech: String,
    #[tabled(rename = "elevenlabs")]
    elevenlabs: String,
    #[tabled(rename = "duration")]
    duration: String,
    #[tabled(rename = "html")]
    html: String,
}

fn build_report(s: &Session) -> SessionReport {
    let coverage = s
        .scenes
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| SceneCoverage {
            index,
            comment: record.comment.is_some(),
            speech: record.speech.is_some(),
            elevenlabs: record.elevenlabs.is_some(),
            duration: record.duration.is_some(),
            html: record.html.is_some(),
        })
        .collect();

    SessionReport {
        session: s.name.to_string(),
        scenes: s.scenes.len(),
        grounding_docs: s.grounding.len(),
        has_audio: s.audio.is_some(),
        exported: s.export.is_some(),
        updated_at: s.updated_at.to_rfc3339(),
        coverage,
    }
}

fn print_report(report: SessionReport) {
    println!(
        "{} | {} scene(s) | {} grounding doc(s) | audio: {} | export: {}",
        report.session.bold(),
        report.scenes,
        report.grounding_docs,
        yes_no(report.has_audio),
        yes_no(report.exported),
    );

    if report.coverage.is_empty() {
        println!("  (empty ledger — run `scenecast narrate` to create scenes)");
        return;
    }

    let rows: Vec<CoverageRow> = report
        .coverage
        .into_iter()
        .map(|c| CoverageRow {
            index: c.index,
            comment: mark(c.comment),
            speech: mark(c.speech),
            elevenlabs: mark(c.elevenlabs),
            duration: mark(c.duration),
            html: mark(c.html),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn mark(present: bool) -> String {
    if present {
        "✓".green().to_string()
    } else {
        "·".bright_black().to_string()
    }
}

fn yes_no(b: bool) -> String {
    if b {
        "yes".green().to_string()
    } else {
        "no".bright_black().to_string()
    }
}
