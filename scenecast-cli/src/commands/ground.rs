//! `scenecast ground <path|url> --session <name>` — import source material.
//!
//! Grounding feeds the narration stage; it never touches the scene ledger.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use scenecast_core::{session, ArtifactKind};

/// Import a grounding document into the session's artifact store.
#[derive(Args, Debug)]
pub struct GroundArgs {
    /// Local file path or http(s) URL of a markdown or PDF document.
    pub source: String,

    /// Session to attach the document to.
    #[arg(long, short = 's')]
    pub session: String,
}

impl GroundArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let mut session = super::load_session(&home, &self.session)?;

        let (key, bytes) = fetch(&self.source)?;
        let (mime, kind) = classify(&key)?;

        let store = super::artifact_store(&home, &session);
        let artifact = store
            .save(&key, &bytes, mime, kind)
            .with_context(|| format!("failed to store grounding document '{key}'"))?;
        session.grounding.push(artifact.clone());
        session::save_at(&home, &mut session)
            .with_context(|| format!("failed to save session '{}'", self.session))?;

        println!(
            "✓ Grounded '{}' ({} bytes, {}) as '{}' v{}",
            self.source,
            bytes.len(),
            artifact.kind,
            artifact.key,
            artifact.version
        );
        Ok(())
    }
}

/// Read the document bytes and pick an artifact key (the file name).
fn fetch(source: &str) -> Result<(String, Vec<u8>)> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let key = source
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or("grounding.md")
            .to_owned();
        let response = ureq::get(source)
            .call()
            .with_context(|| format!("failed to fetch '{source}'"))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read response body from '{source}'"))?;
        return Ok((key, bytes));
    }

    let path = Path::new(source);
    let key = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("source path has no file name")?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok((key, bytes))
}

fn classify(key: &str) -> Result<(&'static str, ArtifactKind)> {
    let extension = key.rsplit('.').next().unwrap_or_default();
    match extension.to_ascii_lowercase().as_str() {
        "md" | "markdown" => Ok(("text/markdown", ArtifactKind::Markdown)),
        "pdf" => Ok(("application/pdf", ArtifactKind::Pdf)),
        other => bail!("unsupported grounding format '.{other}'; expected .md or .pdf"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_extensions() {
        assert_eq!(
            classify("notes.md").unwrap(),
            ("text/markdown", ArtifactKind::Markdown)
        );
        assert_eq!(
            classify("slides.PDF").unwrap(),
            ("application/pdf", ArtifactKind::Pdf)
        );
        assert!(classify("archive.zip").is_err());
    }

    #[test]
    fn fetch_local_file_uses_file_name_as_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lesson.md");
        std::fs::write(&path, "# Title\n").unwrap();
        let (key, bytes) = fetch(path.to_str().unwrap()).expect("fetch");
        assert_eq!(key, "lesson.md");
        assert_eq!(bytes, b"# Title\n");
    }
}
