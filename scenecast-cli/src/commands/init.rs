//! `scenecast init <name>`

use anyhow::{Context, Result};
use clap::Args;

use scenecast_core::{session, SessionName};

/// Create a new authoring session.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Session name, e.g. "intro_python". Creates
    /// ~/.scenecast/sessions/<name>/session.json
    pub name: String,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let session = session::init_at(&home, SessionName::from(self.name.clone()))
            .with_context(|| format!("failed to create session '{}'", self.name))?;

        println!("✓ Created session '{}'", session.name);
        println!("  Saved to: ~/.scenecast/sessions/{}/session.json", session.name);
        Ok(())
    }
}
