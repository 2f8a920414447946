//! Narration stage — writes `{comment, speech}` and may create new scenes.

use scenecast_core::{FieldGroup, SceneLedger, SceneUpdate, UpdateBatch};

use crate::error::{CollaboratorError, ProduceError};
use crate::producer::StageProducer;

/// One proposed scene script, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneScript {
    /// 1-sentence metadata comment for the scene.
    pub comment: String,
    /// The voiceover narration text.
    pub speech: String,
}

/// Collaborator that turns grounded source material into scene scripts.
///
/// Implementations are external (a model call, a slide deck splitter); the
/// producer only cares about the ordered rows coming back.
pub trait NarrationSource {
    fn narrate(&self) -> Result<Vec<SceneScript>, CollaboratorError>;
}

/// The narration producer. The only stage with no ledger precondition: an
/// empty ledger is its normal starting point, and its patches may target
/// indices beyond the current length.
#[derive(Debug)]
pub struct NarrationProducer<S> {
    source: S,
}

impl<S: NarrationSource> NarrationProducer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: NarrationSource> StageProducer for NarrationProducer<S> {
    fn name(&self) -> &'static str {
        "narration"
    }

    fn field_group(&self) -> FieldGroup {
        FieldGroup::Narration
    }

    fn produce(&self, _ledger: &SceneLedger) -> Result<UpdateBatch, ProduceError> {
        let scripts = self.source.narrate()?;
        tracing::info!("narration collaborator returned {} scene(s)", scripts.len());

        let updates = scripts
            .into_iter()
            .enumerate()
            .map(|(i, script)| SceneUpdate::narration(i as i64, script.comment, script.speech))
            .collect();
        Ok(UpdateBatch::with_updates(FieldGroup::Narration, updates))
    }
}
