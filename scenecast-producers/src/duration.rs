//! Synthesis-duration stage — writes `{duration}` from a timing collaborator.

use scenecast_core::{DurationValue, FieldGroup, SceneLedger, SceneUpdate, UpdateBatch};

use crate::error::{CollaboratorError, ProduceError};
use crate::producer::StageProducer;

/// Collaborator that maps narration text to a timing value, aligned by
/// index. May return [`DurationValue::Auto`] when timing should be derived
/// from synthesized-audio metadata later.
pub trait TimingSource {
    fn time(&self, texts: &[String]) -> Result<Vec<DurationValue>, CollaboratorError>;
}

#[derive(Debug)]
pub struct DurationProducer<S> {
    source: S,
}

impl<S: TimingSource> DurationProducer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: TimingSource> StageProducer for DurationProducer<S> {
    fn name(&self) -> &'static str {
        "duration"
    }

    fn field_group(&self) -> FieldGroup {
        FieldGroup::Duration
    }

    fn produce(&self, ledger: &SceneLedger) -> Result<UpdateBatch, ProduceError> {
        if ledger.is_empty() {
            return Err(ProduceError::precondition(
                FieldGroup::Duration,
                "no scenes on the ledger; run the narration stage first",
            ));
        }

        // Prefer the annotated narration; fall back to plain speech.
        let mut texts = Vec::with_capacity(ledger.len());
        for (i, record) in ledger.records().iter().enumerate() {
            match record.elevenlabs.as_ref().or(record.speech.as_ref()) {
                Some(text) => texts.push(text.clone()),
                None => {
                    return Err(ProduceError::precondition(
                        FieldGroup::Duration,
                        format!("scene {i} has no narration; run the narration stage first"),
                    ))
                }
            }
        }

        let durations = self.source.time(&texts)?;
        if durations.len() != texts.len() {
            return Err(CollaboratorError::failed(format!(
                "timing collaborator returned {} value(s) for {} scene(s)",
                durations.len(),
                texts.len()
            ))
            .into());
        }

        tracing::info!("timed {} scene(s)", durations.len());
        let updates = durations
            .into_iter()
            .enumerate()
            .map(|(i, d)| SceneUpdate::duration(i as i64, d))
            .collect();
        Ok(UpdateBatch::with_updates(FieldGroup::Duration, updates))
    }
}
