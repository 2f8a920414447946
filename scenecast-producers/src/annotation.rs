//! Annotation stage — writes `{elevenlabs}`, derived from `speech`.
//!
//! `speech` is retained alongside the annotated text; this stage never
//! creates new scenes.

use scenecast_core::{FieldGroup, SceneLedger, SceneUpdate, UpdateBatch};

use crate::error::{CollaboratorError, ProduceError};
use crate::producer::StageProducer;

/// Collaborator that decorates narration with expressive markers
/// (`[thoughtful]`, `[short pause]`, …), one output per input, aligned by
/// index.
pub trait AnnotationSource {
    fn annotate(&self, speeches: &[String]) -> Result<Vec<String>, CollaboratorError>;
}

#[derive(Debug)]
pub struct AnnotationProducer<S> {
    source: S,
}

impl<S: AnnotationSource> AnnotationProducer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: AnnotationSource> StageProducer for AnnotationProducer<S> {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn field_group(&self) -> FieldGroup {
        FieldGroup::Annotation
    }

    fn produce(&self, ledger: &SceneLedger) -> Result<UpdateBatch, ProduceError> {
        if ledger.is_empty() {
            return Err(ProduceError::precondition(
                FieldGroup::Annotation,
                "no scenes on the ledger; run the narration stage first",
            ));
        }

        let mut speeches = Vec::with_capacity(ledger.len());
        for (i, record) in ledger.records().iter().enumerate() {
            match &record.speech {
                Some(speech) => speeches.push(speech.clone()),
                None => {
                    return Err(ProduceError::precondition(
                        FieldGroup::Annotation,
                        format!("scene {i} has no speech; run the narration stage first"),
                    ))
                }
            }
        }

        let annotated = self.source.annotate(&speeches)?;
        if annotated.len() != speeches.len() {
            return Err(CollaboratorError::failed(format!(
                "annotation collaborator returned {} value(s) for {} scene(s)",
                annotated.len(),
                speeches.len()
            ))
            .into());
        }

        tracing::info!("annotated {} scene(s)", annotated.len());
        let updates = annotated
            .into_iter()
            .enumerate()
            .map(|(i, text)| SceneUpdate::annotation(i as i64, text))
            .collect();
        Ok(UpdateBatch::with_updates(FieldGroup::Annotation, updates))
    }
}

#[cfg(test)]
mod tests {
    use scenecast_core::apply_batch;

    use super::*;

    struct UppercaseSource;

    impl AnnotationSource for UppercaseSource {
        fn annotate(&self, speeches: &[String]) -> Result<Vec<String>, CollaboratorError> {
            Ok(speeches.iter().map(|s| format!("[warm] {s}")).collect())
        }
    }

    struct ShortSource;

    impl AnnotationSource for ShortSource {
        fn annotate(&self, _speeches: &[String]) -> Result<Vec<String>, CollaboratorError> {
            Ok(vec!["only one".into()])
        }
    }

    fn narrated_ledger(n: i64) -> SceneLedger {
        let mut ledger = SceneLedger::new();
        let batch = UpdateBatch::with_updates(
            FieldGroup::Narration,
            (0..n)
                .map(|i| SceneUpdate::narration(i, format!("c{i}"), format!("s{i}")))
                .collect(),
        );
        apply_batch(&mut ledger, &batch);
        ledger
    }

    #[test]
    fn annotates_every_scene_by_index() {
        let ledger = narrated_ledger(3);
        let batch = AnnotationProducer::new(UppercaseSource)
            .produce(&ledger)
            .expect("produce");
        assert_eq!(batch.updates.len(), 3);
        assert_eq!(
            batch.updates[2].fields.get("elevenlabs").unwrap(),
            "[warm] s2"
        );
    }

    #[test]
    fn empty_ledger_is_a_precondition_error() {
        let err = AnnotationProducer::new(UppercaseSource)
            .produce(&SceneLedger::new())
            .unwrap_err();
        assert!(matches!(err, ProduceError::Precondition { .. }));
        assert!(err.to_string().contains("narration"));
    }

    #[test]
    fn scene_without_speech_is_a_precondition_error() {
        let mut ledger = narrated_ledger(1);
        // extend with a blank record via an out-of-range annotation the
        // engine will happily create, then check the producer refuses it
        apply_batch(
            &mut ledger,
            &UpdateBatch::with_updates(
                FieldGroup::Visual,
                vec![SceneUpdate::html(1, "<div/>")],
            ),
        );
        let err = AnnotationProducer::new(UppercaseSource)
            .produce(&ledger)
            .unwrap_err();
        assert!(err.to_string().contains("scene 1 has no speech"));
    }

    #[test]
    fn misaligned_collaborator_output_is_a_failure() {
        let ledger = narrated_ledger(2);
        let err = AnnotationProducer::new(ShortSource)
            .produce(&ledger)
            .unwrap_err();
        assert!(matches!(err, ProduceError::Collaborator(_)));
    }
}
