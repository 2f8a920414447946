//! Two-step stage runner: produce, then apply.
//!
//! The runner holds the `&mut` ledger borrow across both steps, so nothing
//! can observe or mutate the ledger between production and application, and
//! no producer output reaches the ledger except through the apply engine's
//! per-patch validation. Stages run strictly sequentially; at most one
//! runner is active per session.

use scenecast_core::{apply_batch, ApplyReport, SceneLedger};
use scenecast_producers::{ProduceError, StageProducer};

/// Lifecycle of one stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    AwaitingProduction,
    Produced,
    /// Terminal success.
    Applied,
    /// Terminal failure: the producer could not run; nothing was applied.
    ProductionFailed,
    /// Terminal failure on the apply side. Unreachable in practice — the
    /// apply engine skips malformed patches instead of failing — but kept
    /// so reports can name it.
    ApplyFailed,
}

impl std::fmt::Display for StageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageState::AwaitingProduction => write!(f, "awaiting_production"),
            StageState::Produced => write!(f, "produced"),
            StageState::Applied => write!(f, "applied"),
            StageState::ProductionFailed => write!(f, "production_failed"),
            StageState::ApplyFailed => write!(f, "apply_failed"),
        }
    }
}

/// Terminal outcome of [`run_stage`].
#[derive(Debug)]
pub enum StageOutcome {
    /// The batch was merged; the report says what was applied and skipped.
    Applied { report: ApplyReport },
    /// The producer failed; the ledger was not touched.
    ProductionFailed { error: ProduceError },
}

impl StageOutcome {
    pub fn state(&self) -> StageState {
        match self {
            StageOutcome::Applied { .. } => StageState::Applied,
            StageOutcome::ProductionFailed { .. } => StageState::ProductionFailed,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied { .. })
    }
}

/// Run one enrichment stage against the ledger.
///
/// Step 1 invokes the producer with a read-only ledger view; step 2 commits
/// the resulting batch through the apply engine. A producer failure is
/// terminal for the stage and leaves the ledger unchanged.
pub fn run_stage(ledger: &mut SceneLedger, producer: &dyn StageProducer) -> StageOutcome {
    let stage = producer.name();
    tracing::debug!("stage {stage}: {}", StageState::AwaitingProduction);

    let batch = match producer.produce(ledger) {
        Ok(batch) => batch,
        Err(error) => {
            tracing::warn!("stage {stage}: {} ({error})", StageState::ProductionFailed);
            return StageOutcome::ProductionFailed { error };
        }
    };
    tracing::debug!(
        "stage {stage}: {} ({} update(s))",
        StageState::Produced,
        batch.updates.len()
    );

    let report = apply_batch(ledger, &batch);
    tracing::info!(
        "stage {stage}: {} (updated {}, created {}, skipped {})",
        StageState::Applied,
        report.updated,
        report.created,
        report.skipped.len()
    );
    StageOutcome::Applied { report }
}

#[cfg(test)]
mod tests {
    use scenecast_core::{FieldGroup, SceneUpdate, UpdateBatch};
    use scenecast_producers::WireBatchProducer;

    use super::*;

    struct EmptyProducer;

    impl StageProducer for EmptyProducer {
        fn name(&self) -> &'static str {
            "empty"
        }
        fn field_group(&self) -> FieldGroup {
            FieldGroup::Narration
        }
        fn produce(
            &self,
            _ledger: &SceneLedger,
        ) -> Result<UpdateBatch, ProduceError> {
            Ok(UpdateBatch::new(FieldGroup::Narration))
        }
    }

    #[test]
    fn empty_batch_applies_successfully() {
        let mut ledger = SceneLedger::new();
        let outcome = run_stage(&mut ledger, &EmptyProducer);
        assert!(outcome.is_applied());
        assert_eq!(outcome.state(), StageState::Applied);
        match outcome {
            StageOutcome::Applied { report } => {
                assert_eq!(report.updated, 0);
                assert_eq!(report.created, 0);
            }
            StageOutcome::ProductionFailed { .. } => unreachable!(),
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn production_failure_leaves_ledger_untouched() {
        let mut ledger = SceneLedger::new();
        run_stage(
            &mut ledger,
            &WireBatchProducer::new(
                FieldGroup::Narration,
                r#"{"updates":[{"index":0,"comment":"c","speech":"s"}]}"#,
            ),
        );
        let before = ledger.clone();

        let outcome = run_stage(
            &mut ledger,
            &WireBatchProducer::new(FieldGroup::Annotation, "sorry, I can't do that"),
        );
        assert_eq!(outcome.state(), StageState::ProductionFailed);
        assert_eq!(ledger, before);
    }

    #[test]
    fn wire_producer_commits_through_the_engine() {
        let mut ledger = SceneLedger::new();
        let producer = WireBatchProducer::new(
            FieldGroup::Narration,
            r#"```json
{"updates":[{"index":0,"comment":"c0","speech":"s0"},{"index":2,"comment":"c2","speech":"s2"}]}
```"#,
        );
        let outcome = run_stage(&mut ledger, &producer);
        assert!(outcome.is_applied());
        assert_eq!(ledger.len(), 3);
        assert!(ledger.get(1).unwrap().is_blank());
    }

    #[test]
    fn malformed_entries_surface_in_the_report() {
        let mut ledger = SceneLedger::new();
        let producer = WireBatchProducer::new(
            FieldGroup::Narration,
            r#"{"updates":[{"index":0,"comment":"c0","speech":"s0"},{"index":1,"comment":"lonely"}]}"#,
        );
        let outcome = run_stage(&mut ledger, &producer);
        match outcome {
            StageOutcome::Applied { report } => {
                assert_eq!(report.updated, 1);
                assert_eq!(report.skipped.len(), 1);
            }
            StageOutcome::ProductionFailed { .. } => unreachable!(),
        }
    }

    #[test]
    fn state_display_names() {
        assert_eq!(StageState::AwaitingProduction.to_string(), "awaiting_production");
        assert_eq!(StageState::ApplyFailed.to_string(), "apply_failed");
    }
}
