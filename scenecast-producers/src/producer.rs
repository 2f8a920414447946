//! The stage producer capability contract.

use scenecast_core::{FieldGroup, SceneLedger, UpdateBatch};

use crate::error::ProduceError;

/// Anything that proposes an [`UpdateBatch`] for its field group.
///
/// Producers read the ledger, never write it: all commits pass through the
/// apply engine via the pipeline runner. A producer fails as a whole when a
/// precondition is missing or its collaborator cannot run; individually
/// malformed updates are left in the batch for the apply engine to skip.
pub trait StageProducer {
    /// Stable stage name for logs and reports.
    fn name(&self) -> &'static str;

    /// The single field group this producer writes.
    fn field_group(&self) -> FieldGroup;

    /// Propose a batch for the current ledger. May be empty.
    fn produce(&self, ledger: &SceneLedger) -> Result<UpdateBatch, ProduceError>;
}
