//! Apply engine — deterministic positional merge of an update batch.
//!
//! ## Merge protocol
//!
//! For each update, in batch order:
//! 1. Validate against the batch's declared field group → [`ScenePatch`]
//!    or a [`SkipReason`].
//! 2. Index inside the ledger → field-level overwrite of that group's
//!    fields; unrelated fields on the record are untouched.
//! 3. Index beyond the ledger → blank records are appended up to and
//!    including the index, then the patch is applied. Extension is
//!    unconditional for every field group; the narration stage relies on it
//!    to create brand-new scenes at arbitrary positions.
//! 4. Invalid update → skipped with a reason; processing continues.
//!
//! Every patch is an absolute field assignment, so re-applying a batch is
//! idempotent. Later patches at the same index+field win.

use serde::Serialize;

use crate::ledger::SceneLedger;
use crate::types::{DurationValue, FieldGroup, SceneUpdate, UpdateBatch};

// ---------------------------------------------------------------------------
// Validated patches
// ---------------------------------------------------------------------------

/// A validated patch — the tagged form of a wire update, one variant per
/// field group.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenePatch {
    Narration { comment: String, speech: String },
    Annotation { elevenlabs: String },
    Duration { duration: DurationValue },
    Visual { html: String },
}

/// Why an individual update was excluded from application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum SkipReason {
    /// No `index` key, or its value was not an integer.
    MissingIndex,
    /// `index` was negative.
    NegativeIndex { index: i64 },
    /// A required field for the batch's group was absent.
    MissingField { field: &'static str },
    /// A required field was present but not text.
    WrongType { field: &'static str },
    /// The update carried a scene field owned by a different stage.
    ForeignField { field: String },
    /// `duration` text was neither `"auto"` nor `"<seconds>s"`.
    InvalidDuration { value: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingIndex => write!(f, "missing or non-integer index"),
            SkipReason::NegativeIndex { index } => write!(f, "negative index {index}"),
            SkipReason::MissingField { field } => write!(f, "missing required field '{field}'"),
            SkipReason::WrongType { field } => write!(f, "field '{field}' must be text"),
            SkipReason::ForeignField { field } => {
                write!(f, "field '{field}' belongs to another stage")
            }
            SkipReason::InvalidDuration { value } => write!(f, "invalid duration '{value}'"),
        }
    }
}

/// Validate one wire update against the declared field group.
///
/// Unknown keys that are not scene fields are ignored; scene fields owned by
/// another group invalidate the update (foreign-field hardening).
pub fn validate(update: &SceneUpdate, group: FieldGroup) -> Result<(usize, ScenePatch), SkipReason> {
    let index = update.index.ok_or(SkipReason::MissingIndex)?;
    if index < 0 {
        return Err(SkipReason::NegativeIndex { index });
    }

    for key in update.fields.keys() {
        if group.is_foreign(key) {
            return Err(SkipReason::ForeignField { field: key.clone() });
        }
    }

    let text = |field: &'static str| -> Result<String, SkipReason> {
        let value = update
            .fields
            .get(field)
            .ok_or(SkipReason::MissingField { field })?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or(SkipReason::WrongType { field })
    };

    let patch = match group {
        FieldGroup::Narration => ScenePatch::Narration {
            comment: text("comment")?,
            speech: text("speech")?,
        },
        FieldGroup::Annotation => ScenePatch::Annotation {
            elevenlabs: text("elevenlabs")?,
        },
        FieldGroup::Duration => {
            let raw = text("duration")?;
            let duration = raw
                .parse::<DurationValue>()
                .map_err(|_| SkipReason::InvalidDuration { value: raw })?;
            ScenePatch::Duration { duration }
        }
        FieldGroup::Visual => ScenePatch::Visual {
            html: text("html")?,
        },
    };

    Ok((index as usize, patch))
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// An update that was excluded from application, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedUpdate {
    pub update: SceneUpdate,
    pub reason: SkipReason,
}

/// Per-call outcome of [`apply_batch`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ApplyReport {
    /// Updates merged into the ledger.
    pub updated: usize,
    /// Blank records appended to cover out-of-range indices.
    pub created: usize,
    /// Updates excluded from application.
    pub skipped: Vec<SkippedUpdate>,
}

/// Merge `batch` into `ledger`, positionally and deterministically.
///
/// Never fails: malformed updates are skipped, not fatal. An empty batch is
/// a no-op that reports zero counts.
pub fn apply_batch(ledger: &mut SceneLedger, batch: &UpdateBatch) -> ApplyReport {
    let mut report = ApplyReport::default();

    for update in &batch.updates {
        let (index, patch) = match validate(update, batch.field_group) {
            Ok(validated) => validated,
            Err(reason) => {
                report.skipped.push(SkippedUpdate {
                    update: update.clone(),
                    reason,
                });
                continue;
            }
        };

        report.created += ledger.extend_to(index);
        // extend_to guarantees the index is covered
        let Some(record) = ledger.record_mut(index) else {
            continue;
        };

        match patch {
            ScenePatch::Narration { comment, speech } => {
                record.comment = Some(comment);
                record.speech = Some(speech);
            }
            ScenePatch::Annotation { elevenlabs } => record.elevenlabs = Some(elevenlabs),
            ScenePatch::Duration { duration } => record.duration = Some(duration),
            ScenePatch::Visual { html } => record.html = Some(html),
        }
        report.updated += 1;
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
