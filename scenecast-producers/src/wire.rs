//! Wire format for producer output.
//!
//! Stage-internal contract: `{"updates":[{"index":0,"<field>":"…"},…]}` —
//! one object per patch, never the full ledger. Model output sometimes
//! arrives wrapped in markdown code fences; the parser strips them first.

use serde_json::Value;

use scenecast_core::{FieldGroup, SceneLedger, SceneUpdate, UpdateBatch};

use crate::error::{ProduceError, WireError};
use crate::producer::StageProducer;

/// Strip a surrounding ```` ```json … ``` ```` fence, if present.
///
/// Returns the inner text unchanged when no fence is found; the caller will
/// attempt JSON parsing either way.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line ("```json" or bare "```"), then the closing fence.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => return trimmed,
    };
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => trimmed,
    }
}

/// Parse producer text into an [`UpdateBatch`] for `field_group`.
///
/// Whole-document parse failure is [`WireError`] — zero valid patches, the
/// caller retries. Entries that are not JSON objects are dropped here;
/// object entries are preserved losslessly for the apply engine to validate.
pub fn parse_batch(text: &str, field_group: FieldGroup) -> Result<UpdateBatch, WireError> {
    let value: Value = serde_json::from_str(extract_json(text))?;
    let entries = value
        .get("updates")
        .and_then(Value::as_array)
        .ok_or(WireError::MissingUpdates)?;

    let mut updates = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::Object(map) => updates.push(SceneUpdate::from_object(map.clone())),
            other => {
                tracing::warn!("dropping non-object wire entry: {other}");
            }
        }
    }
    Ok(UpdateBatch::with_updates(field_group, updates))
}

/// A producer backed by a pre-captured block of wire text.
///
/// This is the co-creation path: updates authored outside the pipeline (for
/// example pasted from an interactive model session) still commit through
/// the same produce-then-apply sequence as every other stage.
#[derive(Debug, Clone)]
pub struct WireBatchProducer {
    field_group: FieldGroup,
    text: String,
}

impl WireBatchProducer {
    pub fn new(field_group: FieldGroup, text: impl Into<String>) -> Self {
        Self {
            field_group,
            text: text.into(),
        }
    }
}

impl StageProducer for WireBatchProducer {
    fn name(&self) -> &'static str {
        "wire"
    }

    fn field_group(&self) -> FieldGroup {
        self.field_group
    }

    fn produce(&self, _ledger: &SceneLedger) -> Result<UpdateBatch, ProduceError> {
        let batch = parse_batch(&self.text, self.field_group)?;
        tracing::debug!(
            "wire batch parsed: {} update(s) for {}",
            batch.updates.len(),
            self.field_group
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("{\"updates\":[]}")]
    #[case("```json\n{\"updates\":[]}\n```")]
    #[case("```\n{\"updates\":[]}\n```")]
    #[case("  {\"updates\":[]}  ")]
    fn parses_fenced_and_bare_json(#[case] text: &str) {
        let batch = parse_batch(text, FieldGroup::Visual).expect("parse");
        assert!(batch.is_empty());
    }

    #[test]
    fn parses_updates_with_indices() {
        let text = r#"{"updates":[{"index":0,"html":"<div/>"},{"index":3,"html":"<p/>"}]}"#;
        let batch = parse_batch(text, FieldGroup::Visual).expect("parse");
        assert_eq!(batch.updates.len(), 2);
        assert_eq!(batch.updates[1].index, Some(3));
    }

    #[test]
    fn garbage_is_a_wire_error() {
        let err = parse_batch("here are your slides!", FieldGroup::Visual).unwrap_err();
        assert!(matches!(err, WireError::Json(_)));
    }

    #[test]
    fn missing_updates_key_is_a_wire_error() {
        let err = parse_batch(r#"{"scenes":[]}"#, FieldGroup::Visual).unwrap_err();
        assert!(matches!(err, WireError::MissingUpdates));
    }

    #[test]
    fn non_object_entries_are_dropped() {
        let text = r#"{"updates":[{"index":0,"html":"<div/>"},"oops",7]}"#;
        let batch = parse_batch(text, FieldGroup::Visual).expect("parse");
        assert_eq!(batch.updates.len(), 1);
    }

    #[test]
    fn wire_producer_reports_malformed_output() {
        let producer = WireBatchProducer::new(FieldGroup::Visual, "not json");
        let err = producer.produce(&SceneLedger::new()).unwrap_err();
        assert!(matches!(err, ProduceError::Malformed(_)));
    }

    #[test]
    fn unterminated_fence_falls_through_to_json_error() {
        let err = parse_batch("```json\n{\"updates\":[]}", FieldGroup::Visual).unwrap_err();
        assert!(matches!(err, WireError::Json(_)));
    }
}
