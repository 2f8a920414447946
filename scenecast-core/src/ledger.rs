//! The scene ledger — the canonical, ordered, growable sequence of scenes.
//!
//! The ledger is shared by every pipeline stage but exposes no public
//! mutator: all writes funnel through [`crate::apply::apply_batch`], which
//! lives in this crate precisely so it can reach the `pub(crate)` mutation
//! API. The ledger grows monotonically; it never shrinks or reorders.

use serde::{Deserialize, Serialize};

use crate::types::SceneRecord;

/// Ordered sequence of [`SceneRecord`]s, addressable by integer index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneLedger {
    scenes: Vec<SceneRecord>,
}

impl SceneLedger {
    /// A fresh, empty ledger — the state at the start of every session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the full sequence.
    pub fn records(&self) -> &[SceneRecord] {
        &self.scenes
    }

    /// The record at `index`, if the ledger covers it.
    pub fn get(&self, index: usize) -> Option<&SceneRecord> {
        self.scenes.get(index)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Empty-ledger reads are valid for early pipeline stages.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Grow the ledger with blank records so that `index` is covered.
    ///
    /// Returns the number of records created. Zero if already covered.
    pub(crate) fn extend_to(&mut self, index: usize) -> usize {
        let mut created = 0;
        while self.scenes.len() <= index {
            self.scenes.push(SceneRecord::default());
            created += 1;
        }
        created
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> Option<&mut SceneRecord> {
        self.scenes.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ledger_reads_are_valid() {
        let ledger = SceneLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert!(ledger.records().is_empty());
        assert!(ledger.get(0).is_none());
    }

    #[test]
    fn extend_to_creates_blank_records() {
        let mut ledger = SceneLedger::new();
        assert_eq!(ledger.extend_to(2), 3);
        assert_eq!(ledger.len(), 3);
        assert!(ledger.records().iter().all(|r| r.is_blank()));
        // already covered — no-op
        assert_eq!(ledger.extend_to(1), 0);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn serde_shape_is_a_bare_array() {
        let mut ledger = SceneLedger::new();
        ledger.extend_to(1);
        let v = serde_json::to_value(&ledger).unwrap();
        assert_eq!(v, serde_json::json!([{}, {}]));
    }
}
