//! Domain types for the scenecast scene ledger.
//!
//! A scene accumulates fields over the pipeline's lifetime; nothing is
//! required at creation. All types serialize via serde + serde_json.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for an authoring session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionName(pub String);

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SessionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Field groups
// ---------------------------------------------------------------------------

/// The set of scene fields one pipeline stage is responsible for writing.
///
/// Each enrichment stage proposes patches for exactly one group; the apply
/// engine rejects patches that carry fields belonging to another group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldGroup {
    /// `{comment, speech}` — written by the narration stage.
    Narration,
    /// `{elevenlabs}` — speech annotated with expressive markers.
    Annotation,
    /// `{duration}` — synthesized-audio timing.
    Duration,
    /// `{html}` — the visual markup for a scene.
    Visual,
}

/// Every scene field name, in ledger order.
pub const SCENE_FIELDS: [&str; 5] = ["comment", "speech", "elevenlabs", "duration", "html"];

impl FieldGroup {
    /// Field names this group is allowed to write.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FieldGroup::Narration => &["comment", "speech"],
            FieldGroup::Annotation => &["elevenlabs"],
            FieldGroup::Duration => &["duration"],
            FieldGroup::Visual => &["html"],
        }
    }

    /// True if `field` is a scene field owned by a *different* group.
    pub fn is_foreign(&self, field: &str) -> bool {
        SCENE_FIELDS.contains(&field) && !self.fields().contains(&field)
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldGroup::Narration => write!(f, "narration"),
            FieldGroup::Annotation => write!(f, "annotation"),
            FieldGroup::Duration => write!(f, "duration"),
            FieldGroup::Visual => write!(f, "visual"),
        }
    }
}

// ---------------------------------------------------------------------------
// Duration values
// ---------------------------------------------------------------------------

/// Parse failure for a [`DurationValue`] literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration '{0}': expected \"auto\" or seconds with an 's' suffix (e.g. \"5.23s\")")]
pub struct DurationParseError(pub String);

/// Scene timing, as carried on the wire: `"auto"` or `"<seconds>s"`.
///
/// `Auto` means "derive from synthesized-audio timing metadata, not yet
/// resolved at commit time".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DurationValue {
    Auto,
    Seconds(f64),
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationValue::Auto => write!(f, "auto"),
            DurationValue::Seconds(s) => write!(f, "{s}s"),
        }
    }
}

impl FromStr for DurationValue {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "auto" {
            return Ok(DurationValue::Auto);
        }
        let Some(num) = s.strip_suffix('s') else {
            return Err(DurationParseError(s.to_owned()));
        };
        match num.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(DurationValue::Seconds(v)),
            _ => Err(DurationParseError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for DurationValue {
    type Error = DurationParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DurationValue> for String {
    fn from(d: DurationValue) -> Self {
        d.to_string()
    }
}

// ---------------------------------------------------------------------------
// Scene records
// ---------------------------------------------------------------------------

/// One narrated unit of the output video.
///
/// The index is implicit — a record's position in the ledger — and is never
/// stored on the record itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevenlabs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl SceneRecord {
    /// True if no stage has written anything yet.
    pub fn is_blank(&self) -> bool {
        self.comment.is_none()
            && self.speech.is_none()
            && self.elevenlabs.is_none()
            && self.duration.is_none()
            && self.html.is_none()
    }
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// A single proposed patch, in wire shape.
///
/// Kept loose on purpose: producers hand these over exactly as received, and
/// the apply engine validates them against the batch's declared field group.
/// `index` is `None` when the wire object had no usable integer index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneUpdate {
    pub index: Option<i64>,
    pub fields: Map<String, Value>,
}

impl SceneUpdate {
    /// Build an update from a raw wire object, pulling `index` out of the map.
    pub fn from_object(mut fields: Map<String, Value>) -> Self {
        let index = fields.remove("index").and_then(|v| v.as_i64());
        Self { index, fields }
    }

    fn with_field(index: i64, key: &str, value: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(key.to_owned(), Value::String(value.into()));
        Self {
            index: Some(index),
            fields,
        }
    }

    /// `{comment, speech}` patch.
    pub fn narration(index: i64, comment: impl Into<String>, speech: impl Into<String>) -> Self {
        let mut u = Self::with_field(index, "comment", comment);
        u.fields
            .insert("speech".to_owned(), Value::String(speech.into()));
        u
    }

    /// `{elevenlabs}` patch.
    pub fn annotation(index: i64, elevenlabs: impl Into<String>) -> Self {
        Self::with_field(index, "elevenlabs", elevenlabs)
    }

    /// `{duration}` patch.
    pub fn duration(index: i64, duration: DurationValue) -> Self {
        Self::with_field(index, "duration", duration.to_string())
    }

    /// `{html}` patch.
    pub fn html(index: i64, html: impl Into<String>) -> Self {
        Self::with_field(index, "html", html)
    }
}

/// An ordered list of proposed patches for one field group.
///
/// Ephemeral: produced by a stage, consumed exactly once by the apply engine,
/// then discarded. Duplicate indices are allowed — last write wins per field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateBatch {
    pub field_group: FieldGroup,
    pub updates: Vec<SceneUpdate>,
}

impl UpdateBatch {
    pub fn new(field_group: FieldGroup) -> Self {
        Self {
            field_group,
            updates: Vec::new(),
        }
    }

    pub fn with_updates(field_group: FieldGroup, updates: Vec<SceneUpdate>) -> Self {
        Self {
            field_group,
            updates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// The payload category of a stored artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Pdf,
    Json,
    Markdown,
    Audio,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Pdf => write!(f, "pdf"),
            ArtifactKind::Json => write!(f, "json"),
            ArtifactKind::Markdown => write!(f, "markdown"),
            ArtifactKind::Audio => write!(f, "audio"),
        }
    }
}

/// An opaque key/version handle for a large binary payload.
///
/// The ledger never stores payload bytes inline; scenes reference artifacts
/// only through session-level state. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub key: String,
    pub version: u32,
    pub mime_type: String,
    pub kind: ArtifactKind,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
