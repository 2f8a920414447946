//! Visual stage — writes `{html}`, one slide per duration-bearing scene.
//!
//! Three alternative strategies implement [`VisualSource`]: reusing
//! imported slide images, generating new images, or co-creating layouts
//! interactively. The caller picks the strategy; the apply engine never
//! distinguishes them.

use scenecast_core::{FieldGroup, SceneLedger, SceneUpdate, UpdateBatch};

use crate::error::{CollaboratorError, ProduceError};
use crate::producer::StageProducer;

/// What a visual collaborator gets to work with, per scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneBrief {
    pub index: usize,
    pub comment: String,
    pub speech: String,
}

/// Collaborator that renders one HTML slide per brief, positionally aligned.
pub trait VisualSource {
    fn render(&self, briefs: &[SceneBrief]) -> Result<Vec<String>, CollaboratorError>;
}

/// Wrap a base64 image payload in the standard image-only slide markup.
pub fn image_slide(img_src: &str) -> String {
    format!(r#"<html><body><img style="width: 100%" src="{img_src}" /></body></html>"#)
}

#[derive(Debug)]
pub struct VisualProducer<S> {
    source: S,
}

impl<S: VisualSource> VisualProducer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: VisualSource> StageProducer for VisualProducer<S> {
    fn name(&self) -> &'static str {
        "visual"
    }

    fn field_group(&self) -> FieldGroup {
        FieldGroup::Visual
    }

    fn produce(&self, ledger: &SceneLedger) -> Result<UpdateBatch, ProduceError> {
        if ledger.is_empty() {
            return Err(ProduceError::precondition(
                FieldGroup::Visual,
                "no scenes on the ledger; run the narration stage first",
            ));
        }

        let mut briefs = Vec::with_capacity(ledger.len());
        for (index, record) in ledger.records().iter().enumerate() {
            if record.duration.is_none() {
                return Err(ProduceError::precondition(
                    FieldGroup::Visual,
                    format!("scene {index} has no duration; run the timing stage first"),
                ));
            }
            briefs.push(SceneBrief {
                index,
                comment: record.comment.clone().unwrap_or_default(),
                speech: record.speech.clone().unwrap_or_default(),
            });
        }

        let slides = self.source.render(&briefs)?;
        if slides.len() != briefs.len() {
            return Err(CollaboratorError::failed(format!(
                "visual collaborator returned {} slide(s) for {} scene(s)",
                slides.len(),
                briefs.len()
            ))
            .into());
        }

        tracing::info!("rendered {} slide(s)", slides.len());
        let updates = slides
            .into_iter()
            .enumerate()
            .map(|(i, html)| SceneUpdate::html(i as i64, html))
            .collect();
        Ok(UpdateBatch::with_updates(FieldGroup::Visual, updates))
    }
}
