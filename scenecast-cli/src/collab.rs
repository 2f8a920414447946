//! Offline collaborator implementations.
//!
//! The producers are collaborator-agnostic; these are the deterministic,
//! network-free strategies the CLI wires in. Each one targets the same trait
//! a model- or synthesis-backed collaborator would implement.

use scenecast_core::DurationValue;
use scenecast_producers::{
    AnnotationSource, CollaboratorError, NarrationSource, SceneBrief, SceneScript, TimingSource,
    VisualSource,
};

// ---------------------------------------------------------------------------
// Narration: markdown heading splitter
// ---------------------------------------------------------------------------

/// Splits grounded markdown into one scene per `#`-heading section.
///
/// The heading text becomes the scene comment; the section body, flattened to
/// a single line, becomes the speech. Documents without headings become a
/// single scene titled "Introduction".
pub struct HeadingNarrator {
    markdown: String,
}

impl HeadingNarrator {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }
}

impl NarrationSource for HeadingNarrator {
    fn narrate(&self) -> Result<Vec<SceneScript>, CollaboratorError> {
        let mut scripts: Vec<SceneScript> = Vec::new();
        let mut current: Option<(String, Vec<String>)> = None;

        for line in self.markdown.lines() {
            let trimmed = line.trim();
            if let Some(heading) = trimmed.strip_prefix('#') {
                if let Some((comment, body)) = current.take() {
                    push_script(&mut scripts, comment, body);
                }
                current = Some((heading.trim_start_matches('#').trim().to_owned(), Vec::new()));
            } else if !trimmed.is_empty() {
                match current.as_mut() {
                    Some((_, body)) => body.push(trimmed.to_owned()),
                    None => current = Some(("Introduction".to_owned(), vec![trimmed.to_owned()])),
                }
            }
        }
        if let Some((comment, body)) = current {
            push_script(&mut scripts, comment, body);
        }

        if scripts.is_empty() {
            return Err(CollaboratorError::failed(
                "grounding document has no narratable content",
            ));
        }
        Ok(scripts)
    }
}

fn push_script(scripts: &mut Vec<SceneScript>, comment: String, body: Vec<String>) {
    let speech = if body.is_empty() {
        comment.clone()
    } else {
        body.join(" ")
    };
    scripts.push(SceneScript { comment, speech });
}

// ---------------------------------------------------------------------------
// Annotation: expressive-tag inserter
// ---------------------------------------------------------------------------

/// Prefixes each speech with a delivery tag and inserts a short break after
/// every sentence, the markup the synthesis service understands.
pub struct TagAnnotator;

impl AnnotationSource for TagAnnotator {
    fn annotate(&self, speeches: &[String]) -> Result<Vec<String>, CollaboratorError> {
        Ok(speeches
            .iter()
            .map(|speech| {
                let with_breaks = speech.replace(". ", ". <break time=\"0.4s\" /> ");
                format!("[calm] {with_breaks}")
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Timing: words-per-minute estimate
// ---------------------------------------------------------------------------

/// Estimates spoken duration from word count at a fixed speaking rate.
pub struct WordRateTiming {
    words_per_minute: u32,
}

impl WordRateTiming {
    pub fn new(words_per_minute: u32) -> Self {
        Self { words_per_minute }
    }
}

impl TimingSource for WordRateTiming {
    fn time(&self, texts: &[String]) -> Result<Vec<DurationValue>, CollaboratorError> {
        if self.words_per_minute == 0 {
            return Err(CollaboratorError::failed("words-per-minute must be nonzero"));
        }
        Ok(texts
            .iter()
            .map(|text| {
                let words = text.split_whitespace().count() as f64;
                let seconds = words * 60.0 / f64::from(self.words_per_minute);
                DurationValue::Seconds((seconds * 100.0).round() / 100.0)
            })
            .collect())
    }
}

/// Defers every scene's timing to synthesis metadata (`"auto"`).
pub struct AutoTiming;

impl TimingSource for AutoTiming {
    fn time(&self, texts: &[String]) -> Result<Vec<DurationValue>, CollaboratorError> {
        Ok(texts.iter().map(|_| DurationValue::Auto).collect())
    }
}

// ---------------------------------------------------------------------------
// Visual: text-card renderer
// ---------------------------------------------------------------------------

/// Renders a plain titled text card per scene.
pub struct TextCardVisuals;

impl VisualSource for TextCardVisuals {
    fn render(&self, briefs: &[SceneBrief]) -> Result<Vec<String>, CollaboratorError> {
        Ok(briefs
            .iter()
            .map(|brief| {
                format!(
                    "<html><body><h1>{}</h1><p>{}</p></body></html>",
                    escape_html(&brief.comment),
                    escape_html(&brief.speech)
                )
            })
            .collect())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrator_splits_on_headings() {
        let md = "# Intro\n\nWelcome to the course.\nLet's begin.\n\n## Setup\n\nInstall it.\n";
        let scripts = HeadingNarrator::new(md).narrate().expect("narrate");
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].comment, "Intro");
        assert_eq!(scripts[0].speech, "Welcome to the course. Let's begin.");
        assert_eq!(scripts[1].comment, "Setup");
    }

    #[test]
    fn narrator_without_headings_yields_one_scene() {
        let scripts = HeadingNarrator::new("just a paragraph\n")
            .narrate()
            .expect("narrate");
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].comment, "Introduction");
        assert_eq!(scripts[0].speech, "just a paragraph");
    }

    #[test]
    fn narrator_rejects_empty_document() {
        assert!(HeadingNarrator::new("  \n\n").narrate().is_err());
    }

    #[test]
    fn annotator_tags_and_breaks() {
        let out = TagAnnotator
            .annotate(&["One. Two.".to_owned()])
            .expect("annotate");
        assert_eq!(out, vec!["[calm] One. <break time=\"0.4s\" /> Two."]);
    }

    #[test]
    fn word_rate_timing_rounds_to_centiseconds() {
        let out = WordRateTiming::new(150)
            .time(&["one two three".to_owned()])
            .expect("time");
        assert_eq!(out, vec![DurationValue::Seconds(1.2)]);
    }

    #[test]
    fn auto_timing_emits_sentinel() {
        let out = AutoTiming.time(&["anything".to_owned()]).expect("time");
        assert_eq!(out, vec![DurationValue::Auto]);
    }

    #[test]
    fn text_cards_escape_markup() {
        let briefs = vec![SceneBrief {
            index: 0,
            comment: "a < b".to_owned(),
            speech: "x & y".to_owned(),
        }];
        let out = TextCardVisuals.render(&briefs).expect("render");
        assert!(out[0].contains("a &lt; b"));
        assert!(out[0].contains("x &amp; y"));
    }
}
