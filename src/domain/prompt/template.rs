//! Step prompt templates
//!
//! A template is opaque text with exactly one `${var:prompt}` marker, which
//! is replaced by the user's trimmed prompt at render time.

use thiserror::Error;

/// The substitution marker every step template must contain once
pub const PROMPT_MARKER: &str = "${var:prompt}";

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template is missing the {marker} marker")]
    MissingMarker { marker: &'static str },

    #[error("Template contains the {marker} marker {count} times, expected once")]
    RepeatedMarker { marker: &'static str, count: usize },
}

/// A validated step template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    content: String,
}

impl PromptTemplate {
    /// Parse a template string, checking the marker appears exactly once
    pub fn parse(content: impl Into<String>) -> Result<Self, TemplateError> {
        let content = content.into();

        match content.matches(PROMPT_MARKER).count() {
            0 => Err(TemplateError::MissingMarker {
                marker: PROMPT_MARKER,
            }),
            1 => Ok(Self { content }),
            count => Err(TemplateError::RepeatedMarker {
                marker: PROMPT_MARKER,
                count,
            }),
        }
    }

    /// Get the original template content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Insert the prompt, trimmed, in place of the marker
    pub fn render(&self, prompt: &str) -> String {
        self.content.replacen(PROMPT_MARKER, prompt.trim(), 1)
    }
}
