//! JSON extraction from free-form completion replies
//!
//! Replies are tried as plain JSON first. When that fails the reply is read
//! as Markdown and its fenced code blocks become candidates: blocks tagged
//! `json` go to the front of the list, untagged blocks to the back, and
//! blocks in any other language are skipped. Only the first candidate is
//! parsed.

use std::collections::VecDeque;
use std::fmt;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use serde_json::Value;
use tracing::debug;

/// Failure to recover JSON from a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    no_code_blocks: bool,
    original: Option<String>,
}

impl ExtractionError {
    /// True when the Markdown scan found no usable code block at all
    pub fn no_code_blocks(&self) -> bool {
        self.no_code_blocks
    }

    /// The raw reply, only kept outside production mode
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response parsing failed")?;

        if self.no_code_blocks {
            write!(f, "; no code blocks found")?;
        }

        if let Some(ref original) = self.original {
            write!(f, "\n\nOriginal response:\n{}", original)?;
        }

        Ok(())
    }
}

impl std::error::Error for ExtractionError {}

/// Recovers a JSON value from a completion reply
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor {
    production_mode: bool,
}

impl JsonExtractor {
    pub fn new(production_mode: bool) -> Self {
        Self { production_mode }
    }

    /// Extract a JSON value from `text`. Never mutates or keeps the input.
    pub fn extract(&self, text: &str) -> Result<Value, ExtractionError> {
        let trimmed = text.trim();

        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return Ok(value);
        }

        let candidates = code_block_candidates(trimmed);
        debug!(
            candidates = candidates.len(),
            "Direct JSON parse failed, scanning fenced code blocks"
        );

        match candidates.front() {
            Some(candidate) => serde_json::from_str::<Value>(candidate.trim())
                .map_err(|e| {
                    debug!(error = %e, "First code block candidate is not valid JSON");
                    self.error(text, false)
                }),
            None => Err(self.error(text, true)),
        }
    }

    fn error(&self, text: &str, no_code_blocks: bool) -> ExtractionError {
        ExtractionError {
            no_code_blocks,
            original: (!self.production_mode).then(|| text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceTag {
    Json,
    Untagged,
    Other,
}

impl FenceTag {
    fn from_info(info: &str) -> Self {
        match info.split_whitespace().next() {
            None => Self::Untagged,
            Some(lang) if lang.eq_ignore_ascii_case("json") => Self::Json,
            Some(_) => Self::Other,
        }
    }
}

/// Collect fenced code block bodies in priority order
fn code_block_candidates(markdown: &str) -> VecDeque<String> {
    let mut candidates = VecDeque::new();
    let mut current: Option<(FenceTag, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some((FenceTag::from_info(&info), String::new()));
            }
            Event::Text(text) => {
                if let Some((_, ref mut body)) = current {
                    body.push_str(&text);
                }
            }
            Event::End(Tag::CodeBlock(_)) => match current.take() {
                Some((FenceTag::Json, body)) => candidates.push_front(body),
                Some((FenceTag::Untagged, body)) => candidates.push_back(body),
                Some((FenceTag::Other, _)) | None => {}
            },
            _ => {}
        }
    }

    candidates
}
