//! Inbound chain request parsing

use serde::Deserialize;
use validator::Validate;

use super::{StepContext, StepKind};
use crate::domain::llm::Message;
use crate::domain::DomainError;

/// Maximum prompt length in characters
pub const MAX_PROMPT_CHARS: usize = 280;

// `validator` length bounds are u64.
const MAX_PROMPT_CHARS_U64: u64 = MAX_PROMPT_CHARS as u64;

/// Request fields exactly as received; nothing is checked yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawChainRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl RawChainRequest {
    /// Collect form fields in arrival order; repeated `steps` and `messages`
    /// keep their relative order and unknown fields are ignored
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();

        for (key, value) in pairs {
            match key.as_ref() {
                "prompt" => raw.prompt = Some(value.into()),
                "steps" | "steps[]" => raw.steps.push(value.into()),
                "messages" | "messages[]" => raw.messages.push(value.into()),
                _ => {}
            }
        }

        raw
    }
}

#[derive(Debug, Validate)]
struct PromptField {
    #[validate(length(
        min = 1,
        max = MAX_PROMPT_CHARS_U64,
        message = "Prompt must be between 1 and 280 characters"
    ))]
    prompt: String,
}

/// A validated chain request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRequest {
    prompt: String,
    steps: Vec<StepKind>,
    contexts: Vec<StepContext>,
}

impl ChainRequest {
    /// Validate a raw request. Every failure here is a caller error.
    pub fn parse(raw: RawChainRequest) -> Result<Self, DomainError> {
        let prompt = raw
            .prompt
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| DomainError::request("Missing prompt"))?;

        PromptField {
            prompt: prompt.to_string(),
        }
        .validate()
        .map_err(|e| DomainError::request(e.to_string()))?;

        if raw.steps.is_empty() {
            return Err(DomainError::request("At least one step is required"));
        }

        let steps = raw
            .steps
            .iter()
            .map(|s| s.parse::<StepKind>())
            .collect::<Result<Vec<_>, _>>()?;

        let contexts = parse_contexts(&raw.messages, steps.len())?;

        Ok(Self {
            prompt: prompt.to_string(),
            steps,
            contexts,
        })
    }

    /// The trimmed prompt
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn steps(&self) -> &[StepKind] {
        &self.steps
    }

    pub fn contexts(&self) -> &[StepContext] {
        &self.contexts
    }
}

/// Decode per-step histories. Omitting `messages` entirely means every step
/// is absent; otherwise there must be one entry per step, empty meaning
/// absent. Once a step has an explicit history, every later step needs one
/// too.
fn parse_contexts(entries: &[String], step_count: usize) -> Result<Vec<StepContext>, DomainError> {
    if entries.is_empty() {
        return Ok(vec![StepContext::Absent; step_count]);
    }

    if entries.len() != step_count {
        return Err(DomainError::request(format!(
            "Got {} message histories for {} steps",
            entries.len(),
            step_count
        )));
    }

    let mut contexts = Vec::with_capacity(entries.len());
    let mut explicit_from = None;

    for (index, entry) in entries.iter().enumerate() {
        let context = parse_context(index, entry)?;

        match (&context, explicit_from) {
            (StepContext::Explicit(_), None) => explicit_from = Some(index),
            (StepContext::Absent, Some(first)) => {
                return Err(DomainError::request(format!(
                    "Message history for step {} is missing but step {} has one; \
                     steps after an explicit history need their own",
                    index, first
                )));
            }
            _ => {}
        }

        contexts.push(context);
    }

    Ok(contexts)
}

fn parse_context(index: usize, entry: &str) -> Result<StepContext, DomainError> {
    let entry = entry.trim();

    if entry.is_empty() {
        return Ok(StepContext::Absent);
    }

    let history: Vec<Message> = serde_json::from_str(entry).map_err(|e| {
        DomainError::request(format!("Invalid message history for step {}: {}", index, e))
    })?;

    if history.is_empty() {
        return Err(DomainError::request(format!(
            "Message history for step {} is an empty list; omit it instead",
            index
        )));
    }

    Ok(StepContext::Explicit(history))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(prompt: &str, steps: &[&str], messages: &[&str]) -> RawChainRequest {
        RawChainRequest {
            prompt: Some(prompt.to_string()),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            messages: messages.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let raw = RawChainRequest::from_pairs(vec![
            ("steps", "components"),
            ("prompt", "make a button"),
            ("messages", ""),
            ("steps", "instances"),
            ("messages", "[]"),
            ("other", "ignored"),
        ]);

        assert_eq!(raw.prompt.as_deref(), Some("make a button"));
        assert_eq!(raw.steps, vec!["components", "instances"]);
        assert_eq!(raw.messages, vec!["", "[]"]);
    }

    #[test]
    fn test_parse_minimal_request() {
        let request = ChainRequest::parse(raw("  make a button  ", &["instances"], &[])).unwrap();

        assert_eq!(request.prompt(), "make a button");
        assert_eq!(request.steps(), &[StepKind::Instances]);
        assert_eq!(request.contexts(), &[StepContext::Absent]);
    }

    #[test]
    fn test_missing_prompt() {
        let mut request = raw("", &["instances"], &[]);
        request.prompt = None;

        assert!(matches!(
            ChainRequest::parse(request),
            Err(DomainError::Request { .. })
        ));
    }

    #[test]
    fn test_blank_prompt() {
        assert!(ChainRequest::parse(raw("   ", &["instances"], &[])).is_err());
    }

    #[test]
    fn test_prompt_length_bound_counts_characters() {
        let at_limit = "é".repeat(MAX_PROMPT_CHARS);
        assert!(ChainRequest::parse(raw(&at_limit, &["layout"], &[])).is_ok());

        let over_limit = "a".repeat(MAX_PROMPT_CHARS + 1);
        let err = ChainRequest::parse(raw(&over_limit, &["layout"], &[])).unwrap_err();
        assert!(err.to_string().contains("280"));
    }

    #[test]
    fn test_no_steps() {
        assert!(ChainRequest::parse(raw("p", &[], &[])).is_err());
    }

    #[test]
    fn test_unknown_step() {
        let err = ChainRequest::parse(raw("p", &["components", "widgets"], &[])).unwrap_err();
        assert!(err.to_string().contains("widgets"));
    }

    #[test]
    fn test_explicit_history() {
        let request = ChainRequest::parse(raw(
            "p",
            &["components", "instances"],
            &["", r#"[{"role":"user","content":"x"}]"#],
        ))
        .unwrap();

        assert_eq!(
            request.contexts(),
            &[
                StepContext::Absent,
                StepContext::Explicit(vec![Message::user("x")])
            ]
        );
    }

    #[test]
    fn test_absent_history_after_explicit_rejected() {
        let err = ChainRequest::parse(raw(
            "p",
            &["components", "instances"],
            &[r#"[{"role":"user","content":"x"}]"#, ""],
        ))
        .unwrap_err();

        assert!(matches!(err, DomainError::Request { .. }));
        assert!(err.to_string().contains("step 1"));
    }

    #[test]
    fn test_explicit_history_on_every_step() {
        let history = r#"[{"role":"user","content":"x"}]"#;
        let request = ChainRequest::parse(raw(
            "p",
            &["components", "instances", "layout"],
            &["", history, history],
        ))
        .unwrap();

        assert_eq!(request.contexts()[0], StepContext::Absent);
        assert!(request.contexts()[1..]
            .iter()
            .all(|c| matches!(c, StepContext::Explicit(_))));
    }

    #[test]
    fn test_history_count_mismatch() {
        let err = ChainRequest::parse(raw("p", &["components", "instances"], &[""])).unwrap_err();
        assert!(err.to_string().contains("1 message histories for 2 steps"));
    }

    #[test]
    fn test_malformed_history() {
        let err = ChainRequest::parse(raw("p", &["components"], &["{not json"])).unwrap_err();
        assert!(matches!(err, DomainError::Request { .. }));
        assert!(err.to_string().contains("step 0"));
    }

    #[test]
    fn test_history_with_unknown_role() {
        let history = r#"[{"role":"tool","content":"x"}]"#;
        assert!(ChainRequest::parse(raw("p", &["components"], &[history])).is_err());
    }

    #[test]
    fn test_empty_history_list_rejected() {
        let err = ChainRequest::parse(raw("p", &["components"], &["[]"])).unwrap_err();
        assert!(err.to_string().contains("empty list"));
    }
}
