use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::llm::{Message, Usage};
use crate::domain::prompt::PromptTemplate;
use crate::domain::DomainError;

/// The closed set of chain stage identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Pick the library components the request needs
    Components,
    /// Instantiate the chosen components with concrete props
    Instances,
    /// Arrange instances on the page
    Layout,
}

impl StepKind {
    pub const ALL: [StepKind; 3] = [Self::Components, Self::Instances, Self::Layout];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Instances => "instances",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::request(format!("Unknown step identifier '{}'", s)))
    }
}

/// One stage of a chain: its identifier and the template it renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    kind: StepKind,
    template: PromptTemplate,
}

impl ChainStep {
    pub fn new(kind: StepKind, template: PromptTemplate) -> Self {
        Self { kind, template }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }
}

/// Conversation history for one step.
///
/// `Explicit` seeds the request with caller-supplied messages (used to
/// resume or redo a step). `Absent` lets the executor carry the previous
/// step's reply forward instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StepContext {
    #[default]
    Absent,
    Explicit(Vec<Message>),
}

impl StepContext {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Raw reply produced by one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub step: StepKind,
    pub response: String,
    pub latency_ms: u64,
    pub usage: Option<Usage>,
}

impl StepResult {
    pub fn new(step: StepKind, response: impl Into<String>) -> Self {
        Self {
            step,
            response: response.into(),
            latency_ms: 0,
            usage: None,
        }
    }
}

/// Extracted, validated output of one step. Serializes as
/// `["<step>", [values...]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutput(pub StepKind, pub Vec<Value>);

impl StepOutput {
    /// Wrap a non-array value in a single element array
    pub fn normalized(step: StepKind, value: Value) -> Self {
        match value {
            Value::Array(items) => Self(step, items),
            other => Self(step, vec![other]),
        }
    }

    pub fn step(&self) -> StepKind {
        self.0
    }

    pub fn values(&self) -> &[Value] {
        &self.1
    }
}

/// Templates for every step kind, loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: HashMap<StepKind, PromptTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a template; a malformed template is a
    /// configuration error
    pub fn with_template(
        mut self,
        kind: StepKind,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let template = PromptTemplate::parse(content).map_err(|e| {
            DomainError::configuration(format!("Invalid template for step '{}': {}", kind, e))
        })?;

        self.templates.insert(kind, template);
        Ok(self)
    }

    pub fn get(&self, kind: StepKind) -> Option<&PromptTemplate> {
        self.templates.get(&kind)
    }

    /// Build the ordered step list for a request
    pub fn steps_for(&self, kinds: &[StepKind]) -> Result<Vec<ChainStep>, DomainError> {
        kinds
            .iter()
            .map(|&kind| {
                self.get(kind)
                    .cloned()
                    .map(|template| ChainStep::new(kind, template))
                    .ok_or_else(|| {
                        DomainError::configuration(format!(
                            "No template configured for step '{}'",
                            kind
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_kind_round_trip_through_str() {
        for kind in StepKind::ALL {
            assert_eq!(kind.as_str().parse::<StepKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_step_kind() {
        let err = "widgets".parse::<StepKind>().unwrap_err();
        assert!(matches!(err, DomainError::Request { .. }));
        assert!(err.to_string().contains("widgets"));
    }

    #[test]
    fn test_step_kind_is_case_sensitive() {
        assert!("Instances".parse::<StepKind>().is_err());
    }

    #[test]
    fn test_step_output_wraps_non_array() {
        let output = StepOutput::normalized(StepKind::Layout, json!({"rows": 2}));
        assert_eq!(output.values(), &[json!({"rows": 2})]);
    }

    #[test]
    fn test_step_output_keeps_array() {
        let output = StepOutput::normalized(StepKind::Components, json!(["Button", "Card"]));
        assert_eq!(output.values().len(), 2);
    }

    #[test]
    fn test_step_output_serialization() {
        let output = StepOutput::normalized(StepKind::Instances, json!([{"component": "Button"}]));
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json, json!(["instances", [{"component": "Button"}]]));
    }

    #[test]
    fn test_catalog_rejects_template_without_marker() {
        let err = TemplateCatalog::new()
            .with_template(StepKind::Components, "no marker")
            .unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_catalog_steps_for_missing_template() {
        let catalog = TemplateCatalog::new()
            .with_template(StepKind::Components, "C: ${var:prompt}")
            .unwrap();

        assert_eq!(catalog.steps_for(&[StepKind::Components]).unwrap().len(), 1);
        assert!(catalog.steps_for(&[StepKind::Layout]).is_err());
    }
}
