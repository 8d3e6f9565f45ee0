//! Prompt templates for chain steps

mod template;

pub use template::{PromptTemplate, TemplateError, PROMPT_MARKER};
