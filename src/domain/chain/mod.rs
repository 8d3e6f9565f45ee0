//! Prompt chain domain - step definitions, execution and orchestration

mod entity;
mod executor;
mod orchestrator;
mod request;

pub use entity::{
    ChainStep, StepContext, StepKind, StepOutput, StepResult, TemplateCatalog,
};
pub use executor::{
    build_messages, ChainExecutor, ChainExecutorConfig, ChainObserver, NoopObserver,
};
pub use orchestrator::{ChainOrchestrator, ChainSettings, GENERIC_ERROR_MESSAGE};
pub use request::{ChainRequest, RawChainRequest, MAX_PROMPT_CHARS};
