//! Domain layer - Core business logic and entities

pub mod chain;
pub mod credentials;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod prompt;
pub mod validation;

pub use chain::{
    ChainExecutor, ChainExecutorConfig, ChainObserver, ChainOrchestrator, ChainRequest,
    ChainSettings, ChainStep, RawChainRequest, StepContext, StepKind, StepOutput, StepResult,
    TemplateCatalog, GENERIC_ERROR_MESSAGE,
};
pub use credentials::ProviderCredentials;
pub use error::DomainError;
pub use extraction::{ExtractionError, JsonExtractor};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use prompt::{PromptTemplate, TemplateError};
pub use validation::{SchemaError, ValidatorRegistry};
