//! Chain orchestrator - request validation, execution and response shaping

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{
    ChainExecutor, ChainRequest, RawChainRequest, StepOutput, StepResult, TemplateCatalog,
};
use crate::domain::credentials::ProviderCredentials;
use crate::domain::extraction::JsonExtractor;
use crate::domain::validation::ValidatorRegistry;
use crate::domain::DomainError;

/// Message shown instead of internal failure details in production
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong while generating a response. Please try again.";

/// Deployment switches, passed in explicitly rather than read from globals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSettings {
    /// When false every request is rejected as unavailable
    pub feature_enabled: bool,
    /// Hide raw replies, value dumps and upstream causes from callers
    pub production_mode: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            feature_enabled: false,
            production_mode: true,
        }
    }
}

/// Entry point for one chain invocation
#[derive(Debug)]
pub struct ChainOrchestrator {
    executor: ChainExecutor,
    templates: TemplateCatalog,
    validators: ValidatorRegistry,
    extractor: JsonExtractor,
    credentials: ProviderCredentials,
    settings: ChainSettings,
}

impl ChainOrchestrator {
    pub fn new(
        executor: ChainExecutor,
        templates: TemplateCatalog,
        credentials: ProviderCredentials,
        settings: ChainSettings,
    ) -> Self {
        Self {
            executor,
            templates,
            validators: ValidatorRegistry::with_builtin(settings.production_mode),
            extractor: JsonExtractor::new(settings.production_mode),
            credentials,
            settings,
        }
    }

    pub fn with_validators(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = validators;
        self
    }

    pub fn settings(&self) -> ChainSettings {
        self.settings
    }

    pub fn credentials(&self) -> &ProviderCredentials {
        &self.credentials
    }

    /// Reject with `Unavailable` while the feature switch is off
    pub fn ensure_enabled(&self) -> Result<(), DomainError> {
        if !self.settings.feature_enabled {
            return Err(DomainError::unavailable("Prompt chains are not enabled"));
        }

        Ok(())
    }

    /// Run one chain request end to end.
    ///
    /// Order: feature gate, request parsing, credential check, execution,
    /// then extraction and validation of every step. The first failure
    /// aborts; no partial output is ever returned.
    pub async fn run(
        &self,
        raw: RawChainRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<StepOutput>, DomainError> {
        self.ensure_enabled()?;

        let request = ChainRequest::parse(raw)?;
        self.credentials.validate()?;

        let steps = self.templates.steps_for(request.steps())?;

        info!(
            steps = ?request.steps(),
            explicit_contexts = request.contexts().iter().filter(|c| !c.is_absent()).count(),
            "Running prompt chain"
        );

        let results = self
            .executor
            .execute(request.prompt(), &steps, request.contexts(), cancel)
            .await?;

        self.shape(&results)
    }

    /// Extract and validate every step result, in order
    pub fn shape(&self, results: &[StepResult]) -> Result<Vec<StepOutput>, DomainError> {
        results
            .iter()
            .map(|result| -> Result<StepOutput, DomainError> {
                let step = result.step;

                let value = self.extractor.extract(&result.response).inspect_err(|e| {
                    warn!(step = %step, no_code_blocks = e.no_code_blocks(), "Extraction failed");
                })?;

                self.validators.validate(step, &value).inspect_err(|e| {
                    warn!(step = %step, reason = %e.message(), "Schema validation failed");
                })?;

                Ok(StepOutput::normalized(step, value))
            })
            .collect()
    }

    /// The message a caller is allowed to see for `err`
    pub fn public_message(&self, err: &DomainError) -> String {
        if err.is_caller_facing() || !self.settings.production_mode {
            err.to_string()
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        }
    }
}
