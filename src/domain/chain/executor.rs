//! Chain executor - runs steps strictly in order, one completion call at a time

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ChainStep, StepContext, StepKind, StepResult};
use crate::domain::llm::{LlmProvider, LlmRequest, Message, Usage};
use crate::domain::DomainError;

/// Configuration for the chain executor
#[derive(Debug, Clone)]
pub struct ChainExecutorConfig {
    /// Provider-side model name
    pub model: String,
    /// Sampling temperature sent with every step
    pub temperature: f32,
    /// Reply token cap sent with every step
    pub max_tokens: u32,
}

impl Default for ChainExecutorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: 2048,
        }
    }
}

/// Receives per-step execution outcomes (metrics sink)
pub trait ChainObserver: Send + Sync {
    fn step_finished(&self, step: StepKind, elapsed: Duration, success: bool, usage: Option<Usage>);
}

/// Observer that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ChainObserver for NoopObserver {
    fn step_finished(&self, _: StepKind, _: Duration, _: bool, _: Option<Usage>) {}
}

/// Build the outbound messages for one step.
///
/// Explicit history is used verbatim. Otherwise the previous step's reply,
/// if any, is injected as a single assistant turn. The rendered template is
/// always the final user message.
pub fn build_messages(
    step: &ChainStep,
    prompt: &str,
    context: &StepContext,
    previous: Option<&StepResult>,
) -> Vec<Message> {
    let mut messages = match (context, previous) {
        (StepContext::Explicit(history), _) => history.clone(),
        (StepContext::Absent, Some(previous)) => {
            vec![Message::assistant(previous.response.clone())]
        }
        (StepContext::Absent, None) => Vec::new(),
    };

    messages.push(Message::user(step.template().render(prompt)));
    messages
}

/// Chain executor - linear state machine over the step list
pub struct ChainExecutor {
    provider: Arc<dyn LlmProvider>,
    config: ChainExecutorConfig,
    observer: Arc<dyn ChainObserver>,
}

impl fmt::Debug for ChainExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainExecutor")
            .field("provider", &self.provider.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl ChainExecutor {
    /// Create a new chain executor
    pub fn new(provider: Arc<dyn LlmProvider>, config: ChainExecutorConfig) -> Self {
        Self {
            provider,
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ChainObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run every step in order.
    ///
    /// Returns all step results, or the first failure. Nothing partial is
    /// returned: a failed or cancelled step aborts the chain and later steps
    /// never run.
    pub async fn execute(
        &self,
        prompt: &str,
        steps: &[ChainStep],
        contexts: &[StepContext],
        cancel: &CancellationToken,
    ) -> Result<Vec<StepResult>, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::request("Chain has no steps"));
        }

        if contexts.len() != steps.len() {
            return Err(DomainError::request(format!(
                "Expected {} step contexts, got {}",
                steps.len(),
                contexts.len()
            )));
        }

        let start = Instant::now();
        let mut results: Vec<StepResult> = Vec::with_capacity(steps.len());

        for (index, (step, context)) in steps.iter().zip(contexts).enumerate() {
            if cancel.is_cancelled() {
                info!(step = %step.kind(), index, "Chain cancelled before step");
                return Err(DomainError::Cancelled);
            }

            let messages = build_messages(step, prompt, context, results.last());
            let result = self.execute_step(index, step, messages).await?;

            if cancel.is_cancelled() {
                warn!(step = %step.kind(), index, "Chain cancelled during step, discarding reply");
                return Err(DomainError::Cancelled);
            }

            results.push(result);
        }

        info!(
            steps = results.len(),
            total_latency_ms = start.elapsed().as_millis() as u64,
            "Chain completed"
        );

        Ok(results)
    }

    /// Execute a single step once; no retries
    async fn execute_step(
        &self,
        index: usize,
        step: &ChainStep,
        messages: Vec<Message>,
    ) -> Result<StepResult, DomainError> {
        let kind = step.kind();
        let request = LlmRequest::builder()
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build();

        debug!(
            step = %kind,
            index,
            messages = request.messages.len(),
            model = %self.config.model,
            "Sending step request"
        );

        let start = Instant::now();
        let outcome = self.provider.chat(&self.config.model, request).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(response) => {
                self.observer
                    .step_finished(kind, elapsed, true, response.usage);

                debug!(
                    step = %kind,
                    index,
                    latency_ms = elapsed.as_millis() as u64,
                    reply_chars = response.content().chars().count(),
                    "Step completed"
                );

                Ok(StepResult {
                    step: kind,
                    response: response.content().to_string(),
                    latency_ms: elapsed.as_millis() as u64,
                    usage: response.usage,
                })
            }
            Err(e) => {
                self.observer.step_finished(kind, elapsed, false, None);
                warn!(step = %kind, index, error = %e, "Step failed, aborting chain");
                Err(e)
            }
        }
    }
}
