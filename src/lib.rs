//! PMP Prompt Chain
//!
//! Runs a short, ordered chain of completion calls (components, instances,
//! layout) against an OpenAI-compatible service and turns each free-text
//! reply into validated JSON:
//! - Markdown code block extraction with production redaction
//! - Per-step schema validation through a validator registry
//! - HTTP API and one-shot CLI front ends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{ChainExecutor, ChainExecutorConfig, ChainOrchestrator, DomainError};
use infrastructure::llm::{HttpClient, OpenAiProvider};
use infrastructure::observability::PrometheusChainObserver;
use tracing::info;

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    Ok(AppState::new(build_orchestrator(config)?))
}

/// Wire provider, templates, credentials and settings into an orchestrator.
///
/// Malformed templates fail here. Missing or invalid credentials do not:
/// they are reported per request, before any network call.
pub fn build_orchestrator(config: &AppConfig) -> Result<ChainOrchestrator, DomainError> {
    let templates = config.templates.catalog()?;
    let credentials = config.openai.credentials();

    let client = match config.openai.timeout_secs {
        Some(secs) => HttpClient::with_timeout(Duration::from_secs(secs))?,
        None => HttpClient::new(),
    };

    let mut provider = OpenAiProvider::with_base_url(
        client,
        credentials.api_key().unwrap_or_default(),
        config.openai.base_url.as_str(),
    );

    if let Some(org) = credentials.organization() {
        provider = provider.with_organization(org);
    }

    let executor = ChainExecutor::new(
        Arc::new(provider),
        ChainExecutorConfig {
            model: config.openai.model.clone(),
            max_tokens: config.openai.max_tokens,
            ..ChainExecutorConfig::default()
        },
    )
    .with_observer(Arc::new(PrometheusChainObserver));

    info!(
        model = %config.openai.model,
        base_url = %config.openai.base_url,
        "Prompt chain orchestrator ready"
    );

    Ok(ChainOrchestrator::new(
        executor,
        templates,
        credentials,
        config.chain_settings(),
    ))
}
