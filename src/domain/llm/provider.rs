use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Completion client boundary: one request, one assistant reply.
///
/// Implementations own transport concerns (timeouts, TLS, headers). A
/// non-success upstream outcome is reported as [`DomainError::Service`];
/// callers never retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
