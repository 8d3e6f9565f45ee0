use thiserror::Error;

use super::extraction::ExtractionError;
use super::validation::SchemaError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid request: {message}")]
    Request { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service error: {status} {status_text}")]
    Service { status: u16, status_text: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Unavailable: {message}")]
    Unavailable { message: String },

    #[error("Chain execution cancelled")]
    Cancelled,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn service(status: u16, status_text: impl Into<String>) -> Self {
        Self::Service {
            status,
            status_text: status_text.into(),
        }
    }

    /// Transport level failure with no usable HTTP status from upstream
    pub fn bad_gateway() -> Self {
        Self::service(502, "Bad Gateway")
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller caused this error (input or configuration), as
    /// opposed to upstream or response shaping failures
    pub fn is_caller_facing(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::Configuration { .. } | Self::Unavailable { .. }
        )
    }

    /// Short stable label, used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Configuration { .. } => "configuration",
            Self::Service { .. } => "service",
            Self::Extraction(_) => "extraction",
            Self::Schema(_) => "schema",
            Self::Unavailable { .. } => "unavailable",
            Self::Cancelled => "cancelled",
            Self::Internal { .. } => "internal",
        }
    }
}
