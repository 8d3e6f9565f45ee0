//! Error payloads returned by the chain API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error body: `{"errors": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                errors: message.into(),
            },
        }
    }

    /// Map a domain failure to its status; `message` is what the caller may
    /// see, already redacted for production
    pub fn from_domain(err: &DomainError, message: impl Into<String>) -> Self {
        Self::new(status_for(err), message)
    }
}

/// HTTP status for each domain failure
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Request { .. } => StatusCode::BAD_REQUEST,
        DomainError::Unavailable { .. } => StatusCode::NOT_FOUND,
        DomainError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Service { .. } => StatusCode::BAD_GATEWAY,
        DomainError::Extraction(_) | DomainError::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Cancelled | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.response.errors)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::new(StatusCode::BAD_REQUEST, "Missing prompt");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.errors, "Missing prompt");
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ApiErrorResponse {
            errors: "boom".to_string(),
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "errors": "boom" }));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&DomainError::request("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&DomainError::unavailable("x")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&DomainError::configuration("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&DomainError::service(429, "Too Many Requests")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&DomainError::Cancelled),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_domain_uses_given_message() {
        let err = ApiError::from_domain(&DomainError::internal("secret detail"), "Try again");

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response.errors, "Try again");
    }
}
