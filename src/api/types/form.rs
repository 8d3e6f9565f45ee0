//! Form extractor that returns rejections in the API error format

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form as AxumForm,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Wrapper around `axum::Form` whose rejections render as `{"errors": ...}`
#[derive(Debug, Clone, Default)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Form rejection rendered through [`ApiError`]
#[derive(Debug)]
pub struct FormRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for FormRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::new(rejection.status, rejection.message)
    }
}

impl<S, T> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumForm::<T>::from_request(req, state).await {
            Ok(AxumForm(value)) => Ok(Form(value)),
            Err(rejection) => Err(FormRejection {
                status: rejection.status(),
                message: format_rejection_message(&rejection),
            }),
        }
    }
}

fn format_rejection_message(rejection: &axum::extract::rejection::FormRejection) -> String {
    use axum::extract::rejection::FormRejection::*;

    match rejection {
        InvalidFormContentType(_) => {
            "Invalid Content-Type header. Expected 'application/x-www-form-urlencoded'."
                .to_string()
        }
        FailedToDeserializeForm(err) => format!("Invalid form data: {}", err.body_text()),
        FailedToDeserializeFormBody(err) => format!("Invalid form data: {}", err.body_text()),
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid form request".to_string(),
    }
}
