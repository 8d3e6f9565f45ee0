//! API request and response types

pub mod error;
pub mod form;

pub use error::{ApiError, ApiErrorResponse};
pub use form::Form;
