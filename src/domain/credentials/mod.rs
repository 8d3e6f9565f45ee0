//! Completion service credentials

mod credential;

pub use credential::{ProviderCredentials, ORGANIZATION_PREFIX};
