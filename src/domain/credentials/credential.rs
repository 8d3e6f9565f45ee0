use std::fmt;

use crate::domain::DomainError;

/// Prefix every OpenAI organization identifier carries
pub const ORGANIZATION_PREFIX: &str = "org-";

/// Credentials for the completion service
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    api_key: Option<String>,
    organization: Option<String>,
}

impl ProviderCredentials {
    pub fn new(api_key: Option<String>, organization: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            organization: organization.filter(|o| !o.trim().is_empty()),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Fail fast when credentials are missing or malformed; runs before any
    /// network call
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.api_key.is_none() {
            return Err(DomainError::configuration("Missing completion service API key"));
        }

        match self.organization.as_deref() {
            None => Err(DomainError::configuration(
                "Missing completion service organization",
            )),
            Some(org) if !org.starts_with(ORGANIZATION_PREFIX) => {
                Err(DomainError::configuration(format!(
                    "Invalid organization identifier: must start with '{}'",
                    ORGANIZATION_PREFIX
                )))
            }
            Some(_) => Ok(()),
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("organization", &self.organization)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(key: Option<&str>, org: Option<&str>) -> ProviderCredentials {
        ProviderCredentials::new(key.map(String::from), org.map(String::from))
    }

    #[test]
    fn test_valid_credentials() {
        assert!(creds(Some("sk-test"), Some("org-abc123")).validate().is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let err = creds(None, Some("org-abc")).validate().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        assert!(creds(Some("   "), Some("org-abc")).validate().is_err());
    }

    #[test]
    fn test_missing_organization() {
        let err = creds(Some("sk-test"), None).validate().unwrap_err();
        assert!(err.to_string().contains("organization"));
    }

    #[test]
    fn test_organization_without_prefix() {
        let err = creds(Some("sk-test"), Some("acme")).validate().unwrap_err();
        assert!(err.to_string().contains("org-"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", creds(Some("sk-secret"), Some("org-abc")));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
