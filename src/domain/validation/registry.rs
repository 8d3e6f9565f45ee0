//! Step kind to schema check dispatch

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::schemas;
use crate::domain::chain::StepKind;

/// A structural check over an extracted value
pub type Validator = fn(&Value) -> Result<(), String>;

/// An extracted value that failed its step's schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    step: StepKind,
    message: String,
    dump: Option<String>,
}

impl SchemaError {
    pub fn step(&self) -> StepKind {
        self.step
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Pretty-printed offending value, only kept outside production mode
    pub fn dump(&self) -> Option<&str> {
        self.dump.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Schema validation failed for step '{}': {}",
            self.step, self.message
        )?;

        if let Some(ref dump) = self.dump {
            write!(f, "\n\nValue:\n{}", dump)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Maps step kinds to validators; kinds without one pass unchecked
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<StepKind, Validator>,
    production_mode: bool,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.validators.keys().map(StepKind::as_str).collect();
        kinds.sort_unstable();

        f.debug_struct("ValidatorRegistry")
            .field("validators", &kinds)
            .field("production_mode", &self.production_mode)
            .finish()
    }
}

impl ValidatorRegistry {
    /// Create an empty registry
    pub fn new(production_mode: bool) -> Self {
        Self {
            validators: HashMap::new(),
            production_mode,
        }
    }

    /// Create a registry with the built-in schemas registered
    pub fn with_builtin(production_mode: bool) -> Self {
        Self::new(production_mode)
            .with_validator(StepKind::Components, schemas::validate_components)
            .with_validator(StepKind::Instances, schemas::validate_instances)
    }

    pub fn with_validator(mut self, step: StepKind, validator: Validator) -> Self {
        self.validators.insert(step, validator);
        self
    }

    pub fn lookup(&self, step: StepKind) -> Option<Validator> {
        self.validators.get(&step).copied()
    }

    /// Check `value` against the schema registered for `step`
    pub fn validate(&self, step: StepKind, value: &Value) -> Result<(), SchemaError> {
        let Some(validator) = self.lookup(step) else {
            debug!(step = %step, "No validator registered, passing value through");
            return Ok(());
        };

        validator(value).map_err(|message| SchemaError {
            step,
            message,
            dump: (!self.production_mode)
                .then(|| serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unregistered_step_passes_unchecked() {
        let registry = ValidatorRegistry::with_builtin(false);

        assert!(registry.lookup(StepKind::Layout).is_none());
        assert!(registry.validate(StepKind::Layout, &json!("anything")).is_ok());
    }

    #[test]
    fn test_empty_registry_passes_everything() {
        let registry = ValidatorRegistry::new(false);
        assert!(registry.validate(StepKind::Instances, &json!(42)).is_ok());
    }

    #[test]
    fn test_builtin_instances_validator() {
        let registry = ValidatorRegistry::with_builtin(false);
        let value = json!([{"component": "Button", "props": {"label": "Go"}}]);

        assert!(registry.validate(StepKind::Instances, &value).is_ok());
    }

    #[test]
    fn test_schema_error_includes_dump_outside_production() {
        let registry = ValidatorRegistry::with_builtin(false);
        let err = registry
            .validate(StepKind::Instances, &json!([{"props": {}}]))
            .unwrap_err();

        assert_eq!(err.step(), StepKind::Instances);
        assert!(err.dump().is_some());

        let rendered = err.to_string();
        assert!(rendered.starts_with("Schema validation failed for step 'instances'"));
        assert!(rendered.contains("\"props\": {}"));
    }

    #[test]
    fn test_schema_error_hides_dump_in_production() {
        let registry = ValidatorRegistry::with_builtin(true);
        let err = registry
            .validate(StepKind::Components, &json!([""]))
            .unwrap_err();

        assert!(err.dump().is_none());
        assert!(!err.to_string().contains("Value:"));
    }

    #[test]
    fn test_custom_validator_overrides_builtin() {
        fn reject_all(_: &Value) -> Result<(), String> {
            Err("rejected".to_string())
        }

        let registry =
            ValidatorRegistry::with_builtin(true).with_validator(StepKind::Layout, reject_all);
        let err = registry.validate(StepKind::Layout, &json!({})).unwrap_err();

        assert_eq!(err.message(), "rejected");
    }
}
