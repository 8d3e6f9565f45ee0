//! Per-step schema validation

mod registry;
mod schemas;

pub use registry::{SchemaError, Validator, ValidatorRegistry};
pub use schemas::{
    validate_components, validate_instances, ComponentChoice, ComponentInstance, ComponentRef,
};
