//! Structural schemas for the built-in step kinds

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

/// One entry of a `components` step reply: a bare name or a name with a reason
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComponentChoice {
    Name(String),
    Detailed(ComponentRef),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ComponentRef {
    #[validate(length(min = 1, message = "component name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ComponentChoice {
    fn into_ref(self) -> ComponentRef {
        match self {
            Self::Name(name) => ComponentRef { name, reason: None },
            Self::Detailed(component) => component,
        }
    }
}

/// One node of an `instances` step reply
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ComponentInstance {
    #[validate(length(min = 1, message = "component cannot be empty"))]
    pub component: String,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    #[validate(nested)]
    pub children: Vec<ComponentInstance>,
}

/// `components`: a list (or one entry) of component names
pub fn validate_components(value: &Value) -> Result<(), String> {
    for_each_entry::<ComponentChoice, _>(value, |choice| {
        let component = choice.into_ref();

        if component.name.trim().is_empty() {
            return Err("component name cannot be empty".to_string());
        }

        component.validate().map_err(|e| e.to_string())
    })
}

/// `instances`: a list (or one object) of component instance trees
pub fn validate_instances(value: &Value) -> Result<(), String> {
    for_each_entry::<ComponentInstance, _>(value, |instance| {
        instance.validate().map_err(|e| e.to_string())
    })
}

/// Deserialize an array's items (or a lone value) and check each one.
/// Errors are prefixed with the failing item's index.
fn for_each_entry<T, F>(value: &Value, mut check: F) -> Result<(), String>
where
    T: DeserializeOwned,
    F: FnMut(T) -> Result<(), String>,
{
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let entry = T::deserialize(item).map_err(|e| format!("[{}] {}", index, e))?;
                check(entry).map_err(|e| format!("[{}] {}", index, e))?;
            }
            Ok(())
        }
        other => {
            let entry = T::deserialize(other).map_err(|e| e.to_string())?;
            check(entry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_components_accepts_names_and_objects() {
        let value = json!(["Button", {"name": "Card", "reason": "groups content"}]);
        assert!(validate_components(&value).is_ok());
    }

    #[test]
    fn test_components_accepts_single_entry() {
        assert!(validate_components(&json!("Button")).is_ok());
    }

    #[test]
    fn test_components_rejects_blank_name() {
        let err = validate_components(&json!(["Button", "  "])).unwrap_err();
        assert!(err.starts_with("[1]"));
    }

    #[test]
    fn test_components_rejects_numbers() {
        assert!(validate_components(&json!([42])).is_err());
    }

    #[test]
    fn test_instances_accepts_nested_tree() {
        let value = json!([{
            "component": "Card",
            "props": {"title": "Login"},
            "children": [
                {"component": "Input", "props": {"type": "password"}},
                {"component": "Button"}
            ]
        }]);
        assert!(validate_instances(&value).is_ok());
    }

    #[test]
    fn test_instances_rejects_missing_component() {
        let err = validate_instances(&json!([{"props": {}}])).unwrap_err();
        assert!(err.contains("component"));
    }

    #[test]
    fn test_instances_rejects_empty_nested_component() {
        let value = json!({"component": "Card", "children": [{"component": ""}]});
        assert!(validate_instances(&value).is_err());
    }

    #[test]
    fn test_instances_error_names_failing_index() {
        let value = json!([{"component": "Button"}, {"component": ""}]);
        let err = validate_instances(&value).unwrap_err();
        assert!(err.starts_with("[1]"));
    }

    #[test]
    fn test_instances_rejects_non_object_props() {
        let value = json!([{"component": "Button", "props": "primary"}]);
        assert!(validate_instances(&value).is_err());
    }
}
