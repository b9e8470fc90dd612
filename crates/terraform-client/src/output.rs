//! Structured-output extraction
//!
//! `terraform output -json` prints one JSON object whose values are
//! `{type, value, sensitive}` records. Extraction keeps the raw `value` for
//! each name and discards the `type` and `sensitive` metadata by contract;
//! sensitive values are exposed exactly like non-sensitive ones.

use crate::observers::Observers;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One declared output variable as Terraform prints it
#[derive(Debug, Clone, Deserialize)]
pub struct OutputVariable {
    /// Terraform's type tag for the value
    #[serde(rename = "type", default)]
    pub type_tag: Value,
    /// The raw value
    pub value: Value,
    /// Whether Terraform marked the value sensitive
    #[serde(default)]
    pub sensitive: bool,
}

/// Flatten captured `output -json` stdout into a name-to-value map
///
/// A document that does not match the expected shape is reported to the
/// error observer as a single parse-error line and yields an empty map;
/// malformed tool output degrades observably instead of aborting the
/// operation.
pub fn extract_values(captured: &str, observers: &mut Observers) -> HashMap<String, Value> {
    match serde_json::from_str::<HashMap<String, OutputVariable>>(captured) {
        Ok(raw) => raw
            .into_iter()
            .map(|(name, variable)| (name, variable.value))
            .collect(),
        Err(e) => {
            observers.emit_error(&format!("JSON parse error: {e}"));
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn error_sink() -> (Observers, Arc<Mutex<Vec<String>>>) {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        let observers =
            Observers::new().on_error(move |line| sink.lock().unwrap().push(line.to_string()));
        (observers, errors)
    }

    #[test]
    fn extracts_raw_values_and_drops_metadata() {
        let (mut observers, errors) = error_sink();
        let doc = r#"{
            "endpoint": {"type": "string", "value": "https://example.net", "sensitive": false},
            "replicas": {"type": "number", "value": 3, "sensitive": false},
            "password": {"type": "string", "value": "hunter2", "sensitive": true}
        }"#;

        let values = extract_values(doc, &mut observers);

        assert_eq!(values.len(), 3);
        assert_eq!(values["endpoint"], Value::from("https://example.net"));
        assert_eq!(values["replicas"], Value::from(3));
        // Sensitive values come through unredacted.
        assert_eq!(values["password"], Value::from("hunter2"));
        assert!(errors.lock().unwrap().is_empty());
    }

    #[test]
    fn single_string_variable() {
        let (mut observers, _) = error_sink();
        let doc = r#"{"x":{"type":"string","value":"a","sensitive":false}}"#;

        let values = extract_values(doc, &mut observers);

        assert_eq!(values.len(), 1);
        assert_eq!(values["x"], Value::from("a"));
    }

    #[test]
    fn malformed_json_yields_empty_map_and_one_error() {
        let (mut observers, errors) = error_sink();

        let values = extract_values("not json at all", &mut observers);

        assert!(values.is_empty());
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("JSON parse error:"));
    }

    #[test]
    fn wrong_shape_is_a_parse_failure() {
        let (mut observers, errors) = error_sink();

        // Values must be {type,value,sensitive} records, not bare scalars.
        let values = extract_values(r#"{"x": "bare"}"#, &mut observers);

        assert!(values.is_empty());
        assert_eq!(errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_sensitive_field_defaults_to_false() {
        let (mut observers, _) = error_sink();
        let doc = r#"{"x":{"type":"string","value":"a"}}"#;

        let values = extract_values(doc, &mut observers);

        assert_eq!(values["x"], Value::from("a"));
    }
}
