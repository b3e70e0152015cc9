//! openFDA field schema
//!
//! The drugevent YAML schema published by openFDA types every field.
//! Two typings matter for normalization: integer-formatted fields and
//! categorical fields whose codes map to human-readable labels.

use crate::{IngestError, Result};
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;

// declared int-formatted upstream but mixed with floats in the data
const FLOAT_MIXED_FIELDS: [&str; 2] = ["drugintervaldosageunitnumb", "drugseparatedosagenumb"];

/// Field typing extracted from the drugevent schema.
#[derive(Debug, Clone, Default)]
pub struct EventSchema {
    int_fields: HashSet<String>,
    categorical_fields: HashMap<String, HashMap<String, String>>,
}

impl EventSchema {
    /// Parse the schema from its YAML text.
    ///
    /// Walks the document collecting `one_of` categorical value maps and
    /// int-formatted field names. Fields that are both categorical and
    /// int-formatted coerce by label, so they are dropped from the int
    /// set, as are the two fields whose data mixes ints and floats.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let root: Value =
            serde_yaml::from_str(yaml).map_err(|e| IngestError::Schema(e.to_string()))?;

        let mut int_fields = HashSet::new();
        let mut categorical_fields = HashMap::new();
        collect_fields(&root, &mut int_fields, &mut categorical_fields);

        for field in FLOAT_MIXED_FIELDS {
            int_fields.remove(field);
        }
        for field in categorical_fields.keys() {
            int_fields.remove(field);
        }

        Ok(Self {
            int_fields,
            categorical_fields,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn is_int_field(&self, field: &str) -> bool {
        self.int_fields.contains(field)
    }

    /// Label for a categorical field's code, if both are known.
    pub fn categorical_label(&self, field: &str, code: &str) -> Option<&str> {
        self.categorical_fields
            .get(field)?
            .get(code)
            .map(String::as_str)
    }

    pub fn int_field_count(&self) -> usize {
        self.int_fields.len()
    }

    pub fn categorical_field_count(&self) -> usize {
        self.categorical_fields.len()
    }
}

fn collect_fields(
    value: &Value,
    int_fields: &mut HashSet<String>,
    categorical_fields: &mut HashMap<String, HashMap<String, String>>,
) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Value::Mapping(spec) = child else {
                    if let Value::Sequence(items) = child {
                        for item in items {
                            collect_fields(item, int_fields, categorical_fields);
                        }
                    }
                    continue;
                };
                let Some(name) = key.as_str() else {
                    collect_fields(child, int_fields, categorical_fields);
                    continue;
                };

                if let Some(values) = one_of_values(spec) {
                    categorical_fields.insert(name.to_string(), values);
                }
                if format_is_int(spec) {
                    int_fields.insert(name.to_string());
                }

                collect_fields(child, int_fields, categorical_fields);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                collect_fields(item, int_fields, categorical_fields);
            }
        }
        _ => {}
    }
}

/// Extract the code-to-label map of a `possible_values` block whose
/// type is `one_of`. Codes are stringified since YAML may carry them
/// as numbers.
fn one_of_values(spec: &serde_yaml::Mapping) -> Option<HashMap<String, String>> {
    let possible = spec.get("possible_values")?.as_mapping()?;
    if possible.get("type").and_then(Value::as_str) != Some("one_of") {
        return None;
    }
    let values = possible.get("value")?.as_mapping()?;

    let mut map = HashMap::new();
    for (code, label) in values {
        let code = scalar_to_string(code)?;
        let label = scalar_to_string(label)?;
        map.insert(code, label);
    }
    Some(map)
}

fn format_is_int(spec: &serde_yaml::Mapping) -> bool {
    spec.get("format")
        .and_then(Value::as_str)
        .is_some_and(|format| format.contains("int"))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
