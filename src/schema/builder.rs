//! Schema assembly from record samples

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use crate::inference::config::InferenceConfig;
use crate::inference::error::InferenceError;
use crate::inference::inferrer::FieldTypeInferencer;
use crate::inference::types::{CanonicalType, FieldDescriptor};

use super::document::SchemaDocument;

/// Assembles per-field inferences into a [`SchemaDocument`].
///
/// Field enumeration is the union of keys across all object records, so a
/// field present in any record is described. Values are gathered per field
/// with absence mapped to null, which is how nullability and requiredness
/// propagate into the inferencer.
pub struct SchemaBuilder {
    config: InferenceConfig,
    inferencer: FieldTypeInferencer,
}

impl SchemaBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create a builder with custom configuration.
    pub fn with_config(config: InferenceConfig) -> Self {
        let inferencer = FieldTypeInferencer::with_config(config.clone());
        Self { config, inferencer }
    }

    /// Build a schema document from a record sample.
    ///
    /// Fails only on an empty slice. Non-object records are skipped with a
    /// warning. With a `namespace_key`, fields outside the platform-reserved
    /// set are nested under a single object-typed container keyed by the
    /// namespace; reserved fields always stay at the top level.
    pub fn build(
        &self,
        records: &[Value],
        name: &str,
        description: &str,
        namespace_key: Option<&str>,
        class_hint: Option<&str>,
    ) -> Result<SchemaDocument, InferenceError> {
        if records.is_empty() {
            return Err(InferenceError::EmptyInput);
        }

        let objects: Vec<&serde_json::Map<String, Value>> = records
            .iter()
            .filter_map(|record| match record.as_object() {
                Some(object) => Some(object),
                None => {
                    warn!(kind = %crate::value::ValueKind::of(record), "skipping non-object record");
                    None
                }
            })
            .collect();

        let mut field_names: BTreeSet<&String> = BTreeSet::new();
        for object in &objects {
            field_names.extend(object.keys());
        }

        let mut standard: BTreeMap<String, FieldDescriptor> = BTreeMap::new();
        let mut custom: BTreeMap<String, FieldDescriptor> = BTreeMap::new();

        for field_name in field_names {
            let values: Vec<Value> = objects
                .iter()
                .map(|o| o.get(field_name).cloned().unwrap_or(Value::Null))
                .collect();
            let descriptor = self.inferencer.infer(field_name, &values);

            if self.config.is_standard_field(field_name) {
                standard.insert(field_name.clone(), descriptor);
            } else {
                custom.insert(field_name.clone(), descriptor);
            }
        }

        let mut fields = standard;
        match namespace_key {
            Some(namespace) if !custom.is_empty() => {
                let mut container = FieldDescriptor::new(
                    namespace,
                    CanonicalType::Object,
                    "tenant namespace container for custom fields",
                );
                container.required = true;
                container.children = custom;
                fields.insert(namespace.to_string(), container);
            }
            _ => fields.append(&mut custom),
        }

        Ok(SchemaDocument {
            name: name.to_string(),
            description: description.to_string(),
            fields,
            namespace_key: namespace_key.map(String::from),
            class_hint: class_hint.map(String::from),
            record_count: records.len(),
        })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
