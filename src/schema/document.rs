//! Inferred schema document and JSON Schema export

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::inference::types::{CanonicalType, FieldDescriptor};

/// A hierarchical schema inferred from a record sample.
///
/// Field maps are ordered so two builds from identical input serialize
/// byte-identically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    /// Human-readable schema name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Top-level fields, including the namespace container when present
    pub fields: BTreeMap<String, FieldDescriptor>,

    /// Namespace key the custom fields were nested under, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_key: Option<String>,

    /// Caller-supplied downstream classification hint, carried unvalidated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_hint: Option<String>,

    /// Number of records the schema was inferred from
    pub record_count: usize,
}

impl SchemaDocument {
    /// Export as a draft 2020-12 JSON Schema document.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, descriptor) in &self.fields {
            properties.insert(name.clone(), descriptor_to_json_schema(descriptor));
            if descriptor.required {
                required.push(Value::String(name.clone()));
            }
        }

        let mut schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": self.name,
            "description": self.description,
            "type": "object",
            "properties": properties,
        });

        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }

        schema
    }
}

fn descriptor_to_json_schema(descriptor: &FieldDescriptor) -> Value {
    let mut node = Map::new();

    let type_name = descriptor.canonical_type.type_name();

    if descriptor.nullable && descriptor.canonical_type != CanonicalType::Null {
        node.insert("type".into(), json!([type_name, "null"]));
    } else {
        node.insert("type".into(), json!(type_name));
    }

    if !descriptor.rationale.is_empty() {
        node.insert("description".into(), json!(descriptor.rationale));
    }

    if let Some(format) = descriptor.format {
        node.insert("format".into(), json!(format.to_string()));
    }

    if let Some(values) = &descriptor.enum_values {
        node.insert("enum".into(), json!(values));
    }

    if let Some((min, max)) = descriptor.numeric_range {
        node.insert("minimum".into(), json!(min));
        node.insert("maximum".into(), json!(max));
    }

    if let Some(min) = descriptor.min_length {
        node.insert("minLength".into(), json!(min));
    }
    if let Some(max) = descriptor.max_length {
        node.insert("maxLength".into(), json!(max));
    }

    if !descriptor.children.is_empty() {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for (name, child) in &descriptor.children {
            properties.insert(name.clone(), descriptor_to_json_schema(child));
            if child.required {
                required.push(Value::String(name.clone()));
            }
        }
        node.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            node.insert("required".into(), Value::Array(required));
        }
    }

    if let Some(item) = &descriptor.item_type {
        node.insert("items".into(), descriptor_to_json_schema(item));
    }

    Value::Object(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::types::FieldFormat;

    fn document_with(fields: BTreeMap<String, FieldDescriptor>) -> SchemaDocument {
        SchemaDocument {
            name: "Test".into(),
            description: "test schema".into(),
            fields,
            namespace_key: None,
            class_hint: None,
            record_count: 1,
        }
    }

    #[test]
    fn test_json_schema_basics() {
        let mut fields = BTreeMap::new();
        let mut email =
            FieldDescriptor::new("email", CanonicalType::String, "plain inference")
                .with_format(FieldFormat::Email);
        email.required = true;
        fields.insert("email".into(), email);

        let schema = document_with(fields).to_json_schema();
        assert_eq!(
            schema["$schema"],
            "https://json-schema.org/draft/2020-12/schema"
        );
        assert_eq!(schema["properties"]["email"]["type"], "string");
        assert_eq!(schema["properties"]["email"]["format"], "email");
        assert_eq!(schema["required"], json!(["email"]));
    }

    #[test]
    fn test_json_schema_nullable_union_type() {
        let mut fields = BTreeMap::new();
        let mut age = FieldDescriptor::new("age", CanonicalType::Integer, "plain inference");
        age.nullable = true;
        age.numeric_range = Some((18.0, 65.0));
        fields.insert("age".into(), age);

        let schema = document_with(fields).to_json_schema();
        assert_eq!(schema["properties"]["age"]["type"], json!(["integer", "null"]));
        assert_eq!(schema["properties"]["age"]["minimum"], 18.0);
        assert_eq!(schema["properties"]["age"]["maximum"], 65.0);
    }

    #[test]
    fn test_json_schema_nested_object_and_array() {
        let mut address =
            FieldDescriptor::new("address", CanonicalType::Object, "plain inference");
        address.children.insert(
            "city".into(),
            FieldDescriptor::new("city", CanonicalType::String, "plain inference"),
        );

        let mut tags = FieldDescriptor::new("tags", CanonicalType::Array, "plain inference");
        tags.item_type = Some(Box::new(FieldDescriptor::new(
            "tags",
            CanonicalType::String,
            "plain inference",
        )));

        let mut fields = BTreeMap::new();
        fields.insert("address".into(), address);
        fields.insert("tags".into(), tags);

        let schema = document_with(fields).to_json_schema();
        assert_eq!(
            schema["properties"]["address"]["properties"]["city"]["type"],
            "string"
        );
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "string");
    }
}
