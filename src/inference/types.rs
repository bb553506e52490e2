//! Inferred field descriptors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// Canonical type of an inferred field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl CanonicalType {
    /// JSON Schema type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            CanonicalType::String => "string",
            CanonicalType::Integer => "integer",
            CanonicalType::Number => "number",
            CanonicalType::Boolean => "boolean",
            CanonicalType::Object => "object",
            CanonicalType::Array => "array",
            CanonicalType::Null => "null",
        }
    }

    /// Canonical type for an observed value kind.
    pub fn from_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Null => CanonicalType::Null,
            ValueKind::Boolean => CanonicalType::Boolean,
            ValueKind::Integer => CanonicalType::Integer,
            ValueKind::Number => CanonicalType::Number,
            ValueKind::String => CanonicalType::String,
            ValueKind::Array => CanonicalType::Array,
            ValueKind::Object => CanonicalType::Object,
        }
    }
}

impl std::fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// String format refinement. Only meaningful for string-typed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldFormat {
    Email,
    Uri,
    Date,
    DateTime,
    Uuid,
}

impl std::fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldFormat::Email => write!(f, "email"),
            FieldFormat::Uri => write!(f, "uri"),
            FieldFormat::Date => write!(f, "date"),
            FieldFormat::DateTime => write!(f, "date-time"),
            FieldFormat::Uuid => write!(f, "uuid"),
        }
    }
}

/// One inferred field.
///
/// Exactly one of `children` (non-empty, object types) and `item_type`
/// (array types) is populated; scalar types carry neither. `format` is
/// only set for string-typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Leaf field name (not the full path).
    pub name: String,
    /// Canonical inferred type.
    pub canonical_type: CanonicalType,
    /// String format refinement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
    /// True if any sampled value was null or absent.
    pub nullable: bool,
    /// True if the field was present and non-null in every sampled record.
    pub required: bool,
    /// Distinct value set, populated when sampled cardinality is low.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// (min, max) over parseable numeric samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_range: Option<(f64, f64)>,
    /// Minimum string length constraint (set by enrichment or manual schemas).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length constraint (set by enrichment or manual schemas).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Why this type/format was chosen (which detector fired).
    pub rationale: String,
    /// Child descriptors for object-typed fields.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub children: BTreeMap<String, FieldDescriptor>,
    /// Element descriptor for array-typed fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Box<FieldDescriptor>>,
}

impl FieldDescriptor {
    /// Create a descriptor with the given type and rationale.
    pub fn new(
        name: impl Into<String>,
        canonical_type: CanonicalType,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            canonical_type,
            format: None,
            nullable: false,
            required: false,
            enum_values: None,
            numeric_range: None,
            min_length: None,
            max_length: None,
            rationale: rationale.into(),
            children: BTreeMap::new(),
            item_type: None,
        }
    }

    /// Set the string format.
    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the numeric range.
    pub fn with_numeric_range(mut self, min: f64, max: f64) -> Self {
        self.numeric_range = Some((min, max));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let d = FieldDescriptor::new("age", CanonicalType::Integer, "plain inference");
        assert_eq!(d.canonical_type, CanonicalType::Integer);
        assert!(!d.nullable);
        assert!(d.children.is_empty());
        assert!(d.item_type.is_none());
    }

    #[test]
    fn test_descriptor_serialization_is_camel_case() {
        let d = FieldDescriptor::new("email", CanonicalType::String, "fallback")
            .with_format(FieldFormat::Email);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["canonicalType"], "string");
        assert_eq!(json["format"], "email");
        // Empty/absent members are skipped
        assert!(json.get("enumValues").is_none());
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(FieldFormat::DateTime.to_string(), "date-time");
        assert_eq!(FieldFormat::Uuid.to_string(), "uuid");
    }

    #[test]
    fn test_canonical_type_from_kind() {
        assert_eq!(
            CanonicalType::from_kind(crate::value::ValueKind::Integer),
            CanonicalType::Integer
        );
        assert_eq!(
            CanonicalType::from_kind(crate::value::ValueKind::Object),
            CanonicalType::Object
        );
    }
}
