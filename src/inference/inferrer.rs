//! Per-field type inference

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use super::config::InferenceConfig;
use super::detectors::EDGE_CASE_DETECTORS;
use super::formats::detect_string_format;
use super::types::{CanonicalType, FieldDescriptor};
use crate::value::ValueKind;

/// Infers a typed descriptor for a single field from its sampled values.
///
/// Runs the ordered edge-case detector battery before falling back to plain
/// kind-based inference, then applies format tagging, enum detection and
/// numeric bounds. Never fails: unparseable or contradictory input degrades
/// to the safest wider type with an explanatory rationale.
pub struct FieldTypeInferencer {
    config: InferenceConfig,
}

impl FieldTypeInferencer {
    /// Create an inferencer with default configuration.
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create an inferencer with custom configuration.
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Infer a descriptor for `field_name` from its sampled values.
    ///
    /// Absent values must be passed as nulls so nullability and requiredness
    /// reflect the full sample.
    pub fn infer(&self, field_name: &str, samples: &[Value]) -> FieldDescriptor {
        let non_null: Vec<&Value> = samples.iter().filter(|v| !v.is_null()).collect();
        let nullable = non_null.len() < samples.len();

        if non_null.is_empty() {
            let mut descriptor = FieldDescriptor::new(
                field_name,
                CanonicalType::String,
                "no data observed; defaulting to string",
            );
            descriptor.nullable = true;
            return descriptor;
        }

        let mut descriptor = self
            .run_detectors(field_name, &non_null)
            .unwrap_or_else(|| self.infer_plain(field_name, &non_null));

        descriptor.nullable = nullable;
        descriptor.required = !nullable;

        if descriptor.canonical_type == CanonicalType::String {
            self.tag_string_format(&mut descriptor, &non_null);
            self.detect_enum(&mut descriptor, &non_null);
        }

        if matches!(
            descriptor.canonical_type,
            CanonicalType::Integer | CanonicalType::Number
        ) && descriptor.numeric_range.is_none()
        {
            descriptor.numeric_range = numeric_bounds(&non_null);
        }

        descriptor
    }

    /// Evaluate the edge-case detector chain in priority order, stopping at
    /// the first match.
    fn run_detectors(&self, field_name: &str, non_null: &[&Value]) -> Option<FieldDescriptor> {
        for (name, detector) in EDGE_CASE_DETECTORS {
            if let Some(descriptor) = detector(field_name, non_null) {
                debug!(field = field_name, detector = name, "edge-case detector fired");
                return Some(descriptor);
            }
        }
        None
    }

    /// Plain fallback inference from the first non-null sample's kind.
    fn infer_plain(&self, field_name: &str, non_null: &[&Value]) -> FieldDescriptor {
        let kind = ValueKind::of(non_null[0]);
        match kind {
            ValueKind::Array => self.infer_array(field_name, non_null),
            ValueKind::Object => self.infer_object(field_name, non_null),
            _ => FieldDescriptor::new(
                field_name,
                CanonicalType::from_kind(kind),
                format!("plain inference from {} sample", kind),
            ),
        }
    }

    /// Infer an array descriptor from up to the first `max_array_elements`
    /// non-null elements across all sampled instances of the field.
    fn infer_array(&self, field_name: &str, non_null: &[&Value]) -> FieldDescriptor {
        let mut elements: Vec<Value> = Vec::new();
        for value in non_null {
            if let Value::Array(items) = value {
                for item in items.iter().filter(|i| !i.is_null()) {
                    if elements.len() >= self.config.max_array_elements {
                        break;
                    }
                    elements.push(item.clone());
                }
            }
        }

        let mut descriptor = FieldDescriptor::new(
            field_name,
            CanonicalType::Array,
            "plain inference from array sample",
        );

        if elements.is_empty() {
            let mut item = FieldDescriptor::new(
                field_name,
                CanonicalType::String,
                "no array elements observed; defaulting to string",
            );
            item.nullable = true;
            descriptor.item_type = Some(Box::new(item));
            return descriptor;
        }

        let kinds: BTreeSet<&'static str> = elements
            .iter()
            .map(|e| ValueKind::of(e).type_name())
            .collect();

        if kinds.len() > 1 {
            // Safe fallback: callers must not assume element homogeneity.
            let kind_list: Vec<&str> = kinds.into_iter().collect();
            descriptor.item_type = Some(Box::new(FieldDescriptor::new(
                field_name,
                CanonicalType::String,
                format!("mixed types detected: {}", kind_list.join(", ")),
            )));
        } else {
            descriptor.item_type = Some(Box::new(self.infer(field_name, &elements)));
        }

        descriptor
    }

    /// Infer an object descriptor by aggregating every value per child key
    /// across all object samples before recursing, so nested fields see the
    /// same sample breadth as top-level ones.
    fn infer_object(&self, field_name: &str, non_null: &[&Value]) -> FieldDescriptor {
        let objects: Vec<&serde_json::Map<String, Value>> = non_null
            .iter()
            .filter_map(|v| v.as_object())
            .collect();

        let mut keys: BTreeSet<&String> = BTreeSet::new();
        for object in &objects {
            keys.extend(object.keys());
        }

        let mut children = BTreeMap::new();
        for key in keys {
            let values: Vec<Value> = objects
                .iter()
                .map(|o| o.get(key).cloned().unwrap_or(Value::Null))
                .collect();
            children.insert(key.clone(), self.infer(key, &values));
        }

        let mut descriptor = FieldDescriptor::new(
            field_name,
            CanonicalType::Object,
            "plain inference from object sample",
        );
        descriptor.children = children;
        descriptor
    }

    /// Tag email/URI formats on strings no edge-case detector claimed.
    fn tag_string_format(&self, descriptor: &mut FieldDescriptor, non_null: &[&Value]) {
        if descriptor.format.is_some() {
            return;
        }
        let Some(first) = non_null.iter().find_map(|v| v.as_str()) else {
            return;
        };
        if let Some(format) = detect_string_format(&descriptor.name, first) {
            descriptor.rationale = format!("{}; format {} detected", descriptor.rationale, format);
            descriptor.format = Some(format);
        }
    }

    /// Populate advisory enum values for low-cardinality untagged strings:
    /// every observed value must recur at least once.
    fn detect_enum(&self, descriptor: &mut FieldDescriptor, non_null: &[&Value]) {
        if descriptor.format.is_some() {
            return;
        }
        let strings: Vec<&str> = non_null.iter().filter_map(|v| v.as_str()).collect();
        if strings.len() != non_null.len() {
            return;
        }
        let distinct: BTreeSet<&str> = strings.iter().copied().collect();
        if !distinct.is_empty() && distinct.len() < strings.len() {
            descriptor.enum_values = Some(distinct.into_iter().map(String::from).collect());
        }
    }
}

impl Default for FieldTypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// (min, max) over all parseable numeric samples.
fn numeric_bounds(non_null: &[&Value]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;

    for value in non_null {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        if let Some(v) = parsed {
            min = min.min(v);
            max = max.max(v);
            seen = true;
        }
    }

    seen.then_some((min, max))
}
