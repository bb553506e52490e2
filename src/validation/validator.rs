//! Record and batch validation

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::inference::formats::matches_format;
use crate::inference::types::{CanonicalType, FieldDescriptor};
use crate::schema::SchemaDocument;
use crate::value::ValueKind;

use super::report::{IssueType, Severity, ValidationIssue, ValidationReport};

/// Validates records against a [`SchemaDocument`].
///
/// The namespace container is flattened into the effective field map, and
/// record keys of the form `ns:field` match the bare field name, so
/// namespaced schemas validate flat exports without false extra-field
/// reports.
pub struct SchemaValidator<'a> {
    schema: &'a SchemaDocument,
    effective_fields: BTreeMap<&'a str, &'a FieldDescriptor>,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a SchemaDocument) -> Self {
        let mut effective_fields: BTreeMap<&str, &FieldDescriptor> = BTreeMap::new();
        for (name, descriptor) in &schema.fields {
            if schema.namespace_key.as_deref() == Some(name.as_str()) {
                for (child_name, child) in &descriptor.children {
                    effective_fields.insert(child_name, child);
                }
            } else {
                effective_fields.insert(name, descriptor);
            }
        }
        Self {
            schema,
            effective_fields,
        }
    }

    /// Validate a single record.
    pub fn validate_record(&self, record: &Value) -> ValidationReport {
        let mut issues = Vec::new();
        self.check_record(record, None, &mut issues);
        ValidationReport::from_issues(&self.schema.name, issues, Vec::new(), 1)
    }

    /// Validate a tabular batch.
    ///
    /// Required columns are verified against the union of keys across the
    /// whole batch before per-row checks. With `max_issues`, accumulation
    /// stops once the cap is reached and the report carries an explicit
    /// early-termination warning; truncation is never silent.
    pub fn validate_batch(
        &self,
        records: &[Value],
        max_issues: Option<usize>,
    ) -> ValidationReport {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        let batch_keys: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.as_object())
            .flat_map(|o| o.keys())
            .map(|k| bare_name(k))
            .collect();

        for (name, descriptor) in &self.effective_fields {
            if descriptor.required && !batch_keys.contains(name) {
                issues.push(
                    ValidationIssue::new(
                        Severity::Critical,
                        IssueType::MissingRequired,
                        *name,
                        format!("required column '{name}' missing from batch"),
                    )
                    .with_expected(descriptor.canonical_type.type_name()),
                );
            }
        }

        let mut rows_validated = 0;
        for (row_index, record) in records.iter().enumerate() {
            if let Some(max) = max_issues {
                if issues.len() >= max {
                    warnings.push(format!(
                        "validation stopped early after {} issues; {} of {} rows checked",
                        issues.len(),
                        row_index,
                        records.len()
                    ));
                    break;
                }
            }
            self.check_record(record, Some(row_index), &mut issues);
            rows_validated += 1;
        }

        ValidationReport::from_issues(&self.schema.name, issues, warnings, rows_validated)
    }

    fn check_record(
        &self,
        record: &Value,
        row_index: Option<usize>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let Some(object) = record.as_object() else {
            issues.push(
                ValidationIssue::new(
                    Severity::Critical,
                    IssueType::TypeMismatch,
                    "",
                    "record is not an object",
                )
                .with_expected("object")
                .with_actual(ValueKind::of(record).type_name())
                .with_row(row_index),
            );
            return;
        };

        // Record keys resolved to bare field names; first occurrence wins.
        let mut by_bare_name: BTreeMap<&str, &Value> = BTreeMap::new();
        for (key, value) in object {
            by_bare_name.entry(bare_name(key)).or_insert(value);
        }

        for (name, descriptor) in &self.effective_fields {
            match by_bare_name.get(name) {
                None | Some(Value::Null) => {
                    if descriptor.required {
                        issues.push(
                            ValidationIssue::new(
                                Severity::Critical,
                                IssueType::MissingRequired,
                                *name,
                                format!("required field '{name}' is missing or null"),
                            )
                            .with_expected(descriptor.canonical_type.type_name())
                            .with_row(row_index),
                        );
                    }
                }
                Some(value) => self.check_value(name, descriptor, value, row_index, issues),
            }
        }

        for key in by_bare_name.keys() {
            if !self.effective_fields.contains_key(key) {
                issues.push(
                    ValidationIssue::new(
                        Severity::Info,
                        IssueType::ExtraField,
                        *key,
                        format!("field '{key}' is not declared in the schema"),
                    )
                    .auto_fixable()
                    .with_row(row_index),
                );
            }
        }
    }

    fn check_value(
        &self,
        path: &str,
        descriptor: &FieldDescriptor,
        value: &Value,
        row_index: Option<usize>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let kind = ValueKind::of(value);
        if !kind_satisfies(kind, descriptor.canonical_type) {
            issues.push(
                ValidationIssue::new(
                    Severity::Critical,
                    IssueType::TypeMismatch,
                    path,
                    format!(
                        "expected {}, found {}",
                        descriptor.canonical_type, kind
                    ),
                )
                .with_sample(value.clone())
                .with_expected(descriptor.canonical_type.type_name())
                .with_actual(kind.type_name())
                .auto_fixable()
                .with_row(row_index),
            );
            return;
        }

        match value {
            Value::String(s) => {
                self.check_string(path, descriptor, s, row_index, issues);
            }
            Value::Number(n) => {
                if let (Some(v), Some((min, max))) = (n.as_f64(), descriptor.numeric_range) {
                    if v < min {
                        issues.push(bound_issue(
                            IssueType::Minimum, path, value, format!(">= {min}"), v, row_index,
                        ));
                    }
                    if v > max {
                        issues.push(bound_issue(
                            IssueType::Maximum, path, value, format!("<= {max}"), v, row_index,
                        ));
                    }
                }
            }
            Value::Object(object) => {
                if !descriptor.children.is_empty() {
                    self.check_children(path, descriptor, object, row_index, issues);
                }
            }
            Value::Array(items) => {
                if let Some(item_type) = &descriptor.item_type {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_null() {
                            let item_path = format!("{path}[{i}]");
                            self.check_value(&item_path, item_type, item, row_index, issues);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn check_string(
        &self,
        path: &str,
        descriptor: &FieldDescriptor,
        value: &str,
        row_index: Option<usize>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if let Some(format) = descriptor.format {
            if !matches_format(value, format) {
                issues.push(
                    ValidationIssue::new(
                        Severity::Warning,
                        IssueType::FormatMismatch,
                        path,
                        format!("value does not look like {format}"),
                    )
                    .with_sample(Value::String(value.to_string()))
                    .with_expected(format.to_string())
                    .auto_fixable()
                    .with_row(row_index),
                );
            }
        }

        let length = value.chars().count();
        if let Some(min) = descriptor.min_length {
            if length < min {
                issues.push(
                    ValidationIssue::new(
                        Severity::Critical,
                        IssueType::MinLength,
                        path,
                        format!("string length {length} is below the minimum of {min}"),
                    )
                    .with_sample(Value::String(value.to_string()))
                    .with_expected(format!("length >= {min}"))
                    .with_actual(length.to_string())
                    .with_row(row_index),
                );
            }
        }
        if let Some(max) = descriptor.max_length {
            if length > max {
                issues.push(
                    ValidationIssue::new(
                        Severity::Critical,
                        IssueType::MaxLength,
                        path,
                        format!("string length {length} exceeds the maximum of {max}"),
                    )
                    .with_sample(Value::String(value.to_string()))
                    .with_expected(format!("length <= {max}"))
                    .with_actual(length.to_string())
                    .with_row(row_index),
                );
            }
        }

        if let Some(allowed) = &descriptor.enum_values {
            if !allowed.iter().any(|a| a == value) {
                issues.push(
                    ValidationIssue::new(
                        Severity::Critical,
                        IssueType::EnumViolation,
                        path,
                        format!("value '{value}' is not in the allowed set"),
                    )
                    .with_sample(Value::String(value.to_string()))
                    .with_expected(allowed.join(", "))
                    .with_actual(value.to_string())
                    .with_row(row_index),
                );
            }
        }
    }

    fn check_children(
        &self,
        path: &str,
        descriptor: &FieldDescriptor,
        object: &serde_json::Map<String, Value>,
        row_index: Option<usize>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for (child_name, child) in &descriptor.children {
            let child_path = format!("{path}.{child_name}");
            match object.get(child_name) {
                None | Some(Value::Null) => {
                    if child.required {
                        issues.push(
                            ValidationIssue::new(
                                Severity::Critical,
                                IssueType::MissingRequired,
                                child_path,
                                format!("required field '{child_name}' is missing or null"),
                            )
                            .with_expected(child.canonical_type.type_name())
                            .with_row(row_index),
                        );
                    }
                }
                Some(value) => self.check_value(&child_path, child, value, row_index, issues),
            }
        }

        for key in object.keys() {
            if !descriptor.children.contains_key(key) {
                issues.push(
                    ValidationIssue::new(
                        Severity::Info,
                        IssueType::ExtraField,
                        format!("{path}.{key}"),
                        format!("field '{key}' is not declared in the schema"),
                    )
                    .auto_fixable()
                    .with_row(row_index),
                );
            }
        }
    }
}

/// Record key resolution: `ns:field` matches the bare field name.
fn bare_name(key: &str) -> &str {
    key.split_once(':').map_or(key, |(_, bare)| bare)
}

/// The single allowed widening: an observed integer satisfies a declared
/// number. Everything else must match exactly.
fn kind_satisfies(kind: ValueKind, declared: CanonicalType) -> bool {
    match (kind, declared) {
        (ValueKind::Integer, CanonicalType::Number) => true,
        _ => CanonicalType::from_kind(kind) == declared,
    }
}

fn bound_issue(
    issue_type: IssueType,
    path: &str,
    value: &Value,
    expected: String,
    actual: f64,
    row_index: Option<usize>,
) -> ValidationIssue {
    let relation = if issue_type == IssueType::Minimum {
        "below the minimum"
    } else {
        "above the maximum"
    };
    ValidationIssue::new(
        Severity::Critical,
        issue_type,
        path,
        format!("value {actual} is {relation}"),
    )
    .with_sample(value.clone())
    .with_expected(expected)
    .with_actual(actual.to_string())
    .with_row(row_index)
}
