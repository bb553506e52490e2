//! Configuration for inference, building and profiling

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default platform-reserved field names, matched case/underscore-insensitively.
///
/// These fields are excluded from the custom-field namespace when building a
/// schema; callers map them onto their platform's pre-defined structures.
const DEFAULT_STANDARD_FIELDS: &[&str] = &[
    "email",
    "firstName",
    "lastName",
    "fullName",
    "phone",
    "mobilePhone",
    "birthDate",
    "gender",
];

/// Configuration for schema inference and profiling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Maximum array elements inspected per field when inferring item types
    pub max_array_elements: usize,

    /// Maximum sample values retained per field during profiling
    pub max_sample_values: usize,

    /// Cap on the distinct-value set tracked per field for cardinality
    /// estimation, so profiling stays bounded regardless of record count
    pub max_distinct_tracked: usize,

    /// Platform-reserved field names excluded from the custom-field
    /// namespace. Stored in normalized form (lowercase, underscores removed).
    pub standard_fields: BTreeSet<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_array_elements: 10,
            max_sample_values: 5,
            max_distinct_tracked: 1000,
            standard_fields: DEFAULT_STANDARD_FIELDS
                .iter()
                .map(|f| normalize_field_name(f))
                .collect(),
        }
    }
}

impl InferenceConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration.
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Check whether a field name is platform-reserved.
    pub fn is_standard_field(&self, name: &str) -> bool {
        self.standard_fields.contains(&normalize_field_name(name))
    }
}

/// Normalize a field name for standard-field matching: lowercase with
/// underscores removed, so `first_name`, `firstName` and `FIRSTNAME` all
/// compare equal.
pub(crate) fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Builder for [`InferenceConfig`]
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the maximum array elements inspected per field.
    pub fn max_array_elements(mut self, max: usize) -> Self {
        self.config.max_array_elements = max;
        self
    }

    /// Set the maximum sample values retained per field.
    pub fn max_sample_values(mut self, max: usize) -> Self {
        self.config.max_sample_values = max;
        self
    }

    /// Set the cap on distinct values tracked per field.
    pub fn max_distinct_tracked(mut self, max: usize) -> Self {
        self.config.max_distinct_tracked = max;
        self
    }

    /// Replace the standard-field set entirely.
    pub fn standard_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.standard_fields = fields
            .into_iter()
            .map(|f| normalize_field_name(f.as_ref()))
            .collect();
        self
    }

    /// Add a field name to the standard-field set.
    pub fn add_standard_field(mut self, field: &str) -> Self {
        self.config
            .standard_fields
            .insert(normalize_field_name(field));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
