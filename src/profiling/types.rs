//! Profiling output types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::ValueKind;

/// Per-field statistics gathered while profiling an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    /// Most frequent native kind observed, ties broken by first-seen
    pub detected_type: ValueKind,

    /// First non-null values, capped by configuration
    pub sample_values: Vec<Value>,

    pub null_count: usize,

    /// Distinct scalar values seen, capped by configuration; a lower bound
    /// on true cardinality once the cap is hit
    pub approx_unique_count: usize,

    /// Field name follows identifier conventions (`id`, `*_id`, `*Id`)
    pub looks_like_identifier: bool,
}

/// Profile of one named record collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProfile {
    pub entity_name: String,

    pub record_count: usize,

    pub fields: BTreeMap<String, FieldStats>,

    /// Best primary-key candidate by naming heuristic, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_primary_key: Option<String>,

    /// Identifier-looking fields other than the primary key, in the order
    /// encountered
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub candidate_foreign_keys: Vec<String>,
}
