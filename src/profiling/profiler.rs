//! Multi-entity dataset profiling

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use crate::inference::config::InferenceConfig;
use crate::value::ValueKind;

use super::types::{EntityProfile, FieldStats};

/// Profiles named record collections and proposes key relationships.
///
/// Key detection is a naming heuristic only; the profiler performs no
/// value-overlap check between entities. Callers wanting stronger
/// relationship confirmation do that on top of these candidates.
pub struct DatasetProfiler {
    config: InferenceConfig,
}

impl DatasetProfiler {
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Profile every entity in the dataset.
    pub fn profile(&self, entities: &BTreeMap<String, Vec<Value>>) -> BTreeMap<String, EntityProfile> {
        entities
            .iter()
            .map(|(name, records)| (name.clone(), self.profile_entity(name, records)))
            .collect()
    }

    /// Profile a single named record collection.
    pub fn profile_entity(&self, entity_name: &str, records: &[Value]) -> EntityProfile {
        let mut field_order: Vec<String> = Vec::new();
        let mut accumulators: BTreeMap<String, FieldAccumulator> = BTreeMap::new();

        let objects: Vec<&serde_json::Map<String, Value>> = records
            .iter()
            .filter_map(|record| match record.as_object() {
                Some(object) => Some(object),
                None => {
                    warn!(entity = entity_name, "skipping non-object record");
                    None
                }
            })
            .collect();

        for object in &objects {
            for key in object.keys() {
                if !accumulators.contains_key(key) {
                    field_order.push(key.clone());
                    accumulators.insert(key.clone(), FieldAccumulator::default());
                }
            }
        }

        for object in &objects {
            for field in &field_order {
                if let Some(acc) = accumulators.get_mut(field) {
                    acc.observe(object.get(field).unwrap_or(&Value::Null), &self.config);
                }
            }
        }

        let mut fields = BTreeMap::new();
        for field in &field_order {
            if let Some(acc) = accumulators.get(field) {
                fields.insert(
                    field.clone(),
                    acc.finish(looks_like_identifier(field, entity_name)),
                );
            }
        }

        let candidate_primary_key = select_primary_key(entity_name, &field_order, &fields);
        let candidate_foreign_keys = field_order
            .iter()
            .filter(|f| {
                fields[*f].looks_like_identifier && Some(*f) != candidate_primary_key.as_ref()
            })
            .cloned()
            .collect();

        EntityProfile {
            entity_name: entity_name.to_string(),
            record_count: records.len(),
            fields,
            candidate_primary_key,
            candidate_foreign_keys,
        }
    }
}

impl Default for DatasetProfiler {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct FieldAccumulator {
    /// Kind counts in first-seen order, so frequency ties resolve stably
    kind_counts: Vec<(ValueKind, usize)>,
    samples: Vec<Value>,
    null_count: usize,
    distinct: BTreeSet<String>,
}

impl FieldAccumulator {
    fn observe(&mut self, value: &Value, config: &InferenceConfig) {
        if value.is_null() {
            self.null_count += 1;
            return;
        }

        let kind = ValueKind::of(value);
        match self.kind_counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) => *count += 1,
            None => self.kind_counts.push((kind, 1)),
        }

        if self.samples.len() < config.max_sample_values {
            self.samples.push(value.clone());
        }

        // Distinct tracking covers scalars with stable identity only.
        if self.distinct.len() < config.max_distinct_tracked {
            match value {
                Value::String(s) => {
                    self.distinct.insert(format!("s:{s}"));
                }
                Value::Number(n) if n.is_i64() || n.is_u64() => {
                    self.distinct.insert(format!("i:{n}"));
                }
                _ => {}
            }
        }
    }

    fn finish(&self, looks_like_identifier: bool) -> FieldStats {
        // kind_counts is in first-seen order; only a strictly greater count
        // displaces the current winner, so frequency ties keep the kind
        // observed first.
        let mut detected_type = ValueKind::Null;
        let mut best_count = 0;
        for (kind, count) in &self.kind_counts {
            if *count > best_count {
                best_count = *count;
                detected_type = *kind;
            }
        }

        FieldStats {
            detected_type,
            sample_values: self.samples.clone(),
            null_count: self.null_count,
            approx_unique_count: self.distinct.len(),
            looks_like_identifier,
        }
    }
}

/// Identifier naming convention check.
fn looks_like_identifier(field_name: &str, entity_name: &str) -> bool {
    field_name == "id"
        || field_name.ends_with("_id")
        || field_name.ends_with("Id")
        || field_name.ends_with("_ID")
        || field_name == format!("{entity_name}_id")
}

/// Pick the best primary-key candidate by naming priority; first-seen order
/// breaks ties.
fn select_primary_key(
    entity_name: &str,
    field_order: &[String],
    fields: &BTreeMap<String, FieldStats>,
) -> Option<String> {
    let singular = entity_name.strip_suffix('s').unwrap_or(entity_name);
    let entity_id = format!("{entity_name}_id");

    let mut best: Option<(&String, u8)> = None;
    for field in field_order {
        let priority = if *field == entity_id {
            3
        } else if field == "id" {
            2
        } else if fields[field].looks_like_identifier && field.contains(singular) {
            1
        } else {
            0
        };
        if priority > 0 && best.map_or(true, |(_, p)| priority > p) {
            best = Some((field, priority));
        }
    }

    best.map(|(field, _)| field.clone())
}
