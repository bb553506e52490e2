//! Schema inference engine for semi-structured record samples
//!
//! Provides unified building blocks for:
//! - Per-field type inference with edge-case detection (boolean variants,
//!   date formats, phone numbers, currency)
//! - Schema assembly with standard-field elision and namespace nesting
//! - Record/batch validation with categorized, ranked issue reporting
//! - Dataset profiling with primary/foreign key heuristics

pub mod inference;
pub mod profiling;
pub mod schema;
pub mod validation;
pub mod value;

// Re-export commonly used types
pub use inference::{
    CanonicalType, FieldDescriptor, FieldFormat, FieldTypeInferencer, InferenceConfig,
    InferenceConfigBuilder, InferenceError,
};
pub use profiling::{DatasetProfiler, EntityProfile, FieldStats};
pub use schema::{SchemaBuilder, SchemaDocument};
pub use validation::{
    IssueType, OverallStatus, SchemaValidator, Severity, ValidationIssue, ValidationReport,
};
pub use value::ValueKind;
