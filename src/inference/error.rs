//! Error types for schema inference

use thiserror::Error;

/// Errors that can occur during schema inference.
///
/// Inference degrades rather than fails: ambiguous types, malformed dates
/// and contradictory array elements all produce a best-effort descriptor
/// with a rationale. The one hard failure is building from zero records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// No records provided to build a schema from
    #[error("no records provided for schema inference")]
    EmptyInput,
}
