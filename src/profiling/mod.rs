//! Dataset profiling and key-relationship heuristics
//!
//! [`DatasetProfiler`] walks multiple named record collections, gathers
//! bounded per-field statistics, and proposes primary/foreign key candidates
//! from naming conventions.

pub mod profiler;
pub mod types;

pub use profiler::DatasetProfiler;
pub use types::{EntityProfile, FieldStats};
