//! Field-level type inference
//!
//! Turns sampled values into typed field descriptors. An ordered battery of
//! edge-case detectors (boolean variants, date formats, phone numbers,
//! currency) runs before plain kind-based inference, so messy real-world
//! exports classify the way an analyst would read them rather than the way
//! a JSON parser sees them.

pub mod config;
pub mod detectors;
pub mod error;
pub mod formats;
pub mod inferrer;
pub mod types;

pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub use inferrer::FieldTypeInferencer;
pub use types::{CanonicalType, FieldDescriptor, FieldFormat};
