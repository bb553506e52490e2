//! Schema assembly and export
//!
//! [`SchemaBuilder`] enumerates fields across a record sample, runs the
//! inferencer per field, applies standard-field elision and namespace
//! nesting, and produces a [`SchemaDocument`] that can be exported as JSON
//! Schema.

pub mod builder;
pub mod document;

pub use builder::SchemaBuilder;
pub use document::SchemaDocument;
