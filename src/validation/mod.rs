//! Record validation against inferred schemas
//!
//! Provides validation logic for:
//! - Single records (type, format, bounds, enum, required, extra fields)
//! - Tabular batches (required-column precheck, per-row issues, capped
//!   accumulation with an explicit early-termination marker)

pub mod report;
pub mod validator;

pub use report::{IssueType, OverallStatus, Severity, ValidationIssue, ValidationReport};
pub use validator::SchemaValidator;
