//! Validation issues and reports

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How badly an issue hurts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// Category of a validation discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    TypeMismatch,
    FormatMismatch,
    MissingRequired,
    EnumViolation,
    Minimum,
    Maximum,
    MinLength,
    MaxLength,
    ExtraField,
}

/// Aggregate validation outcome, derived from issue severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Passed,
    PassedWithWarnings,
    Failed,
}

/// One discrepancy between a record and the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,

    /// Dot-joined path to the offending field; array elements are indexed.
    pub field_path: String,

    pub issue_type: IssueType,

    pub message: String,

    /// The offending value, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,

    /// Whether a mechanical transform could repair the record
    pub auto_fixable: bool,

    /// Row position for tabular input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        issue_type: IssueType,
        field_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            field_path: field_path.into(),
            issue_type,
            message: message.into(),
            sample_value: None,
            expected: None,
            actual: None,
            auto_fixable: false,
            row_index: None,
        }
    }

    pub fn with_sample(mut self, value: Value) -> Self {
        self.sample_value = Some(value);
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn auto_fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }

    pub fn with_row(mut self, row_index: Option<usize>) -> Self {
        self.row_index = row_index;
        self
    }
}

/// Result of validating one record or a batch against a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Name of the schema validated against
    pub schema_name: String,

    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,

    /// Issues in the order they were found
    pub issues: Vec<ValidationIssue>,

    /// Out-of-band process notices (early termination, skipped rows)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,

    pub rows_validated: usize,

    pub overall_status: OverallStatus,
}

impl ValidationReport {
    /// Assemble a report, deriving counts and status from the issue list.
    ///
    /// Any critical issue fails the report; otherwise any warning demotes it
    /// to passed-with-warnings. Process notices never affect the status.
    pub fn from_issues(
        schema_name: impl Into<String>,
        issues: Vec<ValidationIssue>,
        warnings: Vec<String>,
        rows_validated: usize,
    ) -> Self {
        let critical_count = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        let warning_count = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count();
        let info_count = issues
            .iter()
            .filter(|i| i.severity == Severity::Info)
            .count();

        let overall_status = if critical_count > 0 {
            OverallStatus::Failed
        } else if warning_count > 0 {
            OverallStatus::PassedWithWarnings
        } else {
            OverallStatus::Passed
        };

        Self {
            schema_name: schema_name.into(),
            critical_count,
            warning_count,
            info_count,
            issues,
            warnings,
            rows_validated,
            overall_status,
        }
    }

    pub fn passed(&self) -> bool {
        self.overall_status != OverallStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> ValidationIssue {
        ValidationIssue::new(severity, IssueType::TypeMismatch, "f", "msg")
    }

    #[test]
    fn test_status_derivation() {
        let passed = ValidationReport::from_issues("s", vec![], vec![], 1);
        assert_eq!(passed.overall_status, OverallStatus::Passed);

        let warned = ValidationReport::from_issues(
            "s",
            vec![issue(Severity::Warning), issue(Severity::Info)],
            vec![],
            1,
        );
        assert_eq!(warned.overall_status, OverallStatus::PassedWithWarnings);
        assert_eq!(warned.warning_count, 1);
        assert_eq!(warned.info_count, 1);

        let failed = ValidationReport::from_issues(
            "s",
            vec![issue(Severity::Warning), issue(Severity::Critical)],
            vec![],
            1,
        );
        assert_eq!(failed.overall_status, OverallStatus::Failed);
        assert!(!failed.passed());
    }

    #[test]
    fn test_process_warnings_do_not_affect_status() {
        let report = ValidationReport::from_issues(
            "s",
            vec![],
            vec!["stopped early".to_string()],
            10,
        );
        assert_eq!(report.overall_status, OverallStatus::Passed);
    }

    #[test]
    fn test_issue_serialization_shape() {
        let issue = ValidationIssue::new(
            Severity::Critical,
            IssueType::MinLength,
            "profile.name",
            "too short",
        )
        .with_expected("length >= 2")
        .with_actual("1");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["issueType"], "min_length");
        assert_eq!(json["fieldPath"], "profile.name");
        assert!(json.get("rowIndex").is_none());
    }
}
