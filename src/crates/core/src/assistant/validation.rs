//! Structural validation of generated scripts before execution.
//!
//! Blocking issues abort the run; advisory issues are logged and the
//! script still executes.

use serde::Serialize;

/// Marker the runner also keys its entry-point driver on.
pub const ENTRY_POINT_MARKER: &str = "def run(";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Advisory,
    Blocking,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

impl ValidationIssue {
    fn blocking(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Blocking,
            message: message.into(),
        }
    }

    fn advisory(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Advisory,
            message: message.into(),
        }
    }
}

/// Scan the script for required structural markers and known risky
/// patterns.
pub fn validate_script(code: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !code.contains(ENTRY_POINT_MARKER) {
        issues.push(ValidationIssue::blocking(
            "script does not define the run(context) entry point",
        ));
    }

    if !(code.contains("try:") && code.contains("except")) {
        issues.push(ValidationIssue::blocking(
            "script has no try/except error handling block",
        ));
    }

    if !code.contains("adsk.core.Application.get()") || !code.contains("userInterface") {
        issues.push(ValidationIssue::advisory(
            "script skips the standard application/UI initialization",
        ));
    }

    if code.contains("revolveFeatures") && !code.contains("isConstruction") {
        issues.push(ValidationIssue::advisory(
            "revolve without an explicit construction-axis check; tangent axes fail the operation",
        ));
    }

    if code.contains("extrudeFeatures") && !code.contains("profiles.count") {
        issues.push(ValidationIssue::advisory(
            "extrude without checking that the sketch produced any profiles",
        ));
    }

    if code.contains("createByReal(") {
        issues.push(ValidationIssue::advisory(
            "unit-ambiguous numeric value; prefer ValueInput.createByString with explicit units",
        ));
    }

    issues
}

pub fn has_blocking(issues: &[ValidationIssue]) -> bool {
    issues
        .iter()
        .any(|issue| issue.severity == IssueSeverity::Blocking)
}
