//! Schema registry
//!
//! Declarative validation for the two AI wire formats (event
//! extraction and outfit generation) plus the confirmed-details rules
//! used by the orchestrator. Every inbound model payload passes
//! through here before it becomes session state.

pub mod event;
pub mod outfit;

use serde::Serialize;

/// One structural or value-range violation, with a JSON-path-ish
/// location.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Join violations into a single diagnostic string.
pub fn describe(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
