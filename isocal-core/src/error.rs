//! Error types for the isocal ecosystem.

use std::fmt;

use serde::Serialize;
use serde_json::Number;
use thiserror::Error;
use uuid::Uuid;

/// A single violated field-level invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted path of the offending field, e.g. `date.value.isoWeek`
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Raised by every construction entry point when input violates a field invariant.
///
/// All violations found in one input are reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}", join_issues(&self.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError {
            issues: vec![FieldIssue {
                field: field.into(),
                reason: reason.into(),
            }],
        }
    }

    /// Nest every issue under `prefix` (`year` becomes `date.value.year`).
    pub fn prefixed(self, prefix: &str) -> Self {
        let issues = self
            .issues
            .into_iter()
            .map(|issue| FieldIssue {
                field: format!("{}.{}", prefix, issue.field),
                reason: issue.reason,
            })
            .collect();

        ValidationError { issues }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects field issues while a structural record is being checked.
#[derive(Debug, Default)]
pub(crate) struct Issues(Vec<FieldIssue>);

impl Issues {
    pub(crate) fn push(&mut self, field: &str, reason: impl Into<String>) {
        self.0.push(FieldIssue {
            field: field.to_string(),
            reason: reason.into(),
        });
    }

    pub(crate) fn extend(&mut self, error: ValidationError) {
        self.0.extend(error.issues);
    }

    /// Check a required integer field against an inclusive range.
    pub(crate) fn integer_in(
        &mut self,
        field: &str,
        value: Option<&Number>,
        min: i64,
        max: i64,
    ) -> Option<i64> {
        let Some(number) = value else {
            self.push(field, "is required");
            return None;
        };

        let Some(n) = as_integer(number) else {
            self.push(field, "must be an integer");
            return None;
        };

        if n < min || n > max {
            self.push(field, format!("must be between {} and {}", min, max));
            return None;
        }

        Some(n)
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

/// Integral JSON numbers, including floats with no fractional part (`2024.0`).
fn as_integer(number: &Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }

    let f = number.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Errors that can occur in isocal store, config and import operations.
#[derive(Error, Debug)]
pub enum IsocalError {
    #[error("Invalid event data: {0}")]
    Validation(#[from] ValidationError),

    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Empty CSV file")]
    EmptyCsv,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for isocal operations.
pub type IsocalResult<T> = Result<T, IsocalError>;
