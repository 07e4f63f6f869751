//! Error types: fatal configuration errors and aggregated validation failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One violated constraint, recorded under its field in the failure map.
///
/// Carries the rule name, the arguments it was compiled with, the field's
/// value at the time the violation was recorded, and the fully resolved,
/// placeholder-substituted message (if any template matched).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Failure {
    /// The rule that was violated.
    pub rule: String,
    /// Arguments from the rule grammar, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// The field's value when the failure was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Resolved message; `None` when no template matched at any tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Per-field failure lists. Within a field the compiled constraint order is
/// preserved; the engine makes no ordering promise between fields.
pub type FailureMap = BTreeMap<String, Vec<Failure>>;

/// Aggregated validation failure, produced by the error handler collaborator.
///
/// The default handler produces this shape: a human summary, a numeric status
/// classifier, and the structured per-field detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Machine status classifier.
    pub status: u16,
    /// Human summary of the failure.
    pub message: String,
    /// Per-field failure detail.
    pub failures: FailureMap,
}

impl ValidationError {
    /// Build the default error shape around a failure map.
    pub fn new(failures: FailureMap) -> Self {
        Self {
            status: 400,
            message: "Please check your submitted values.".to_string(),
            failures,
        }
    }

    /// Replace the human summary.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Total number of recorded failures across all fields.
    pub fn len(&self) -> usize {
        self.failures.values().map(|v| v.len()).sum()
    }

    /// True when no field recorded a failure.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} failure(s) across {} field(s))",
            self.message,
            self.len(),
            self.failures.len()
        )
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by [`Validator::validate`](crate::Validator::validate).
///
/// Every variant except [`Error::Invalid`] is a fatal configuration error:
/// it aborts the entire run immediately and bypasses the error handler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A compiled constraint referenced a rule with no registered check.
    #[error("a check for the rule `{0}` does not exist")]
    UnknownRule(String),

    /// A rule was invoked without an argument it requires.
    #[error("the `{arg}` argument of the `{rule}` rule is required")]
    MissingArgument {
        /// The rule that was invoked.
        rule: String,
        /// What the rule was missing.
        arg: String,
    },

    /// A rule argument was supplied but could not be used (e.g. a malformed
    /// pattern or a non-numeric bound).
    #[error("bad argument for the `{rule}` rule: {reason}")]
    InvalidArgument {
        /// The rule that was invoked.
        rule: String,
        /// Why the argument was rejected.
        reason: String,
    },

    /// One or more constraints were violated. Routed through the error
    /// handler collaborator, so the inner shape is pluggable.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl Error {
    /// Fatal configuration misuse, as opposed to a normal validation failure.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Invalid(_))
    }

    pub(crate) fn missing_argument(rule: &str, arg: &str) -> Self {
        Error::MissingArgument {
            rule: rule.to_string(),
            arg: arg.to_string(),
        }
    }

    pub(crate) fn invalid_argument(rule: &str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_and_invalid_are_disjoint() {
        assert!(Error::UnknownRule("nope".into()).is_fatal());
        assert!(Error::missing_argument("max", "max").is_fatal());
        assert!(Error::invalid_argument("regex", "unclosed group").is_fatal());
        assert!(!Error::Invalid(ValidationError::new(FailureMap::new())).is_fatal());
    }

    #[test]
    fn validation_error_default_shape() {
        let mut failures = FailureMap::new();
        failures.insert(
            "email".to_string(),
            vec![Failure {
                rule: "required".to_string(),
                args: vec![],
                value: None,
                message: Some("The email field is required.".to_string()),
            }],
        );

        let err = ValidationError::new(failures);
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "Please check your submitted values.");
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn failure_serializes_without_empty_optionals() {
        let failure = Failure {
            rule: "required".to_string(),
            args: vec![],
            value: None,
            message: None,
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json, serde_json::json!({"rule": "required"}));
    }
}
