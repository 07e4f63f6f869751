//! Message templates: the default table, shape dispatch, and the three-tier
//! resolution precedence.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A default message template for one rule.
///
/// Some rules phrase the same bound differently depending on what kind of
/// subject is being measured - a string's length, a numeric value, an
/// array's item count, or a file's size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageSpec {
    /// One template regardless of the value's shape.
    Flat(String),
    /// Shape-dispatched templates, selected by the input value's runtime
    /// shape at schema-compile time.
    BySubject {
        /// Template when the value is a string.
        string: String,
        /// Template when the value is a sequence.
        array: String,
        /// Template when the value is a number.
        numeric: String,
        /// Template for everything else (file-like subjects).
        file: String,
    },
}

impl MessageSpec {
    /// Selects the template branch for a value's shape.
    pub fn for_value(&self, value: Option<&Value>) -> &str {
        match self {
            MessageSpec::Flat(template) => template,
            MessageSpec::BySubject {
                string,
                array,
                numeric,
                file,
            } => match value {
                Some(Value::String(_)) => string,
                Some(Value::Array(_)) => array,
                Some(Value::Number(_)) => numeric,
                _ => file,
            },
        }
    }
}

impl From<&str> for MessageSpec {
    fn from(template: &str) -> Self {
        MessageSpec::Flat(template.to_string())
    }
}

impl From<String> for MessageSpec {
    fn from(template: String) -> Self {
        MessageSpec::Flat(template)
    }
}

/// Call-scoped message overrides, keyed by `"rule"` or `"field.rule"`.
pub type Messages = HashMap<String, String>;

/// Resolves the message template for one (field, rule) pair.
///
/// Precedence, most specific wins: call-scoped `"field.rule"`, then
/// call-scoped `"rule"`, then the configured default for `rule` (shape
/// dispatched when not flat). `None` when nothing matches; later stages
/// tolerate an absent message.
pub(crate) fn resolve(
    field: &str,
    rule: &str,
    value: Option<&Value>,
    call: &Messages,
    defaults: &HashMap<String, MessageSpec>,
) -> Option<String> {
    if let Some(template) = call.get(&format!("{field}.{rule}")) {
        return Some(template.clone());
    }
    if let Some(template) = call.get(rule) {
        return Some(template.clone());
    }
    defaults
        .get(rule)
        .map(|spec| spec.for_value(value).to_string())
}

macro_rules! sized_spec {
    ($string:expr, $array:expr, $numeric:expr, $file:expr) => {
        MessageSpec::BySubject {
            string: $string.to_string(),
            array: $array.to_string(),
            numeric: $numeric.to_string(),
            file: $file.to_string(),
        }
    };
}

/// The built-in default message table, one entry per built-in rule.
pub(crate) fn defaults() -> HashMap<String, MessageSpec> {
    let flat: &[(&str, &str)] = &[
        ("accepted", "The :attribute must be accepted."),
        ("after", "The :attribute must be a date after :date."),
        ("alpha", "The :attribute may only contain letters."),
        (
            "alpha_num",
            "The :attribute may only contain letters and numbers.",
        ),
        (
            "alpha_num_dash",
            "The :attribute may only contain letters, numbers, and dashes.",
        ),
        ("array", "The :attribute must be an array."),
        ("before", "The :attribute must be a date before :date."),
        ("boolean", "The :attribute field must be true or false."),
        ("confirmed", "The :attribute confirmation does not match."),
        ("date", "The :attribute is not a valid date."),
        (
            "date_format",
            "The :attribute does not match the format :format.",
        ),
        ("different", "The :attribute and :other must be different."),
        ("digits", "The :attribute must be :digits digits."),
        (
            "digits_between",
            "The :attribute must be between :min and :max digits.",
        ),
        ("email", "The :attribute must be a valid email address."),
        ("in", "The selected :attribute is invalid."),
        ("integer", "The :attribute must be an integer."),
        ("ip", "The :attribute must be a valid IP address."),
        ("json", "The :attribute must be a valid JSON string."),
        ("not_in", "The selected :attribute is invalid."),
        ("numeric", "The :attribute must be a number."),
        ("object", "The :attribute must be an object."),
        ("regex", "The :attribute format is invalid."),
        ("required", "The :attribute field is required."),
        (
            "required_if",
            "The :attribute field is required when :other is :value.",
        ),
        (
            "required_with",
            "The :attribute field is required when :values is present.",
        ),
        (
            "required_with_all",
            "The :attribute field is required when :values is present.",
        ),
        (
            "required_without",
            "The :attribute field is required when :values is not present.",
        ),
        (
            "required_without_all",
            "The :attribute field is required when none of :values are present.",
        ),
        ("same", "The :attribute and :other must match."),
        ("string", "The :attribute must be a string."),
        ("timezone", "The :attribute must be a valid zone."),
        ("url", "The :attribute format is invalid."),
    ];

    let mut table: HashMap<String, MessageSpec> = flat
        .iter()
        .map(|(rule, template)| (rule.to_string(), MessageSpec::from(*template)))
        .collect();

    table.insert(
        "between".to_string(),
        sized_spec!(
            "The :attribute must be between :min and :max characters.",
            "The :attribute must have between :min and :max items.",
            "The :attribute must be between :min and :max.",
            "The :attribute must be between :min and :max kilobytes."
        ),
    );
    table.insert(
        "max".to_string(),
        sized_spec!(
            "The :attribute may not be greater than :max characters.",
            "The :attribute may not have more than :max items.",
            "The :attribute may not be greater than :max.",
            "The :attribute may not be greater than :max kilobytes."
        ),
    );
    table.insert(
        "min".to_string(),
        sized_spec!(
            "The :attribute must be at least :min characters.",
            "The :attribute must have at least :min items.",
            "The :attribute must be at least :min.",
            "The :attribute must be at least :min kilobytes."
        ),
    );
    table.insert(
        "size".to_string(),
        sized_spec!(
            "The :attribute must be :size characters.",
            "The :attribute must contain :size items.",
            "The :attribute must be :size.",
            "The :attribute must be :size kilobytes."
        ),
    );

    table
}
