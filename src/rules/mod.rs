//! Built-in rule checks, grouped by concern.
//!
//! Checks that need network, filesystem, or database collaborators
//! (`active_url`, `image`, `mimes`, `exists`, `unique`) are deliberately not
//! built in; register them as custom rules when the surrounding application
//! supplies those collaborators.

mod datetime;
mod format;
mod presence;
mod size;

use crate::rule::{rule_fn, Rule};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A value counts as present unless it is missing, null, an empty string, or
/// an empty array. Numbers and booleans are always present, including `0`
/// and `false`.
pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// The measured "size" of a value: character count for strings, the number
/// itself for numerics, element count for arrays and objects.
pub(crate) fn size_of(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::String(s)) => s.chars().count() as f64,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Array(items)) => items.len() as f64,
        Some(Value::Object(map)) => map.len() as f64,
        _ => 0.0,
    }
}

/// Numeric reading of a value, accepting numeric strings.
pub(crate) fn as_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Textual form used for membership tests and cross-field comparisons.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Loose scalar equality: identical values match, and otherwise scalars are
/// compared by their textual form (so `"1"` matches `1`). Composite values
/// only match structurally.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => text_of(a) == text_of(b),
    }
}

/// The built-in rule table, keyed by rule name.
pub(crate) fn defaults() -> HashMap<String, Arc<dyn Rule>> {
    let entries: Vec<(&str, Arc<dyn Rule>)> = vec![
        ("accepted", rule_fn(presence::accepted)),
        ("after", rule_fn(datetime::after)),
        ("alpha", rule_fn(format::alpha)),
        ("alpha_num", rule_fn(format::alpha_num)),
        ("alpha_num_dash", rule_fn(format::alpha_num_dash)),
        ("array", rule_fn(format::array)),
        ("before", rule_fn(datetime::before)),
        ("between", rule_fn(size::between)),
        ("boolean", rule_fn(presence::boolean)),
        ("confirmed", rule_fn(presence::confirmed)),
        ("date", rule_fn(datetime::date)),
        ("date_format", rule_fn(datetime::date_format)),
        ("different", rule_fn(presence::different)),
        ("digits", rule_fn(format::digits)),
        ("digits_between", rule_fn(format::digits_between)),
        ("email", rule_fn(format::email)),
        ("in", rule_fn(presence::in_list)),
        ("integer", rule_fn(format::integer)),
        ("ip", rule_fn(format::ip)),
        ("json", rule_fn(format::json)),
        ("max", rule_fn(size::max)),
        ("min", rule_fn(size::min)),
        ("not_in", rule_fn(presence::not_in)),
        ("numeric", rule_fn(format::numeric)),
        ("object", rule_fn(format::object)),
        ("regex", rule_fn(format::regex_match)),
        ("required", rule_fn(presence::required)),
        ("required_if", rule_fn(presence::required_if)),
        ("required_with", rule_fn(presence::required_with)),
        ("required_with_all", rule_fn(presence::required_with_all)),
        ("required_without", rule_fn(presence::required_without)),
        (
            "required_without_all",
            rule_fn(presence::required_without_all),
        ),
        ("same", rule_fn(presence::same)),
        ("size", rule_fn(size::exact)),
        ("string", rule_fn(format::string)),
        ("timezone", rule_fn(datetime::timezone)),
        ("url", rule_fn(format::url)),
    ];

    entries
        .into_iter()
        .map(|(name, rule)| (name.to_string(), rule))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::rule::RuleContext;
    use crate::value::Record;
    use serde_json::Value;

    /// Runs a synchronous built-in check against a bare value.
    pub(crate) fn check(
        rule: fn(&RuleContext<'_>) -> Result<crate::Verdict, crate::Error>,
        value: Option<&Value>,
        args: &[&str],
    ) -> Result<crate::Verdict, crate::Error> {
        let record = Record::new();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        rule(&RuleContext {
            record: &record,
            field: "field",
            value,
            args: &args,
        })
    }

    /// Like [`check`] but against a populated record.
    pub(crate) fn check_in(
        rule: fn(&RuleContext<'_>) -> Result<crate::Verdict, crate::Error>,
        record: &Record,
        field: &str,
        args: &[&str],
    ) -> Result<crate::Verdict, crate::Error> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        rule(&RuleContext {
            record,
            field,
            value: crate::value::get_path(record, field),
            args: &args,
        })
    }
}
