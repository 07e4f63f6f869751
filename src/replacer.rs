//! Placeholder replacers: substitute `:attribute` and rule-specific tokens
//! (`:min`, `:max`, `:other`, ...) into resolved message templates.

use crate::error::Failure;
use std::collections::HashMap;
use std::sync::Arc;

/// Rewrites rule-specific placeholders in a recorded failure's message.
///
/// Receives the field name and the failure (whose `args` hold the rule's
/// arguments positionally) and edits `failure.message` in place. Every
/// occurrence of a token is replaced, not just the first.
pub type Replacer = Arc<dyn Fn(&str, &mut Failure) + Send + Sync>;

/// Lower-cases a field name into space-separated words for `:attribute`.
///
/// Handles snake_case, kebab-case, camelCase, and dot-path separators:
/// `"meal_selection"` and `"mealSelection"` both become `"meal selection"`.
pub fn humanize(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in field.chars() {
        if matches!(ch, '_' | '-' | '.' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(ch.to_lowercase());
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join(" ")
}

/// Runs the replacer chain for one failure: the generic `:attribute` pass
/// first, then the rule-specific replacer if one is registered. The generic
/// pass must come first so a rule replacer's edits are not clobbered.
pub(crate) fn apply(replacers: &HashMap<String, Replacer>, field: &str, failure: &mut Failure) {
    if let Some(message) = failure.message.as_mut() {
        *message = message.replace(":attribute", &humanize(field));
    }
    if let Some(replacer) = replacers.get(&failure.rule) {
        replacer(field, failure);
    }
}

/// Substitutes one token with the argument at `index`, if present.
pub fn replace_arg(failure: &mut Failure, token: &str, index: usize) {
    let Some(arg) = failure.args.get(index).cloned() else {
        return;
    };
    if let Some(message) = failure.message.as_mut() {
        *message = message.replace(token, &arg);
    }
}

/// Substitutes one token with a comma-joined list of the arguments after
/// skipping the first `skip`.
pub fn replace_joined(failure: &mut Failure, token: &str, skip: usize) {
    let joined = failure
        .args
        .iter()
        .skip(skip)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Some(message) = failure.message.as_mut() {
        *message = message.replace(token, &joined);
    }
}

fn arg(token: &'static str, index: usize) -> Replacer {
    Arc::new(move |_field, failure| replace_arg(failure, token, index))
}

fn joined(token: &'static str, skip: usize) -> Replacer {
    Arc::new(move |_field, failure| replace_joined(failure, token, skip))
}

fn min_max() -> Replacer {
    Arc::new(|_field, failure| {
        replace_arg(failure, ":min", 0);
        replace_arg(failure, ":max", 1);
    })
}

/// The built-in replacer table, keyed by rule name.
pub(crate) fn defaults() -> HashMap<String, Replacer> {
    let mut table: HashMap<String, Replacer> = HashMap::new();

    table.insert("after".to_string(), arg(":date", 0));
    table.insert("before".to_string(), arg(":date", 0));
    table.insert("between".to_string(), min_max());
    table.insert("date_format".to_string(), arg(":format", 0));
    table.insert("different".to_string(), arg(":other", 0));
    table.insert("digits".to_string(), arg(":digits", 0));
    table.insert("digits_between".to_string(), min_max());
    table.insert("in".to_string(), joined(":values", 0));
    table.insert("max".to_string(), arg(":max", 0));
    table.insert("min".to_string(), arg(":min", 0));
    table.insert("not_in".to_string(), joined(":values", 0));
    table.insert(
        "required_if".to_string(),
        Arc::new(|_field, failure| {
            replace_arg(failure, ":other", 0);
            replace_joined(failure, ":value", 1);
        }),
    );
    table.insert("required_with".to_string(), joined(":values", 0));
    table.insert("required_with_all".to_string(), joined(":values", 0));
    table.insert("required_without".to_string(), joined(":values", 0));
    table.insert("required_without_all".to_string(), joined(":values", 0));
    table.insert("same".to_string(), arg(":other", 0));
    table.insert("size".to_string(), arg(":size", 0));

    table
}
