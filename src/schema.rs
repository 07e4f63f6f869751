//! The rule grammar and the schema compiler.
//!
//! A field's rules arrive as a pipe-delimited line (`"required|max:20"`), an
//! ordered list of entries, or structured [`RuleDef`]s. Compilation
//! normalizes every form into an ordered list of typed [`Constraint`]s with
//! the field's resolved value and message attached.

use crate::message::{self, MessageSpec, Messages};
use crate::value::{self, Record};
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

/// The one parse-time control directive: `sometimes` is consumed during
/// compilation and never appears in a compiled constraint list.
const SOMETIMES: &str = "sometimes";

/// One entry in a field's declared rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    /// Rule name.
    pub rule: String,
    /// Argument strings, in declaration order.
    pub args: Vec<String>,
    /// Entry-scoped message override; wins over every message table tier.
    pub message: Option<String>,
}

impl RuleDef {
    /// A rule with no arguments.
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            args: Vec::new(),
            message: None,
        }
    }

    /// Sets the argument list.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets an entry-scoped message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Parses one `rule:arg1,arg2` entry: split on the first colon, trim the
    /// name, comma-split and trim the argument text.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (rule, arg_text) = match text.split_once(':') {
            Some((rule, rest)) => (rule.trim(), rest.trim()),
            None => (text, ""),
        };
        let args = if arg_text.is_empty() {
            Vec::new()
        } else {
            arg_text.split(',').map(|a| a.trim().to_string()).collect()
        };
        Self {
            rule: rule.to_string(),
            args,
            message: None,
        }
    }
}

impl From<&str> for RuleDef {
    fn from(text: &str) -> Self {
        RuleDef::parse(text)
    }
}

/// A field's declared rule list, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules(pub(crate) Vec<RuleDef>);

impl FieldRules {
    /// An empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry.
    pub fn push(&mut self, def: RuleDef) {
        self.0.push(def);
    }

    /// True when no entries were declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for FieldRules {
    /// A pipe-delimited line: `"required|string|max:20"`.
    fn from(line: &str) -> Self {
        Self(
            line.split('|')
                .filter(|entry| !entry.trim().is_empty())
                .map(RuleDef::parse)
                .collect(),
        )
    }
}

impl From<String> for FieldRules {
    fn from(line: String) -> Self {
        Self::from(line.as_str())
    }
}

impl From<RuleDef> for FieldRules {
    fn from(def: RuleDef) -> Self {
        Self(vec![def])
    }
}

impl From<Vec<RuleDef>> for FieldRules {
    fn from(defs: Vec<RuleDef>) -> Self {
        Self(defs)
    }
}

impl From<Vec<&str>> for FieldRules {
    fn from(entries: Vec<&str>) -> Self {
        Self(entries.into_iter().map(RuleDef::parse).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldRules {
    fn from(entries: [&str; N]) -> Self {
        Self(entries.iter().map(|e| RuleDef::parse(e)).collect())
    }
}

impl FromIterator<RuleDef> for FieldRules {
    fn from_iter<I: IntoIterator<Item = RuleDef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The per-field rules specification. Fields keep their declaration order;
/// redeclaring a field replaces its rule list in place.
///
/// ```
/// use sieve::Rules;
///
/// let rules = Rules::new()
///     .field("meal", "required|in:vegetables,meat")
///     .field("side", ["sometimes", "required"]);
/// # let _ = rules;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rules(pub(crate) Vec<(String, FieldRules)>);

impl Rules {
    /// An empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or replaces) a field's rule list.
    pub fn field(mut self, name: impl Into<String>, rules: impl Into<FieldRules>) -> Self {
        self.set(name, rules);
        self
    }

    /// In-place variant of [`Rules::field`]; used by the conditional rule
    /// resolver, which replaces rather than merges. A replaced field keeps
    /// its original position.
    pub fn set(&mut self, name: impl Into<String>, rules: impl Into<FieldRules>) {
        let name = name.into();
        let rules = rules.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rules,
            None => self.0.push((name, rules)),
        }
    }

    /// True when no field declares any rules.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, rules)| rules.is_empty())
    }
}

/// One compiled constraint: a rule bound to its field's resolved value,
/// normalized arguments, and resolved message template.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Rule name.
    pub rule: String,
    /// The field's value resolved by deep dot-path lookup at compile time.
    pub value: Option<Value>,
    /// Normalized argument list - always a vector after compilation, never
    /// raw argument text.
    pub args: Vec<String>,
    /// Resolved message template, still holding placeholders.
    pub message: Option<String>,
}

/// The compiled schema: per-field ordered constraint lists.
pub(crate) type Schema = Vec<(String, Vec<Constraint>)>;

/// Compiles the rules specification against a record.
///
/// Fields compile in declaration order; a `sometimes` entry whose field is
/// absent from the record discards the rest of that field's list. Fields
/// that compile to no constraints are omitted from the schema.
pub(crate) fn compile(
    record: &Record,
    rules: &Rules,
    call_messages: &Messages,
    default_messages: &HashMap<String, MessageSpec>,
) -> Schema {
    let mut schema = Schema::new();

    for (field, field_rules) in &rules.0 {
        let value = value::get_path(record, field).cloned();
        let mut constraints = Vec::with_capacity(field_rules.0.len());

        for def in &field_rules.0 {
            if def.rule == SOMETIMES {
                if value.is_none() {
                    trace!(field = %field, "sometimes: value absent, discarding remaining rules");
                    break;
                }
                continue;
            }

            let message = def.message.clone().or_else(|| {
                message::resolve(
                    field,
                    &def.rule,
                    value.as_ref(),
                    call_messages,
                    default_messages,
                )
            });
            constraints.push(Constraint {
                rule: def.rule.clone(),
                value: value.clone(),
                args: def.args.clone(),
                message,
            });
        }

        if !constraints.is_empty() {
            schema.push((field.clone(), constraints));
        }
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::record;
    use serde_json::json;

    fn compile_simple(record: &Record, rules: &Rules) -> Schema {
        compile(record, rules, &Messages::new(), &message::defaults())
    }

    #[test]
    fn pipe_line_and_list_compile_identically() {
        let data = record(json!({"name": "ada"}));
        let from_line = Rules::new().field("name", "required|string|max:20");
        let from_list = Rules::new().field("name", ["required", "string", "max:20"]);

        let a = compile_simple(&data, &from_line);
        let b = compile_simple(&data, &from_list);
        let names = |schema: &Schema| {
            schema[0]
                .1
                .iter()
                .map(|c| c.rule.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&a), vec!["required", "string", "max"]);
        assert_eq!(names(&a), names(&b));
        assert_eq!(a[0].1[2].args, vec!["20"]);
    }

    #[test]
    fn rule_text_is_trimmed_and_split_on_first_colon() {
        let def = RuleDef::parse("  date_format : %Y-%m-%d %H:%M:%S ");
        assert_eq!(def.rule, "date_format");
        // args split on commas only, so the colons inside the format survive
        assert_eq!(def.args, vec!["%Y-%m-%d %H:%M:%S"]);

        let def = RuleDef::parse("between: 1 , 10 ");
        assert_eq!(def.args, vec!["1", "10"]);
    }

    #[test]
    fn args_are_always_a_list_after_compilation() {
        let data = record(json!({"n": 5}));
        let rules = Rules::new().field("n", "integer|between:1,10");
        let schema = compile_simple(&data, &rules);
        assert_eq!(schema[0].1[0].args, Vec::<String>::new());
        assert_eq!(schema[0].1[1].args, vec!["1", "10"]);
    }

    #[test]
    fn sometimes_discards_remaining_rules_when_value_absent() {
        let data = record(json!({}));
        let rules = Rules::new().field("side", ["sometimes", "required", "in:salad,fries"]);
        let schema = compile_simple(&data, &rules);
        assert!(schema.is_empty());
    }

    #[test]
    fn sometimes_is_dropped_but_the_rest_compiles_when_value_present() {
        let data = record(json!({"side": "rice"}));
        let rules = Rules::new().field("side", ["sometimes", "required", "in:salad,fries"]);
        let schema = compile_simple(&data, &rules);
        let rules_out: Vec<_> = schema[0].1.iter().map(|c| c.rule.as_str()).collect();
        assert_eq!(rules_out, vec!["required", "in"]);
    }

    #[test]
    fn mid_list_sometimes_discards_only_the_tail() {
        let data = record(json!({}));
        let rules = Rules::new().field("side", ["string", "sometimes", "required"]);
        let schema = compile_simple(&data, &rules);
        let rules_out: Vec<_> = schema[0].1.iter().map(|c| c.rule.as_str()).collect();
        assert_eq!(rules_out, vec!["string"]);
    }

    #[test]
    fn fields_compile_in_declaration_order() {
        let data = record(json!({}));
        let rules = Rules::new()
            .field("zulu", "required")
            .field("alpha", "required")
            .field("mike", "required");
        let schema = compile_simple(&data, &rules);
        let fields: Vec<_> = schema.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn redeclaring_a_field_replaces_in_place() {
        let rules = Rules::new()
            .field("zulu", "required")
            .field("alpha", "required")
            .field("zulu", "string|max:3");
        let fields: Vec<_> = rules.0.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["zulu", "alpha"]);
        assert_eq!(rules.0[0].1, FieldRules::from("string|max:3"));
    }

    #[test]
    fn value_resolves_through_dot_paths() {
        let data = record(json!({"address": {"city": "london"}}));
        let rules = Rules::new().field("address.city", "required|string");
        let schema = compile_simple(&data, &rules);
        assert_eq!(schema[0].1[0].value, Some(json!("london")));
    }

    #[test]
    fn entry_scoped_message_wins_over_call_messages() {
        let data = record(json!({}));
        let rules = Rules::new().field(
            "name",
            FieldRules::from(RuleDef::new("required").message("entry wins")),
        );
        let mut call = Messages::new();
        call.insert("name.required".to_string(), "call loses".to_string());

        let schema = compile(&data, &rules, &call, &message::defaults());
        assert_eq!(schema[0].1[0].message.as_deref(), Some("entry wins"));
    }

    #[test]
    fn empty_spec_compiles_to_empty_schema() {
        let data = record(json!({"anything": 1}));
        assert!(compile_simple(&data, &Rules::new()).is_empty());
        let rules = Rules::new().field("anything", FieldRules::new());
        assert!(compile_simple(&data, &rules).is_empty());
    }
}
