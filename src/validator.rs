//! The validator: conditional rule injection, schema compilation, and the
//! concurrent-but-ordered constraint executor.

use crate::config::Config;
use crate::error::{Error, Failure, FailureMap};
use crate::message::Messages;
use crate::rule::RuleContext;
use crate::schema::{self, Constraint, FieldRules, Rules};
use crate::value::{self, Record};
use crate::Verdict;
use futures_util::future;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// A predicate over the full input record, deciding whether a conditional
/// rule entry applies for this run.
pub type Condition = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

struct ConditionalRules {
    rules: FieldRules,
    condition: Condition,
}

/// One field name or several, for conditional registration.
pub struct FieldNames(Vec<String>);

impl From<&str> for FieldNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for FieldNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl<const N: usize> From<[&str; N]> for FieldNames {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<&str>> for FieldNames {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<String>> for FieldNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

/// Validates one input record against a rules specification.
///
/// Each run is stateless over fresh input: conditional rules are resolved,
/// the schema is compiled, every field's constraint list executes
/// concurrently with the field's own constraints in strict declaration
/// order, and failures aggregate per field.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use sieve::{Rules, Validator};
///
/// let data = sieve::record(serde_json::json!({"field_1": "yes"}));
/// let mut validator = Validator::new(data, Rules::new().field("field_1", "accepted"));
/// assert!(validator.validate().await.is_ok());
/// # }
/// ```
pub struct Validator {
    config: Arc<Config>,
    data: Record,
    rules: Rules,
    messages: Messages,
    sometimes: HashMap<String, ConditionalRules>,
    failures: Option<FailureMap>,
}

impl Validator {
    /// A validator over the built-in configuration.
    pub fn new(data: Record, rules: Rules) -> Self {
        Self::with_config(Arc::new(Config::default()), data, rules, Messages::new())
    }

    /// A validator with call-scoped message overrides.
    pub fn with_messages(data: Record, rules: Rules, messages: Messages) -> Self {
        Self::with_config(Arc::new(Config::default()), data, rules, messages)
    }

    pub(crate) fn with_config(
        config: Arc<Config>,
        data: Record,
        rules: Rules,
        messages: Messages,
    ) -> Self {
        Self {
            config,
            data,
            rules,
            messages,
            sometimes: HashMap::new(),
            failures: None,
        }
    }

    /// Conditionally sets rules for one or more fields: when `condition`
    /// holds over the input record at validation time, `rules` replaces the
    /// field's statically declared entry. Repeated registration for the same
    /// field replaces the previous one - last registration wins.
    pub fn sometimes<F>(
        &mut self,
        fields: impl Into<FieldNames>,
        rules: impl Into<FieldRules>,
        condition: F,
    ) where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        let rules = rules.into();
        let condition: Condition = Arc::new(condition);
        for field in fields.into().0 {
            self.sometimes.insert(
                field,
                ConditionalRules {
                    rules: rules.clone(),
                    condition: Arc::clone(&condition),
                },
            );
        }
    }

    /// The input record, including any rewrites applied by coercion rules
    /// during the last run.
    pub fn data(&self) -> &Record {
        &self.data
    }

    /// Consumes the validator, returning the record.
    pub fn into_data(self) -> Record {
        self.data
    }

    /// The last run's aggregated failure map, if that run recorded any.
    pub fn failed(&self) -> Option<&FailureMap> {
        self.failures.as_ref()
    }

    /// Conditional resolution runs to completion before compilation, since
    /// the schema derives from the possibly-rewritten specification.
    fn apply_conditional_rules(&mut self) {
        for (field, conditional) in &self.sometimes {
            if (conditional.condition)(&self.data) {
                trace!(field = %field, "conditional rules injected");
                self.rules.set(field.clone(), conditional.rules.clone());
            }
        }
    }

    /// Runs the full pipeline.
    ///
    /// `Ok(())` when every constraint is satisfied (including the trivial
    /// empty-schema case). `Err(Error::Invalid(_))` carries the error
    /// handler's aggregate when constraints were violated; any other
    /// variant is a fatal configuration error that aborted the run.
    pub async fn validate(&mut self) -> Result<(), Error> {
        self.failures = None;
        self.apply_conditional_rules();

        let schema = schema::compile(
            &self.data,
            &self.rules,
            &self.messages,
            &self.config.messages,
        );
        if schema.is_empty() {
            return Ok(());
        }
        debug!(fields = schema.len(), "compiled validation schema");

        // Fields validate independently against a shared snapshot; rewrites
        // only ever touch the rewriting field's own slot.
        let snapshot = Arc::new(self.data.clone());
        let tasks = schema.into_iter().map(|(field, constraints)| {
            run_field(
                Arc::clone(&self.config),
                Arc::clone(&snapshot),
                field,
                constraints,
            )
        });

        // try_join_all drops the remaining field futures on the first fatal
        // error, aborting the whole run
        let outcomes = future::try_join_all(tasks).await?;

        let mut failures = FailureMap::new();
        for outcome in outcomes {
            if let Some(rewrite) = outcome.rewrite {
                value::set_path(&mut self.data, &outcome.field, rewrite);
            }
            if !outcome.failures.is_empty() {
                failures.insert(outcome.field, outcome.failures);
            }
        }

        if failures.is_empty() {
            return Ok(());
        }
        debug!(fields = failures.len(), "validation failed");
        let error = (self.config.error_handler)(failures.clone());
        self.failures = Some(failures);
        Err(Error::Invalid(error))
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.data.len())
            .field("rules", &self.rules)
            .field("conditional", &self.sometimes.keys().collect::<Vec<_>>())
            .finish()
    }
}

struct FieldOutcome {
    field: String,
    failures: Vec<Failure>,
    rewrite: Option<Value>,
}

/// Runs one field's constraint chain: strictly sequential, no short-circuit
/// on violation, fatal errors propagate immediately.
async fn run_field(
    config: Arc<Config>,
    record: Arc<Record>,
    field: String,
    constraints: Vec<Constraint>,
) -> Result<FieldOutcome, Error> {
    let mut failures = Vec::new();
    let mut rewrite = None;
    let mut current = value::get_path(&record, &field).cloned();

    for constraint in &constraints {
        let rule = config
            .rule(&constraint.rule)
            .ok_or_else(|| Error::UnknownRule(constraint.rule.clone()))?;

        let ctx = RuleContext {
            record: &record,
            field: &field,
            value: current.as_ref(),
            args: &constraint.args,
        };

        match rule.check(&ctx).await? {
            Verdict::Pass => {
                trace!(field = %field, rule = %constraint.rule, "satisfied");
            }
            Verdict::PassWith(value) => {
                trace!(field = %field, rule = %constraint.rule, "satisfied with rewrite");
                current = Some(value.clone());
                rewrite = Some(value);
            }
            Verdict::Fail => {
                trace!(field = %field, rule = %constraint.rule, "violated");
                let mut failure = Failure {
                    rule: constraint.rule.clone(),
                    args: constraint.args.clone(),
                    value: current.clone(),
                    message: constraint.message.clone(),
                };
                crate::replacer::apply(&config.replacers, &field, &mut failure);
                failures.push(failure);
            }
        }
    }

    Ok(FieldOutcome {
        field,
        failures,
        rewrite,
    })
}
