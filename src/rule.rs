//! The rule seam: the check trait, its verdict, and closure adapters.

use crate::error::Error;
use crate::value::Record;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Outcome reported by a rule check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Constraint satisfied.
    Pass,
    /// Constraint satisfied, and the field's slot must be overwritten with
    /// the given value before the field's next constraint runs. This is the
    /// declared rewrite side-channel used by coercion rules (`boolean`).
    PassWith(Value),
    /// Constraint violated. Recorded as a failure; never aborts the run.
    Fail,
}

impl Verdict {
    /// `Pass` when the condition holds, `Fail` otherwise.
    pub fn passed(ok: bool) -> Verdict {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// Everything a rule check may inspect.
pub struct RuleContext<'a> {
    /// Snapshot of the full input record, taken at run start. Cross-field
    /// reads observe this snapshot, never another field's rewrites.
    pub record: &'a Record,
    /// Dot-path name of the field under validation.
    pub field: &'a str,
    /// The field's current value: resolved from the record, then updated by
    /// earlier rewrites in the same field's chain. `None` means absent.
    pub value: Option<&'a Value>,
    /// Arguments parsed from the rule grammar, in declaration order.
    pub args: &'a [String],
}

impl RuleContext<'_> {
    /// The nth argument, or the fatal missing-argument error naming it.
    pub fn arg(&self, index: usize, rule: &str, name: &str) -> Result<&str, Error> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| Error::missing_argument(rule, name))
    }
}

/// A named check backing a rule.
///
/// Checks may be asynchronous (awaiting an external collaborator) or plain
/// computations; the executor drives both uniformly. A check reports exactly
/// one of: satisfied ([`Verdict::Pass`], optionally with a rewrite), violated
/// ([`Verdict::Fail`]), or a fatal configuration error (`Err`), which aborts
/// the entire run.
///
/// Data faults (an unparseable date, a number where a string was expected)
/// must be reported as `Fail`, not as an error - `Err` is reserved for
/// misuse such as a missing required argument.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Run the check against the field's current value.
    async fn check(&self, ctx: &RuleContext<'_>) -> Result<Verdict, Error>;
}

struct FnRule<F>(F);

#[async_trait]
impl<F> Rule for FnRule<F>
where
    F: Fn(&RuleContext<'_>) -> Result<Verdict, Error> + Send + Sync,
{
    async fn check(&self, ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
        (self.0)(ctx)
    }
}

/// Adapts a synchronous closure into a [`Rule`].
///
/// Async checks implement [`Rule`] directly.
///
/// ```
/// use sieve::{rule_fn, Verdict};
///
/// let shouty = rule_fn(|ctx| {
///     Ok(Verdict::passed(matches!(
///         ctx.value,
///         Some(serde_json::Value::String(s)) if s.chars().all(|c| !c.is_lowercase())
///     )))
/// });
/// # let _ = shouty;
/// ```
pub fn rule_fn<F>(f: F) -> Arc<dyn Rule>
where
    F: Fn(&RuleContext<'_>) -> Result<Verdict, Error> + Send + Sync + 'static,
{
    Arc::new(FnRule(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn closure_adapter_reports_verdicts() {
        let rule = rule_fn(|ctx| Ok(Verdict::passed(ctx.value.is_some())));
        let record = crate::value::record(json!({"a": 1}));

        let present = RuleContext {
            record: &record,
            field: "a",
            value: record.get("a"),
            args: &[],
        };
        assert_eq!(rule.check(&present).await.unwrap(), Verdict::Pass);

        let absent = RuleContext {
            record: &record,
            field: "b",
            value: None,
            args: &[],
        };
        assert_eq!(rule.check(&absent).await.unwrap(), Verdict::Fail);
    }

    #[test]
    fn arg_accessor_names_the_missing_argument() {
        let record = Record::new();
        let args = vec!["10".to_string()];
        let ctx = RuleContext {
            record: &record,
            field: "n",
            value: None,
            args: &args,
        };

        assert_eq!(ctx.arg(0, "max", "max").unwrap(), "10");
        let err = ctx.arg(1, "between", "max").unwrap_err();
        assert!(matches!(err, Error::MissingArgument { ref rule, ref arg } if rule == "between" && arg == "max"));
    }
}
