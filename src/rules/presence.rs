//! Presence, acceptance, membership, and cross-field comparison checks.

use super::{is_present, loose_eq, text_of};
use crate::error::Error;
use crate::rule::{RuleContext, Verdict};
use crate::value::get_path;
use serde_json::Value;

/// The value must be yes, on, 1, or true. Useful for terms-of-service
/// checkboxes.
pub(super) fn accepted(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let ok = match ctx.value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.as_str(), "1" | "yes" | "on" | "true"),
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// The value must cast to a boolean: true, false, 1, 0, "1", "0", "true",
/// "false". Passing rewrites the field's slot to the canonical boolean.
pub(super) fn boolean(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    match ctx.value {
        Some(Value::Bool(_)) => Ok(Verdict::Pass),
        Some(Value::String(s)) => match s.as_str() {
            "true" | "1" => Ok(Verdict::PassWith(Value::Bool(true))),
            "false" | "0" => Ok(Verdict::PassWith(Value::Bool(false))),
            _ => Ok(Verdict::Fail),
        },
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v == 1.0 => Ok(Verdict::PassWith(Value::Bool(true))),
            Some(v) if v == 0.0 => Ok(Verdict::PassWith(Value::Bool(false))),
            _ => Ok(Verdict::Fail),
        },
        _ => Ok(Verdict::Fail),
    }
}

/// The value must be present.
pub(super) fn required(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(is_present(ctx.value)))
}

/// Required when another field equals any of the listed values; otherwise
/// the check passes regardless of this field.
pub(super) fn required_if(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    if ctx.args.len() < 2 {
        return Err(Error::missing_argument(
            "required_if",
            "other field and value(s)",
        ));
    }
    let other = get_path(ctx.record, &ctx.args[0]);
    let triggered = other.is_some_and(|other| {
        ctx.args[1..]
            .iter()
            .any(|candidate| text_of(other) == *candidate)
    });
    if triggered {
        Ok(Verdict::passed(is_present(ctx.value)))
    } else {
        Ok(Verdict::Pass)
    }
}

fn required_when<F>(ctx: &RuleContext<'_>, rule: &str, triggered: F) -> Result<Verdict, Error>
where
    F: Fn(&RuleContext<'_>) -> bool,
{
    if ctx.args.is_empty() {
        return Err(Error::missing_argument(rule, "other fields"));
    }
    if triggered(ctx) {
        Ok(Verdict::passed(is_present(ctx.value)))
    } else {
        Ok(Verdict::Pass)
    }
}

/// Required when any of the listed fields is present.
pub(super) fn required_with(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    required_when(ctx, "required_with", |ctx| {
        ctx.args
            .iter()
            .any(|field| is_present(get_path(ctx.record, field)))
    })
}

/// Required when all of the listed fields are present.
pub(super) fn required_with_all(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    required_when(ctx, "required_with_all", |ctx| {
        ctx.args
            .iter()
            .all(|field| is_present(get_path(ctx.record, field)))
    })
}

/// Required when any of the listed fields is absent.
pub(super) fn required_without(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    required_when(ctx, "required_without", |ctx| {
        ctx.args
            .iter()
            .any(|field| !is_present(get_path(ctx.record, field)))
    })
}

/// Required when all of the listed fields are absent.
pub(super) fn required_without_all(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    required_when(ctx, "required_without_all", |ctx| {
        ctx.args
            .iter()
            .all(|field| !is_present(get_path(ctx.record, field)))
    })
}

/// A matching `<field>_confirmation` entry must be present and equal.
pub(super) fn confirmed(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let other = get_path(ctx.record, &format!("{}_confirmation", ctx.field));
    let ok = match (ctx.value, other) {
        (Some(a), Some(b)) => loose_eq(a, b),
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// The value must equal another field's value.
pub(super) fn same(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let other_field = ctx.arg(0, "same", "other field")?;
    let other = get_path(ctx.record, other_field);
    let ok = match (ctx.value, other) {
        (Some(a), Some(b)) => loose_eq(a, b),
        (None, None) => true,
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// The value must differ from another field's (present) value.
pub(super) fn different(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let other_field = ctx.arg(0, "different", "other field")?;
    let ok = match (ctx.value, get_path(ctx.record, other_field)) {
        (Some(a), Some(b)) => !loose_eq(a, b),
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

fn is_in(ctx: &RuleContext<'_>) -> bool {
    ctx.value
        .is_some_and(|value| ctx.args.iter().any(|candidate| text_of(value) == *candidate))
}

/// The value must be one of the listed candidates.
pub(super) fn in_list(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    if ctx.args.is_empty() {
        return Err(Error::missing_argument("in", "values"));
    }
    Ok(Verdict::passed(is_in(ctx)))
}

/// The value must not be one of the listed candidates.
pub(super) fn not_in(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(!is_in(ctx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{check, check_in};
    use crate::value::record;
    use serde_json::json;

    #[test]
    fn accepted_takes_the_usual_spellings() {
        for value in [json!("yes"), json!("on"), json!("1"), json!("true"), json!(1), json!(true)] {
            assert_eq!(check(accepted, Some(&value), &[]).unwrap(), Verdict::Pass);
        }
        assert_eq!(
            check(accepted, Some(&json!("slkdjf")), &[]).unwrap(),
            Verdict::Fail
        );
        assert_eq!(check(accepted, None, &[]).unwrap(), Verdict::Fail);
    }

    #[test]
    fn boolean_coerces_and_reports_the_rewrite() {
        assert_eq!(
            check(boolean, Some(&json!("1")), &[]).unwrap(),
            Verdict::PassWith(json!(true))
        );
        assert_eq!(
            check(boolean, Some(&json!(0)), &[]).unwrap(),
            Verdict::PassWith(json!(false))
        );
        // already canonical: nothing to rewrite
        assert_eq!(check(boolean, Some(&json!(true)), &[]).unwrap(), Verdict::Pass);
        assert_eq!(check(boolean, Some(&json!("maybe")), &[]).unwrap(), Verdict::Fail);
    }

    #[test]
    fn required_follows_presence() {
        assert_eq!(check(required, Some(&json!("x")), &[]).unwrap(), Verdict::Pass);
        assert_eq!(check(required, Some(&json!(0)), &[]).unwrap(), Verdict::Pass);
        assert_eq!(check(required, Some(&json!("")), &[]).unwrap(), Verdict::Fail);
        assert_eq!(check(required, None, &[]).unwrap(), Verdict::Fail);
    }

    #[test]
    fn required_if_triggers_on_matching_other_value() {
        let data = record(json!({"plan": "pro"}));
        assert_eq!(
            check_in(required_if, &data, "seats", &["plan", "pro", "team"]).unwrap(),
            Verdict::Fail
        );
        let data = record(json!({"plan": "free"}));
        assert_eq!(
            check_in(required_if, &data, "seats", &["plan", "pro", "team"]).unwrap(),
            Verdict::Pass
        );
        assert!(check(required_if, None, &["plan"]).is_err());
    }

    #[test]
    fn required_with_family() {
        let data = record(json!({"first": "a"}));
        assert_eq!(
            check_in(required_with, &data, "last", &["first"]).unwrap(),
            Verdict::Fail
        );
        assert_eq!(
            check_in(required_with, &data, "last", &["middle"]).unwrap(),
            Verdict::Pass
        );
        assert_eq!(
            check_in(required_with_all, &data, "last", &["first", "middle"]).unwrap(),
            Verdict::Pass
        );
        assert_eq!(
            check_in(required_without, &data, "last", &["middle"]).unwrap(),
            Verdict::Fail
        );
        assert_eq!(
            check_in(required_without_all, &data, "last", &["first"]).unwrap(),
            Verdict::Pass
        );
        assert!(check(required_with, None, &[]).is_err());
    }

    #[test]
    fn confirmed_needs_a_matching_sibling() {
        let data = record(json!({"password": "s3cret", "password_confirmation": "s3cret"}));
        assert_eq!(
            check_in(confirmed, &data, "password", &[]).unwrap(),
            Verdict::Pass
        );
        let data = record(json!({"password": "s3cret", "password_confirmation": "typo"}));
        assert_eq!(
            check_in(confirmed, &data, "password", &[]).unwrap(),
            Verdict::Fail
        );
        let data = record(json!({"password": "s3cret"}));
        assert_eq!(
            check_in(confirmed, &data, "password", &[]).unwrap(),
            Verdict::Fail
        );
    }

    #[test]
    fn same_and_different_compare_across_fields() {
        let data = record(json!({"a": "1", "b": 1, "c": "2"}));
        assert_eq!(check_in(same, &data, "a", &["b"]).unwrap(), Verdict::Pass);
        assert_eq!(check_in(same, &data, "a", &["c"]).unwrap(), Verdict::Fail);
        assert_eq!(check_in(different, &data, "a", &["c"]).unwrap(), Verdict::Pass);
        assert_eq!(check_in(different, &data, "a", &["b"]).unwrap(), Verdict::Fail);
        assert!(check(same, None, &[]).is_err());
        assert!(check(different, None, &[]).is_err());
    }

    #[test]
    fn membership_uses_textual_form() {
        assert_eq!(
            check(in_list, Some(&json!("meat")), &["vegetables", "meat"]).unwrap(),
            Verdict::Pass
        );
        assert_eq!(
            check(in_list, Some(&json!(2)), &["1", "2"]).unwrap(),
            Verdict::Pass
        );
        assert_eq!(
            check(in_list, Some(&json!("turkey")), &["beef", "chicken"]).unwrap(),
            Verdict::Fail
        );
        assert!(check(in_list, Some(&json!("x")), &[]).is_err());

        assert_eq!(
            check(not_in, Some(&json!("turkey")), &["beef"]).unwrap(),
            Verdict::Pass
        );
        assert_eq!(
            check(not_in, Some(&json!("beef")), &["beef"]).unwrap(),
            Verdict::Fail
        );
    }
}
