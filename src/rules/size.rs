//! Size and bound checks. Strings measure character count, numerics their
//! value, arrays and objects their element count.

use super::size_of;
use crate::error::Error;
use crate::rule::{RuleContext, Verdict};

fn bound(text: &str, rule: &str) -> Result<f64, Error> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| Error::invalid_argument(rule, format!("`{text}` is not a number")))
}

/// The measured size must be at least the given minimum.
pub(super) fn min(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let min = bound(ctx.arg(0, "min", "min")?, "min")?;
    Ok(Verdict::passed(size_of(ctx.value) >= min))
}

/// The measured size may not exceed the given maximum.
pub(super) fn max(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let max = bound(ctx.arg(0, "max", "max")?, "max")?;
    Ok(Verdict::passed(size_of(ctx.value) <= max))
}

/// The measured size must fall inside the given min/max, inclusive.
pub(super) fn between(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    if ctx.args.len() != 2 {
        return Err(Error::missing_argument("between", "min and max"));
    }
    let min = bound(&ctx.args[0], "between")?;
    let max = bound(&ctx.args[1], "between")?;
    let size = size_of(ctx.value);
    Ok(Verdict::passed(size >= min && size <= max))
}

/// The measured size must equal the given value exactly.
pub(super) fn exact(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let size = bound(ctx.arg(0, "size", "size")?, "size")?;
    Ok(Verdict::passed(size_of(ctx.value) == size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::check;
    use serde_json::json;

    #[test]
    fn bounds_follow_the_value_shape() {
        assert_eq!(check(max, Some(&json!("hello")), &["5"]).unwrap(), Verdict::Pass);
        assert_eq!(check(max, Some(&json!("hello!")), &["5"]).unwrap(), Verdict::Fail);
        assert_eq!(check(max, Some(&json!(4)), &["5"]).unwrap(), Verdict::Pass);
        assert_eq!(check(max, Some(&json!([1, 2, 3])), &["2"]).unwrap(), Verdict::Fail);

        assert_eq!(check(min, Some(&json!("ab")), &["2"]).unwrap(), Verdict::Pass);
        assert_eq!(check(min, Some(&json!(1)), &["2"]).unwrap(), Verdict::Fail);
    }

    #[test]
    fn between_is_inclusive() {
        assert_eq!(
            check(between, Some(&json!("abc")), &["3", "5"]).unwrap(),
            Verdict::Pass
        );
        assert_eq!(
            check(between, Some(&json!("ab")), &["3", "5"]).unwrap(),
            Verdict::Fail
        );
        assert_eq!(check(between, Some(&json!(5)), &["3", "5"]).unwrap(), Verdict::Pass);
    }

    #[test]
    fn exact_size() {
        assert_eq!(check(exact, Some(&json!("abcd")), &["4"]).unwrap(), Verdict::Pass);
        assert_eq!(check(exact, Some(&json!([1])), &["2"]).unwrap(), Verdict::Fail);
    }

    #[test]
    fn missing_or_malformed_bounds_are_fatal() {
        assert!(matches!(
            check(max, Some(&json!("x")), &[]).unwrap_err(),
            Error::MissingArgument { .. }
        ));
        assert!(matches!(
            check(between, Some(&json!("x")), &["1"]).unwrap_err(),
            Error::MissingArgument { .. }
        ));
        assert!(matches!(
            check(min, Some(&json!("x")), &["soon"]).unwrap_err(),
            Error::InvalidArgument { .. }
        ));
    }
}
