//! Shape and format checks: character classes, numerics, and well-known
//! textual formats.

use super::{as_number, text_of};
use crate::error::Error;
use crate::rule::{RuleContext, Verdict};
use regex::Regex;
use serde_json::Value;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

// Pre-compiled patterns
static ALPHA: OnceLock<Regex> = OnceLock::new();
static ALPHA_NUM: OnceLock<Regex> = OnceLock::new();
static ALPHA_NUM_DASH: OnceLock<Regex> = OnceLock::new();
static EMAIL: OnceLock<Regex> = OnceLock::new();
static URL: OnceLock<Regex> = OnceLock::new();

fn alpha_re() -> &'static Regex {
    ALPHA.get_or_init(|| Regex::new(r"^[A-Za-z]+$").expect("static pattern"))
}

fn alpha_num_re() -> &'static Regex {
    ALPHA_NUM.get_or_init(|| Regex::new(r"(?i)^[a-z0-9]+$").expect("static pattern"))
}

fn alpha_num_dash_re() -> &'static Regex {
    ALPHA_NUM_DASH.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("static pattern"))
}

fn email_re() -> &'static Regex {
    EMAIL.get_or_init(|| {
        // RFC 5322 simplified
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("static pattern")
    })
}

fn url_re() -> &'static Regex {
    URL.get_or_init(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("static pattern"))
}

fn matches_text(ctx: &RuleContext<'_>, pattern: &Regex) -> bool {
    match ctx.value {
        Some(Value::String(s)) => pattern.is_match(s),
        _ => false,
    }
}

/// Entirely alphabetic characters.
pub(super) fn alpha(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(matches_text(ctx, alpha_re())))
}

/// Entirely alpha-numeric characters; plain numbers also pass.
pub(super) fn alpha_num(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    if matches!(ctx.value, Some(Value::Number(_))) {
        return Ok(Verdict::Pass);
    }
    Ok(Verdict::passed(matches_text(ctx, alpha_num_re())))
}

/// Alpha-numeric characters plus dashes and underscores.
pub(super) fn alpha_num_dash(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(matches_text(ctx, alpha_num_dash_re())))
}

/// The value must be a string.
pub(super) fn string(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(matches!(ctx.value, Some(Value::String(_)))))
}

/// The value must be an array.
pub(super) fn array(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(matches!(ctx.value, Some(Value::Array(_)))))
}

/// The value must be a nested mapping.
pub(super) fn object(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(matches!(ctx.value, Some(Value::Object(_)))))
}

/// The value must be numeric (numbers and numeric strings).
pub(super) fn numeric(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(as_number(ctx.value).is_some()))
}

/// The value must be numeric with no fractional part.
pub(super) fn integer(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(
        as_number(ctx.value).is_some_and(|n| n.fract() == 0.0),
    ))
}

fn digit_length(ctx: &RuleContext<'_>) -> Option<usize> {
    as_number(ctx.value)?;
    let text = text_of(ctx.value?);
    Some(text.chars().filter(|c| c.is_ascii_digit()).count())
}

/// Numeric with exactly the given number of digits.
pub(super) fn digits(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let expected = parse_count(ctx.arg(0, "digits", "digits")?, "digits")?;
    Ok(Verdict::passed(digit_length(ctx) == Some(expected)))
}

/// Numeric with a digit count between the given min and max.
pub(super) fn digits_between(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    if ctx.args.len() != 2 {
        return Err(Error::missing_argument("digits_between", "min and max"));
    }
    let min = parse_count(&ctx.args[0], "digits_between")?;
    let max = parse_count(&ctx.args[1], "digits_between")?;
    Ok(Verdict::passed(
        digit_length(ctx).is_some_and(|len| len >= min && len <= max),
    ))
}

fn parse_count(text: &str, rule: &str) -> Result<usize, Error> {
    text.parse::<usize>()
        .map_err(|_| Error::invalid_argument(rule, format!("`{text}` is not a whole number")))
}

/// Formatted as an e-mail address.
pub(super) fn email(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(matches_text(ctx, email_re())))
}

/// Formatted as an http/https/ftp URL.
pub(super) fn url(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(matches_text(ctx, url_re())))
}

/// A dotted-quad IPv4 address.
pub(super) fn ip(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let ok = match ctx.value {
        Some(Value::String(s)) => s.parse::<Ipv4Addr>().is_ok(),
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// A string holding well-formed JSON.
pub(super) fn json(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let ok = match ctx.value {
        Some(Value::String(s)) => serde_json::from_str::<serde_json::Value>(s).is_ok(),
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// The value's textual form must match the supplied pattern. A malformed
/// pattern is a configuration error, not a validation failure.
pub(super) fn regex_match(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    if ctx.args.is_empty() {
        return Err(Error::missing_argument("regex", "pattern"));
    }
    // commas were split during compilation; rejoin so patterns may contain them
    let pattern = ctx.args.join(",");
    let compiled =
        Regex::new(&pattern).map_err(|e| Error::invalid_argument("regex", e.to_string()))?;
    let ok = ctx.value.is_some_and(|value| compiled.is_match(&text_of(value)));
    Ok(Verdict::passed(ok))
}
