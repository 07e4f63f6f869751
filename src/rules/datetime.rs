//! Date checks, backed by chrono.
//!
//! Unparseable date *values* are plain validation failures; a missing bound
//! or format argument is a fatal configuration error. Formats use chrono
//! `strftime` patterns (`%Y-%m-%d`), not the original's moment.js tokens.

use crate::error::Error;
use crate::rule::{RuleContext, Verdict};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

/// Lenient parse for date comparison rules: RFC 3339, then a few common
/// calendar layouts, all read as a naive timestamp.
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    for layout in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn value_date(ctx: &RuleContext<'_>) -> Option<NaiveDateTime> {
    match ctx.value {
        Some(Value::String(s)) => parse_date(s),
        _ => None,
    }
}

/// The value must parse as a date.
pub(super) fn date(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    Ok(Verdict::passed(value_date(ctx).is_some()))
}

/// The value must be a date after the given bound.
pub(super) fn after(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let bound = ctx.arg(0, "after", "date")?;
    let ok = match (value_date(ctx), parse_date(bound)) {
        (Some(value), Some(bound)) => value > bound,
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// The value must be a date before the given bound.
pub(super) fn before(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let bound = ctx.arg(0, "before", "date")?;
    let ok = match (value_date(ctx), parse_date(bound)) {
        (Some(value), Some(bound)) => value < bound,
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// The value must name an IANA timezone (`"Europe/London"`, `"UTC"`).
pub(super) fn timezone(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    let ok = match ctx.value {
        Some(Value::String(s)) => s.parse::<chrono_tz::Tz>().is_ok(),
        _ => false,
    };
    Ok(Verdict::passed(ok))
}

/// The value must match the given chrono format exactly.
pub(super) fn date_format(ctx: &RuleContext<'_>) -> Result<Verdict, Error> {
    if ctx.args.is_empty() {
        return Err(Error::missing_argument("date_format", "format"));
    }
    // commas were split during compilation; rejoin so formats may contain them
    let format = ctx.args.join(",");
    let ok = match ctx.value {
        Some(Value::String(s)) => {
            NaiveDateTime::parse_from_str(s, &format).is_ok()
                || NaiveDate::parse_from_str(s, &format).is_ok()
                || NaiveTime::parse_from_str(s, &format).is_ok()
        }
        _ => false,
    };
    Ok(Verdict::passed(ok))
}
