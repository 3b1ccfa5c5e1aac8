//! Baseline validators: `Object`, `String`, `Number`, `Date`, `Email`.
//!
//! None of them enforce the enum list; it is forwarded for custom types.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use super::descriptor::{ArgValue, Args, Literal, parse_number};
use super::errors::Rejection;
use super::registry::Registry;
use super::validator::{ValidationContext, Validator};
use crate::value::{Value, describe, is_missing};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .unwrap()
});

/// Register every baseline type.
pub fn register_baseline(registry: &Registry) {
    registry.register("Object", ObjectValidator);
    registry.register("String", StringValidator::default());
    registry.register("Number", NumberValidator);
    registry.register("Date", DateValidator);
    registry.register("Email", EmailValidator::default());
}

/// Default syntax check used by the `Email` type.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Apply the `opt` convention shared by every baseline type.
///
/// `Ok(None)`: optional and missing, nothing to do.
/// A numeric `min` / `max` bound, if present.
fn number_bound(args: &Args, name: &str) -> Result<Option<f64>, Rejection> {
    match args.get(name) {
        None => Ok(None),
        Some(ArgValue::Number(n)) => Ok(Some(*n)),
        Some(other) => Err(Rejection::Message(format!("invalid {name} bound {other}"))),
    }
}

fn require<'a>(
    value: Option<&'a Value>,
    args: &Args,
    expected: &str,
) -> Result<Option<&'a Value>, Rejection> {
    match value {
        v if !is_missing(v) => Ok(v),
        _ if args.is_optional() => Ok(None),
        v => Err(Rejection::Message(format!(
            "missing value, expected {expected}, got {}",
            describe(v)
        ))),
    }
}

/// Accepts objects and lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectValidator;

impl Validator for ObjectValidator {
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        _enum_list: &[Literal],
        _cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        let Some(value) = require(value, args, "object")? else {
            return Ok(None);
        };
        match value {
            Value::Object(_) | Value::List(_) => Ok(None),
            other => Err(format!("must be an object, got {}", other.type_name()).into()),
        }
    }
}

/// Accepts strings; `min` / `max` bound the length in characters, `re` must match.
///
/// Compiled `re` patterns are cached per validator.
#[derive(Debug, Default)]
pub struct StringValidator {
    patterns: RwLock<HashMap<String, Regex>>,
}

impl StringValidator {
    fn pattern(&self, pattern: &str) -> Result<Regex, Rejection> {
        if let Some(re) = self.patterns.read().unwrap_or_else(PoisonError::into_inner).get(pattern) {
            return Ok(re.clone());
        }
        let re = Regex::new(pattern)
            .map_err(|e| Rejection::Message(format!("invalid regex {pattern}: {e}")))?;
        self.patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern.to_string(), re.clone());
        Ok(re)
    }

    /// Number of distinct patterns compiled so far.
    pub fn cached_patterns(&self) -> usize {
        self.patterns.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Validator for StringValidator {
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        _enum_list: &[Literal],
        _cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        let Some(value) = require(value, args, "string")? else {
            return Ok(None);
        };
        let Value::String(s) = value else {
            return Err(format!("wrong value, required string, got {}", value.type_name()).into());
        };

        let len = s.chars().count();
        if let Some(min) = number_bound(args, "min")?
            && (len as f64) < min
        {
            return Err(format!("string must be at least {min} chars long (min), got {len}").into());
        }
        if let Some(max) = number_bound(args, "max")?
            && (len as f64) > max
        {
            return Err(format!("string must be at most {max} chars long (max), got {len}").into());
        }

        if let Some(pattern) = args.text("re") {
            if !self.pattern(&pattern)?.is_match(s) {
                return Err(format!("string did not match regex {pattern}").into());
            }
        }

        Ok(None)
    }
}

/// Accepts numbers and numeric strings; returns the parsed number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValidator;

impl Validator for NumberValidator {
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        _enum_list: &[Literal],
        _cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        let Some(value) = require(value, args, "Number")? else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => Some(*n),
            Value::String(s) => parse_number(s.trim()),
            _ => None,
        };
        let Some(n) = parsed else {
            return Err(format!("wrong value, required a Number, got {value}").into());
        };

        if let Some(min) = number_bound(args, "min")?
            && n < min
        {
            return Err(format!("Number must be at least {min} (min), got {n}").into());
        }
        if let Some(max) = number_bound(args, "max")?
            && n > max
        {
            return Err(format!("Number must be at most {max} (max), got {n}").into());
        }

        Ok(Some(Value::Number(n)))
    }
}

/// Accepts dates, date strings and epoch milliseconds; returns the parsed date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateValidator;

impl Validator for DateValidator {
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        _enum_list: &[Literal],
        _cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        let Some(value) = require(value, args, "Date")? else {
            return Ok(None);
        };
        let Some(date) = parse_date(value) else {
            return Err(format!(
                "Got {} {value}, required Date or Date compatible string",
                value.type_name()
            )
            .into());
        };

        if let Some(min) = args.get("min") {
            let bound = date_bound(min, "min")?;
            if date < bound {
                return Err(format!("Got date {value}, expected on or after {min} (min)").into());
            }
        }
        if let Some(max) = args.get("max") {
            let bound = date_bound(max, "max")?;
            if date > bound {
                return Err(format!("Got date {value}, expected on or before {max} (max)").into());
            }
        }

        Ok(Some(Value::Date(date)))
    }
}

fn date_bound(arg: &ArgValue, name: &str) -> Result<DateTime<Utc>, Rejection> {
    let parsed = match arg {
        ArgValue::Number(n) => DateTime::from_timestamp_millis(*n as i64),
        ArgValue::Text(s) => parse_date_str(s),
        ArgValue::Bool(_) => None,
    };
    parsed.ok_or_else(|| Rejection::Message(format!("invalid {name} date bound {arg}")))
}

/// Parse a value as a date: dates pass through, numbers are epoch milliseconds.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(*n as i64),
        Value::String(s) => parse_date_str(s),
        _ => None,
    }
}

/// Parse a date string. Values without an offset are taken as UTC.
pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// Accepts syntactically valid email addresses; `lower` lower-cases the result.
#[derive(Clone)]
pub struct EmailValidator {
    check: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl EmailValidator {
    /// Use a custom syntax check instead of the built-in pattern.
    pub fn with_checker(check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self { check: Arc::new(check) }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::with_checker(is_valid_email)
    }
}

impl Validator for EmailValidator {
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        _enum_list: &[Literal],
        _cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        let Some(value) = require(value, args, "email")? else {
            return Ok(None);
        };
        let Value::String(s) = value else {
            return Err(
                format!("wrong value, required email string, got {}", value.type_name()).into()
            );
        };
        if !(self.check)(s) {
            return Err(format!("required email, got: {s}").into());
        }
        if args.flag("lower") {
            let lowered = s.to_lowercase();
            if lowered != *s {
                return Ok(Some(Value::String(lowered)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn run(v: &dyn Validator, value: Option<Value>, args: &[(&str, ArgValue)]) -> Result<Option<Value>, String> {
        let mut parsed = Args::new();
        for (k, a) in args {
            parsed.insert(*k, a.clone());
        }
        v.validate(value.as_ref(), &parsed, &[], &mut ValidationContext::default()).map_err(|r| match r {
            Rejection::Message(m) => m,
            other => panic!("unexpected rejection {other:?}"),
        })
    }

    fn num(n: f64) -> ArgValue {
        ArgValue::Number(n)
    }

    fn text(s: &str) -> ArgValue {
        ArgValue::Text(s.to_string())
    }

    #[test]
    fn test_number_bounds_name_the_bound() {
        let bounds = [("min", num(3.0)), ("max", num(9.0))];
        assert_eq!(run(&NumberValidator, Some(Value::Number(5.0)), &bounds), Ok(Some(Value::Number(5.0))));

        let low = run(&NumberValidator, Some(Value::Number(2.0)), &bounds).unwrap_err();
        assert!(low.contains("at least 3") && low.contains("min"), "{low}");

        let high = run(&NumberValidator, Some(Value::Number(22.0)), &bounds).unwrap_err();
        assert!(high.contains("at most 9") && high.contains("max"), "{high}");
    }

    #[test]
    fn test_number_zero_bound_is_enforced() {
        let err = run(&NumberValidator, Some(Value::Number(-1.0)), &[("min", num(0.0))]).unwrap_err();
        assert!(err.contains("at least 0"));
    }

    #[test]
    fn test_number_coerces_strings() {
        assert_eq!(run(&NumberValidator, Some(Value::from(" 12.5 ")), &[]), Ok(Some(Value::Number(12.5))));
        assert!(run(&NumberValidator, Some(Value::from("12abc")), &[]).is_err());
        assert!(run(&NumberValidator, Some(Value::Bool(true)), &[]).is_err());
    }

    #[test]
    fn test_string_length_counts_chars() {
        let out = run(&StringValidator::default(), Some(Value::from("héé")), &[("max", num(3.0))]);
        assert_eq!(out, Ok(None));
        assert!(run(&StringValidator::default(), Some(Value::from("héé")), &[("max", num(2.0))]).is_err());
    }

    #[test]
    fn test_string_invalid_regex_is_a_failure() {
        let err = run(&StringValidator::default(), Some(Value::from("x")), &[("re", text("(unclosed"))]).unwrap_err();
        assert!(err.starts_with("invalid regex (unclosed"));
    }

    #[test]
    fn test_string_regex_is_compiled_once() {
        let strings = StringValidator::default();
        let re = [("re", text("^me"))];
        assert_eq!(run(&strings, Some(Value::from("meow")), &re), Ok(None));
        assert!(run(&strings, Some(Value::from("purr")), &re).is_err());
        assert_eq!(run(&strings, Some(Value::from("mew")), &[("re", text("w$"))]), Ok(None));
        assert_eq!(strings.cached_patterns(), 2);

        assert!(run(&strings, Some(Value::from("x")), &[("re", text("(bad"))]).is_err());
        assert_eq!(strings.cached_patterns(), 2);
    }

    #[test]
    fn test_non_numeric_bound_is_rejected() {
        let err = run(&NumberValidator, Some(Value::Number(5.0)), &[("min", text("abc"))]).unwrap_err();
        assert_eq!(err, "invalid min bound abc");

        let err = run(&StringValidator::default(), Some(Value::from("cat")), &[("max", ArgValue::Bool(true))])
            .unwrap_err();
        assert_eq!(err, "invalid max bound true");
    }

    #[test]
    fn test_unchanged_values_are_not_written_back() {
        let object = Value::from(serde_json::json!({ "a": [1, 2, 3] }));
        assert_eq!(run(&ObjectValidator, Some(object), &[]), Ok(None));
        assert_eq!(run(&ObjectValidator, Some(Value::List(vec![])), &[]), Ok(None));
        assert_eq!(run(&EmailValidator::default(), Some(Value::from("a@b.io")), &[("lower", ArgValue::Bool(true))]), Ok(None));
    }

    #[test]
    fn test_missing_without_opt() {
        for v in [
            &ObjectValidator as &dyn Validator,
            &StringValidator::default(),
            &NumberValidator,
            &DateValidator,
            &EmailValidator::default(),
        ] {
            let err = run(v, None, &[]).unwrap_err();
            assert!(err.starts_with("missing value"), "{err}");
            assert_eq!(run(v, Some(Value::Null), &[("opt", ArgValue::Bool(true))]), Ok(None));
        }
    }

    #[test]
    fn test_date_formats() {
        let expected = Utc.with_ymd_and_hms(2013, 12, 12, 0, 0, 0).unwrap();
        for s in ["12/12/2013", "2013-12-12", "2013/12/12", "2013-12-12T00:00:00Z", "2013-12-12 00:00:00"] {
            assert_eq!(parse_date_str(s), Some(expected), "{s}");
        }
        assert_eq!(parse_date_str("mog"), None);
        assert_eq!(parse_date(&Value::Number(0.0)).map(|d| d.year()), Some(1970));
    }

    #[test]
    fn test_date_bounds() {
        let min = [("min", text("12/12/2014"))];
        assert!(run(&DateValidator, Some(Value::from("12/12/2013")), &min).is_err());
        assert!(run(&DateValidator, Some(Value::from("2015-01-01")), &min).is_ok());

        let bad = run(&DateValidator, Some(Value::from("2015-01-01")), &[("max", text("soon"))]).unwrap_err();
        assert_eq!(bad, "invalid max date bound soon");
    }

    #[test]
    fn test_email() {
        assert_eq!(
            run(&EmailValidator::default(), Some(Value::from("Foo@Example.com")), &[("lower", ArgValue::Bool(true))]),
            Ok(Some(Value::from("foo@example.com")))
        );
        assert!(run(&EmailValidator::default(), Some(Value::from("fooemail.com")), &[]).is_err());
        assert!(run(&EmailValidator::default(), Some(Value::Number(1.0)), &[]).is_err());

        let permissive = EmailValidator::with_checker(|s| s.contains('@'));
        assert!(run(&permissive, Some(Value::from("a@b")), &[]).is_ok());
    }
}
