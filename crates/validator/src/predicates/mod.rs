//! Built-in predicates.
//!
//! Every built-in rule is a pure function of the field value, the enclosing
//! object and, for time rules, the clock. [`evaluate`] dispatches a
//! [`RuleKind`] to its predicate. Values of the wrong JSON type are invalid.
//!
//! Formats with a grammar are checked by parsing rather than by regex:
//! addresses go through the std parsers, URLs through `url`, UUIDs through
//! `uuid` and JSON documents through a bounded recursive-descent parser.

pub mod collection;
pub mod cross_field;
pub mod custom;
pub mod json_shape;
pub mod network;
pub mod numeric;
pub mod string;
pub mod time;

pub use custom::{CustomPredicate, FnPredicate, PredicateRegistry, Verdict};
pub use json_shape::{JsonShapeError, check_json, is_json};

use serde_json::Value;

use crate::foundation::Clock;
use crate::pattern::{PatternAnalyzer, PatternCache};
use crate::schema::RuleKind;

/// Evaluates one built-in rule.
///
/// `parent` is the object that holds the field; presence and cross-field
/// rules read siblings from it. Pattern rules go through the process-wide
/// pattern cache; a rejected pattern never matches. Custom rules need a
/// registry and always evaluate to `false` here; compiled plans run them
/// through their resolved predicate instead.
#[must_use]
pub fn evaluate(kind: &RuleKind, value: &Value, parent: &Value, clock: &dyn Clock) -> bool {
    match kind {
        RuleKind::Required => !value.is_null(),
        RuleKind::RequiredIf { field, equals } => {
            !loose_eq(sibling(parent, field), equals) || !value.is_null()
        }
        RuleKind::RequiredUnless { field, equals } => {
            loose_eq(sibling(parent, field), equals) || !value.is_null()
        }
        RuleKind::RequiredWith { field } => sibling(parent, field).is_null() || !value.is_null(),
        RuleKind::RequiredWithout { field } => {
            !sibling(parent, field).is_null() || !value.is_null()
        }

        RuleKind::NotBlank => with_str(value, string::not_blank),
        RuleKind::MinLength(min) => with_str(value, |s| string::char_len(s) >= *min),
        RuleKind::MaxLength(max) => with_str(value, |s| string::char_len(s) <= *max),
        RuleKind::Length { min, max } => {
            with_str(value, |s| (*min..=*max).contains(&string::char_len(s)))
        }
        RuleKind::StartsWith(prefix) => with_str(value, |s| s.starts_with(prefix.as_str())),
        RuleKind::EndsWith(suffix) => with_str(value, |s| s.ends_with(suffix.as_str())),
        RuleKind::Contains(needle) => with_str(value, |s| s.contains(needle.as_str())),
        RuleKind::Lowercase => with_str(value, string::is_lowercase),
        RuleKind::Uppercase => with_str(value, string::is_uppercase),
        RuleKind::OneOf(allowed) => allowed.iter().any(|candidate| loose_eq(value, candidate)),
        RuleKind::Pattern(pattern) => with_str(value, |s| {
            PatternCache::global()
                .get_or_admit(pattern, &PatternAnalyzer::default())
                .is_ok_and(|admitted| admitted.regex.is_match(s))
        }),
        RuleKind::Email => with_str(value, string::is_email),
        RuleKind::Url => with_str(value, string::is_http_url),
        RuleKind::Uuid => with_str(value, string::is_uuid),

        RuleKind::Min(min) => with_f64(value, |n| n >= *min),
        RuleKind::Max(max) => with_f64(value, |n| n <= *max),
        RuleKind::Range { min, max } => with_f64(value, |n| (*min..=*max).contains(&n)),
        RuleKind::Positive => with_f64(value, |n| n > 0.0),
        RuleKind::Negative => with_f64(value, |n| n < 0.0),
        RuleKind::Even => numeric::as_integer(value).is_some_and(|n| n % 2 == 0),
        RuleKind::Odd => numeric::as_integer(value).is_some_and(|n| n % 2 != 0),
        RuleKind::DivisibleBy(divisor) => numeric::is_divisible_by(value, *divisor),
        RuleKind::DecimalPlaces(max) => {
            numeric::fractional_digits(value).is_some_and(|digits| digits <= *max)
        }

        RuleKind::MinSize(min) => collection::size(value).is_some_and(|n| n >= *min),
        RuleKind::MaxSize(max) => collection::size(value).is_some_and(|n| n <= *max),
        RuleKind::NotEmpty => collection::size(value).is_some_and(|n| n > 0),
        RuleKind::UniqueItems => collection::has_unique_items(value),

        RuleKind::IpAddress(family) => with_str(value, |s| network::is_ip(s, *family)),

        RuleKind::JsonString { max_depth } => with_str(value, |s| is_json(s, *max_depth)),

        RuleKind::Past => time::compare(value, clock, |t, now| t < now),
        RuleKind::Future => time::compare(value, clock, |t, now| t > now),
        RuleKind::PastOrPresent => time::compare(value, clock, |t, now| t <= now),
        RuleKind::FutureOrPresent => time::compare(value, clock, |t, now| t >= now),

        RuleKind::EqualsField(other) => cross_field::equals_field(value, parent, other),
        RuleKind::NotEqualsField(other) => !cross_field::equals_field(value, parent, other),

        RuleKind::Custom(_) => false,
    }
}

/// A sibling of the field inside `parent`; absent reads as null.
pub(crate) fn sibling<'a>(parent: &'a Value, name: &str) -> &'a Value {
    parent.get(name).unwrap_or(&Value::Null)
}

/// JSON equality where numbers compare by value (`1 == 1.0`).
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn with_str(value: &Value, check: impl FnOnce(&str) -> bool) -> bool {
    value.as_str().is_some_and(check)
}

fn with_f64(value: &Value, check: impl FnOnce(f64) -> bool) -> bool {
    value.as_f64().is_some_and(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::SystemClock;
    use rstest::rstest;
    use serde_json::json;

    fn check(kind: RuleKind, value: Value) -> bool {
        evaluate(&kind, &value, &Value::Null, &SystemClock)
    }

    fn check_in(kind: RuleKind, field: &str, parent: &Value) -> bool {
        evaluate(&kind, sibling(parent, field), parent, &SystemClock)
    }

    #[rstest]
    #[case(RuleKind::Required, json!("x"), true)]
    #[case(RuleKind::Required, json!(null), false)]
    #[case(RuleKind::Required, json!(""), true)]
    #[case(RuleKind::NotBlank, json!("  \t"), false)]
    #[case(RuleKind::MinLength(3), json!("héé"), true)]
    #[case(RuleKind::MaxLength(2), json!("héé"), false)]
    #[case(RuleKind::Length { min: 1, max: 3 }, json!("abc"), true)]
    #[case(RuleKind::StartsWith("ab".into()), json!("abc"), true)]
    #[case(RuleKind::EndsWith("bc".into()), json!("abd"), false)]
    #[case(RuleKind::Contains("@".into()), json!("a@b"), true)]
    #[case(RuleKind::Lowercase, json!("abc1"), true)]
    #[case(RuleKind::Uppercase, json!("ABc"), false)]
    #[case(RuleKind::OneOf(vec![json!("red"), json!(2)]), json!(2.0), true)]
    #[case(RuleKind::OneOf(vec![json!("red")]), json!("blue"), false)]
    #[case(RuleKind::Pattern("^[a-z]+$".into()), json!("abc"), true)]
    #[case(RuleKind::Pattern("(a+)+".into()), json!("aaa"), false)]
    #[case(RuleKind::Min(18.0), json!(18), true)]
    #[case(RuleKind::Min(18.0), json!(15), false)]
    #[case(RuleKind::Max(10.0), json!(10.5), false)]
    #[case(RuleKind::Range { min: 1.0, max: 5.0 }, json!(3), true)]
    #[case(RuleKind::Positive, json!(0), false)]
    #[case(RuleKind::Negative, json!(-0.1), true)]
    #[case(RuleKind::Even, json!(4), true)]
    #[case(RuleKind::Odd, json!(4), false)]
    #[case(RuleKind::Even, json!(2.5), false)]
    #[case(RuleKind::DivisibleBy(5), json!(25), true)]
    #[case(RuleKind::DecimalPlaces(2), json!(1.25), true)]
    #[case(RuleKind::DecimalPlaces(1), json!(1.25), false)]
    #[case(RuleKind::MinSize(2), json!([1]), false)]
    #[case(RuleKind::MaxSize(2), json!({"a": 1, "b": 2}), true)]
    #[case(RuleKind::NotEmpty, json!([]), false)]
    #[case(RuleKind::UniqueItems, json!([1, 2, 1]), false)]
    #[case(RuleKind::json_string(), json!("{\"a\": [1, 2]}"), true)]
    #[case(RuleKind::json_string(), json!("{\"a\": [1, 2,]}"), false)]
    fn builtins(#[case] kind: RuleKind, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(check(kind, value), expected);
    }

    #[rstest]
    #[case(RuleKind::Min(1.0), json!("5"))]
    #[case(RuleKind::MinLength(1), json!(5))]
    #[case(RuleKind::Email, json!(["a@b.io"]))]
    #[case(RuleKind::NotEmpty, json!(true))]
    fn wrong_type_is_invalid(#[case] kind: RuleKind, #[case] value: Value) {
        assert!(!check(kind, value));
    }

    #[test]
    fn conditional_presence_reads_siblings() {
        let business = json!({"kind": "business", "vat": null});
        let personal = json!({"kind": "personal"});
        let required_if = RuleKind::RequiredIf {
            field: "kind".into(),
            equals: json!("business"),
        };
        assert!(!check_in(required_if.clone(), "vat", &business));
        assert!(check_in(required_if, "vat", &personal));

        let with = RuleKind::RequiredWith {
            field: "password".into(),
        };
        assert!(!check_in(with.clone(), "confirm", &json!({"password": "x"})));
        assert!(check_in(with, "confirm", &json!({})));

        let without = RuleKind::RequiredWithout {
            field: "phone".into(),
        };
        assert!(!check_in(without.clone(), "email", &json!({})));
        assert!(check_in(without, "email", &json!({"phone": "1"})));

        let unless = RuleKind::RequiredUnless {
            field: "guest".into(),
            equals: json!(true),
        };
        assert!(check_in(unless.clone(), "name", &json!({"guest": true})));
        assert!(!check_in(unless, "name", &json!({"guest": false})));
    }

    #[test]
    fn custom_rules_do_not_evaluate_without_a_plan() {
        assert!(!check(RuleKind::custom("anything"), json!("x")));
    }
}
