//! Time-relative predicates on RFC 3339 timestamps.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::foundation::Clock;

/// Parses an RFC 3339 timestamp into UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Compares the value's timestamp against the clock; unparsable values are
/// invalid.
pub(crate) fn compare(
    value: &Value,
    clock: &dyn Clock,
    accept: impl FnOnce(DateTime<Utc>, DateTime<Utc>) -> bool,
) -> bool {
    value
        .as_str()
        .and_then(parse_timestamp)
        .is_some_and(|t| accept(t, clock.now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::FixedClock;
    use crate::predicates::evaluate;
    use crate::schema::RuleKind;
    use chrono::TimeZone;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    fn check(kind: RuleKind, value: Value) -> bool {
        evaluate(&kind, &value, &Value::Null, &clock())
    }

    #[test]
    fn offsets_are_normalized() {
        let t = parse_timestamp("2024-06-01T14:00:00+02:00").unwrap();
        assert_eq!(t, clock().now());
    }

    #[test]
    fn relative_rules() {
        let earlier = json!("2024-05-31T00:00:00Z");
        let now = json!("2024-06-01T12:00:00Z");
        let later = json!("2025-01-01T00:00:00Z");

        assert!(check(RuleKind::Past, earlier.clone()));
        assert!(!check(RuleKind::Past, now.clone()));
        assert!(check(RuleKind::PastOrPresent, now.clone()));
        assert!(check(RuleKind::Future, later));
        assert!(!check(RuleKind::Future, now.clone()));
        assert!(check(RuleKind::FutureOrPresent, now));
        assert!(!check(RuleKind::FutureOrPresent, earlier));
    }

    #[test]
    fn unparsable_timestamps_are_invalid() {
        assert!(!check(RuleKind::Past, json!("yesterday")));
        assert!(!check(RuleKind::Past, json!("2024-05-31")));
        assert!(!check(RuleKind::Past, json!(1_700_000_000)));
    }
}
