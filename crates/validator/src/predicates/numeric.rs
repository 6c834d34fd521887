//! Numeric predicates over JSON numbers.

use serde_json::{Number, Value};

/// The value as an integer, accepting whole floats such as `4.0`.
#[must_use]
pub fn as_integer(value: &Value) -> Option<i64> {
    let number = value.as_number()?;
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    if number.is_u64() {
        return None;
    }
    let f = number.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15).then_some(f as i64)
}

/// Integer divisible by `divisor`; a zero divisor never divides.
#[must_use]
pub fn is_divisible_by(value: &Value, divisor: i64) -> bool {
    as_integer(value)
        .and_then(|n| n.checked_rem(divisor))
        .is_some_and(|rem| rem == 0)
}

/// Digits after the decimal point in the number's shortest decimal form.
#[must_use]
pub fn fractional_digits(value: &Value) -> Option<u32> {
    value.as_number().map(number_fractional_digits)
}

fn number_fractional_digits(number: &Number) -> u32 {
    if number.is_i64() || number.is_u64() {
        return 0;
    }
    let text = number.to_string();
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().unwrap_or(0)),
        None => (text.as_str(), 0),
    };
    let fraction = mantissa
        .split_once('.')
        .map_or("", |(_, fraction)| fraction.trim_end_matches('0'));
    (fraction.len() as i64 - exponent).max(0) as u32
}
