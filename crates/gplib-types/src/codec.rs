//! Canonical string codec for [`TypedValue`].
//!
//! Every value is stored on disk as a string token so the file stays
//! hand-editable:
//!
//! | Kind | Token |
//! |---|---|
//! | String | the text, verbatim |
//! | Integer | base-10 `i64` |
//! | Decimal / Float | shortest round-trip literal, `.` as separator |
//! | Boolean | `True` / `False` |
//! | Date | `DATETIME` + binary tick count (see [`ticks`](crate::ticks)) |
//! | Null | empty string |
//!
//! Decoding is directed by a declared [`ValueKind`]. Tokens with no declared
//! kind go through [`sniff`] instead.

use crate::error::DecodeError;
use crate::ticks;
use crate::value::{TypedValue, ValueKind};

/// Marker preceding the tick count of an encoded date.
pub const DATETIME_PREFIX: &str = "DATETIME";

const TRUE_TOKEN: &str = "True";
const FALSE_TOKEN: &str = "False";

/// Encode a value as its canonical on-disk token.
pub fn encode(value: &TypedValue) -> String {
    match value {
        TypedValue::String(s) => s.clone(),
        TypedValue::Integer(i) => i.to_string(),
        TypedValue::Decimal(d) => d.to_string(),
        TypedValue::Float(f) => f.to_string(),
        TypedValue::Boolean(true) => TRUE_TOKEN.to_string(),
        TypedValue::Boolean(false) => FALSE_TOKEN.to_string(),
        TypedValue::Date(d) => format!("{DATETIME_PREFIX}{}", ticks::to_binary(*d)),
        TypedValue::Null => String::new(),
    }
}

/// Decode a token as the declared kind.
///
/// The empty token is null for every kind, and a `Null` declared kind always
/// yields [`TypedValue::Null`]. Numeric kinds ignore surrounding ASCII
/// whitespace.
pub fn decode(raw: &str, kind: ValueKind) -> Result<TypedValue, DecodeError> {
    if raw.is_empty() {
        return Ok(TypedValue::Null);
    }
    match kind {
        ValueKind::Null => Ok(TypedValue::Null),
        ValueKind::String => Ok(TypedValue::String(raw.to_string())),
        ValueKind::Date => decode_date(raw).map(TypedValue::Date),
        ValueKind::Boolean => decode_boolean(raw)
            .map(TypedValue::Boolean)
            .ok_or_else(|| DecodeError::new(raw, kind, "expected `True` or `False`")),
        ValueKind::Integer => raw
            .trim_ascii()
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|e| DecodeError::new(raw, kind, e.to_string())),
        ValueKind::Decimal => raw
            .trim_ascii()
            .parse::<f64>()
            .map(TypedValue::Decimal)
            .map_err(|e| DecodeError::new(raw, kind, e.to_string())),
        ValueKind::Float => raw
            .trim_ascii()
            .parse::<f32>()
            .map(TypedValue::Float)
            .map_err(|e| DecodeError::new(raw, kind, e.to_string())),
    }
}

/// Best-effort kind inference for a token with no declared kind.
///
/// Priority: empty, date, boolean, integer, decimal, float, string. Numeric
/// steps only accept finite values, so words like `inf` stay strings.
pub fn sniff(raw: &str) -> TypedValue {
    if raw.is_empty() {
        return TypedValue::Null;
    }
    if let Ok(date) = decode_date(raw) {
        return TypedValue::Date(date);
    }
    if let Some(b) = decode_boolean(raw) {
        return TypedValue::Boolean(b);
    }
    let number = raw.trim_ascii();
    if let Ok(i) = number.parse::<i64>() {
        return TypedValue::Integer(i);
    }
    match number.parse::<f64>() {
        Ok(d) if d.is_finite() => return TypedValue::Decimal(d),
        _ => {}
    }
    match number.parse::<f32>() {
        Ok(f) if f.is_finite() => TypedValue::Float(f),
        _ => TypedValue::String(raw.to_string()),
    }
}

fn decode_boolean(raw: &str) -> Option<bool> {
    match raw {
        TRUE_TOKEN => Some(true),
        FALSE_TOKEN => Some(false),
        _ => None,
    }
}

fn decode_date(raw: &str) -> Result<chrono::NaiveDateTime, DecodeError> {
    let digits = raw
        .strip_prefix(DATETIME_PREFIX)
        .ok_or_else(|| DecodeError::new(raw, ValueKind::Date, "missing DATETIME prefix"))?;
    let binary = digits
        .parse::<i64>()
        .map_err(|e| DecodeError::new(raw, ValueKind::Date, e.to_string()))?;
    ticks::from_binary(binary)
        .ok_or_else(|| DecodeError::new(raw, ValueKind::Date, "tick count out of range"))
}
