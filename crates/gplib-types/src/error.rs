use thiserror::Error;

use crate::value::ValueKind;

/// A [`TypedValue`](crate::TypedValue) accessor was called for a kind the
/// value does not hold.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("type mismatch: expected {expected}, value is {actual}")]
pub struct TypeMismatch {
    pub expected: ValueKind,
    pub actual: ValueKind,
}

/// A string token could not be decoded as the requested kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot decode {value:?} as {expected}: {reason}")]
pub struct DecodeError {
    /// The raw on-disk token.
    pub value: String,
    /// The kind the schema asked for.
    pub expected: ValueKind,
    pub reason: String,
}

impl DecodeError {
    pub(crate) fn new(value: &str, expected: ValueKind, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            expected,
            reason: reason.into(),
        }
    }
}

/// A kind name did not match any [`ValueKind`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown value kind: {0}")]
pub struct UnknownKind(pub String);
