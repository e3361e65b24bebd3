use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{TypeMismatch, UnknownKind};

/// The kind of payload a [`TypedValue`] carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Integer,
    /// 64-bit floating point.
    Decimal,
    /// 32-bit floating point, decoded on its own parse path.
    Float,
    Boolean,
    Date,
    Null,
}

impl ValueKind {
    /// All kinds, in sniffing priority order.
    pub const ALL: [ValueKind; 7] = [
        ValueKind::Null,
        ValueKind::Date,
        ValueKind::Boolean,
        ValueKind::Integer,
        ValueKind::Decimal,
        ValueKind::Float,
        ValueKind::String,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A single configuration value of a known kind.
///
/// Exactly one payload is meaningful per instance. Accessors are exact-kind
/// only: asking for an integer from a `Decimal` fails with [`TypeMismatch`]
/// instead of truncating. Convert explicitly at the call site when coercion
/// is wanted.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Decimal(f64),
    Float(f32),
    Boolean(bool),
    Date(NaiveDateTime),
    /// Key present, no typed value.
    #[default]
    Null,
}

impl TypedValue {
    /// The kind of the stored payload.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Float(_) => ValueKind::Float,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Date(_) => ValueKind::Date,
            Self::Null => ValueKind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_string(&self) -> Result<&str, TypeMismatch> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::String)),
        }
    }

    pub fn as_integer(&self) -> Result<i64, TypeMismatch> {
        match self {
            Self::Integer(i) => Ok(*i),
            other => Err(other.mismatch(ValueKind::Integer)),
        }
    }

    pub fn as_decimal(&self) -> Result<f64, TypeMismatch> {
        match self {
            Self::Decimal(d) => Ok(*d),
            other => Err(other.mismatch(ValueKind::Decimal)),
        }
    }

    pub fn as_float(&self) -> Result<f32, TypeMismatch> {
        match self {
            Self::Float(f) => Ok(*f),
            other => Err(other.mismatch(ValueKind::Float)),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, TypeMismatch> {
        match self {
            Self::Boolean(b) => Ok(*b),
            other => Err(other.mismatch(ValueKind::Boolean)),
        }
    }

    pub fn as_date(&self) -> Result<NaiveDateTime, TypeMismatch> {
        match self {
            Self::Date(d) => Ok(*d),
            other => Err(other.mismatch(ValueKind::Date)),
        }
    }

    fn mismatch(&self, expected: ValueKind) -> TypeMismatch {
        TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }
}

/// Formats the canonical on-disk string form; `Null` renders as empty.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(self))
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<f32> for TypedValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for TypedValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
