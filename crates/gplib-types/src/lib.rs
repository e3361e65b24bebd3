//! Foundation types for GeneralPurposeLib configuration.
//!
//! A configuration value is a [`TypedValue`]: a closed tagged union with one
//! payload of a known [`ValueKind`]. On disk every value is a plain string;
//! the [`codec`] module converts between the two.
//!
//! # Key Types
//!
//! - [`TypedValue`] — one configuration value (string, integer, decimal,
//!   float, boolean, date or null)
//! - [`ValueKind`] — the discriminant of a [`TypedValue`]
//! - [`TypeMismatch`] — an accessor asked for the wrong kind
//! - [`DecodeError`] — a string token could not be decoded as a kind
//!
//! # Modules
//!
//! - [`value`] — [`TypedValue`] and [`ValueKind`]
//! - [`codec`] — canonical encoding, schema-directed decoding and sniffing
//! - [`ticks`] — 100 ns tick encoding for dates
//! - [`error`] — error types

pub mod codec;
pub mod error;
pub mod ticks;
pub mod value;

pub use codec::{decode, encode, sniff, DATETIME_PREFIX};
pub use error::{DecodeError, TypeMismatch, UnknownKind};
pub use value::{TypedValue, ValueKind};
