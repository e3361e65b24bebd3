//! Tick encoding for dates.
//!
//! A date is stored as a signed 64-bit integer in the layout of .NET's
//! `DateTime.ToBinary`: the low 62 bits count 100 ns ticks since
//! 0001-01-01T00:00:00, the top two bits hold a kind tag. Dates here are
//! timezone-naive, so the tag is always written as zero and ignored on read.

use chrono::{DateTime, NaiveDateTime};

/// 100 ns ticks per second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 0001-01-01T00:00:00 and the UNIX epoch.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Ticks of 9999-12-31T23:59:59.9999999, the last representable instant.
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

/// Mask selecting the tick count out of the binary form.
pub const TICKS_MASK: i64 = 0x3FFF_FFFF_FFFF_FFFF;

const NANOS_PER_TICK: i64 = 100;

/// Encode a date as its binary tick form.
///
/// Instants outside 0001-01-01 ..= 9999-12-31 saturate to the nearest bound.
/// Nanoseconds below one tick are truncated.
pub fn to_binary(date: NaiveDateTime) -> i64 {
    let utc = date.and_utc();
    let sub_ticks = i128::from(utc.timestamp_subsec_nanos()) / i128::from(NANOS_PER_TICK);
    let ticks = i128::from(UNIX_EPOCH_TICKS)
        + i128::from(utc.timestamp()) * i128::from(TICKS_PER_SECOND)
        + sub_ticks;
    ticks.clamp(0, i128::from(MAX_TICKS)) as i64
}

/// Decode a binary tick form. Returns `None` when the tick count lies past
/// [`MAX_TICKS`].
pub fn from_binary(binary: i64) -> Option<NaiveDateTime> {
    let ticks = binary & TICKS_MASK;
    if ticks > MAX_TICKS {
        return None;
    }
    let since_unix = ticks - UNIX_EPOCH_TICKS;
    let secs = since_unix.div_euclid(TICKS_PER_SECOND);
    let nanos = since_unix.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
    DateTime::from_timestamp(secs, nanos as u32).map(|dt| dt.naive_utc())
}
