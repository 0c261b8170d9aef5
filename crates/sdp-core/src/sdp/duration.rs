//! Typed-time durations (RFC 4566 §5.10)
//!
//! Repeat intervals, active durations, offsets and time zone adjustments may
//! be written with a unit suffix: `d` (days), `h` (hours), `m` (minutes) or
//! `s` (seconds). A bare number is seconds.

use nom::{
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize},
    sequence::pair,
    IResult,
};

use crate::error::{Error, Result};

/// Unit suffixes and their length in seconds.
pub const UNITS: &[(char, i64)] = &[('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)];

/// Units tried when encoding, largest first. Seconds are the unsuffixed fallback.
const ENCODE_UNITS: &[(char, i64)] = &[('d', 86_400), ('h', 3_600), ('m', 60)];

/// Encodes seconds using the largest unit that divides them evenly.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::duration::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(90), "90");
/// assert_eq!(encode(120), "2m");
/// assert_eq!(encode(3600), "1h");
/// assert_eq!(encode(-3600), "-1h");
/// assert_eq!(encode(61), "61");
/// ```
pub fn encode(seconds: i64) -> String {
    if seconds == 0 {
        return "0".to_string();
    }
    for &(unit, length) in ENCODE_UNITS {
        if seconds % length == 0 {
            return format!("{}{}", seconds / length, unit);
        }
    }
    seconds.to_string()
}

/// Length in seconds of a unit suffix.
fn unit_length(unit: char) -> Option<i64> {
    UNITS.iter().find(|(u, _)| *u == unit).map(|(_, length)| *length)
}

/// nom parser for a signed typed-time token: `[-]digits[d|h|m|s]`.
pub(crate) fn typed_time(input: &str) -> IResult<&str, (&str, Option<char>)> {
    pair(recognize(pair(opt(char('-')), digit1)), opt(one_of("dhms")))(input)
}

/// Converts the pieces recognized by [`typed_time`] into seconds.
pub(crate) fn to_seconds(number: &str, unit: Option<char>) -> Result<i64> {
    let value: i64 = number
        .parse()
        .map_err(|_| Error::Duration(format!("{number} is out of range")))?;
    let length = unit.and_then(unit_length).unwrap_or(1);
    value
        .checked_mul(length)
        .ok_or_else(|| Error::Duration(format!("{number}{} overflows", unit.map(String::from).unwrap_or_default())))
}

/// Decodes a typed-time value into seconds.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::duration::decode;
///
/// assert_eq!(decode("7d").unwrap(), 604_800);
/// assert_eq!(decode("25h").unwrap(), 90_000);
/// assert_eq!(decode("-1h").unwrap(), -3_600);
/// assert_eq!(decode("61").unwrap(), 61);
/// assert!(decode("1w").is_err());
/// ```
pub fn decode(text: &str) -> Result<i64> {
    match typed_time(text) {
        Ok(("", (number, unit))) => to_seconds(number, unit),
        _ => Err(Error::Duration(format!("invalid typed time: {text:?}"))),
    }
}
