//! Time description grammars: t=, r= and z=
//!
//! Repeat and time zone values use typed time (`7d`, `-1h`, `3600`), decoded
//! through the duration codec.

use nom::{
    character::complete::char,
    combinator::map_res,
    multi::{many0, separated_list1},
    sequence::{separated_pair, tuple},
    IResult,
};

use crate::sdp::duration::{to_seconds, typed_time};
use crate::types::{RepeatTime, TimeZone, Timing};

use super::line_parser::{complete, number, spaced};
use super::ValueResult;

/// A typed-time token converted to seconds.
fn duration(input: &str) -> IResult<&str, i64> {
    map_res(typed_time, |(value, unit)| to_seconds(value, unit))(input)
}

/// Parse the value of a timing line (t=).
///
/// Format: `<start-time> <stop-time>`
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::time_parser::parse_time_description_line;
///
/// let timing = parse_time_description_line("2873397496 2873404696").unwrap();
/// assert_eq!(timing.start, 2873397496);
/// assert_eq!(timing.stop, 2873404696);
/// ```
pub fn parse_time_description_line(value: &str) -> ValueResult<Timing> {
    let (start, stop) = complete(
        value,
        separated_pair(number::<u64>, char(' '), number::<u64>),
        "timing",
        &["<start-time> <stop-time>"],
    )?;
    Ok(Timing { start, stop })
}

/// Parse the value of a repeat times line (r=).
///
/// Format: `<repeat interval> <active duration> <offsets from start-time>...`
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::time_parser::parse_repeat_time_line;
///
/// let repeat = parse_repeat_time_line("7d 1h 0 25h").unwrap();
/// assert_eq!(repeat.interval, 604800);
/// assert_eq!(repeat.active_duration, 3600);
/// assert_eq!(repeat.offsets, vec![0, 90000]);
/// ```
pub fn parse_repeat_time_line(value: &str) -> ValueResult<RepeatTime> {
    let (interval, active_duration, offsets) = complete(
        value,
        tuple((duration, spaced(duration), many0(spaced(duration)))),
        "repeat time",
        &["<repeat interval> <active duration> <offsets>"],
    )?;
    Ok(RepeatTime {
        interval,
        active_duration,
        offsets,
    })
}

/// Parse the value of a time zones line (z=).
///
/// Format: `<adjustment time> <offset> <adjustment time> <offset> ...`
pub fn parse_time_zones_line(value: &str) -> ValueResult<Vec<TimeZone>> {
    let zones = complete(
        value,
        separated_list1(char(' '), separated_pair(number::<u64>, char(' '), duration)),
        "time zones",
        &["<adjustment time> <offset>"],
    )?;
    Ok(zones
        .into_iter()
        .map(|(adjustment, offset)| TimeZone { adjustment, offset })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_errors() {
        assert!(parse_time_description_line("0").is_err());
        assert!(parse_time_description_line("0 0 0").is_err());
        assert!(parse_time_description_line("-1 0").is_err());
    }

    #[test]
    fn test_repeat_without_offsets() {
        let repeat = parse_repeat_time_line("604800 3600").unwrap();
        assert_eq!(repeat.interval, 604_800);
        assert!(repeat.offsets.is_empty());
    }

    #[test]
    fn test_repeat_error_position() {
        let err = parse_repeat_time_line("7d 1h 1w").unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.expected, vec!["end of line"]);

        let err = parse_repeat_time_line("7d 99999999999999999d").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.message, "invalid repeat time");
    }

    #[test]
    fn test_time_zones() {
        let zones = parse_time_zones_line("2882844526 -1h 2898848070 0").unwrap();
        assert_eq!(
            zones,
            vec![
                TimeZone { adjustment: 2_882_844_526, offset: -3_600 },
                TimeZone { adjustment: 2_898_848_070, offset: 0 },
            ]
        );
        assert!(parse_time_zones_line("2882844526").is_err());
        assert!(parse_time_zones_line("2882844526 -1h 2898848070").is_err());
    }
}
