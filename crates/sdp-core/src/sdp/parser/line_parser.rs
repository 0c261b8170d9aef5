//! SDP line parsing utilities
//!
//! Every SDP line has the form `<type>=<value>`, where type is a single
//! lowercase letter. Values are split into fields by single spaces.
//!
//! This module holds the line splitter, the `<type>=<value>` and
//! `<name>[:<value>]` grammars, and the nom building blocks shared by the
//! value grammars.

use std::str::FromStr;

use nom::{
    bytes::complete::{take_till1, take_while1},
    character::complete::{char, digit1, satisfy},
    combinator::{map_res, opt, rest},
    sequence::{pair, preceded},
    IResult,
};

use super::{ValueError, ValueResult};

/// Splits SDP text into lines.
///
/// Lines end with CRLF or a bare LF. A terminator after the last line does
/// not start another line, so `"v=0\r\n"` is one line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Parse an SDP line into its type letter and value.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::line_parser::parse_sdp_line;
///
/// let (_, (sdp_type, value)) = parse_sdp_line("a=rtpmap:96 VP8/90000").unwrap();
/// assert_eq!(sdp_type, 'a');
/// assert_eq!(value, "rtpmap:96 VP8/90000");
///
/// assert!(parse_sdp_line("V=0").is_err());
/// assert!(parse_sdp_line("v:0").is_err());
/// ```
pub fn parse_sdp_line(input: &str) -> IResult<&str, (char, &str)> {
    let (input, sdp_type) = satisfy(|c| c.is_ascii_lowercase())(input)?;
    let (input, _) = char('=')(input)?;
    let (input, value) = rest(input)?;
    Ok((input, (sdp_type, value)))
}

/// RFC 4566 `token-char`.
pub fn is_token_char(c: char) -> bool {
    matches!(c,
        '\x21' | '\x23'..='\x27' | '\x2A'..='\x2B' | '\x2D'..='\x2E' | '0'..='9' | 'A'..='Z' | '\x5E'..='\x7E')
}

/// Splits the value of an `a=` line into the attribute name and its value.
///
/// A flag attribute has no value; `a=name:` has an empty one.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::line_parser::parse_attribute;
///
/// assert_eq!(parse_attribute("sendrecv").unwrap(), ("sendrecv", None));
/// assert_eq!(parse_attribute("ptime:20").unwrap(), ("ptime", Some("20")));
/// assert!(parse_attribute("bad name").is_err());
/// ```
pub fn parse_attribute(value: &str) -> ValueResult<(&str, Option<&str>)> {
    let parsed: IResult<&str, (&str, Option<&str>)> =
        pair(take_while1(is_token_char), opt(preceded(char(':'), rest)))(value);
    match parsed {
        Ok(("", attribute)) => Ok(attribute),
        Ok((remaining, _)) => Err(ValueError::new(
            offset(value, remaining),
            "invalid character in attribute name",
            &["\":\"", "end of line"],
        )),
        Err(_) => Err(ValueError::new(0, "missing attribute name", &["<attribute name>"])),
    }
}

/// One space-delimited field.
pub fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == ' ')(input)
}

/// A decimal number that fits `T`.
pub fn number<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, |digits: &str| digits.parse::<T>())(input)
}

/// A field preceded by a single space.
pub fn spaced<'a, O, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(char(' '), parser)
}

/// Runs a value grammar that must consume the whole value.
///
/// `what` names the value in error messages, `expected` describes its syntax.
pub fn complete<'a, O, F>(value: &'a str, mut parser: F, what: &str, expected: &[&'static str]) -> ValueResult<O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    match parser(value) {
        Ok(("", output)) => Ok(output),
        Ok((remaining, _)) => Err(ValueError::new(
            offset(value, remaining),
            format!("unexpected text after {what}"),
            &["end of line"],
        )),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => Err(ValueError::new(
            offset(value, err.input),
            format!("invalid {what}"),
            expected,
        )),
        Err(nom::Err::Incomplete(_)) => Err(ValueError::new(value.len(), format!("incomplete {what}"), expected)),
    }
}

/// Byte offset of `remaining` within `value`, which it is a suffix of.
pub fn offset(value: &str, remaining: &str) -> usize {
    value.len() - remaining.len()
}
