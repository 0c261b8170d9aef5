//! # SDP Parser Implementation
//!
//! Parses Session Description Protocol documents ([RFC 4566](https://tools.ietf.org/html/rfc4566))
//! into a [`SessionDescription`].
//!
//! ## Parsing Process
//!
//! 1. Splitting the content into lines (CRLF or LF)
//! 2. Checking each line against the configured limits
//! 3. Classifying each line by its type letter
//! 4. Enforcing the field order: `v=`, `o=`, `s=`, then the other session
//!    fields, then media descriptions
//! 5. Decoding each value with its grammar
//!
//! ## Field Order
//!
//! - `v=` must be first, `o=` second and `s=` third.
//! - `i=`, `u=`, `e=`, `p=`, `c=`, `t=`, `z=` and `k=` appear at most once per
//!   session; `b=`, `r=` and `a=` may repeat. `r=` needs a preceding `t=`.
//! - `t=` is required and must precede the first `m=`.
//! - Inside a media description only `i=`, `c=`, `b=`, `k=` and `a=` are
//!   allowed; `i=`, `c=` and `k=` at most once per media.
//!
//! Any violation fails the whole parse with a [`SyntaxError`]. Nothing is
//! recovered or partially returned.

use bytes::Bytes;
use std::str;
use tracing::{debug, trace};

use crate::config::ParseConfig;
use crate::error::{Error, Result, SyntaxError};
use crate::sdp::registry::attribute_property;
use crate::types::{
    Attributes, Bandwidth, Connection, EncryptionKey, Media, Origin, RepeatTime, SessionDescription, TimeZone,
    Timing,
};

use super::attribute_parser::parse_attribute_value;
use super::line_parser::{offset, parse_attribute, parse_sdp_line, split_lines};
use super::media_parser::{attach_payload_attribute, parse_media_description_line};
use super::session_parser::{
    parse_bandwidth_line, parse_connection_line, parse_encryption_key_line, parse_origin_line, parse_version_line,
};
use super::time_parser::{parse_repeat_time_line, parse_time_description_line, parse_time_zones_line};
use super::ValueError;

/// Width of the `x=` prefix of every line
const PREFIX_LEN: usize = 2;

/// Line types accepted at session level once `s=` has been read
const SESSION_TYPES: &[&str] = &["i=", "u=", "e=", "p=", "c=", "b=", "t=", "r=", "z=", "k=", "a=", "m="];

/// Line types accepted inside a media description
const MEDIA_TYPES: &[&str] = &["i=", "c=", "b=", "k=", "a=", "m="];

/// Where the parser is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FieldOrder {
    Version,     // v= (must be first)
    Origin,      // o= (must be second)
    SessionName, // s= (must be third)
    SessionLevel,
    Media,
}

/// Parses SDP text with the default configuration.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parse_sdp;
///
/// let sdp = "v=0\r\n\
///            o=jdoe 2890844526 2890842807 IN IP4 10.47.16.5\r\n\
///            s=SDP Seminar\r\n\
///            c=IN IP4 224.2.17.12/127\r\n\
///            t=2873397496 2873404696\r\n\
///            a=recvonly\r\n\
///            m=audio 49170 RTP/AVP 0\r\n";
///
/// let session = parse_sdp(sdp).unwrap();
/// assert_eq!(session.origin.username, "jdoe");
/// assert_eq!(session.session_name, "SDP Seminar");
/// assert!(session.attributes.has_flag("recvonly"));
/// assert_eq!(session.media[0].port, 49170);
/// ```
pub fn parse_sdp(text: &str) -> Result<SessionDescription> {
    parse_with_config(text, &ParseConfig::default())
}

/// Parses an SDP body received as bytes.
///
/// Content that is not valid UTF-8 fails with a syntax error positioned at
/// the first invalid byte.
pub fn parse_bytes(content: &Bytes) -> Result<SessionDescription> {
    match str::from_utf8(content) {
        Ok(text) => parse_sdp(text),
        Err(err) => {
            let valid = &content[..err.valid_up_to()];
            let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
            let column = valid.iter().rev().take_while(|b| **b != b'\n').count() + 1;
            Err(SyntaxError::new("SDP content is not valid UTF-8", line, column).into())
        }
    }
}

/// Parses SDP text with explicit limits and leniency.
pub fn parse_with_config(text: &str, config: &ParseConfig) -> Result<SessionDescription> {
    let lines = split_lines(text);
    if lines.len() > config.max_lines {
        return Err(Error::LimitExceeded {
            what: "line count",
            limit: config.max_lines,
        });
    }

    let mut parser = SdpParser::new(config);
    for (index, &raw) in lines.iter().enumerate() {
        parser.line_number = index + 1;
        if raw.len() > config.max_line_length {
            return Err(Error::LimitExceeded {
                what: "line length",
                limit: config.max_line_length,
            });
        }

        let line = if config.lenient {
            let trimmed = raw.trim_start();
            parser.indent = raw.len() - trimmed.len();
            trimmed.trim_end()
        } else {
            raw
        };
        if line.is_empty() {
            if config.lenient {
                continue;
            }
            return Err(parser.error_at(0, "blank line", &["<type>=<value>"]));
        }

        let (sdp_type, value) = match parse_sdp_line(line) {
            Ok((_, parsed)) => parsed,
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                let column = offset(line, err.input);
                let expected: &[&'static str] = if column == 0 { &["<type>"] } else { &["\"=\""] };
                return Err(parser.error_at(column, "malformed SDP line", expected));
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(parser.error_at(line.len(), "malformed SDP line", &["<type>=<value>"]));
            }
        };
        trace!(line = parser.line_number, sdp_type = %sdp_type, "Parsing SDP line");
        parser.parse_line(sdp_type, value)?;
    }

    parser.line_number = lines.len() + 1;
    parser.indent = 0;
    let session = parser.finish()?;
    debug!(
        lines = lines.len(),
        media = session.media.len(),
        "Parsed SDP session"
    );
    Ok(session)
}

/// Accumulates a session while lines are read.
struct SdpParser<'c> {
    config: &'c ParseConfig,
    field_position: FieldOrder,
    line_number: usize,
    indent: usize,

    version: u32,
    origin: Option<Origin>,
    session_name: Option<String>,
    session_description: Option<String>,
    uri: Option<String>,
    email_address: Option<String>,
    phone_number: Option<String>,
    connection: Option<Connection>,
    bandwidth: Vec<Bandwidth>,
    timing: Option<Timing>,
    repeat: Vec<RepeatTime>,
    timezones: Option<Vec<TimeZone>>,
    encryption_key: Option<EncryptionKey>,
    attributes: Attributes,
    media: Vec<Media>,
}

impl<'c> SdpParser<'c> {
    fn new(config: &'c ParseConfig) -> Self {
        SdpParser {
            config,
            field_position: FieldOrder::Version,
            line_number: 0,
            indent: 0,
            version: 0,
            origin: None,
            session_name: None,
            session_description: None,
            uri: None,
            email_address: None,
            phone_number: None,
            connection: None,
            bandwidth: Vec::new(),
            timing: None,
            repeat: Vec::new(),
            timezones: None,
            encryption_key: None,
            attributes: Attributes::new(),
            media: Vec::new(),
        }
    }

    /// Syntax error at a 0-based column of the current (trimmed) line.
    fn error_at(&self, column: usize, message: impl Into<String>, expected: &[&str]) -> Error {
        SyntaxError::new(message, self.line_number, self.indent + column + 1)
            .expecting(expected.iter().copied())
            .into()
    }

    /// Positions a value grammar failure after the `x=` prefix.
    fn value_error(&self, err: ValueError) -> Error {
        self.error_at(PREFIX_LEN + err.offset, err.message, &err.expected)
    }

    fn parse_line(&mut self, sdp_type: char, value: &str) -> Result<()> {
        match self.field_position {
            FieldOrder::Version if sdp_type != 'v' => {
                return Err(self.error_at(0, "v= must be the first line in SDP", &["v="]));
            }
            FieldOrder::Origin if sdp_type != 'o' => {
                return Err(self.error_at(0, "o= must follow v=", &["o="]));
            }
            FieldOrder::SessionName if sdp_type != 's' => {
                return Err(self.error_at(0, "s= must follow o=", &["s="]));
            }
            _ => {}
        }

        match self.field_position {
            FieldOrder::Media => self.parse_media_line(sdp_type, value),
            _ => self.parse_session_line(sdp_type, value),
        }
    }

    fn parse_session_line(&mut self, sdp_type: char, value: &str) -> Result<()> {
        match sdp_type {
            'v' if self.field_position == FieldOrder::Version => {
                self.version = parse_version_line(value).map_err(|e| self.value_error(e))?;
                self.field_position = FieldOrder::Origin;
            }
            'o' if self.field_position == FieldOrder::Origin => {
                self.origin = Some(parse_origin_line(value).map_err(|e| self.value_error(e))?);
                self.field_position = FieldOrder::SessionName;
            }
            's' if self.field_position == FieldOrder::SessionName => {
                self.session_name = Some(value.to_string());
                self.field_position = FieldOrder::SessionLevel;
            }
            'i' => {
                if self.session_description.is_some() {
                    return Err(self.duplicate('i'));
                }
                self.session_description = Some(value.to_string());
            }
            'u' => {
                if self.uri.is_some() {
                    return Err(self.duplicate('u'));
                }
                self.uri = Some(value.to_string());
            }
            'e' => {
                if self.email_address.is_some() {
                    return Err(self.duplicate('e'));
                }
                self.email_address = Some(value.to_string());
            }
            'p' => {
                if self.phone_number.is_some() {
                    return Err(self.duplicate('p'));
                }
                self.phone_number = Some(value.to_string());
            }
            'c' => {
                if self.connection.is_some() {
                    return Err(self.duplicate('c'));
                }
                self.connection = Some(parse_connection_line(value).map_err(|e| self.value_error(e))?);
            }
            'b' => {
                let bandwidth = parse_bandwidth_line(value).map_err(|e| self.value_error(e))?;
                self.bandwidth.push(bandwidth);
            }
            't' => {
                if self.timing.is_some() {
                    return Err(self.duplicate('t'));
                }
                self.timing = Some(parse_time_description_line(value).map_err(|e| self.value_error(e))?);
            }
            'r' => {
                if self.timing.is_none() {
                    return Err(self.error_at(0, "r= must follow a t= line", &["t="]));
                }
                let repeat = parse_repeat_time_line(value).map_err(|e| self.value_error(e))?;
                self.repeat.push(repeat);
            }
            'z' => {
                if self.timezones.is_some() {
                    return Err(self.duplicate('z'));
                }
                self.timezones = Some(parse_time_zones_line(value).map_err(|e| self.value_error(e))?);
            }
            'k' => {
                if self.encryption_key.is_some() {
                    return Err(self.duplicate('k'));
                }
                self.encryption_key = Some(parse_encryption_key_line(value).map_err(|e| self.value_error(e))?);
            }
            'a' => {
                let (name, attribute_value) = parse_attribute(value).map_err(|e| self.value_error(e))?;
                let attribute = match attribute_value {
                    Some(text) => Some(
                        parse_attribute_value(name, text)
                            .map_err(|e| self.value_error(e.shifted(name.len() + 1)))?,
                    ),
                    None => None,
                };
                self.attributes.record(attribute_property(name), attribute);
            }
            'm' => {
                if self.timing.is_none() {
                    return Err(self.error_at(0, "m= must come after the t= line", &["t="]));
                }
                self.field_position = FieldOrder::Media;
                return self.parse_media_line(sdp_type, value);
            }
            'v' | 'o' | 's' => return Err(self.duplicate(sdp_type)),
            _ => {
                return Err(self.error_at(0, format!("unexpected {sdp_type}= line in session description"), SESSION_TYPES));
            }
        }
        Ok(())
    }

    fn parse_media_line(&mut self, sdp_type: char, value: &str) -> Result<()> {
        if sdp_type == 'm' {
            if self.media.len() >= self.config.max_media {
                return Err(Error::LimitExceeded {
                    what: "media count",
                    limit: self.config.max_media,
                });
            }
            let media = parse_media_description_line(value).map_err(|e| self.value_error(e))?;
            self.media.push(media);
            return Ok(());
        }

        let line_number = self.line_number;
        let Some(media) = self.media.last_mut() else {
            return Err(self.error_at(0, "media line expected", &["m="]));
        };
        let result: std::result::Result<(), Option<ValueError>> = match sdp_type {
            'i' if media.information.is_none() => {
                media.information = Some(value.to_string());
                Ok(())
            }
            'c' if media.connection.is_none() => parse_connection_line(value)
                .map(|connection| media.connection = Some(connection))
                .map_err(Some),
            'b' => parse_bandwidth_line(value)
                .map(|bandwidth| media.bandwidth.push(bandwidth))
                .map_err(Some),
            'k' if media.encryption_key.is_none() => parse_encryption_key_line(value)
                .map(|key| media.encryption_key = Some(key))
                .map_err(Some),
            'a' => parse_media_attribute(media, value).map_err(Some),
            'i' | 'c' | 'k' => Err(None),
            _ => {
                return Err(self.error_at(0, format!("unexpected {sdp_type}= line in media description"), MEDIA_TYPES));
            }
        };
        trace!(line = line_number, "Parsed media-level line");
        match result {
            Ok(()) => Ok(()),
            Err(Some(err)) => Err(self.value_error(err)),
            Err(None) => Err(self.duplicate(sdp_type)),
        }
    }

    fn duplicate(&self, sdp_type: char) -> Error {
        self.error_at(0, format!("duplicate {sdp_type}= line"), &[])
    }

    fn missing(&self, sdp_type: char) -> Error {
        let token = format!("{sdp_type}=");
        self.error_at(0, format!("missing {sdp_type}= line"), &[token.as_str()])
    }

    fn finish(mut self) -> Result<SessionDescription> {
        if self.field_position == FieldOrder::Version {
            return Err(self.missing('v'));
        }
        let Some(origin) = self.origin.take() else {
            return Err(self.missing('o'));
        };
        let Some(session_name) = self.session_name.take() else {
            return Err(self.missing('s'));
        };
        let Some(timing) = self.timing else {
            return Err(self.missing('t'));
        };
        Ok(SessionDescription {
            version: self.version,
            origin,
            session_name,
            session_description: self.session_description,
            uri: self.uri,
            email_address: self.email_address,
            phone_number: self.phone_number,
            connection: self.connection,
            bandwidth: self.bandwidth,
            timing,
            repeat: self.repeat,
            timezones: self.timezones.unwrap_or_default(),
            encryption_key: self.encryption_key,
            attributes: self.attributes,
            media: self.media,
        })
    }
}

/// Records an `a=` line of a media description.
fn parse_media_attribute(media: &mut Media, value: &str) -> std::result::Result<(), ValueError> {
    let (name, attribute_value) = parse_attribute(value)?;
    let shift = name.len() + 1;
    let attribute = match attribute_value {
        Some(text) => {
            if attach_payload_attribute(media, name, text).map_err(|e| e.shifted(shift))? {
                return Ok(());
            }
            Some(parse_attribute_value(name, text).map_err(|e| e.shifted(shift))?)
        }
        None => None,
    };
    media.attributes.record(attribute_property(name), attribute);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeValue, MediaFormats};

    const MINIMAL: &str = "v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n";

    fn syntax_error(text: &str) -> SyntaxError {
        match parse_sdp(text) {
            Err(Error::Syntax(err)) => err,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_session() {
        let session = parse_sdp(MINIMAL).unwrap();
        assert_eq!(session.version, 0);
        assert_eq!(session.session_name, "-");
        assert_eq!(session.timing, Timing { start: 0, stop: 0 });
        assert!(session.media.is_empty());
        assert!(session.attributes.is_empty());
    }

    #[test]
    fn test_lf_only_and_missing_final_terminator() {
        let session = parse_sdp("v=0\no=- 1 1 IN IP4 127.0.0.1\ns=-\nt=0 0").unwrap();
        assert_eq!(session.origin.unicast_address, "127.0.0.1");
    }

    #[test]
    fn test_field_order_errors() {
        let err = syntax_error("o=- 1 1 IN IP4 127.0.0.1\r\nv=0\r\n");
        assert_eq!((err.line, err.column), (1, 1));
        assert_eq!(err.expected, vec!["v="]);

        let err = syntax_error("v=0\r\ns=-\r\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.expected, vec!["o="]);

        let err = syntax_error("v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nm=audio 9 RTP/AVP 0\r\nt=0 0\r\n");
        assert_eq!(err.line, 4);
        assert_eq!(err.expected, vec!["t="]);

        let err = syntax_error("v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\n");
        assert_eq!(err.line, 4);
        assert_eq!(err.message, "missing t= line");
    }

    #[test]
    fn test_truncated_documents_name_the_missing_line() {
        for (text, sdp_type) in [
            ("v=0\r\n", "o="),
            ("v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\n", "s="),
            ("v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nc=IN IP4 0.0.0.0\r\n", "t="),
        ] {
            let err = syntax_error(text);
            assert_eq!(err.message, format!("missing {sdp_type} line"));
            assert_eq!(err.expected, vec![sdp_type]);
        }
    }

    #[test]
    fn test_duplicate_single_fields() {
        let err = syntax_error(&format!("{MINIMAL}t=1 2\r\n"));
        assert_eq!(err.line, 5);
        assert_eq!(err.message, "duplicate t= line");

        let err = syntax_error(&format!("{MINIMAL}s=again\r\n"));
        assert_eq!(err.message, "duplicate s= line");

        let err = syntax_error(&format!("{MINIMAL}m=audio 9 RTP/AVP 0\r\nc=IN IP4 1.2.3.4\r\nc=IN IP4 1.2.3.5\r\n"));
        assert_eq!(err.line, 7);
        assert_eq!(err.message, "duplicate c= line");
    }

    #[test]
    fn test_value_error_columns() {
        let err = syntax_error("v=0\r\no=- 1 1 IN IP4\r\ns=-\r\nt=0 0\r\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 15);
        assert_eq!(err.message, "invalid origin");

        let err = syntax_error(&format!("{MINIMAL}a=rtcp:x\r\n"));
        assert_eq!((err.line, err.column), (5, 8));
        assert_eq!(err.message, "invalid rtcp");
    }

    #[test]
    fn test_line_type_errors() {
        let err = syntax_error(&format!("{MINIMAL}x=unknown\r\n"));
        assert_eq!(err.line, 5);
        assert!(err.expected.contains(&"a=".to_string()));

        let err = syntax_error(&format!("{MINIMAL}m=audio 9 RTP/AVP 0\r\nt=0 0\r\n"));
        assert_eq!(err.line, 6);
        assert_eq!(err.expected.len(), MEDIA_TYPES.len());

        let err = syntax_error(&format!("{MINIMAL}a\r\n"));
        assert_eq!((err.line, err.column), (5, 2));
    }

    #[test]
    fn test_blank_lines() {
        let text = "v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\n\r\ns=-\r\nt=0 0\r\n";
        let err = syntax_error(text);
        assert_eq!((err.line, err.column), (3, 1));

        let config = ParseConfig::default().with_lenient(true);
        let session = parse_with_config(text, &config).unwrap();
        assert_eq!(session.session_name, "-");

        let session = parse_with_config(&format!("  {MINIMAL}a=tool:x  \r\n\r\n"), &config).unwrap();
        assert_eq!(session.attributes.get("tool").and_then(AttributeValue::as_text), Some("x"));
    }

    #[test]
    fn test_limits() {
        let config = ParseConfig::default().with_max_media(1);
        let text = format!("{MINIMAL}m=audio 9 RTP/AVP 0\r\nm=video 9 RTP/AVP 96\r\n");
        assert!(matches!(
            parse_with_config(&text, &config),
            Err(Error::LimitExceeded { what: "media count", limit: 1 })
        ));

        let config = ParseConfig::default().with_max_line_length(10);
        assert!(matches!(
            parse_with_config(MINIMAL, &config),
            Err(Error::LimitExceeded { what: "line length", .. })
        ));

        let config = ParseConfig {
            max_lines: 3,
            ..ParseConfig::default()
        };
        assert!(matches!(
            parse_with_config(MINIMAL, &config),
            Err(Error::LimitExceeded { what: "line count", .. })
        ));
    }

    #[test]
    fn test_payload_attributes_attach() {
        let text = format!(
            "{MINIMAL}m=audio 9 RTP/AVP 0 101\r\n\
             a=rtpmap:0 PCMU/8000\r\n\
             a=rtpmap:101 telephone-event/8000\r\n\
             a=fmtp:101 0-15\r\n\
             a=rtpmap:8 PCMA/8000\r\n\
             a=ptime:20\r\n"
        );
        let session = parse_sdp(&text).unwrap();
        let media = &session.media[0];
        let MediaFormats::Payloads(payloads) = &media.formats else {
            panic!("expected payloads");
        };
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[1].rtpmap.as_ref().map(|r| r.codec.as_str()), Some("telephone-event"));
        assert!(payloads[1].fmtp.is_some());
        assert_eq!(media.attributes.get("rtpmap").and_then(AttributeValue::as_text), Some("8 PCMA/8000"));
        assert_eq!(media.attributes.get("packetTime").and_then(AttributeValue::as_text), Some("20"));
    }

    #[test]
    fn test_media_attribute_error_column() {
        let text = format!("{MINIMAL}m=audio 9 RTP/AVP 0\r\na=rtpmap:0 PCMU\r\n");
        let err = syntax_error(&text);
        assert_eq!(err.line, 6);
        assert_eq!(err.column, 16);
    }

    #[test]
    fn test_invalid_utf8() {
        let mut bytes = b"v=0\r\ns=".to_vec();
        bytes.push(0xff);
        let err = parse_bytes(&Bytes::from(bytes)).unwrap_err();
        let err = err.syntax().unwrap();
        assert_eq!((err.line, err.column), (2, 3));

        let session = parse_bytes(&Bytes::from_static(MINIMAL.as_bytes())).unwrap();
        assert_eq!(session.version, 0);
    }
}
