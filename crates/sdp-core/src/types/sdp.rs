//! Structured form of an SDP (RFC 4566) session description.
//!
//! These types carry no behavior beyond construction helpers: every value is
//! plain data that serializes to nested key/value and list structures, so a
//! signaling layer in any language can build or inspect it.
//!
//! # References
//! - [RFC 4566: Session Description Protocol](https://tools.ietf.org/html/rfc4566)
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::sdp::{format_sdp, parse_sdp};
use crate::types::attribute::{deserialize_ordered_map, serialize_ordered_map, Attributes};

/// Represents the Origin (o=) field in an SDP message.
///
/// Format: `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    /// Username of the originator (often "-")
    pub username: String,
    /// Session ID (unique identifier for this session)
    pub session_id: String,
    /// Session version (increments when session is modified)
    pub session_version: String,
    /// Network type (typically "IN" for Internet)
    pub network_type: String,
    /// Address type ("IP4" or "IP6")
    pub address_type: String,
    /// Unicast address (hostname or IP address)
    pub unicast_address: String,
}

impl Origin {
    /// Creates an `IN IP4` origin.
    pub fn new(
        username: impl Into<String>,
        session_id: impl Into<String>,
        session_version: impl Into<String>,
        unicast_address: impl Into<String>,
    ) -> Self {
        Origin {
            username: username.into(),
            session_id: session_id.into(),
            session_version: session_version.into(),
            network_type: "IN".to_string(),
            address_type: "IP4".to_string(),
            unicast_address: unicast_address.into(),
        }
    }
}

/// Represents the Connection Data (c=) field in an SDP message.
///
/// Format: `c=<nettype> <addrtype> <connection-address>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Network type (typically "IN" for Internet)
    pub network_type: String,
    /// Address type ("IP4" or "IP6")
    pub address_type: String,
    /// Connection address, including any `/ttl` or `/count` suffix
    pub connection_address: String,
}

impl Connection {
    /// Creates an `IN IP4` connection.
    pub fn new(connection_address: impl Into<String>) -> Self {
        Connection {
            network_type: "IN".to_string(),
            address_type: "IP4".to_string(),
            connection_address: connection_address.into(),
        }
    }
}

/// Represents a Bandwidth (b=) line.
///
/// Format: `b=<bwtype>:<bandwidth>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bandwidth {
    /// Bandwidth modifier ("CT", "AS", "TIAS", ...)
    #[serde(rename = "type")]
    pub bandwidth_type: String,
    /// Bandwidth value, in kilobits per second for CT and AS
    #[serde(rename = "limit")]
    pub bandwidth: u64,
}

impl Bandwidth {
    pub fn new(bandwidth_type: impl Into<String>, bandwidth: u64) -> Self {
        Bandwidth {
            bandwidth_type: bandwidth_type.into(),
            bandwidth,
        }
    }
}

/// Represents the Timing (t=) field. A value of 0 means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub start: u64,
    pub stop: u64,
}

/// Represents a Repeat Times (r=) line. All values are seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatTime {
    pub interval: i64,
    pub active_duration: i64,
    pub offsets: Vec<i64>,
}

/// One adjustment of a Time Zones (z=) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZone {
    /// Time at which the adjustment applies
    pub adjustment: u64,
    /// Signed offset in seconds
    pub offset: i64,
}

/// Represents the Encryption Key (k=) field.
///
/// Format: `k=<method>[:<encryption key>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionKey {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Codec mapping of a payload (a=rtpmap).
///
/// Format: `a=rtpmap:<payload type> <encoding name>/<clock rate>[/<encoding parameters>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpMap {
    /// Encoding name (e.g. "PCMU", "opus")
    pub codec: String,
    /// Clock rate in Hertz
    pub rate: u32,
    /// Encoding parameters, such as the channel count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_params: Option<String>,
}

impl RtpMap {
    pub fn new(codec: impl Into<String>, rate: u32) -> Self {
        RtpMap {
            codec: codec.into(),
            rate,
            codec_params: None,
        }
    }

    pub fn with_params(mut self, codec_params: impl Into<String>) -> Self {
        self.codec_params = Some(codec_params.into());
        self
    }
}

/// Format parameters of a payload.
///
/// The parser produces [`FmtpParams::Map`] whenever every `;`-separated
/// segment has the form `name=value`, and [`FmtpParams::Raw`] otherwise
/// (e.g. telephone-event's `0-15`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FmtpParams {
    /// Parameter text that is not a list of `name=value` pairs
    Raw(String),
    /// Parameters in their original order
    Map(Vec<(String, String)>),
}

impl FmtpParams {
    /// Looks up a decoded parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            FmtpParams::Raw(_) => None,
            FmtpParams::Map(pairs) => pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
        }
    }
}

impl Serialize for FmtpParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FmtpParams::Raw(text) => serializer.serialize_str(text),
            FmtpParams::Map(pairs) => serialize_ordered_map(pairs, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FmtpParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FmtpParamsVisitor;

        impl<'de> Visitor<'de> for FmtpParamsVisitor {
            type Value = FmtpParams;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a parameter string or a map of parameters")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<FmtpParams, E> {
                Ok(FmtpParams::Raw(value.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<FmtpParams, A::Error> {
                let pairs = deserialize_ordered_map(de::value::MapAccessDeserializer::new(access))?;
                Ok(FmtpParams::Map(pairs))
            }
        }

        deserializer.deserialize_any(FmtpParamsVisitor)
    }
}

/// Format parameters attribute (a=fmtp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fmtp {
    pub params: FmtpParams,
}

impl Fmtp {
    /// Creates format parameters from ordered name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Fmtp {
            params: FmtpParams::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Creates format parameters from undecoded text.
    pub fn raw(params: impl Into<String>) -> Self {
        Fmtp {
            params: FmtpParams::Raw(params.into()),
        }
    }
}

/// A payload type of an RTP media line with its codec attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// RTP payload type, listed on the `m=` line
    pub id: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtpmap: Option<RtpMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmtp: Option<Fmtp>,
}

impl Payload {
    pub fn new(id: u8) -> Self {
        Payload {
            id,
            rtpmap: None,
            fmtp: None,
        }
    }

    pub fn with_rtpmap(mut self, rtpmap: RtpMap) -> Self {
        self.rtpmap = Some(rtpmap);
        self
    }

    pub fn with_fmtp(mut self, fmtp: Fmtp) -> Self {
        self.fmtp = Some(fmtp);
        self
    }
}

/// The format list of a media line: either plain format identifiers or
/// RTP payloads carrying their own rtpmap/fmtp attributes.
///
/// `Payloads` is the canonical form whenever the list is non-empty and every
/// identifier is a `u8` written without leading zeros. Parsing always picks
/// that form, so `Formats(vec!["0".into()])` reads back as a payload list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaFormats {
    Formats(Vec<String>),
    Payloads(Vec<Payload>),
}

impl MediaFormats {
    /// Format identifiers as they appear on the `m=` line.
    pub fn identifiers(&self) -> Vec<String> {
        match self {
            MediaFormats::Formats(formats) => formats.clone(),
            MediaFormats::Payloads(payloads) => payloads.iter().map(|p| p.id.to_string()).collect(),
        }
    }
}

/// Represents a media description (m=) and the lines scoped to it.
///
/// Connection, bandwidth, key and attribute values of a media block shadow
/// the session-level ones; they are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Media type (audio, video, text, application, message)
    #[serde(rename = "type")]
    pub media_type: String,
    /// Transport port, taken as written: no range check is applied
    pub port: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_ports: Option<u32>,
    /// Transport protocol (e.g. "RTP/AVP", "UDP/TLS/RTP/SAVPF")
    pub protocol: String,
    #[serde(flatten)]
    pub formats: MediaFormats,
    /// Media title (i=)
    #[serde(default, rename = "sessionDescription", skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bandwidth: Vec<Bandwidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<EncryptionKey>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Media {
    pub fn new(
        media_type: impl Into<String>,
        port: u32,
        protocol: impl Into<String>,
        formats: MediaFormats,
    ) -> Self {
        Media {
            media_type: media_type.into(),
            port,
            number_of_ports: None,
            protocol: protocol.into(),
            formats,
            information: None,
            connection: None,
            bandwidth: Vec::new(),
            encryption_key: None,
            attributes: Attributes::new(),
        }
    }

    /// Returns the payload with the given id, when the media line carries payloads.
    pub fn payload(&self, id: u8) -> Option<&Payload> {
        match &self.formats {
            MediaFormats::Payloads(payloads) => payloads.iter().find(|p| p.id == id),
            MediaFormats::Formats(_) => None,
        }
    }
}

/// Represents a complete SDP session description.
///
/// `version`, `origin`, `session_name` and `timing` are always present; every
/// other line is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescription {
    /// Protocol version (v=)
    pub version: u32,
    /// Session origin (o=)
    pub origin: Origin,
    /// Session name (s=)
    pub session_name: String,
    /// Session information (i=)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_description: Option<String>,
    /// URI of description (u=)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Email address (e=)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    /// Phone number (p=)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Connection data (c=)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
    /// Bandwidth lines (b=)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bandwidth: Vec<Bandwidth>,
    /// Timing (t=)
    pub timing: Timing,
    /// Repeat times (r=)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repeat: Vec<RepeatTime>,
    /// Time zone adjustments (z=), always emitted on a single line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timezones: Vec<TimeZone>,
    /// Encryption key (k=)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<EncryptionKey>,
    /// Session-level attributes (a=)
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Media descriptions (m=), in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
}

impl SessionDescription {
    /// Creates a version 0 session with unbounded timing and no optional lines.
    pub fn new(origin: Origin, session_name: impl Into<String>) -> Self {
        SessionDescription {
            version: 0,
            origin,
            session_name: session_name.into(),
            session_description: None,
            uri: None,
            email_address: None,
            phone_number: None,
            connection: None,
            bandwidth: Vec::new(),
            timing: Timing::default(),
            repeat: Vec::new(),
            timezones: Vec::new(),
            encryption_key: None,
            attributes: Attributes::new(),
            media: Vec::new(),
        }
    }

    /// Builder-style helper appending a media description.
    pub fn with_media(mut self, media: Media) -> Self {
        self.media.push(media);
        self
    }

    /// Serializes the structured value as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a structured value from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromStr for SessionDescription {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_sdp(s)
    }
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_sdp(self))
    }
}
