//! Canonical SDP formatter
//!
//! Walks a [`SessionDescription`] through the ordered property view and emits
//! one line per value. Line prefixes come from the property registry:
//!
//! - a one-letter type is written as `x=value`,
//! - the empty type (payloads) is written without any prefix,
//! - anything else is an attribute, written as `a=name:value`, or as `a=name`
//!   for a set flag. Unset flags are not written.
//!
//! Sequences produce one line per element, except time zones, which share a
//! single `z=` line. Runs of line terminators are collapsed at the end so the
//! output never contains blank lines.

use tracing::{debug, trace};

use crate::types::{
    Attribute, AttributeValue, Bandwidth, Candidate, Connection, EncryptionKey, ExtMap, Fmtp, FmtpParams,
    Group, Media, Origin, Payload, RepeatTime, Rtcp, RtcpFb, RtpMap, SessionDescription, Ssrc, TimeZone,
    Timing,
};

use super::duration;
use super::ordering::{MEDIA_ORDER, PAYLOAD_ORDER, SESSION_ORDER};
use super::properties::{ordered, Property, PropertyValue, Section};
use super::registry::{attribute_wire_name, type_of};

/// SDP line terminator
pub const EOL: &str = "\r\n";

/// Media properties written on the `m=` line itself.
const MEDIA_LINE_PROPERTIES: &[&str] = &["type", "port", "protocol", "numberOfPorts", "formats"];

/// How the lines of a property are introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix<'a> {
    /// `x=value`
    Line(&'a str),
    /// Value only, no terminator of its own
    Bare,
    /// `a=name:value`
    Attribute(&'a str),
}

impl<'a> Prefix<'a> {
    fn of(property: &Property<'a>) -> Self {
        if let PropertyValue::Attribute(_) = property.value {
            return Prefix::Attribute(attribute_wire_name(property.name));
        }
        match type_of(property.name) {
            Some("") => Prefix::Bare,
            Some(sdp_type) if sdp_type.len() == 1 => Prefix::Line(sdp_type),
            Some(sdp_type) => Prefix::Attribute(sdp_type),
            None => Prefix::Attribute(property.name),
        }
    }
}

/// Formats a session description as canonical SDP text.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::format_sdp;
/// use rvoip_sdp_core::types::{Origin, SessionDescription};
///
/// let session = SessionDescription::new(Origin::new("-", "1", "1", "127.0.0.1"), "-");
/// assert_eq!(
///     format_sdp(&session),
///     "v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n"
/// );
/// ```
pub fn format_sdp(session: &SessionDescription) -> String {
    let mut out = String::new();
    format_section(&mut out, session, &[], SESSION_ORDER);
    let out = collapse_line_breaks(&out);
    debug!(media = session.media.len(), bytes = out.len(), "Formatted SDP session");
    out
}

/// Appends the lines of every property of `section`, in table order.
fn format_section<S: Section + ?Sized>(out: &mut String, section: &S, excluded: &[&str], order: &[&str]) {
    for property in ordered(section, excluded, order) {
        trace!(property = property.name, "Formatting SDP property");
        format_property(out, &property);
    }
}

fn format_property(out: &mut String, property: &Property<'_>) {
    let prefix = Prefix::of(property);

    if let PropertyValue::Attribute(AttributeValue::Flag(set)) = property.value {
        if *set {
            let name = match prefix {
                Prefix::Attribute(name) | Prefix::Line(name) => name,
                Prefix::Bare => property.name,
            };
            out.push_str("a=");
            out.push_str(name);
            out.push_str(EOL);
        }
        return;
    }

    let head = match prefix {
        Prefix::Line(sdp_type) => format!("{sdp_type}="),
        Prefix::Bare => String::new(),
        Prefix::Attribute(name) => format!("a={name}:"),
    };
    for value in encode_values(property.value) {
        out.push_str(&head);
        out.push_str(&value);
        if prefix != Prefix::Bare {
            out.push_str(EOL);
        }
    }
}

/// Encodes a property value, one string per output line.
fn encode_values(value: PropertyValue<'_>) -> Vec<String> {
    match value {
        PropertyValue::Number(number) => vec![number.to_string()],
        PropertyValue::Text(text) => vec![text.to_string()],
        PropertyValue::Origin(origin) => vec![encode_origin(origin)],
        PropertyValue::Connection(connection) => vec![encode_connection(connection)],
        PropertyValue::Bandwidth(bandwidth) => bandwidth.iter().map(encode_bandwidth).collect(),
        PropertyValue::Timing(timing) => vec![encode_timing(timing)],
        PropertyValue::Repeat(repeat) => repeat.iter().map(encode_repeat).collect(),
        PropertyValue::TimeZones(timezones) => vec![encode_timezones(timezones)],
        PropertyValue::EncryptionKey(key) => vec![encode_encryption_key(key)],
        PropertyValue::Media(media) => media.iter().map(encode_media).collect(),
        PropertyValue::Formats(formats) => vec![formats.join(" ")],
        PropertyValue::Payloads(payloads) => payloads.iter().map(encode_payload).collect(),
        PropertyValue::RtpMap(id, rtpmap) => vec![encode_rtpmap(id, rtpmap)],
        PropertyValue::Fmtp(id, fmtp) => vec![encode_fmtp(id, fmtp)],
        PropertyValue::Attribute(value) => value.values().map(encode_attribute).collect(),
    }
}

fn encode_origin(origin: &Origin) -> String {
    format!(
        "{} {} {} {} {} {}",
        origin.username,
        origin.session_id,
        origin.session_version,
        origin.network_type,
        origin.address_type,
        origin.unicast_address
    )
}

fn encode_connection(connection: &Connection) -> String {
    format!(
        "{} {} {}",
        connection.network_type, connection.address_type, connection.connection_address
    )
}

fn encode_bandwidth(bandwidth: &Bandwidth) -> String {
    format!("{}:{}", bandwidth.bandwidth_type, bandwidth.bandwidth)
}

fn encode_timing(timing: &Timing) -> String {
    format!("{} {}", timing.start, timing.stop)
}

fn encode_repeat(repeat: &RepeatTime) -> String {
    let mut fields = vec![duration::encode(repeat.interval), duration::encode(repeat.active_duration)];
    fields.extend(repeat.offsets.iter().map(|offset| duration::encode(*offset)));
    fields.join(" ")
}

fn encode_timezones(timezones: &[TimeZone]) -> String {
    timezones
        .iter()
        .map(|zone| format!("{} {}", zone.adjustment, duration::encode(zone.offset)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn encode_encryption_key(key: &EncryptionKey) -> String {
    match key.key.as_deref() {
        Some(value) if !value.is_empty() => format!("{}:{}", key.method, value),
        _ => key.method.clone(),
    }
}

/// The `m=` line value followed by the lines of the media block.
fn encode_media(media: &Media) -> String {
    let mut out = format!("{} {}", media.media_type, media.port);
    if let Some(count) = media.number_of_ports {
        out.push('/');
        out.push_str(&count.to_string());
    }
    out.push(' ');
    out.push_str(&media.protocol);
    for id in media.formats.identifiers() {
        out.push(' ');
        out.push_str(&id);
    }
    out.push_str(EOL);
    format_section(&mut out, media, MEDIA_LINE_PROPERTIES, MEDIA_ORDER);
    out
}

fn encode_payload(payload: &Payload) -> String {
    let mut out = String::new();
    format_section(&mut out, payload, &["id"], PAYLOAD_ORDER);
    out
}

fn encode_rtpmap(id: u8, rtpmap: &RtpMap) -> String {
    let mut out = format!("{} {}/{}", id, rtpmap.codec, rtpmap.rate);
    if let Some(params) = rtpmap.codec_params.as_deref().filter(|p| !p.is_empty()) {
        out.push('/');
        out.push_str(params);
    }
    out
}

fn encode_fmtp(id: u8, fmtp: &Fmtp) -> String {
    let params = match &fmtp.params {
        FmtpParams::Raw(text) => text.clone(),
        FmtpParams::Map(pairs) => pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "),
    };
    format!("{id} {params}")
}

fn encode_attribute(attribute: &Attribute) -> String {
    match attribute {
        Attribute::Text(text) => text.clone(),
        Attribute::Ssrc(ssrc) => encode_ssrc(ssrc),
        Attribute::Candidate(candidate) => encode_candidate(candidate),
        Attribute::ExtMap(extmap) => encode_extmap(extmap),
        Attribute::Fingerprint(fingerprint) => {
            format!("{} {}", fingerprint.hash_function, fingerprint.fingerprint)
        }
        Attribute::Group(group) => encode_group(group),
        Attribute::RtcpFb(feedback) => encode_rtcp_fb(feedback),
        Attribute::Rtcp(rtcp) => encode_rtcp(rtcp),
    }
}

fn encode_ssrc(ssrc: &Ssrc) -> String {
    match &ssrc.value {
        Some(value) => format!("{} {}:{}", ssrc.id, ssrc.attribute, value),
        None => format!("{} {}", ssrc.id, ssrc.attribute),
    }
}

fn encode_candidate(candidate: &Candidate) -> String {
    let mut out = format!(
        "{} {} {} {} {} {} typ {}",
        candidate.foundation,
        candidate.component,
        candidate.transport,
        candidate.priority,
        candidate.address,
        candidate.port,
        candidate.candidate_type
    );
    for (name, value) in &candidate.extensions {
        out.push_str(&format!(" {name} {value}"));
    }
    out
}

fn encode_extmap(extmap: &ExtMap) -> String {
    let mut out = extmap.id.to_string();
    if let Some(direction) = &extmap.direction {
        out.push('/');
        out.push_str(direction);
    }
    out.push(' ');
    out.push_str(&extmap.uri);
    if let Some(attributes) = &extmap.extension_attributes {
        out.push(' ');
        out.push_str(attributes);
    }
    out
}

fn encode_group(group: &Group) -> String {
    let mut out = group.semantics.clone();
    for mid in &group.mids {
        out.push(' ');
        out.push_str(mid);
    }
    out
}

fn encode_rtcp_fb(feedback: &RtcpFb) -> String {
    match &feedback.parameter {
        Some(parameter) => format!("{} {} {}", feedback.payload, feedback.feedback_type, parameter),
        None => format!("{} {}", feedback.payload, feedback.feedback_type),
    }
}

fn encode_rtcp(rtcp: &Rtcp) -> String {
    let mut out = rtcp.port.to_string();
    for field in [&rtcp.network_type, &rtcp.address_type, &rtcp.address].into_iter().flatten() {
        out.push(' ');
        out.push_str(field);
    }
    out
}

/// Replaces every run of two or more `\r`/`\n` characters with one terminator.
pub fn collapse_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\r' && c != '\n' {
            out.push(c);
            continue;
        }
        let mut run = 1;
        while chars.next_if(|next| *next == '\r' || *next == '\n').is_some() {
            run += 1;
        }
        if run >= 2 {
            out.push_str(EOL);
        } else {
            out.push(c);
        }
    }
    out
}
