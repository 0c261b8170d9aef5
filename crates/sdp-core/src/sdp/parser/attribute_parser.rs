//! Attribute value grammars
//!
//! Decodes the value part of well-known `a=` lines into typed values. Any
//! attribute without a grammar here keeps its raw text.
//!
//! # Supported attributes
//!
//! - `rtpmap`, `fmtp` (RFC 4566)
//! - `ssrc` (RFC 5576)
//! - `candidate` (RFC 8839)
//! - `extmap` (RFC 8285)
//! - `fingerprint` (RFC 8122)
//! - `rtcp` (RFC 3605)
//! - `group` (RFC 5888)
//! - `rtcp-fb` (RFC 4585)

use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::char,
    combinator::{opt, rest},
    multi::many0,
    sequence::{pair, preceded, tuple},
};

use crate::types::{
    Attribute, Candidate, ExtMap, Fingerprint, Fmtp, FmtpParams, Group, Rtcp, RtcpFb, RtpMap, Ssrc,
};

use super::line_parser::{complete, number, spaced, token};
use super::ValueResult;

/// Decodes the value of an attribute, typed when its name has a grammar.
///
/// rtpmap and fmtp are not decoded here: they belong to payloads and are
/// handled by the media parser.
pub fn parse_attribute_value(name: &str, value: &str) -> ValueResult<Attribute> {
    let attribute = match name {
        "ssrc" => Attribute::Ssrc(parse_ssrc(value)?),
        "candidate" => Attribute::Candidate(parse_candidate(value)?),
        "extmap" => Attribute::ExtMap(parse_extmap(value)?),
        "fingerprint" => Attribute::Fingerprint(parse_fingerprint(value)?),
        "rtcp" => Attribute::Rtcp(parse_rtcp(value)?),
        "group" => Attribute::Group(parse_group(value)?),
        "rtcp-fb" => Attribute::RtcpFb(parse_rtcp_fb(value)?),
        _ => Attribute::Text(value.to_string()),
    };
    Ok(attribute)
}

/// Parse the value of an rtpmap attribute.
///
/// Format: `<payload type> <encoding name>/<clock rate>[/<encoding parameters>]`
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::attribute_parser::parse_rtpmap;
///
/// let (id, rtpmap) = parse_rtpmap("111 opus/48000/2").unwrap();
/// assert_eq!(id, 111);
/// assert_eq!(rtpmap.codec, "opus");
/// assert_eq!(rtpmap.rate, 48000);
/// assert_eq!(rtpmap.codec_params.as_deref(), Some("2"));
/// ```
pub fn parse_rtpmap(value: &str) -> ValueResult<(u8, RtpMap)> {
    let (id, codec, rate, codec_params) = complete(
        value,
        tuple((
            number::<u8>,
            spaced(take_till1(|c| c == '/' || c == ' ')),
            preceded(char('/'), number::<u32>),
            opt(preceded(char('/'), rest)),
        )),
        "rtpmap",
        &["<payload type> <encoding name>/<clock rate>[/<encoding parameters>]"],
    )?;
    Ok((
        id,
        RtpMap {
            codec: codec.to_string(),
            rate,
            codec_params: codec_params.filter(|p: &&str| !p.is_empty()).map(str::to_string),
        },
    ))
}

/// Parse the value of an fmtp attribute.
///
/// Format: `<format> <format specific parameters>`
///
/// Parameters decode to a map when every `;`-separated segment is a
/// `name=value` pair, and stay raw text otherwise.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::attribute_parser::parse_fmtp;
/// use rvoip_sdp_core::types::FmtpParams;
///
/// let (id, fmtp) = parse_fmtp("111 minptime=10;useinbandfec=1").unwrap();
/// assert_eq!(id, 111);
/// assert_eq!(fmtp.params.get("useinbandfec"), Some("1"));
///
/// let (_, fmtp) = parse_fmtp("101 0-15").unwrap();
/// assert_eq!(fmtp.params, FmtpParams::Raw("0-15".to_string()));
/// ```
pub fn parse_fmtp(value: &str) -> ValueResult<(u8, Fmtp)> {
    let (id, params) = complete(
        value,
        pair(number::<u8>, spaced(rest)),
        "fmtp",
        &["<format> <format specific parameters>"],
    )?;
    Ok((id, Fmtp { params: decode_fmtp_params(params) }))
}

fn decode_fmtp_params(params: &str) -> FmtpParams {
    let pairs: Option<Vec<(String, String)>> = params
        .split(';')
        .map(|segment| {
            let (name, value) = segment.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect();
    match pairs {
        Some(pairs) => FmtpParams::Map(pairs),
        None => FmtpParams::Raw(params.to_string()),
    }
}

/// Format: `<ssrc-id> <attribute>[:<value>]`
pub fn parse_ssrc(value: &str) -> ValueResult<Ssrc> {
    let (id, attribute, attribute_value) = complete(
        value,
        tuple((
            number::<u32>,
            spaced(take_till1(|c| c == ':')),
            opt(preceded(char(':'), rest)),
        )),
        "ssrc",
        &["<ssrc-id> <attribute>[:<value>]"],
    )?;
    Ok(Ssrc {
        id,
        attribute: attribute.to_string(),
        value: attribute_value.map(str::to_string),
    })
}

/// Format: `<foundation> <component-id> <transport> <priority> <address> <port> typ <type> [<name> <value>]*`
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::attribute_parser::parse_candidate;
///
/// let candidate = parse_candidate(
///     "1 1 UDP 2130706431 192.168.1.2 54400 typ host generation 0"
/// ).unwrap();
/// assert_eq!(candidate.priority, 2130706431);
/// assert_eq!(candidate.candidate_type, "host");
/// assert_eq!(candidate.extensions, vec![("generation".to_string(), "0".to_string())]);
/// ```
pub fn parse_candidate(value: &str) -> ValueResult<Candidate> {
    let (foundation, component, transport, priority, address, port, candidate_type, extensions) = complete(
        value,
        tuple((
            token,
            spaced(number::<u32>),
            spaced(token),
            spaced(number::<u64>),
            spaced(token),
            spaced(number::<u32>),
            preceded(tag(" typ"), spaced(token)),
            many0(pair(spaced(token), spaced(token))),
        )),
        "candidate",
        &["<foundation> <component-id> <transport> <priority> <address> <port> typ <type>"],
    )?;
    Ok(Candidate {
        foundation: foundation.to_string(),
        component,
        transport: transport.to_string(),
        priority,
        address: address.to_string(),
        port,
        candidate_type: candidate_type.to_string(),
        extensions: extensions
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    })
}

/// Format: `<id>[/<direction>] <uri> [<extension attributes>]`
pub fn parse_extmap(value: &str) -> ValueResult<ExtMap> {
    let (id, direction, uri, extension_attributes) = complete(
        value,
        tuple((
            number::<u16>,
            opt(preceded(char('/'), token)),
            spaced(token),
            opt(spaced(rest)),
        )),
        "extmap",
        &["<id>[/<direction>] <uri> [<extension attributes>]"],
    )?;
    Ok(ExtMap {
        id,
        direction: direction.map(str::to_string),
        uri: uri.to_string(),
        extension_attributes: extension_attributes.map(str::to_string),
    })
}

/// Format: `<hash-function> <fingerprint>`
pub fn parse_fingerprint(value: &str) -> ValueResult<Fingerprint> {
    let (hash_function, fingerprint) = complete(
        value,
        pair(token, spaced(token)),
        "fingerprint",
        &["<hash-function> <fingerprint>"],
    )?;
    Ok(Fingerprint {
        hash_function: hash_function.to_string(),
        fingerprint: fingerprint.to_string(),
    })
}

/// Format: `<port> [<nettype> <addrtype> <connection-address>]`
pub fn parse_rtcp(value: &str) -> ValueResult<Rtcp> {
    let (port, address) = complete(
        value,
        pair(number::<u32>, opt(tuple((spaced(token), spaced(token), spaced(token))))),
        "rtcp",
        &["<port> [<nettype> <addrtype> <connection-address>]"],
    )?;
    let (network_type, address_type, address) = match address {
        Some((network_type, address_type, address)) => (
            Some(network_type.to_string()),
            Some(address_type.to_string()),
            Some(address.to_string()),
        ),
        None => (None, None, None),
    };
    Ok(Rtcp {
        port,
        network_type,
        address_type,
        address,
    })
}

/// Format: `<semantics> [<identification-tag>]*`
pub fn parse_group(value: &str) -> ValueResult<Group> {
    let (semantics, mids) = complete(
        value,
        pair(token, many0(spaced(token))),
        "group",
        &["<semantics> <identification-tag>..."],
    )?;
    Ok(Group {
        semantics: semantics.to_string(),
        mids: mids.into_iter().map(str::to_string).collect(),
    })
}

/// Format: `<payload type|*> <feedback type> [<parameters>]`
pub fn parse_rtcp_fb(value: &str) -> ValueResult<RtcpFb> {
    let (payload, feedback_type, parameter) = complete(
        value,
        tuple((token, spaced(token), opt(spaced(rest)))),
        "rtcp-fb",
        &["<payload type> <feedback type> [<parameters>]"],
    )?;
    Ok(RtcpFb {
        payload: payload.to_string(),
        feedback_type: feedback_type.to_string(),
        parameter: parameter.map(str::to_string),
    })
}
