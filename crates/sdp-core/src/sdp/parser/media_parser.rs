//! SDP media description parsing
//!
//! An `m=` line opens a media description. When every format on the line is
//! an RTP payload type, the media carries [`Payload`]s and later
//! `a=rtpmap`/`a=fmtp` lines attach to them by payload id.

use nom::{
    character::complete::char,
    combinator::opt,
    multi::many0,
    sequence::{preceded, tuple},
};

use crate::types::{Media, MediaFormats, Payload};

use super::attribute_parser::{parse_fmtp, parse_rtpmap};
use super::line_parser::{complete, number, spaced, token};
use super::ValueResult;

/// Parse a media description line (m=).
///
/// Format: `<media> <port>[/<number of ports>] <proto> <fmt> ...`
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::media_parser::parse_media_description_line;
/// use rvoip_sdp_core::types::MediaFormats;
///
/// let media = parse_media_description_line("audio 49170 RTP/AVP 0 8").unwrap();
/// assert_eq!(media.media_type, "audio");
/// assert_eq!(media.port, 49170);
/// assert_eq!(media.formats.identifiers(), vec!["0", "8"]);
/// assert!(matches!(media.formats, MediaFormats::Payloads(_)));
///
/// let media = parse_media_description_line("application 9 UDP/DTLS/SCTP webrtc-datachannel").unwrap();
/// assert!(matches!(media.formats, MediaFormats::Formats(_)));
/// ```
pub fn parse_media_description_line(value: &str) -> ValueResult<Media> {
    let (media_type, port, number_of_ports, protocol, formats) = complete(
        value,
        tuple((
            token,
            spaced(number::<u32>),
            opt(preceded(char('/'), number::<u32>)),
            spaced(token),
            many0(spaced(token)),
        )),
        "media description",
        &["<media> <port>[/<number of ports>] <proto> <fmt> ..."],
    )?;
    let mut media = Media::new(media_type, port, protocol, media_formats(&formats));
    media.number_of_ports = number_of_ports;
    Ok(media)
}

/// Payloads when every format is a payload type written in canonical form,
/// plain formats otherwise.
fn media_formats(formats: &[&str]) -> MediaFormats {
    let ids: Option<Vec<u8>> = formats
        .iter()
        .map(|format| format.parse::<u8>().ok().filter(|id| id.to_string() == *format))
        .collect();
    match ids {
        Some(ids) if !ids.is_empty() => MediaFormats::Payloads(ids.into_iter().map(Payload::new).collect()),
        _ => MediaFormats::Formats(formats.iter().map(|format| format.to_string()).collect()),
    }
}

/// Attaches an `a=rtpmap` or `a=fmtp` value to the matching payload.
///
/// Returns `Ok(false)` when the media has no free slot for it: no payloads,
/// no payload with that id, or a value already attached. The caller then
/// keeps the line as a plain attribute.
pub fn attach_payload_attribute(media: &mut Media, name: &str, value: &str) -> ValueResult<bool> {
    let MediaFormats::Payloads(payloads) = &mut media.formats else {
        return Ok(false);
    };
    match name {
        "rtpmap" => {
            let (id, rtpmap) = parse_rtpmap(value)?;
            match payloads.iter_mut().find(|payload| payload.id == id) {
                Some(payload) if payload.rtpmap.is_none() => {
                    payload.rtpmap = Some(rtpmap);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        "fmtp" => {
            let (id, fmtp) = parse_fmtp(value)?;
            match payloads.iter_mut().find(|payload| payload.id == id) {
                Some(payload) if payload.fmtp.is_none() => {
                    payload.fmtp = Some(fmtp);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RtpMap;

    #[test]
    fn test_port_count() {
        let media = parse_media_description_line("video 49170/2 RTP/AVP 31").unwrap();
        assert_eq!(media.port, 49170);
        assert_eq!(media.number_of_ports, Some(2));
        assert_eq!(media.protocol, "RTP/AVP");
    }

    #[test]
    fn test_port_is_not_range_checked() {
        let media = parse_media_description_line("audio 70000/70000 RTP/AVP 0").unwrap();
        assert_eq!(media.port, 70_000);
        assert_eq!(media.number_of_ports, Some(70_000));
    }

    #[test]
    fn test_format_detection() {
        let media = parse_media_description_line("audio 9 RTP/AVP 0 096").unwrap();
        assert_eq!(
            media.formats,
            MediaFormats::Formats(vec!["0".to_string(), "096".to_string()])
        );

        let media = parse_media_description_line("audio 9 RTP/AVP 300").unwrap();
        assert!(matches!(media.formats, MediaFormats::Formats(_)));

        let media = parse_media_description_line("audio 9 RTP/AVP").unwrap();
        assert_eq!(media.formats, MediaFormats::Formats(Vec::new()));
    }

    #[test]
    fn test_media_line_errors() {
        assert!(parse_media_description_line("audio RTP/AVP 0").is_err());
        assert!(parse_media_description_line("audio 99999999999 RTP/AVP 0").is_err());

        let err = parse_media_description_line("audio 9 RTP/AVP 0 ").unwrap_err();
        assert_eq!(err.offset, "audio 9 RTP/AVP 0".len());
    }

    #[test]
    fn test_attach_payload_attribute() {
        let mut media = parse_media_description_line("audio 9 RTP/AVP 0 101").unwrap();
        assert!(attach_payload_attribute(&mut media, "rtpmap", "0 PCMU/8000").unwrap());
        assert!(!attach_payload_attribute(&mut media, "rtpmap", "0 PCMA/8000").unwrap());
        assert!(!attach_payload_attribute(&mut media, "rtpmap", "8 PCMA/8000").unwrap());
        assert!(attach_payload_attribute(&mut media, "fmtp", "101 0-15").unwrap());
        assert!(attach_payload_attribute(&mut media, "rtpmap", "0 bad").is_err());

        assert_eq!(media.payload(0).and_then(|p| p.rtpmap.clone()), Some(RtpMap::new("PCMU", 8000)));
        assert!(media.payload(101).and_then(|p| p.fmtp.as_ref()).is_some());

        let mut media = parse_media_description_line("application 9 UDP/DTLS/SCTP webrtc-datachannel").unwrap();
        assert!(!attach_payload_attribute(&mut media, "rtpmap", "0 PCMU/8000").unwrap());
    }
}
