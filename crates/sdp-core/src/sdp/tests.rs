use crate::error::Error;
use crate::sdp::{format_sdp, parse_bytes, parse_sdp};
use crate::types::{
    Attribute, AttributeValue, Attributes, Candidate, Fmtp, FmtpParams, Media, MediaFormats, Origin, Payload,
    RtpMap, SessionDescription, Ssrc,
};
use bytes::Bytes;
use std::str::FromStr;

// Helper function to create SDP test content
fn create_test_sdp_bytes(content: &str) -> Bytes {
    Bytes::copy_from_slice(content.as_bytes())
}

const RFC_EXAMPLE: &str = "\
v=0\r
o=jdoe 2890844526 2890842807 IN IP4 10.47.16.5\r
s=SDP Seminar\r
i=A Seminar on the session description protocol\r
u=http://www.example.com/seminars/sdp.pdf\r
e=j.doe@example.com (Jane Doe)\r
c=IN IP4 224.2.17.12/127\r
t=2873397496 2873404696\r
a=recvonly\r
m=audio 49170 RTP/AVP 0\r
m=video 51372 RTP/AVP 99\r
a=rtpmap:99 h263-1998/90000\r
";

const WEBRTC_OFFER: &str = "\
v=0\r
o=- 4611731400430051336 2 IN IP4 127.0.0.1\r
s=-\r
t=0 0\r
a=group:BUNDLE 0 1\r
a=msid-semantic: WMS stream\r
m=audio 9 UDP/TLS/RTP/SAVPF 111 0 101\r
c=IN IP4 0.0.0.0\r
a=rtcp:9 IN IP4 0.0.0.0\r
a=ice-ufrag:F7gI\r
a=ice-pwd:x9cml/YzichV2+XlhiMu8g\r
a=fingerprint:sha-256 D2:FA:0E:C3:22:59:5E:14:95:69:92:3D:13:B4:84:24:2C:C2:A2:C0:3E:FD:34:8E:5E:EA:6F:AF:52:CE:E6:0F\r
a=setup:actpass\r
a=mid:0\r
a=extmap:1 urn:ietf:params:rtp-hdrext:ssrc-audio-level\r
a=sendrecv\r
a=rtcp-mux\r
a=rtpmap:111 opus/48000/2\r
a=fmtp:111 minptime=10; useinbandfec=1\r
a=rtpmap:0 PCMU/8000\r
a=rtpmap:101 telephone-event/8000\r
a=fmtp:101 0-15\r
a=ptime:20\r
a=ssrc:3735928559 cname:4TOk42mSjXCkVIa6\r
a=ssrc:3735928559 msid:stream audio0\r
a=candidate:1 1 udp 2130706431 192.168.1.2 54400 typ host generation 0\r
m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r
c=IN IP4 0.0.0.0\r
a=mid:1\r
a=sctp-port:5000\r
";

#[test]
fn test_valid_minimal_sdp() {
    let sdp = "\
v=0\r
o=jdoe 2890844526 2890842807 IN IP4 10.47.16.5\r
s=SDP Seminar\r
c=IN IP4 224.2.17.12/127\r
t=0 0\r
m=audio 49170 RTP/AVP 0\r
";
    let result = parse_bytes(&create_test_sdp_bytes(sdp));
    assert!(result.is_ok(), "Failed to parse valid minimal SDP: {:?}", result.err());
    let session = result.unwrap();
    assert_eq!(session.version, 0);
    assert_eq!(session.session_name, "SDP Seminar");
    assert_eq!(session.origin.username, "jdoe");
    assert_eq!(session.origin.unicast_address, "10.47.16.5");
    assert_eq!(session.media.len(), 1);
    assert_eq!(session.media[0].media_type, "audio");
    assert_eq!(session.media[0].port, 49170);
    assert_eq!(format_sdp(&session), sdp);
}

#[test]
fn test_rfc_example_roundtrip() {
    let session = parse_sdp(RFC_EXAMPLE).unwrap();
    assert_eq!(session.email_address.as_deref(), Some("j.doe@example.com (Jane Doe)"));
    assert_eq!(
        session.connection.as_ref().map(|c| c.connection_address.as_str()),
        Some("224.2.17.12/127")
    );
    assert!(session.attributes.has_flag("recvonly"));

    let video = &session.media[1];
    assert_eq!(video.payload(99).and_then(|p| p.rtpmap.as_ref()).map(|r| r.rate), Some(90000));

    assert_eq!(format_sdp(&session), RFC_EXAMPLE);
}

#[test]
fn test_webrtc_offer() {
    let session = parse_sdp(WEBRTC_OFFER).unwrap();

    match session.attributes.get("group") {
        Some(AttributeValue::Scalar(Attribute::Group(group))) => {
            assert_eq!(group.semantics, "BUNDLE");
            assert_eq!(group.mids, vec!["0", "1"]);
        }
        other => panic!("unexpected group attribute: {other:?}"),
    }
    assert_eq!(
        session.attributes.get("msid-semantic").and_then(AttributeValue::as_text),
        Some(" WMS stream")
    );

    let audio = &session.media[0];
    assert_eq!(audio.formats.identifiers(), vec!["111", "0", "101"]);
    let opus = audio.payload(111).unwrap();
    assert_eq!(opus.rtpmap, Some(RtpMap::new("opus", 48000).with_params("2")));
    assert_eq!(
        opus.fmtp.as_ref().map(|f| &f.params),
        Some(&FmtpParams::Map(vec![
            ("minptime".to_string(), "10".to_string()),
            ("useinbandfec".to_string(), "1".to_string()),
        ]))
    );
    assert_eq!(audio.payload(101).and_then(|p| p.fmtp.clone()), Some(Fmtp::raw("0-15")));
    assert!(audio.attributes.has_flag("rtcp-mux"));

    let ssrcs: Vec<_> = audio.attributes.get("ssrc").unwrap().values().collect();
    assert_eq!(ssrcs.len(), 2);
    assert!(matches!(ssrcs[1], Attribute::Ssrc(ssrc) if ssrc.value.as_deref() == Some("stream audio0")));

    match audio.attributes.get("candidate") {
        Some(AttributeValue::Sequence(candidates)) => {
            assert!(matches!(&candidates[0], Attribute::Candidate(Candidate { port: 54400, .. })));
        }
        other => panic!("unexpected candidate attribute: {other:?}"),
    }

    let data = &session.media[1];
    assert_eq!(
        data.formats,
        MediaFormats::Formats(vec!["webrtc-datachannel".to_string()])
    );
    assert_eq!(data.attributes.get("sctp-port").and_then(AttributeValue::as_text), Some("5000"));
}

#[test]
fn test_webrtc_offer_canonical_output() {
    let session = parse_sdp(WEBRTC_OFFER).unwrap();
    let text = format_sdp(&session);

    // the offer is already in canonical order
    assert_eq!(text, WEBRTC_OFFER);
    assert_eq!(parse_sdp(&text).unwrap(), session);
}

#[test]
fn test_canonical_order() {
    let sdp = "\
v=0\r
o=- 1 1 IN IP4 127.0.0.1\r
s=-\r
a=tool:rvoip\r
k=prompt\r
t=0 0\r
c=IN IP4 127.0.0.1\r
b=AS:256\r
m=audio 9 RTP/AVP 0\r
a=ptime:20\r
a=rtpmap:0 PCMU/8000\r
a=mid:audio\r
a=ssrc:1 cname:x\r
a=rtcp-mux\r
";
    let expected = "\
v=0\r
o=- 1 1 IN IP4 127.0.0.1\r
s=-\r
c=IN IP4 127.0.0.1\r
b=AS:256\r
t=0 0\r
k=prompt\r
a=tool:rvoip\r
m=audio 9 RTP/AVP 0\r
a=mid:audio\r
a=rtcp-mux\r
a=rtpmap:0 PCMU/8000\r
a=ptime:20\r
a=ssrc:1 cname:x\r
";
    let session = parse_sdp(sdp).unwrap();
    assert_eq!(format_sdp(&session), expected);
}

#[test]
fn test_unlisted_media_attributes_keep_their_order() {
    let mut media = Media::new("video", 9, "RTP/AVPF", MediaFormats::Payloads(vec![Payload::new(96)]));
    media.attributes = Attributes::new()
        .with("x-b", AttributeValue::text("2"))
        .with("rtcp-fb", AttributeValue::Sequence(vec!["96 nack".into()]))
        .with("x-a", AttributeValue::text("1"));
    let session =
        SessionDescription::new(Origin::new("-", "1", "1", "127.0.0.1"), "-").with_media(media);
    assert!(format_sdp(&session).ends_with(
        "m=video 9 RTP/AVPF 96\r\na=x-b:2\r\na=rtcp-fb:96 nack\r\na=x-a:1\r\n"
    ));
}

#[test]
fn test_repeat_and_time_zones() {
    let sdp = "\
v=0\r
o=- 1 1 IN IP4 127.0.0.1\r
s=-\r
t=3034423619 3042462419\r
r=7d 1h 0 25h\r
r=604800 3600 90000\r
z=2882844526 -1h 2898848070 0\r
";
    let session = parse_sdp(sdp).unwrap();
    assert_eq!(session.repeat.len(), 2);
    assert_eq!(session.repeat[1].offsets, vec![90_000]);
    assert_eq!(session.timezones[0].offset, -3_600);

    let text = format_sdp(&session);
    assert!(text.contains("r=7d 1h 0 25h\r\nr=7d 1h 25h\r\nz=2882844526 -1h 2898848070 0\r\n"));
}

#[test]
fn test_from_str_and_display() {
    let session = SessionDescription::from_str(RFC_EXAMPLE).unwrap();
    assert_eq!(session.to_string(), RFC_EXAMPLE);

    let err = SessionDescription::from_str("v=0\r\n").unwrap_err();
    assert!(err.is_syntax());
    assert!(matches!(err, Error::Syntax(ref e) if e.line == 2));
}

#[test]
fn test_invalid_documents() {
    let cases = [
        ("", 1),
        ("s=-\r\n", 1),
        ("v=0\r\no=- 1 1 IN IP4\r\n", 2),
        ("v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nr=7d 1h\r\n", 4),
        ("v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\nm=audio x RTP/AVP 0\r\n", 5),
        ("v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\na=candidate:1 1 udp\r\n", 5),
    ];
    for (sdp, line) in cases {
        match parse_sdp(sdp) {
            Err(Error::Syntax(err)) => assert_eq!(err.line, line, "wrong line for {sdp:?}: {err}"),
            other => panic!("expected syntax error for {sdp:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_attributes_named_like_lines_and_fields() {
    let sdp = "\
v=0\r
o=- 1 1 IN IP4 127.0.0.1\r
s=-\r
t=0 0\r
a=version:1\r
a=origin:x\r
a=v:1\r
a=o\r
a=s:x\r
a=sessionName:y\r
a=m:1\r
m=audio 9 RTP/AVP 0\r
a=type:broadcast\r
a=port:7\r
a=protocol:x\r
a=formats:y\r
a=i:z\r
";
    let session = parse_sdp(sdp).unwrap();
    assert_eq!(session.attributes.len(), 7);
    assert_eq!(session.attributes.get("m"), Some(&AttributeValue::text("1")));
    assert_eq!(session.media[0].attributes.get("type"), Some(&AttributeValue::text("broadcast")));

    let text = format_sdp(&session);
    assert_eq!(text, sdp);
    assert_eq!(parse_sdp(&text).unwrap(), session);
}

#[test]
fn test_large_port_roundtrip() {
    let sdp = "v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\nm=audio 70000/2 RTP/AVP 0\r\n";
    let session = parse_sdp(sdp).unwrap();
    assert_eq!(session.media[0].port, 70_000);
    assert_eq!(session.media[0].number_of_ports, Some(2));
    assert_eq!(format_sdp(&session), sdp);
}

#[test]
fn test_values_read_back_in_canonical_form() {
    let ssrc = Attribute::Ssrc(Ssrc {
        id: 1,
        attribute: "cname".into(),
        value: Some("x".into()),
    });
    let mut media = Media::new("audio", 9, "RTP/AVP", MediaFormats::Formats(vec!["0".into()]));
    media.attributes = Attributes::new().with("ssrc", AttributeValue::Scalar(ssrc.clone()));
    let session = SessionDescription::new(Origin::new("-", "1", "1", "127.0.0.1"), "-").with_media(media);

    let text = format_sdp(&session);
    assert!(text.ends_with("m=audio 9 RTP/AVP 0\r\na=ssrc:1 cname:x\r\n"));

    let parsed = parse_sdp(&text).unwrap();
    assert_eq!(parsed.media[0].formats, MediaFormats::Payloads(vec![Payload::new(0)]));
    assert_eq!(parsed.media[0].attributes.get("ssrc"), Some(&AttributeValue::Sequence(vec![ssrc])));
    // both shapes write the same text
    assert_eq!(format_sdp(&parsed), text);
}
