//! Structured SDP values
//!
//! The schema exchanged between the codec and its consumers.

pub mod attribute;
pub mod sdp;

pub use attribute::{
    Attribute, AttributeValue, Attributes, Candidate, ExtMap, Fingerprint, Group, Rtcp, RtcpFb, Ssrc,
};
pub use sdp::{
    Bandwidth, Connection, EncryptionKey, Fmtp, FmtpParams, Media, MediaFormats, Origin, Payload,
    RepeatTime, RtpMap, SessionDescription, TimeZone, Timing,
};
