//! SDP (RFC 4566) codec for rvoip
//!
//! This crate converts Session Description Protocol text into a structured
//! [`SessionDescription`] and formats that value back into canonical SDP:
//! CRLF terminators, a fixed line order and no blank lines.
//!
//! ```
//! use rvoip_sdp_core::prelude::*;
//!
//! let session = SessionDescription::new(Origin::new("-", "20518", "0", "203.0.113.1"), "-")
//!     .with_media(Media::new(
//!         "audio",
//!         49170,
//!         "RTP/AVP",
//!         MediaFormats::Payloads(vec![Payload::new(0).with_rtpmap(RtpMap::new("PCMU", 8000))]),
//!     ));
//!
//! let text = format(&session);
//! assert!(text.ends_with("m=audio 49170 RTP/AVP 0\r\na=rtpmap:0 PCMU/8000\r\n"));
//! assert_eq!(parse(&text).unwrap(), session);
//! ```

// Declare modules
pub mod config;
pub mod error;
pub mod sdp;
pub mod types;

pub use config::ParseConfig;
pub use error::{Error, Result, SyntaxError};
pub use sdp::{format_sdp as format, parse_bytes, parse_sdp as parse, parse_with_config};
pub use types::{
    Attribute, AttributeValue, Attributes, Bandwidth, Connection, EncryptionKey, Fmtp, FmtpParams, Media,
    MediaFormats, Origin, Payload, RepeatTime, RtpMap, SessionDescription, TimeZone, Timing,
};

/// Re-export of common types and functions
pub mod prelude {
    pub use crate::config::ParseConfig;
    pub use crate::error::{Error, Result, SyntaxError};
    pub use crate::sdp::duration;
    pub use crate::sdp::{format_sdp as format, parse_sdp as parse, parse_with_config};
    pub use crate::types::*;
}
