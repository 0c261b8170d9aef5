//! SDP text codec
//!
//! Converts between SDP text and [`SessionDescription`](crate::types::SessionDescription).
//! Both directions share the property registry and the duration codec, so
//! a parsed value formats back to equivalent text in canonical order.
//!
//! # Example
//!
//! ```
//! use rvoip_sdp_core::sdp::{format_sdp, parse_sdp};
//!
//! let text = "v=0\r\n\
//!             o=- 20518 0 IN IP4 203.0.113.1\r\n\
//!             s=-\r\n\
//!             t=0 0\r\n\
//!             a=ice-ufrag:F7gI\r\n\
//!             m=audio 54400 RTP/SAVPF 0\r\n\
//!             a=rtcp-mux\r\n\
//!             a=rtpmap:0 PCMU/8000\r\n";
//!
//! let session = parse_sdp(text).unwrap();
//! assert_eq!(format_sdp(&session), text);
//! ```

pub mod duration;
pub mod formatter;
pub mod ordering;
pub mod parser;
pub mod properties;
pub mod registry;

#[cfg(test)]
mod tests;

pub use formatter::format_sdp;
pub use parser::{parse_bytes, parse_sdp, parse_with_config};
