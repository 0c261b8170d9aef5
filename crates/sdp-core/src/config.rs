//! Parser configuration
//!
//! Limits guard against oversized or hostile input. The defaults mirror the
//! limits used by the SIP message parser of the stack.

use serde::{Deserialize, Serialize};

/// Maximum length of a single SDP line
pub const MAX_LINE_LENGTH: usize = 4096;
/// Maximum number of lines in an SDP document
pub const MAX_LINE_COUNT: usize = 1024;
/// Maximum number of media descriptions in an SDP document
pub const MAX_MEDIA_COUNT: usize = 64;

/// Settings that control how SDP text is accepted.
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::config::ParseConfig;
///
/// let config = ParseConfig::default().with_lenient(true);
/// assert!(config.lenient);
/// assert_eq!(config.max_line_length, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseConfig {
    /// Longest accepted line, in bytes, excluding the terminator
    pub max_line_length: usize,
    /// Largest accepted number of lines
    pub max_lines: usize,
    /// Largest accepted number of `m=` sections
    pub max_media: usize,
    /// Skip blank lines and trim surrounding whitespace from every line
    pub lenient: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            max_line_length: MAX_LINE_LENGTH,
            max_lines: MAX_LINE_COUNT,
            max_media: MAX_MEDIA_COUNT,
            lenient: cfg!(feature = "lenient_parsing"),
        }
    }
}

impl ParseConfig {
    /// Returns the configuration with lenient parsing switched on or off.
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Returns the configuration with a different line length limit.
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Returns the configuration with a different media section limit.
    pub fn with_max_media(mut self, max_media: usize) -> Self {
        self.max_media = max_media;
        self
    }
}
