//! SDP parser
//!
//! Text is split into lines and each line is classified by its type letter.
//! Value grammars are nom parsers over the text after `x=`; their failures are
//! reported as [`ValueError`]s positioned within that value, and the session
//! parser turns them into [`SyntaxError`](crate::error::SyntaxError)s carrying
//! the line and column in the document.

pub mod attribute_parser;
pub mod line_parser;
pub mod media_parser;
pub mod sdp_parser;
pub mod session_parser;
pub mod time_parser;

pub use sdp_parser::{parse_bytes, parse_sdp, parse_with_config};

/// A value grammar failure, positioned within the value text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    /// Byte offset in the value where matching stopped
    pub offset: usize,
    pub message: String,
    /// Descriptions of what would have been accepted at `offset`
    pub expected: Vec<&'static str>,
}

impl ValueError {
    pub fn new(offset: usize, message: impl Into<String>, expected: &[&'static str]) -> Self {
        ValueError {
            offset,
            message: message.into(),
            expected: expected.to_vec(),
        }
    }

    /// Moves the error right by `shift` bytes, for values nested in a larger one.
    pub fn shifted(mut self, shift: usize) -> Self {
        self.offset += shift;
        self
    }
}

/// Result of a value grammar
pub type ValueResult<T> = std::result::Result<T, ValueError>;
