use std::fmt;
use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Position and expectation details of a grammar failure.
///
/// Lines and columns are 1-based. The column points at the first character
/// of the line that the grammar could not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable description of the failure
    pub message: String,
    /// Line number in the input document
    pub line: usize,
    /// Column within the offending line
    pub column: usize,
    /// Descriptions of the tokens the grammar would have accepted
    pub expected: Vec<String>,
}

impl SyntaxError {
    /// Creates a syntax error without expectation details.
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        SyntaxError {
            message: message.into(),
            line,
            column,
            expected: Vec::new(),
        }
    }

    /// Adds the descriptions of the tokens that were expected at the failure point.
    pub fn expecting<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected.extend(expected.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)?;
        if !self.expected.is_empty() {
            write!(f, " (expected {})", self.expected.join(" or "))?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Errors that can occur while decoding or encoding SDP
#[derive(Error, Debug)]
pub enum Error {
    /// The input text does not conform to the SDP grammar
    #[error("SDP syntax error at {0}")]
    Syntax(SyntaxError),

    /// A duration literal could not be decoded
    #[error("Invalid duration: {0}")]
    Duration(String),

    /// A configured parser limit was exceeded
    #[error("SDP {what} exceeds the configured limit of {limit}")]
    LimitExceeded { what: &'static str, limit: usize },

    /// Conversion between the structured value and JSON failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true when this is a grammar failure.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    /// Returns the syntax error details, if this is a grammar failure.
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Syntax(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new("invalid origin", 2, 3).expecting(["<username>", "<sess-id>"]);
        assert_eq!(
            err.to_string(),
            "line 2, column 3: invalid origin (expected <username> or <sess-id>)"
        );

        let err: Error = err.into();
        assert!(err.is_syntax());
        assert_eq!(err.syntax().map(|e| e.line), Some(2));
    }

    #[test]
    fn test_non_syntax_errors() {
        let err = Error::LimitExceeded { what: "line count", limit: 10 };
        assert!(!err.is_syntax());
        assert!(err.syntax().is_none());
        assert_eq!(err.to_string(), "SDP line count exceeds the configured limit of 10");
    }
}
