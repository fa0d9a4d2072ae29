//! Error types for SML parsing, serialization, querying and binary coding.
//!
//! Every failure in this crate is reported through the single [`Error`] enum.
//! Errors are raised at the point of detection and never downgraded; callers
//! should treat any of them as "reject this input".
//!
//! ## Error Categories
//!
//! - **Construction**: a tree invariant was violated by an API call (empty
//!   attribute value list, invalid whitespace, comment containing a line feed)
//! - **Parse**: a grammar violation at a specific zero-based line index
//! - **Query**: a schema assertion or required accessor found zero, many, or
//!   wrongly named nodes, or a value failed its lexical check
//! - **Serialization**: an element name collides with the active end keyword
//! - **Binary**: missing preamble, unsupported version, or a corrupt body
//! - **Encoding / I/O**: text decoding and reader/writer failures
//!
//! ## Examples
//!
//! ```rust
//! use sml::{from_str, Error};
//!
//! let err = from_str("Root\nSub\nEnd").unwrap_err();
//! assert!(matches!(err, Error::Parse { line_index: 2, .. }));
//! assert_eq!(err.to_string(), "Element \"Root\" not closed (3)");
//! ```

use std::fmt;
use thiserror::Error;

/// The fixed set of grammar violations the text parser and line tokenizer report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    OnlyOneRootElementAllowed,
    RootElementExpected,
    InvalidRootElementStart,
    NullValueAsElementName,
    NullValueAsAttributeName,
    EndKeywordNotDetected,
    ElementNotClosed(String),
    StringNotClosed,
    InvalidStringLineBreak,
    InvalidCharacterAfterString,
    InvalidDoubleQuoteInValue,
}

impl ParseErrorKind {
    /// Returns the human-readable message for this kind.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ParseErrorKind::OnlyOneRootElementAllowed => "Only one root element allowed".into(),
            ParseErrorKind::RootElementExpected => "Root element expected".into(),
            ParseErrorKind::InvalidRootElementStart => "Invalid root element start".into(),
            ParseErrorKind::NullValueAsElementName => {
                "Null value as element name is not allowed".into()
            }
            ParseErrorKind::NullValueAsAttributeName => {
                "Null value as attribute name is not allowed".into()
            }
            ParseErrorKind::EndKeywordNotDetected => "End keyword could not be detected".into(),
            ParseErrorKind::ElementNotClosed(name) => format!("Element \"{}\" not closed", name),
            ParseErrorKind::StringNotClosed => "String not closed".into(),
            ParseErrorKind::InvalidStringLineBreak => "Invalid string line break".into(),
            ParseErrorKind::InvalidCharacterAfterString => {
                "Invalid character after string".into()
            }
            ParseErrorKind::InvalidDoubleQuoteInValue => "Invalid double quote in value".into(),
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A node or document invariant was violated by a mutating call
    #[error("{0}")]
    Construction(String),

    /// Grammar violation; `line_index` is zero-based, the message shows it one-based
    #[error("{kind} ({})", .line_index + 1)]
    Parse {
        line_index: usize,
        kind: ParseErrorKind,
    },

    /// Schema assertion, required accessor or typed getter failure
    #[error("{0}")]
    Query(String),

    /// The tree cannot be written with the active end keyword
    #[error("{0}")]
    Serialization(String),

    /// The buffer does not start with the binary SML preamble
    #[error("Document does not have a binary SML preamble")]
    NoPreamble,

    /// The preamble carries a version this crate cannot decode
    #[error("Not supported binary SML version '{0}'")]
    UnsupportedVersion(char),

    /// Missing terminator, truncated varint or payload, or trailing bytes
    #[error("Invalid binary SML")]
    InvalidBinary,

    /// Text encoding or BOM failure
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a parse error at the given zero-based line index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sml::{Error, ParseErrorKind};
    ///
    /// let err = Error::parse(0, ParseErrorKind::InvalidRootElementStart);
    /// assert_eq!(err.to_string(), "Invalid root element start (1)");
    /// ```
    pub fn parse(line_index: usize, kind: ParseErrorKind) -> Self {
        Error::Parse { line_index, kind }
    }

    /// Creates a construction error.
    pub fn construction<T: fmt::Display>(msg: T) -> Self {
        Error::Construction(msg.to_string())
    }

    /// Creates a query error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sml::Error;
    ///
    /// let err = Error::query("Element \"Root\" does not contain a \"Sub\" element");
    /// assert!(err.to_string().contains("Sub"));
    /// ```
    pub fn query<T: fmt::Display>(msg: T) -> Self {
        Error::Query(msg.to_string())
    }

    /// Creates a serialization error.
    pub fn serialization<T: fmt::Display>(msg: T) -> Self {
        Error::Serialization(msg.to_string())
    }

    /// Creates an encoding error.
    pub fn encoding<T: fmt::Display>(msg: T) -> Self {
        Error::Encoding(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the zero-based line index of a parse error.
    #[must_use]
    pub fn line_index(&self) -> Option<usize> {
        match self {
            Error::Parse { line_index, .. } => Some(*line_index),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serialization(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Construction(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_is_one_based_in_display() {
        let err = Error::parse(4, ParseErrorKind::ElementNotClosed("Root".into()));
        assert_eq!(err.to_string(), "Element \"Root\" not closed (5)");
        assert_eq!(err.line_index(), Some(4));
    }

    #[test]
    fn non_parse_errors_have_no_line() {
        assert_eq!(Error::InvalidBinary.line_index(), None);
        assert_eq!(
            Error::UnsupportedVersion('2').to_string(),
            "Not supported binary SML version '2'"
        );
    }
}
