//! Configuration options for reading and writing SML text.
//!
//! [`SmlOptions`] bundles the settings the top-level functions need:
//!
//! - whether whitespace, comments and empty lines are kept
//! - the end keyword used when writing (`None` writes `-`)
//! - the encoding used for byte output
//! - the indentation used for nodes without explicit whitespace
//!
//! ## Examples
//!
//! ```rust
//! use sml::{from_str, to_string_with_options, SmlOptions};
//!
//! let doc = from_str("Root\n  Attr 1 #c\nEnd").unwrap();
//!
//! let options = SmlOptions::new()
//!     .with_preserve(false)
//!     .with_indentation(Some("    "))
//!     .with_end_keyword(Some("Stop"));
//! assert_eq!(to_string_with_options(&doc, &options).unwrap(), "Root\n    Attr 1\nStop");
//!
//! assert_eq!(to_string_with_options(&doc, &SmlOptions::minified()).unwrap(), "Root\nAttr 1\n-");
//! ```

use crate::encoding::ReliableTxtEncoding;

/// Settings for parsing and serializing SML text.
///
/// # Examples
///
/// ```rust
/// use sml::SmlOptions;
///
/// let options = SmlOptions::new();
/// assert!(options.preserve_whitespace_and_comments);
/// assert_eq!(options.end_keyword.as_deref(), Some("End"));
/// assert_eq!(options.indentation, None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SmlOptions {
    pub preserve_whitespace_and_comments: bool,
    pub end_keyword: Option<String>,
    pub encoding: ReliableTxtEncoding,
    /// Indentation per level; `None` means a tab.
    pub indentation: Option<String>,
}

impl Default for SmlOptions {
    fn default() -> Self {
        SmlOptions {
            preserve_whitespace_and_comments: true,
            end_keyword: Some("End".to_string()),
            encoding: ReliableTxtEncoding::Utf8,
            indentation: None,
        }
    }
}

impl SmlOptions {
    /// Creates default options: preserving, end keyword `End`, UTF-8, tab indentation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the smallest re-parseable output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sml::SmlOptions;
    ///
    /// let options = SmlOptions::minified();
    /// assert!(!options.preserve_whitespace_and_comments);
    /// assert_eq!(options.end_keyword, None);
    /// assert_eq!(options.indentation.as_deref(), Some(""));
    /// ```
    #[must_use]
    pub fn minified() -> Self {
        SmlOptions {
            preserve_whitespace_and_comments: false,
            end_keyword: None,
            indentation: Some(String::new()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_preserve(mut self, preserve: bool) -> Self {
        self.preserve_whitespace_and_comments = preserve;
        self
    }

    /// Sets the end keyword written after every element; `None` writes `-`.
    #[must_use]
    pub fn with_end_keyword(mut self, end_keyword: Option<&str>) -> Self {
        self.end_keyword = end_keyword.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: ReliableTxtEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the indentation repeated once per level. It must consist of
    /// whitespace only; this is checked when the options are applied.
    #[must_use]
    pub fn with_indentation(mut self, indentation: Option<&str>) -> Self {
        self.indentation = indentation.map(str::to_string);
        self
    }
}
