//! # sml
//!
//! A reader and writer for SML (Simple Markup Language), a line-based
//! markup format where every element is closed by an end keyword.
//!
//! ## What is SML?
//!
//! SML describes a tree of elements and attributes. An element is a line
//! with a single value (its name), an attribute is a line with a name
//! followed by one or more values, and a line holding only the end keyword
//! closes the innermost element. Indentation carries no meaning, so it is
//! free to be anything, and a preserving parse reproduces the input exactly.
//!
//! ```text
//! Configuration
//!   Video
//!     Resolution 1280 720
//!     RefreshRate 60
//!   End
//! End
//! ```
//!
//! ## Key Features
//!
//! - **Lossless**: whitespace, comments and empty lines survive a round trip
//! - **End keyword inference**: the closing keyword is read from the last line
//! - **Schema helpers**: `assure_*` checks and typed `get_*`/`as_*` accessors
//! - **Binary SML**: a compact varint encoding of the same tree
//! - **Streaming**: node-at-a-time readers (sync and async) and writers
//!
//! ## Quick Start
//!
//! ```rust
//! use sml::{from_str, to_string};
//!
//! let text = "Configuration\n  Video\n    Resolution 1280 720\n  End\nEnd";
//! let doc = from_str(text).unwrap();
//!
//! let video = doc.root.element("Video").unwrap();
//! let resolution = video.attribute("Resolution").unwrap();
//! assert_eq!(resolution.get_int_array(0).unwrap(), vec![1280, 720]);
//!
//! assert_eq!(to_string(&doc).unwrap(), text);
//! ```
//!
//! ### Building Documents
//!
//! ```rust
//! use sml::{sml, Document};
//!
//! let mut doc = Document::new(sml!("Settings" {
//!     "Volume" => [0.8],
//!     "Player" { "Name" => ["Hero 1"] },
//! }));
//! doc.root.add_attribute("Muted", vec![Some("false".into())]).unwrap();
//!
//! assert_eq!(
//!     doc.serialize(false).unwrap(),
//!     "Settings\n\tVolume 0.8\n\tPlayer\n\t\tName \"Hero 1\"\n\tEnd\n\tMuted false\nEnd"
//! );
//! ```
//!
//! ### Binary SML
//!
//! ```rust
//! use sml::{from_binary, from_str, to_binary};
//!
//! let doc = from_str("Root\n  A 1 -\nEnd").unwrap();
//! let bytes = to_binary(&doc).unwrap();
//! assert_eq!(bytes, b"BSML1\x0aRoot\x03A\x031\x01\x00");
//!
//! let decoded = from_binary(&bytes).unwrap();
//! assert_eq!(decoded.root.attribute("A").unwrap().values(), vec![Some("1".to_string()), None]);
//! ```
//!
//! ## Modules
//!
//! - [`document`], [`element`], [`attribute`], [`node`]: the tree model
//! - [`parser`], [`line_source`]: text to tree, from strings, arrays and readers
//! - [`binary`], [`varint`]: the binary format
//! - [`io`]: streaming readers and writers
//! - [`wsv`], [`value`], [`encoding`]: line tokenizing, value formats and BOMs
//! - [`format`]: grammar and layout reference
//!
//! Run a demo with: `cargo run --example <simple|binary|streaming>`

pub mod attribute;
pub mod binary;
pub mod document;
pub mod element;
pub mod encoding;
pub mod error;
pub mod format;
pub mod io;
pub mod line_source;
pub mod macros;
pub mod node;
pub mod options;
pub mod parser;
mod serializer;
pub mod value;
pub mod varint;
pub mod wsv;

pub use attribute::Attribute;
pub use document::Document;
pub use element::Element;
pub use encoding::ReliableTxtEncoding;
pub use error::{Error, ParseErrorKind, Result};
pub use node::{EmptyNode, Node};
pub use options::SmlOptions;

use std::io::{Read, Write};

/// Parses SML text, keeping whitespace, comments and empty lines.
///
/// # Examples
///
/// ```rust
/// use sml::from_str;
///
/// let doc = from_str("Root\n  Name Alice #user\nend").unwrap();
/// assert_eq!(doc.end_keyword.as_deref(), Some("end"));
/// assert_eq!(doc.root.attribute("Name").unwrap().comment(), Some("user"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input.
pub fn from_str(text: &str) -> Result<Document> {
    from_str_with_options(text, &SmlOptions::default())
}

/// Parses SML text with custom options.
///
/// Only `preserve_whitespace_and_comments` affects reading; the end keyword
/// is always detected from the text.
///
/// # Examples
///
/// ```rust
/// use sml::{from_str_with_options, SmlOptions};
///
/// let options = SmlOptions::new().with_preserve(false);
/// let doc = from_str_with_options("# c\nRoot #x\nEnd", &options).unwrap();
/// assert!(doc.empty_nodes_before.is_empty());
/// assert_eq!(doc.root.comment(), None);
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input.
pub fn from_str_with_options(text: &str, options: &SmlOptions) -> Result<Document> {
    Document::parse(text, options.preserve_whitespace_and_comments)
}

/// Decodes bytes starting with a BOM and parses them.
///
/// # Errors
///
/// Returns [`Error::Encoding`] for a missing BOM or invalid code units, or a
/// parse error.
pub fn from_slice(bytes: &[u8]) -> Result<Document> {
    Document::from_bytes(bytes, true)
}

/// Reads all bytes from `reader` and parses them as in [`from_slice`].
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as [`from_slice`].
pub fn from_reader<R: Read>(mut reader: R) -> Result<Document> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_slice(&bytes)
}

/// Rebuilds a document from one value list per line.
///
/// # Examples
///
/// ```rust
/// use sml::from_jagged_array;
///
/// let rows = vec![
///     vec![Some("Root".to_string())],
///     vec![Some("A".to_string()), None],
///     vec![None],
/// ];
/// let doc = from_jagged_array(&rows).unwrap();
/// assert_eq!(doc.end_keyword, None);
/// assert!(doc.root.attribute("A").unwrap().is_null_value());
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed rows.
pub fn from_jagged_array(rows: &[Vec<Option<String>>]) -> Result<Document> {
    Document::from_jagged_array(rows)
}

/// Decodes binary SML.
///
/// # Errors
///
/// Returns [`Error::NoPreamble`], [`Error::UnsupportedVersion`] or
/// [`Error::InvalidBinary`].
pub fn from_binary(bytes: &[u8]) -> Result<Document> {
    binary::decode(bytes)
}

/// Serializes a document, keeping its whitespace, comments and empty lines.
///
/// # Examples
///
/// ```rust
/// use sml::{to_string, Document, Element};
///
/// let mut root = Element::new("Root");
/// root.add_element("Sub");
/// assert_eq!(to_string(&Document::new(root)).unwrap(), "Root\n\tSub\n\tEnd\nEnd");
/// ```
///
/// # Errors
///
/// Returns [`Error::Serialization`] if an element is named like the end keyword.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(document: &Document) -> Result<String> {
    document.serialize(true)
}

fn apply_options(document: &Document, options: &SmlOptions) -> Result<Document> {
    let mut document = document.clone();
    document.end_keyword = options.end_keyword.clone();
    document.encoding = options.encoding;
    document.set_default_indentation(options.indentation.as_deref())?;
    Ok(document)
}

/// Serializes a document with custom options.
///
/// The options' end keyword and indentation replace the document's own.
///
/// # Examples
///
/// ```rust
/// use sml::{from_str, to_string_with_options, SmlOptions};
///
/// let doc = from_str("Root\n\tA 1\nEnd").unwrap();
/// let options = SmlOptions::new().with_end_keyword(Some("Fin"));
/// assert_eq!(to_string_with_options(&doc, &options).unwrap(), "Root\n\tA 1\nFin");
/// ```
///
/// # Errors
///
/// Returns [`Error::Construction`] for a non-whitespace indentation and
/// [`Error::Serialization`] if an element is named like the end keyword.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(document: &Document, options: &SmlOptions) -> Result<String> {
    apply_options(document, options)?.serialize(options.preserve_whitespace_and_comments)
}

/// Serializes and encodes a document using the options' encoding, BOM included.
///
/// # Errors
///
/// As [`to_string_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(document: &Document, options: &SmlOptions) -> Result<Vec<u8>> {
    apply_options(document, options)?.to_bytes(options.preserve_whitespace_and_comments)
}

/// Writes the encoded document to `writer`.
///
/// # Errors
///
/// As [`to_vec`], plus [`Error::Io`] if writing fails.
pub fn to_writer<W: Write>(mut writer: W, document: &Document, options: &SmlOptions) -> Result<()> {
    let bytes = to_vec(document, options)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Encodes a document as binary SML. Decoration is not stored.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for size limits.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_binary(document: &Document) -> Result<Vec<u8>> {
    document.to_binary()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserving() {
        let text = "\n# head\nRoot #r\n  A  1   2 # c\n\n  Sub\n  end #e\nend\n";
        let doc = from_str(text).unwrap();
        assert_eq!(to_string(&doc).unwrap(), text);
    }

    #[test]
    fn test_to_string_with_options_minified() {
        let doc = from_str("Root\n  A 1 #c\n  Sub\n  End\nEnd").unwrap();
        assert_eq!(
            to_string_with_options(&doc, &SmlOptions::minified()).unwrap(),
            "Root\nA 1\nSub\n-\n-"
        );
    }

    #[test]
    fn test_invalid_indentation_option() {
        let doc = Document::default();
        let options = SmlOptions::new().with_indentation(Some("x"));
        assert!(matches!(
            to_string_with_options(&doc, &options),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn test_bytes_round_trip() {
        let doc = from_str("Root\n  Name \"Ünïcode 😀\"\nEnd").unwrap();
        let options = SmlOptions::new().with_encoding(ReliableTxtEncoding::Utf32);
        let mut out = Vec::new();
        to_writer(&mut out, &doc, &options).unwrap();
        let back = from_reader(&out[..]).unwrap();
        assert_eq!(back.encoding, ReliableTxtEncoding::Utf32);
        assert_eq!(back.root, doc.root);
    }

    #[test]
    fn test_binary_functions() {
        let doc = Document::parse("Root\nA 1\nEnd", false).unwrap();
        let back = from_binary(&to_binary(&doc).unwrap()).unwrap();
        assert_eq!(back.root, doc.root);
    }
}
