//! SML documents: a root element plus the settings needed to write it back.
//!
//! A [`Document`] owns its root [`Element`], the end keyword that closes
//! elements (`None` stands for the `-` placeholder), the text encoding used
//! for byte output, an optional default indentation, and the empty or
//! comment-only lines found before and after the root.
//!
//! ## Representations
//!
//! | Form | Write | Read |
//! |------|-------|------|
//! | text | [`Document::serialize`] | [`Document::parse`] |
//! | minified text | [`Document::to_minified_string`] | [`Document::parse`] |
//! | encoded bytes | [`Document::to_bytes`] | [`Document::from_bytes`] |
//! | reliable base64 | [`Document::to_base64_string`] | [`Document::from_base64_string`] |
//! | jagged array | [`Document::to_jagged_array`] | [`Document::from_jagged_array`] |
//! | binary SML | [`Document::to_binary`] | [`Document::from_binary`] |
//!
//! ## Examples
//!
//! ```rust
//! use sml::Document;
//!
//! let text = "# settings\nConfig\n  Port 8080 #default\nend";
//! let doc = Document::parse(text, true).unwrap();
//! assert_eq!(doc.end_keyword.as_deref(), Some("end"));
//! assert_eq!(doc.empty_nodes_before.len(), 1);
//! assert_eq!(doc.serialize(true).unwrap(), text);
//! assert_eq!(doc.to_minified_string().unwrap(), "Config\nPort 8080\n-");
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::binary;
use crate::element::Element;
use crate::encoding::ReliableTxtEncoding;
use crate::error::{Error, Result};
use crate::node::EmptyNode;
use crate::parser;
use crate::serializer;
use crate::value;
use crate::wsv;

/// A parsed or constructed SML document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
    /// Keyword closing every element; `None` is written as `-`.
    pub end_keyword: Option<String>,
    pub encoding: ReliableTxtEncoding,
    default_indentation: Option<String>,
    pub empty_nodes_before: Vec<EmptyNode>,
    pub empty_nodes_after: Vec<EmptyNode>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new(Element::new("Root"))
    }
}

impl Document {
    /// Creates a document with end keyword `End` and UTF-8 encoding.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Document {
            root,
            end_keyword: Some("End".to_string()),
            encoding: ReliableTxtEncoding::Utf8,
            default_indentation: None,
            empty_nodes_before: Vec::new(),
            empty_nodes_after: Vec::new(),
        }
    }

    /// Indentation repeated once per level for nodes without explicit
    /// whitespace; `None` means a tab.
    #[must_use]
    pub fn default_indentation(&self) -> Option<&str> {
        self.default_indentation.as_deref()
    }

    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `value` contains a non-whitespace
    /// character.
    pub fn set_default_indentation(&mut self, value: Option<&str>) -> Result<()> {
        if let Some(value) = value {
            wsv::validate_whitespace(value, true)?;
        }
        self.default_indentation = value.map(str::to_string);
        Ok(())
    }

    /// Drops all decoration: empty nodes, comments and whitespace are removed,
    /// the indentation is cleared and the end keyword becomes `-`.
    pub fn minify(&mut self) {
        self.empty_nodes_before.clear();
        self.empty_nodes_after.clear();
        self.default_indentation = Some(String::new());
        self.end_keyword = None;
        self.root.minify();
    }

    /// Serializes the document to text.
    ///
    /// Without `preserve_whitespace_and_comments` the surrounding empty
    /// nodes, all comments and all explicit whitespace are left out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if an element is named like the end
    /// keyword.
    pub fn serialize(&self, preserve_whitespace_and_comments: bool) -> Result<String> {
        serializer::document_to_string(self, preserve_whitespace_and_comments)
    }

    /// Serializes the root without indentation, comments or empty lines,
    /// using `-` as end keyword.
    ///
    /// # Errors
    ///
    /// See [`Element::to_minified_string`].
    pub fn to_minified_string(&self) -> Result<String> {
        self.root.to_minified_string()
    }

    /// Serializes and encodes the document, BOM included.
    ///
    /// # Errors
    ///
    /// Propagates serialization errors.
    pub fn to_bytes(&self, preserve_whitespace_and_comments: bool) -> Result<Vec<u8>> {
        let text = self.serialize(preserve_whitespace_and_comments)?;
        Ok(self.encoding.encode(&text))
    }

    /// Detects the encoding from the BOM, decodes and parses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for a missing BOM or malformed text, and
    /// parse errors otherwise.
    pub fn from_bytes(bytes: &[u8], preserve_whitespace_and_comments: bool) -> Result<Self> {
        let (text, encoding) = ReliableTxtEncoding::decode(bytes)?;
        let mut document = Self::parse(&text, preserve_whitespace_and_comments)?;
        document.encoding = encoding;
        Ok(document)
    }

    /// Encodes the document bytes as `Base64|...|`.
    ///
    /// # Errors
    ///
    /// Propagates serialization errors.
    pub fn to_base64_string(&self, preserve_whitespace_and_comments: bool) -> Result<String> {
        Ok(value::encode_base64(&self.to_bytes(preserve_whitespace_and_comments)?))
    }

    /// Reverses [`Document::to_base64_string`], preserving whitespace and comments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for malformed base64, then as
    /// [`Document::from_bytes`].
    pub fn from_base64_string(text: &str) -> Result<Self> {
        let bytes = value::decode_base64(text)
            .ok_or_else(|| Error::encoding("Invalid Base64 string"))?;
        Self::from_bytes(&bytes, true)
    }

    /// Parses SML text. The end keyword is inferred from the last lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on any grammar violation.
    pub fn parse(content: &str, preserve_whitespace_and_comments: bool) -> Result<Self> {
        if preserve_whitespace_and_comments {
            parser::parse_document(content)
        } else {
            parser::parse_document_non_preserving(content)
        }
    }

    /// Exports the non-preserving form as one value list per line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if an element is named like the end
    /// keyword.
    pub fn to_jagged_array(&self) -> Result<Vec<Vec<Option<String>>>> {
        serializer::jagged_array(&self.root, self.end_keyword.as_deref())
    }

    /// Builds a document from one value list per line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sml::Document;
    ///
    /// let rows = vec![
    ///     vec![Some("Root".to_string())],
    ///     vec![Some("Attribute".to_string()), Some("1".to_string()), Some("2".to_string())],
    ///     vec![Some("End".to_string())],
    /// ];
    /// let doc = Document::from_jagged_array(&rows).unwrap();
    /// assert_eq!(doc, Document::parse("Root\nAttribute 1 2\nEnd", false).unwrap());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the row index on a grammar violation.
    pub fn from_jagged_array(rows: &[Vec<Option<String>>]) -> Result<Self> {
        parser::parse_jagged_array(rows)
    }

    /// Encodes the root as binary SML.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for symmetry with the decoder.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(binary::encode(self))
    }

    /// Decodes binary SML. The result uses the end keyword `End`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPreamble`], [`Error::UnsupportedVersion`] or
    /// [`Error::InvalidBinary`].
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        binary::decode(bytes)
    }
}

impl std::str::FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, true)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_jagged_array()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<Option<String>>>::deserialize(deserializer)?;
        Document::from_jagged_array(&rows).map_err(D::Error::custom)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_jagged_array(false)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Document::deserialize(deserializer).map(|document| document.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let doc = Document::default();
        assert_eq!(doc.root.name(), "Root");
        assert_eq!(doc.end_keyword.as_deref(), Some("End"));
        assert_eq!(doc.encoding, ReliableTxtEncoding::Utf8);
        assert_eq!(doc.default_indentation(), None);
        assert_eq!(doc.serialize(true).unwrap(), "Root\nEnd");
    }

    #[test]
    fn test_default_indentation() {
        let mut doc = Document::default();
        doc.root.add_attribute("A", vec![Some("1".into())]).unwrap();
        doc.set_default_indentation(Some("  ")).unwrap();
        assert_eq!(doc.serialize(true).unwrap(), "Root\n  A 1\nEnd");
        assert!(doc.set_default_indentation(Some("x")).is_err());
        assert_eq!(doc.default_indentation(), Some("  "));
        doc.set_default_indentation(Some("")).unwrap();
        assert_eq!(doc.serialize(true).unwrap(), "Root\nA 1\nEnd");
    }

    #[test]
    fn test_minify() {
        let mut doc = Document::parse("#a\nRoot #c\n\tSub\n\tEnd\nEnd #c\n", true).unwrap();
        doc.minify();
        assert_eq!(doc.serialize(true).unwrap(), "Root\nSub\n-\n-");
        let once = doc.clone();
        doc.minify();
        assert_eq!(doc, once);
    }

    #[test]
    fn test_non_preserving_skips_outer_empty_nodes() {
        let doc = Document::parse("\nRoot #c\nEnd\n", true).unwrap();
        assert_eq!(doc.empty_nodes_before.len(), 1);
        assert_eq!(doc.empty_nodes_after.len(), 1);
        assert_eq!(doc.serialize(false).unwrap(), "Root\nEnd");
    }

    #[test]
    fn test_bytes_and_base64() {
        let mut doc = Document::parse("A\nEnd", true).unwrap();
        doc.minify();
        assert_eq!(doc.to_bytes(true).unwrap(), vec![0xEF, 0xBB, 0xBF, 0x41, 0x0A, 0x2D]);
        doc.encoding = ReliableTxtEncoding::Utf16;
        let restored = Document::from_bytes(&doc.to_bytes(true).unwrap(), true).unwrap();
        assert_eq!(restored.encoding, ReliableTxtEncoding::Utf16);
        assert_eq!(restored.root.name(), "A");

        let base64 = doc.to_base64_string(true).unwrap();
        assert!(base64.starts_with("Base64|"));
        let restored = Document::from_base64_string(&base64).unwrap();
        assert_eq!(restored.encoding, ReliableTxtEncoding::Utf16);
        assert!(matches!(
            Document::from_base64_string("Base64|!!|"),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_jagged_array_round_trip() {
        let doc = Document::parse("Root\n  Attr 1 -\n  Sub\n  End\nEnd", true).unwrap();
        let rows = doc.to_jagged_array().unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Some("Root".to_string())],
                vec![Some("Attr".to_string()), Some("1".to_string()), None],
                vec![Some("Sub".to_string())],
                vec![Some("End".to_string())],
                vec![Some("End".to_string())],
            ]
        );
        let restored = Document::from_jagged_array(&rows).unwrap();
        assert_eq!(restored.serialize(false).unwrap(), doc.serialize(false).unwrap());
    }
}
