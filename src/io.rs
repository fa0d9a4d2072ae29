//! Streaming reading and writing of SML documents.
//!
//! [`SmlStreamReader`] parses the root line eagerly and then hands out the
//! root's children one at a time, so a large document never has to be held
//! in memory. [`SmlStreamWriter`] is the mirror image: it writes the root
//! line on construction, appends nodes as they are produced, and writes the
//! closing end keyword on [`SmlStreamWriter::close`].
//!
//! ## Examples
//!
//! ```rust
//! use sml::io::{SmlStreamReader, SmlStreamWriter};
//! use sml::{Attribute, Document};
//!
//! let mut writer = SmlStreamWriter::new(&Document::default(), Vec::new(), true).unwrap();
//! writer.write_node(Attribute::with_string("Name", "a")).unwrap();
//! writer.write_node(Attribute::with_string("Name", "b")).unwrap();
//! let bytes = writer.close().unwrap();
//! assert_eq!(bytes, b"\xEF\xBB\xBFRoot\n\tName a\n\tName b\nEnd");
//!
//! let mut reader = SmlStreamReader::from_reader(&bytes[..], Some("End"), true).unwrap();
//! assert_eq!(reader.root().name(), "Root");
//! let names: Vec<String> = reader
//!     .by_ref()
//!     .map(|node| node.unwrap().as_attribute().unwrap().get_string(0).unwrap().to_string())
//!     .collect();
//! assert_eq!(names, ["a", "b"]);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tokio::io::AsyncBufRead;

use crate::document::Document;
use crate::element::Element;
use crate::encoding::ReliableTxtEncoding;
use crate::error::Result;
use crate::line_source::{AsyncLineSource, AsyncReaderLines, LineSource, ReaderLines};
use crate::node::{EmptyNode, Node};
use crate::parser;
use crate::serializer::{self, LineStyle};
use crate::wsv;

/// Pulls the root's children from a line source one node at a time.
#[derive(Debug)]
pub struct SmlStreamReader<S> {
    source: S,
    root: Element,
    empty_nodes_before: Vec<EmptyNode>,
    preserve: bool,
    done: bool,
}

impl<S: LineSource> SmlStreamReader<S> {
    /// Reads up to and including the root line.
    ///
    /// # Errors
    ///
    /// Returns the parse errors of [`parser::read_root_element`].
    pub fn new(mut source: S, preserve_whitespace_and_comments: bool) -> Result<Self> {
        let mut empty_nodes_before = Vec::new();
        let root = parser::read_root_element(
            &mut source,
            &mut empty_nodes_before,
            preserve_whitespace_and_comments,
        )?;
        Ok(SmlStreamReader {
            source,
            root,
            empty_nodes_before,
            preserve: preserve_whitespace_and_comments,
            done: false,
        })
    }

    /// The root element. Its children are not collected; once the stream is
    /// exhausted it carries the decoration of the closing line.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    #[must_use]
    pub fn empty_nodes_before(&self) -> &[EmptyNode] {
        &self.empty_nodes_before
    }

    /// Reads the next child of the root, or `None` after the root's end line.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed input or an unclosed root.
    pub fn read_node(&mut self) -> Result<Option<Node>> {
        if self.done {
            return Ok(None);
        }
        let node = parser::read_node(&mut self.source, &mut self.root, self.preserve)?;
        self.done = node.is_none();
        Ok(node)
    }

    /// Returns the wrapped line source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<R: BufRead> SmlStreamReader<ReaderLines<R>> {
    /// Streams from a blocking reader with a known end keyword.
    ///
    /// # Errors
    ///
    /// As [`SmlStreamReader::new`].
    pub fn from_reader(
        reader: R,
        end_keyword: Option<&str>,
        preserve_whitespace_and_comments: bool,
    ) -> Result<Self> {
        Self::new(ReaderLines::new(reader, end_keyword), preserve_whitespace_and_comments)
    }
}

impl SmlStreamReader<ReaderLines<BufReader<File>>> {
    /// Opens a UTF-8 file whose elements are closed by `End`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be opened,
    /// otherwise as [`SmlStreamReader::new`].
    pub fn open<P: AsRef<Path>>(path: P, preserve_whitespace_and_comments: bool) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), Some("End"), preserve_whitespace_and_comments)
    }
}

impl<S: LineSource> Iterator for SmlStreamReader<S> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_node() {
            Ok(node) => node.map(Ok),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Async counterpart of [`SmlStreamReader`]; suspends only while a line is
/// being fetched.
#[derive(Debug)]
pub struct AsyncSmlStreamReader<S> {
    source: S,
    root: Element,
    empty_nodes_before: Vec<EmptyNode>,
    preserve: bool,
    done: bool,
}

impl<S: AsyncLineSource> AsyncSmlStreamReader<S> {
    /// # Errors
    ///
    /// As [`SmlStreamReader::new`].
    pub async fn new(mut source: S, preserve_whitespace_and_comments: bool) -> Result<Self> {
        let mut empty_nodes_before = Vec::new();
        let root = parser::read_root_element_async(
            &mut source,
            &mut empty_nodes_before,
            preserve_whitespace_and_comments,
        )
        .await?;
        Ok(AsyncSmlStreamReader {
            source,
            root,
            empty_nodes_before,
            preserve: preserve_whitespace_and_comments,
            done: false,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    #[must_use]
    pub fn empty_nodes_before(&self) -> &[EmptyNode] {
        &self.empty_nodes_before
    }

    /// # Errors
    ///
    /// As [`SmlStreamReader::read_node`].
    pub async fn read_node(&mut self) -> Result<Option<Node>> {
        if self.done {
            return Ok(None);
        }
        let node = parser::read_node_async(&mut self.source, &mut self.root, self.preserve).await;
        self.done = !matches!(node, Ok(Some(_)));
        node
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<R: AsyncBufRead + Unpin> AsyncSmlStreamReader<AsyncReaderLines<R>> {
    /// # Errors
    ///
    /// As [`SmlStreamReader::new`].
    pub async fn from_reader(
        reader: R,
        end_keyword: Option<&str>,
        preserve_whitespace_and_comments: bool,
    ) -> Result<Self> {
        Self::new(AsyncReaderLines::new(reader, end_keyword), preserve_whitespace_and_comments)
            .await
    }
}

/// Writes a document incrementally.
///
/// The root line is written by [`SmlStreamWriter::new`]; the root's end line
/// only by [`SmlStreamWriter::close`]. A writer dropped without `close`
/// writes the end line on a best-effort basis and ignores failures.
#[derive(Debug)]
pub struct SmlStreamWriter<W: Write> {
    writer: Option<W>,
    encoding: ReliableTxtEncoding,
    end_keyword: Option<String>,
    default_indentation: Option<String>,
    preserve: bool,
    buffer: Vec<u8>,
}

impl<W: Write> SmlStreamWriter<W> {
    /// Writes the BOM of the template's encoding and its root line.
    ///
    /// Only the template's end keyword, default indentation, encoding and
    /// root name (plus root decoration when preserving) are used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if the
    /// root is named like the end keyword, or [`Error::Io`](crate::Error::Io)
    /// on write failure.
    pub fn new(
        template: &Document,
        mut writer: W,
        preserve_whitespace_and_comments: bool,
    ) -> Result<Self> {
        let root = &template.root;
        if let Some(keyword) = template.end_keyword.as_deref() {
            if root.has_name(keyword) {
                return Err(crate::Error::serialization(format!(
                    "Element name matches the end keyword \"{}\"",
                    keyword
                )));
            }
        }
        let line = if preserve_whitespace_and_comments {
            let whitespaces = root.whitespaces().unwrap_or_default();
            wsv::serialize_line(&[Some(root.name())], &whitespaces, root.comment())
        } else {
            wsv::serialize_value(Some(root.name()))
        };

        let mut buffer = template.encoding.preamble().to_vec();
        template.encoding.encode_into(&line, &mut buffer);
        writer.write_all(&buffer)?;
        buffer.clear();

        Ok(SmlStreamWriter {
            writer: Some(writer),
            encoding: template.encoding,
            end_keyword: template.end_keyword.clone(),
            default_indentation: template.default_indentation().map(str::to_string),
            preserve: preserve_whitespace_and_comments,
            buffer,
        })
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.buffer.clear();
        self.encoding.encode_into(text, &mut self.buffer);
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(&self.buffer)?;
        }
        Ok(())
    }

    /// Appends one child of the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if an
    /// element is named like the end keyword, or an I/O error.
    pub fn write_node(&mut self, node: impl Into<Node>) -> Result<()> {
        let node = node.into();
        let style = LineStyle {
            default_indentation: self.default_indentation.as_deref(),
            end_keyword: self.end_keyword.as_deref(),
            preserve: self.preserve,
        };
        let mut lines = Vec::new();
        serializer::write_node(&node, &mut lines, 1, &style)?;
        let mut text = String::new();
        for line in &lines {
            text.push('\n');
            text.push_str(line);
        }
        self.write_text(&text)
    }

    /// # Errors
    ///
    /// Stops at the first failing node, see [`SmlStreamWriter::write_node`].
    pub fn write_nodes<I>(&mut self, nodes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        for node in nodes {
            self.write_node(node)?;
        }
        Ok(())
    }

    fn end_line(&self) -> String {
        format!("\n{}", wsv::serialize_value(self.end_keyword.as_deref()))
    }

    /// Writes the root's end line, flushes and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) on write or flush failure.
    pub fn close(mut self) -> Result<W> {
        let end = self.end_line();
        self.write_text(&end)?;
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| crate::Error::io("Stream writer already closed"))?;
        writer.flush()?;
        tracing::debug!("Closed SML stream writer");
        Ok(writer)
    }
}

impl SmlStreamWriter<BufWriter<File>> {
    /// Creates or truncates `path` and writes the template's root line.
    ///
    /// # Errors
    ///
    /// As [`SmlStreamWriter::new`].
    pub fn create<P: AsRef<Path>>(
        template: &Document,
        path: P,
        preserve_whitespace_and_comments: bool,
    ) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(template, BufWriter::new(file), preserve_whitespace_and_comments)
    }
}

impl<W: Write> Drop for SmlStreamWriter<W> {
    fn drop(&mut self) {
        if self.writer.is_some() {
            let end = self.end_line();
            let _ = self.write_text(&end);
            if let Some(writer) = self.writer.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::line_source::TextLines;

    #[test]
    fn test_reader_yields_children_then_none() {
        let text = "Root\n  A 1\n  Sub\n    B 2\n  End\nEnd";
        let mut reader = SmlStreamReader::new(TextLines::new(text).unwrap(), false).unwrap();
        assert!(reader.read_node().unwrap().unwrap().is_attribute_with_name("A"));
        let sub = reader.read_node().unwrap().unwrap();
        assert_eq!(sub.as_element().unwrap().nodes().len(), 1);
        assert!(reader.read_node().unwrap().is_none());
        assert!(reader.read_node().unwrap().is_none());
    }

    #[test]
    fn test_reader_keeps_empty_nodes_before() {
        let text = "# header\n\nRoot\nEnd";
        let reader = SmlStreamReader::from_reader(text.as_bytes(), Some("End"), true).unwrap();
        assert_eq!(reader.empty_nodes_before().len(), 2);
        assert_eq!(reader.empty_nodes_before()[0].comment(), Some(" header"));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut reader = SmlStreamReader::from_reader(&b"Root\nA 1\n"[..], Some("End"), false).unwrap();
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_writer_uses_template_settings() {
        let mut template = Document::new(Element::new("Config"));
        template.end_keyword = None;
        template.set_default_indentation(Some("  ")).unwrap();
        let mut writer = SmlStreamWriter::new(&template, Vec::new(), false).unwrap();
        let mut sub = Element::new("Sub");
        sub.add_node(Attribute::with_string("Key", "v"));
        writer.write_node(sub).unwrap();
        let bytes = writer.close().unwrap();
        assert_eq!(bytes, "\u{feff}Config\n  Sub\n    Key v\n  -\n-".as_bytes());
    }

    #[test]
    fn test_writer_rejects_end_keyword_name() {
        let mut writer = SmlStreamWriter::new(&Document::default(), Vec::new(), false).unwrap();
        assert!(writer.write_node(Element::new("end")).is_err());
        assert!(SmlStreamWriter::new(&Document::new(Element::new("End")), Vec::new(), false).is_err());
    }

    #[test]
    fn test_drop_writes_end_line() {
        let mut out = Vec::new();
        {
            let mut writer = SmlStreamWriter::new(&Document::default(), &mut out, false).unwrap();
            writer.write_node(Attribute::with_string("A", "1")).unwrap();
        }
        assert_eq!(out, "\u{feff}Root\n\tA 1\nEnd".as_bytes());
    }

    #[test]
    fn test_writer_encodes_utf16() {
        let mut template = Document::default();
        template.encoding = ReliableTxtEncoding::Utf16;
        let writer = SmlStreamWriter::new(&template, Vec::new(), false).unwrap();
        let bytes = writer.close().unwrap();
        let (text, encoding) = ReliableTxtEncoding::decode(&bytes).unwrap();
        assert_eq!(encoding, ReliableTxtEncoding::Utf16);
        assert_eq!(text, "Root\nEnd");
    }

    #[tokio::test]
    async fn test_async_reader() {
        let text: &[u8] = b"Root\n  A 1\n  B 2\nEnd\n";
        let mut reader = AsyncSmlStreamReader::from_reader(text, Some("End"), false)
            .await
            .unwrap();
        assert_eq!(reader.root().name(), "Root");
        let mut names = Vec::new();
        while let Some(node) = reader.read_node().await.unwrap() {
            names.push(node.name().unwrap().to_string());
        }
        assert_eq!(names, ["A", "B"]);
    }
}
