//! Pull-based sources of tokenized lines.
//!
//! The parser never touches text or readers directly; it asks a line source
//! for the next [`WsvLine`]. Buffered sources ([`TextLines`],
//! [`JaggedLines`]) can scan backwards and therefore infer the end keyword
//! themselves. Forward-only sources ([`ReaderLines`], [`AsyncReaderLines`])
//! are given the end keyword up front.
//!
//! ```rust
//! use sml::line_source::{LineSource, TextLines};
//!
//! let mut lines = TextLines::new("Root\n\n  Attr 1\nEnd").unwrap();
//! assert_eq!(lines.end_keyword(), Some("End"));
//! assert!(!lines.is_empty_line());
//! lines.next_line().unwrap();
//! assert!(lines.is_empty_line());
//! assert_eq!(lines.line_index(), 1);
//! ```

use std::io::BufRead;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{Error, ParseErrorKind, Result};
use crate::wsv::{self, WsvLine};

/// A blocking source of tokenized lines.
pub trait LineSource {
    /// Returns `true` while unread lines remain.
    fn has_line(&mut self) -> bool;

    /// Returns `true` if the next line exists and carries no values.
    fn is_empty_line(&mut self) -> bool;

    /// Consumes and returns the next line.
    ///
    /// # Errors
    ///
    /// Returns a tokenizer error for a malformed line, [`Error::Io`] for a
    /// failed read, or an error when no line is left.
    fn next_line(&mut self) -> Result<WsvLine>;

    /// The keyword that closes elements; `None` is the `-` placeholder.
    fn end_keyword(&self) -> Option<&str>;

    /// Zero-based index of the next unread line.
    fn line_index(&self) -> usize;

    /// Consumes the next line, or returns `None` at the end of input.
    ///
    /// # Errors
    ///
    /// As [`LineSource::next_line`].
    fn fetch(&mut self) -> Result<Option<WsvLine>> {
        if self.has_line() {
            self.next_line().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// A line source that suspends while waiting for the next line.
#[allow(async_fn_in_trait)]
pub trait AsyncLineSource {
    /// Consumes the next line, or returns `None` at the end of input.
    ///
    /// # Errors
    ///
    /// Returns a tokenizer error or [`Error::Io`].
    async fn fetch(&mut self) -> Result<Option<WsvLine>>;

    fn end_keyword(&self) -> Option<&str>;

    fn line_index(&self) -> usize;
}

fn exhausted(line_index: usize) -> Error {
    Error::io(format!("No line left to read at line {}", line_index + 1))
}

/// Scans backwards for the last line with values. A single value is the end
/// keyword; two or more values mean there is none.
pub(crate) fn detect_end_keyword<F>(line_count: usize, mut values_at: F) -> Result<Option<String>>
where
    F: FnMut(usize) -> Result<Vec<Option<String>>>,
{
    for index in (0..line_count).rev() {
        let mut values = values_at(index)?;
        match values.len() {
            0 => continue,
            1 => {
                let keyword = values.pop().flatten();
                tracing::trace!("Detected end keyword {:?} at line {}", keyword, index + 1);
                return Ok(keyword);
            }
            _ => break,
        }
    }
    Err(Error::parse(
        line_count.saturating_sub(1),
        ParseErrorKind::EndKeywordNotDetected,
    ))
}

/// Lines of an in-memory text, tokenized on demand.
///
/// Only the byte ranges of the lines are stored; both the backward end
/// keyword scan and the forward parse slice the same text.
#[derive(Debug, Clone)]
pub struct TextLines<'a> {
    text: &'a str,
    spans: Vec<(usize, usize)>,
    end_keyword: Option<String>,
    index: usize,
}

impl<'a> TextLines<'a> {
    /// Splits `text` on line feeds and infers the end keyword.
    ///
    /// # Errors
    ///
    /// Returns [`ParseErrorKind::EndKeywordNotDetected`] when the last line
    /// with values has more than one value, or a tokenizer error from the
    /// scanned lines.
    pub fn new(text: &'a str) -> Result<Self> {
        let mut lines = Self::with_end_keyword(text, None);
        let keyword = detect_end_keyword(lines.spans.len(), |index| {
            let line = lines.line_text(index);
            if wsv::is_blank(line) {
                Ok(Vec::new())
            } else {
                WsvLine::parse(line, index).map(|line| line.values)
            }
        })?;
        lines.end_keyword = keyword;
        Ok(lines)
    }

    /// Splits `text` on line feeds using a known end keyword.
    #[must_use]
    pub fn with_end_keyword(text: &'a str, end_keyword: Option<&str>) -> Self {
        let mut spans = Vec::new();
        let mut start = 0;
        for (offset, _) in text.match_indices('\n') {
            spans.push((start, offset));
            start = offset + 1;
        }
        spans.push((start, text.len()));
        TextLines {
            text,
            spans,
            end_keyword: end_keyword.map(str::to_string),
            index: 0,
        }
    }

    /// Total number of lines, including a final empty one after a trailing
    /// line feed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn line_text(&self, index: usize) -> &'a str {
        let (start, end) = self.spans[index];
        &self.text[start..end]
    }
}

impl LineSource for TextLines<'_> {
    fn has_line(&mut self) -> bool {
        self.index < self.spans.len()
    }

    fn is_empty_line(&mut self) -> bool {
        self.has_line() && wsv::is_blank(self.line_text(self.index))
    }

    fn next_line(&mut self) -> Result<WsvLine> {
        if !self.has_line() {
            return Err(exhausted(self.index));
        }
        let index = self.index;
        self.index += 1;
        WsvLine::parse(self.line_text(index), index)
    }

    fn end_keyword(&self) -> Option<&str> {
        self.end_keyword.as_deref()
    }

    fn line_index(&self) -> usize {
        self.index
    }
}

/// Lines given as value lists, without whitespace or comments.
#[derive(Debug, Clone)]
pub struct JaggedLines<'a> {
    lines: &'a [Vec<Option<String>>],
    end_keyword: Option<String>,
    index: usize,
}

impl<'a> JaggedLines<'a> {
    /// Wraps `lines` and infers the end keyword from the last non-empty row.
    ///
    /// # Errors
    ///
    /// Returns [`ParseErrorKind::EndKeywordNotDetected`] when the last
    /// non-empty row has more than one value or there is none.
    pub fn new(lines: &'a [Vec<Option<String>>]) -> Result<Self> {
        let end_keyword = detect_end_keyword(lines.len(), |index| Ok(lines[index].clone()))?;
        Ok(JaggedLines {
            lines,
            end_keyword,
            index: 0,
        })
    }
}

impl LineSource for JaggedLines<'_> {
    fn has_line(&mut self) -> bool {
        self.index < self.lines.len()
    }

    fn is_empty_line(&mut self) -> bool {
        self.has_line() && self.lines[self.index].is_empty()
    }

    fn next_line(&mut self) -> Result<WsvLine> {
        let values = self.lines.get(self.index).ok_or_else(|| exhausted(self.index))?;
        self.index += 1;
        Ok(WsvLine::from_values(values.clone()))
    }

    fn end_keyword(&self) -> Option<&str> {
        self.end_keyword.as_deref()
    }

    fn line_index(&self) -> usize {
        self.index
    }
}

/// Tracks the raw line framing shared by the blocking and async readers.
///
/// A stream yields an empty final line after a trailing line feed, and a
/// single empty line when it is empty, matching how text is split.
#[derive(Debug)]
struct LineFraming {
    index: usize,
    final_line_pending: bool,
}

impl LineFraming {
    fn new() -> Self {
        LineFraming {
            index: 0,
            final_line_pending: true,
        }
    }

    /// Turns a raw `read_line` result into the next line, if any.
    fn accept(&mut self, read: usize, buffer: &mut String) -> Option<Result<WsvLine>> {
        if read == 0 {
            if !self.final_line_pending {
                return None;
            }
            self.final_line_pending = false;
            buffer.clear();
        } else {
            self.final_line_pending = buffer.ends_with('\n');
            if self.final_line_pending {
                buffer.pop();
            }
        }
        let mut text = buffer.as_str();
        if self.index == 0 {
            text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        }
        let line = WsvLine::parse(text, self.index);
        self.index += 1;
        Some(line)
    }
}

/// Lines read one at a time from a blocking reader.
///
/// A UTF-8 BOM at the start of the stream is skipped.
#[derive(Debug)]
pub struct ReaderLines<R> {
    reader: R,
    end_keyword: Option<String>,
    framing: LineFraming,
    consumed: usize,
    buffer: String,
    peeked: Option<Result<WsvLine>>,
    done: bool,
}

impl<R: BufRead> ReaderLines<R> {
    #[must_use]
    pub fn new(reader: R, end_keyword: Option<&str>) -> Self {
        ReaderLines {
            reader,
            end_keyword: end_keyword.map(str::to_string),
            framing: LineFraming::new(),
            consumed: 0,
            buffer: String::new(),
            peeked: None,
            done: false,
        }
    }

    fn peek(&mut self) -> Option<&Result<WsvLine>> {
        if self.peeked.is_none() && !self.done {
            self.buffer.clear();
            let next = match self.reader.read_line(&mut self.buffer) {
                Ok(read) => self.framing.accept(read, &mut self.buffer),
                Err(err) => Some(Err(err.into())),
            };
            self.done = next.is_none();
            self.peeked = next;
        }
        self.peeked.as_ref()
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> LineSource for ReaderLines<R> {
    fn has_line(&mut self) -> bool {
        self.peek().is_some()
    }

    fn is_empty_line(&mut self) -> bool {
        matches!(self.peek(), Some(Ok(line)) if !line.has_values())
    }

    fn next_line(&mut self) -> Result<WsvLine> {
        self.peek();
        let line = self.peeked.take().ok_or_else(|| exhausted(self.consumed))?;
        self.consumed += 1;
        line
    }

    fn end_keyword(&self) -> Option<&str> {
        self.end_keyword.as_deref()
    }

    fn line_index(&self) -> usize {
        self.consumed
    }
}

/// Lines read from an async reader; suspends only while fetching a line.
#[derive(Debug)]
pub struct AsyncReaderLines<R> {
    reader: R,
    end_keyword: Option<String>,
    framing: LineFraming,
    buffer: String,
    done: bool,
}

impl<R: AsyncBufRead + Unpin> AsyncReaderLines<R> {
    #[must_use]
    pub fn new(reader: R, end_keyword: Option<&str>) -> Self {
        AsyncReaderLines {
            reader,
            end_keyword: end_keyword.map(str::to_string),
            framing: LineFraming::new(),
            buffer: String::new(),
            done: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncBufRead + Unpin> AsyncLineSource for AsyncReaderLines<R> {
    async fn fetch(&mut self) -> Result<Option<WsvLine>> {
        if self.done {
            return Ok(None);
        }
        self.buffer.clear();
        let read = self.reader.read_line(&mut self.buffer).await?;
        match self.framing.accept(read, &mut self.buffer) {
            Some(line) => line.map(Some),
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    fn end_keyword(&self) -> Option<&str> {
        self.end_keyword.as_deref()
    }

    fn line_index(&self) -> usize {
        self.framing.index
    }
}
