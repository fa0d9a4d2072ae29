//! Whitespace separated values: the line format underneath SML text.
//!
//! A line is a sequence of values separated by whitespace, optionally followed
//! by a `#` comment. A value is either unquoted, double quoted, or the null
//! marker `-`.
//!
//! ```text
//! Name   "Value with spaces"  -  "say ""hi"""  "line"/"break"  #comment
//! ```
//!
//! Inside a quoted value `""` is a literal quote and `"/"` is a line feed.
//!
//! ## Whitespace layout
//!
//! Tokenized lines keep the whitespace around their values so a document can
//! be written back byte for byte. For `n` values the whitespace vector holds:
//!
//! - index `0`: the leading whitespace (`Some("")` when there was none)
//! - index `1..n`: the whitespace between neighbouring values
//! - index `n`: the trailing whitespace, or `None` when a comment follows the
//!   last value directly
//!
//! A line without values only stores its leading whitespace.

use crate::error::{Error, ParseErrorKind, Result};

/// One tokenized line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WsvLine {
    pub values: Vec<Option<String>>,
    pub whitespaces: Vec<Option<String>>,
    pub comment: Option<String>,
}

impl WsvLine {
    /// Creates a line from values only.
    #[must_use]
    pub fn from_values(values: Vec<Option<String>>) -> Self {
        WsvLine {
            values,
            whitespaces: Vec::new(),
            comment: None,
        }
    }

    /// Returns `true` when the line carries at least one value.
    #[must_use]
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    /// Tokenizes a single line; `line_index` is only used for error reporting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sml::wsv::WsvLine;
    ///
    /// let line = WsvLine::parse("  Attr \"a b\" - #note", 0).unwrap();
    /// assert_eq!(line.values, vec![Some("Attr".into()), Some("a b".into()), None]);
    /// assert_eq!(line.comment.as_deref(), Some("note"));
    /// assert_eq!(line.to_string(), "  Attr \"a b\" - #note");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for unterminated strings, a bad `"/"` escape, a
    /// character glued to a closing quote, or a quote inside an unquoted value.
    pub fn parse(line: &str, line_index: usize) -> Result<Self> {
        Tokenizer::new(line, line_index).tokenize()
    }

    /// Serializes the line including its whitespace and comment.
    #[must_use]
    pub fn serialize(&self) -> String {
        let values: Vec<Option<&str>> = self.values.iter().map(Option::as_deref).collect();
        serialize_line(&values, &self.whitespaces, self.comment.as_deref())
    }
}

impl std::fmt::Display for WsvLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

struct Tokenizer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line_index: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(line: &'a str, line_index: usize) -> Self {
        Tokenizer {
            chars: line.chars().peekable(),
            line_index,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> Error {
        Error::parse(self.line_index, kind)
    }

    fn take_whitespace(&mut self) -> String {
        let mut ws = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_whitespace(c) {
                break;
            }
            ws.push(c);
            self.chars.next();
        }
        ws
    }

    fn tokenize(mut self) -> Result<WsvLine> {
        let mut line = WsvLine::default();
        line.whitespaces.push(Some(self.take_whitespace()));
        loop {
            match self.chars.peek() {
                None => break,
                Some('#') => {
                    self.chars.next();
                    line.comment = Some(self.chars.by_ref().collect());
                    break;
                }
                Some(_) => {}
            }
            line.values.push(self.value()?);
            let ws = self.take_whitespace();
            match self.chars.peek() {
                None if ws.is_empty() => {}
                Some('#') if ws.is_empty() => line.whitespaces.push(None),
                _ => line.whitespaces.push(Some(ws)),
            }
        }
        Ok(line)
    }

    fn value(&mut self) -> Result<Option<String>> {
        if self.chars.peek() == Some(&'"') {
            self.chars.next();
            return self.quoted().map(Some);
        }
        let mut value = String::new();
        while let Some(&c) = self.chars.peek() {
            if is_whitespace(c) || c == '#' {
                break;
            }
            if c == '"' {
                return Err(self.error(ParseErrorKind::InvalidDoubleQuoteInValue));
            }
            value.push(c);
            self.chars.next();
        }
        if value == "-" {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    fn quoted(&mut self) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.error(ParseErrorKind::StringNotClosed)),
                Some('"') => match self.chars.peek() {
                    Some('"') => {
                        self.chars.next();
                        value.push('"');
                    }
                    Some('/') => {
                        self.chars.next();
                        if self.chars.next() != Some('"') {
                            return Err(self.error(ParseErrorKind::InvalidStringLineBreak));
                        }
                        value.push('\n');
                    }
                    Some(&c) if !is_whitespace(c) && c != '#' => {
                        return Err(self.error(ParseErrorKind::InvalidCharacterAfterString));
                    }
                    _ => return Ok(value),
                },
                Some(c) => value.push(c),
            }
        }
    }
}

/// Returns `true` for the characters WSV treats as value separators.
///
/// Line feed is deliberately absent: it separates lines, not values.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{0085}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Returns `true` if the raw line has no values, without tokenizing it.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    matches!(line.chars().find(|&c| !is_whitespace(c)), None | Some('#'))
}

/// Serializes a single value, quoting it only when needed.
///
/// # Examples
///
/// ```rust
/// use sml::wsv::serialize_value;
///
/// assert_eq!(serialize_value(None), "-");
/// assert_eq!(serialize_value(Some("-")), "\"-\"");
/// assert_eq!(serialize_value(Some("")), "\"\"");
/// assert_eq!(serialize_value(Some("a\"b")), "\"a\"\"b\"");
/// assert_eq!(serialize_value(Some("a\nb")), "\"a\"/\"b\"");
/// assert_eq!(serialize_value(Some("plain")), "plain");
/// ```
#[must_use]
pub fn serialize_value(value: Option<&str>) -> String {
    let value = match value {
        None => return "-".to_string(),
        Some(v) => v,
    };
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if value == "-" {
        return "\"-\"".to_string();
    }
    let needs_quotes = value
        .chars()
        .any(|c| c == '"' || c == '#' || c == '\n' || is_whitespace(c));
    if !needs_quotes {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\"\""),
            '\n' => out.push_str("\"/\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Serializes values with explicit whitespace and an optional comment.
///
/// Missing separators between values become a single space. A missing
/// trailing entry becomes a single space only when a comment follows a value.
#[must_use]
pub fn serialize_line(
    values: &[Option<&str>],
    whitespaces: &[Option<String>],
    comment: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(Some(leading)) = whitespaces.first() {
        out.push_str(leading);
    }
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            match whitespaces.get(i) {
                Some(Some(ws)) if !ws.is_empty() => out.push_str(ws),
                _ => out.push(' '),
            }
        }
        out.push_str(&serialize_value(*value));
    }
    if !values.is_empty() {
        match whitespaces.get(values.len()) {
            Some(Some(ws)) => out.push_str(ws),
            Some(None) => {}
            None if comment.is_some() => out.push(' '),
            None => {}
        }
    }
    if let Some(comment) = comment {
        out.push('#');
        out.push_str(comment);
    }
    out
}

/// Serializes bare values separated by single spaces.
#[must_use]
pub fn serialize_values(values: &[Option<String>]) -> String {
    let values: Vec<Option<&str>> = values.iter().map(Option::as_deref).collect();
    serialize_line(&values, &[], None)
}

/// Splits text on line feeds and tokenizes every line.
///
/// # Errors
///
/// Returns the first tokenizer error, located at its line.
pub fn parse_document(text: &str) -> Result<Vec<WsvLine>> {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| WsvLine::parse(line, index))
        .collect()
}

/// Like [`parse_document`] but keeps only the values of each line.
///
/// # Errors
///
/// Returns the first tokenizer error, located at its line.
pub fn parse_as_jagged_array(text: &str) -> Result<Vec<Vec<Option<String>>>> {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| WsvLine::parse(line, index).map(|l| l.values))
        .collect()
}

/// Checks that `value` is made only of WSV whitespace.
///
/// # Errors
///
/// Returns [`Error::Construction`] for an empty string when `allow_empty` is
/// false, or for any non-whitespace character.
pub fn validate_whitespace(value: &str, allow_empty: bool) -> Result<()> {
    if value.is_empty() && !allow_empty {
        return Err(Error::construction("Non-empty whitespace string expected"));
    }
    if let Some(c) = value.chars().find(|&c| !is_whitespace(c)) {
        return Err(Error::construction(format!(
            "Invalid code unit U+{:04X} in whitespace string",
            u32::from(c)
        )));
    }
    Ok(())
}

/// Checks every present entry of a whitespace vector.
///
/// # Errors
///
/// Returns [`Error::Construction`] on the first invalid entry.
pub fn validate_whitespaces(values: &[Option<String>]) -> Result<()> {
    values
        .iter()
        .flatten()
        .try_for_each(|ws| validate_whitespace(ws, true))
}

/// Checks that a comment fits on one line.
///
/// # Errors
///
/// Returns [`Error::Construction`] if the comment contains a line feed.
pub fn validate_comment(value: &str) -> Result<()> {
    if value.contains('\n') {
        return Err(Error::construction("Line feed in comment is not allowed"));
    }
    Ok(())
}
