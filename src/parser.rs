//! Line-oriented recursive-descent parsing of SML.
//!
//! The grammar is driven by whole lines:
//!
//! - no values: an empty node (kept only when preserving)
//! - one value equal to the end keyword: closes the open element
//! - one other value: opens a child element
//! - two or more values: an attribute, first value is its name
//!
//! Grammar decisions live in [`NodeReader`], a push state machine fed one
//! line at a time. The blocking and async drivers below only differ in how
//! they fetch lines, so both share every rule and every error position.

use crate::attribute::Attribute;
use crate::document::Document;
use crate::element::Element;
use crate::error::{Error, ParseErrorKind, Result};
use crate::line_source::{AsyncLineSource, JaggedLines, LineSource, TextLines};
use crate::node::{equals_ignore_case, EmptyNode, Node};
use crate::wsv::WsvLine;

/// A `None` end keyword only matches the null value.
fn is_end_keyword(end_keyword: Option<&str>, value: Option<&str>) -> bool {
    match (end_keyword, value) {
        (None, None) => true,
        (Some(keyword), Some(value)) => equals_ignore_case(keyword, value),
        _ => false,
    }
}

fn trivia(line: &mut WsvLine, preserve: bool) -> (Option<Vec<Option<String>>>, Option<String>) {
    if preserve {
        (Some(std::mem::take(&mut line.whitespaces)), line.comment.take())
    } else {
        (None, None)
    }
}

fn empty_node(mut line: WsvLine) -> EmptyNode {
    let mut node = EmptyNode::new();
    let (whitespaces, comment) = trivia(&mut line, true);
    node.set_trivia_unchecked(whitespaces, comment);
    node
}

/// Validates the root line and creates the root element from it.
fn root_from_line(
    mut line: WsvLine,
    line_index: usize,
    end_keyword: Option<&str>,
    preserve: bool,
) -> Result<Element> {
    if line.values.len() != 1 || is_end_keyword(end_keyword, line.values[0].as_deref()) {
        return Err(Error::parse(line_index, ParseErrorKind::InvalidRootElementStart));
    }
    let name = line.values.pop().flatten().ok_or_else(|| {
        Error::parse(line_index, ParseErrorKind::NullValueAsElementName)
    })?;
    let mut root = Element::new(name);
    let (whitespaces, comment) = trivia(&mut line, preserve);
    root.set_trivia_unchecked(whitespaces, comment);
    Ok(root)
}

/// Classifies a line after the root closed: empty lines are trailing
/// decoration, anything else is a second root.
fn trailing_line(line: WsvLine, line_index: usize) -> Result<EmptyNode> {
    if line.has_values() {
        return Err(Error::parse(line_index, ParseErrorKind::OnlyOneRootElementAllowed));
    }
    Ok(empty_node(line))
}

/// Outcome of feeding one line to a [`NodeReader`].
#[derive(Debug)]
pub(crate) enum Step {
    /// The line was absorbed into a still-open element or skipped.
    Pending,
    /// A complete child node of the parent.
    Node(Node),
    /// The parent itself was closed by this line.
    End {
        whitespaces: Option<Vec<Option<String>>>,
        comment: Option<String>,
    },
}

/// Assembles one child node of a parent from successive lines.
#[derive(Debug)]
pub(crate) struct NodeReader<'k> {
    end_keyword: Option<&'k str>,
    preserve: bool,
    open: Vec<Element>,
}

impl<'k> NodeReader<'k> {
    pub(crate) fn new(end_keyword: Option<&'k str>, preserve: bool) -> Self {
        NodeReader {
            end_keyword,
            preserve,
            open: Vec::new(),
        }
    }

    /// Completes `node` either as the result or as a child of the innermost
    /// open element.
    fn deliver(&mut self, node: Node) -> Step {
        match self.open.last_mut() {
            Some(parent) => {
                parent.add_node(node);
                Step::Pending
            }
            None => Step::Node(node),
        }
    }

    pub(crate) fn feed(&mut self, mut line: WsvLine, line_index: usize) -> Result<Step> {
        if !line.has_values() {
            if !self.preserve {
                return Ok(Step::Pending);
            }
            return Ok(self.deliver(Node::Empty(empty_node(line))));
        }

        if line.values.len() == 1 {
            if is_end_keyword(self.end_keyword, line.values[0].as_deref()) {
                let (whitespaces, comment) = trivia(&mut line, self.preserve);
                return Ok(match self.open.pop() {
                    Some(mut element) => {
                        element.set_end_trivia_unchecked(whitespaces, comment);
                        self.deliver(Node::Element(element))
                    }
                    None => Step::End {
                        whitespaces,
                        comment,
                    },
                });
            }
            let name = line.values.pop().flatten().ok_or_else(|| {
                Error::parse(line_index, ParseErrorKind::NullValueAsElementName)
            })?;
            let mut element = Element::new(name);
            let (whitespaces, comment) = trivia(&mut line, self.preserve);
            element.set_trivia_unchecked(whitespaces, comment);
            self.open.push(element);
            return Ok(Step::Pending);
        }

        let mut values = std::mem::take(&mut line.values).into_iter();
        let name = values.next().flatten().ok_or_else(|| {
            Error::parse(line_index, ParseErrorKind::NullValueAsAttributeName)
        })?;
        let first = values.next().flatten();
        let mut attribute = Attribute::from_first(name, first, values);
        let (whitespaces, comment) = trivia(&mut line, self.preserve);
        attribute.set_trivia_unchecked(whitespaces, comment);
        Ok(self.deliver(Node::Attribute(attribute)))
    }

    /// The error for running out of lines; points at the last consumed line.
    pub(crate) fn not_closed(&self, parent: &Element, line_index: usize) -> Error {
        let name = self.open.last().map_or(parent.name(), Element::name);
        Error::parse(
            line_index.saturating_sub(1),
            ParseErrorKind::ElementNotClosed(name.to_string()),
        )
    }
}

fn close(parent: &mut Element, step: Step) -> Option<Node> {
    match step {
        Step::Node(node) => Some(node),
        Step::End {
            whitespaces,
            comment,
        } => {
            parent.set_end_trivia_unchecked(whitespaces, comment);
            None
        }
        Step::Pending => None,
    }
}

/// Reads the empty lines before the root and the root line itself.
///
/// # Errors
///
/// Returns [`ParseErrorKind::RootElementExpected`] at the end of input, and
/// [`ParseErrorKind::InvalidRootElementStart`] or
/// [`ParseErrorKind::NullValueAsElementName`] for a bad root line.
pub fn read_root_element<S: LineSource + ?Sized>(
    source: &mut S,
    empty_nodes_before: &mut Vec<EmptyNode>,
    preserve: bool,
) -> Result<Element> {
    let end_keyword = source.end_keyword().map(str::to_string);
    loop {
        let index = source.line_index();
        let Some(line) = source.fetch()? else {
            return Err(Error::parse(source.line_index(), ParseErrorKind::RootElementExpected));
        };
        if !line.has_values() {
            if preserve {
                empty_nodes_before.push(empty_node(line));
            }
            continue;
        }
        return root_from_line(line, index, end_keyword.as_deref(), preserve);
    }
}

/// Reads the next child of `parent`. Returns `None` once the line closing
/// `parent` was consumed; its decoration is stored on `parent`.
///
/// # Errors
///
/// Returns [`ParseErrorKind::ElementNotClosed`] when the input ends first,
/// or any grammar error of the consumed lines.
pub fn read_node<S: LineSource + ?Sized>(
    source: &mut S,
    parent: &mut Element,
    preserve: bool,
) -> Result<Option<Node>> {
    let end_keyword = source.end_keyword().map(str::to_string);
    let mut reader = NodeReader::new(end_keyword.as_deref(), preserve);
    loop {
        let index = source.line_index();
        let Some(line) = source.fetch()? else {
            return Err(reader.not_closed(parent, source.line_index()));
        };
        match reader.feed(line, index)? {
            Step::Pending => {}
            step => return Ok(close(parent, step)),
        }
    }
}

/// Reads children into `element` until its end line.
///
/// # Errors
///
/// As [`read_node`].
pub fn read_element_content<S: LineSource + ?Sized>(
    source: &mut S,
    element: &mut Element,
    preserve: bool,
) -> Result<()> {
    while let Some(node) = read_node(source, element, preserve)? {
        element.add_node(node);
    }
    Ok(())
}

fn read_trailing<S: LineSource + ?Sized>(source: &mut S, preserve: bool) -> Result<Vec<EmptyNode>> {
    let mut nodes = Vec::new();
    loop {
        let index = source.line_index();
        let Some(line) = source.fetch()? else {
            return Ok(nodes);
        };
        let node = trailing_line(line, index)?;
        if preserve {
            nodes.push(node);
        }
    }
}

/// Parses a whole document from any line source.
///
/// # Errors
///
/// Returns the first grammar or tokenizer error.
pub fn parse_lines<S: LineSource + ?Sized>(source: &mut S, preserve: bool) -> Result<Document> {
    let mut empty_nodes_before = Vec::new();
    let mut root = read_root_element(source, &mut empty_nodes_before, preserve)?;
    read_element_content(source, &mut root, preserve)?;
    let empty_nodes_after = read_trailing(source, preserve)?;

    let mut document = Document::new(root);
    document.end_keyword = source.end_keyword().map(str::to_string);
    document.empty_nodes_before = empty_nodes_before;
    document.empty_nodes_after = empty_nodes_after;
    tracing::debug!(
        "Parsed SML document with root \"{}\" from {} lines",
        document.root.name(),
        source.line_index()
    );
    Ok(document)
}

/// Parses text keeping whitespace, comments and empty lines.
///
/// # Errors
///
/// Returns the first grammar or tokenizer error.
pub fn parse_document(content: &str) -> Result<Document> {
    parse_lines(&mut TextLines::new(content)?, true)
}

/// Parses text keeping only names, values and nesting.
///
/// # Errors
///
/// Returns the first grammar or tokenizer error.
pub fn parse_document_non_preserving(content: &str) -> Result<Document> {
    parse_lines(&mut TextLines::new(content)?, false)
}

/// Parses one value list per line.
///
/// # Errors
///
/// Returns the first grammar error.
pub fn parse_jagged_array(rows: &[Vec<Option<String>>]) -> Result<Document> {
    parse_lines(&mut JaggedLines::new(rows)?, false)
}

/// Async counterpart of [`read_root_element`].
///
/// # Errors
///
/// As [`read_root_element`].
pub async fn read_root_element_async<S: AsyncLineSource + ?Sized>(
    source: &mut S,
    empty_nodes_before: &mut Vec<EmptyNode>,
    preserve: bool,
) -> Result<Element> {
    let end_keyword = source.end_keyword().map(str::to_string);
    loop {
        let index = source.line_index();
        let Some(line) = source.fetch().await? else {
            return Err(Error::parse(source.line_index(), ParseErrorKind::RootElementExpected));
        };
        if !line.has_values() {
            if preserve {
                empty_nodes_before.push(empty_node(line));
            }
            continue;
        }
        return root_from_line(line, index, end_keyword.as_deref(), preserve);
    }
}

/// Async counterpart of [`read_node`].
///
/// # Errors
///
/// As [`read_node`].
pub async fn read_node_async<S: AsyncLineSource + ?Sized>(
    source: &mut S,
    parent: &mut Element,
    preserve: bool,
) -> Result<Option<Node>> {
    let end_keyword = source.end_keyword().map(str::to_string);
    let mut reader = NodeReader::new(end_keyword.as_deref(), preserve);
    loop {
        let index = source.line_index();
        let Some(line) = source.fetch().await? else {
            return Err(reader.not_closed(parent, source.line_index()));
        };
        match reader.feed(line, index)? {
            Step::Pending => {}
            step => return Ok(close(parent, step)),
        }
    }
}

/// Async counterpart of [`parse_lines`].
///
/// # Errors
///
/// As [`parse_lines`].
pub async fn parse_lines_async<S: AsyncLineSource + ?Sized>(
    source: &mut S,
    preserve: bool,
) -> Result<Document> {
    let mut empty_nodes_before = Vec::new();
    let mut root = read_root_element_async(source, &mut empty_nodes_before, preserve).await?;
    while let Some(node) = read_node_async(source, &mut root, preserve).await? {
        root.add_node(node);
    }
    let mut empty_nodes_after = Vec::new();
    loop {
        let index = source.line_index();
        let Some(line) = source.fetch().await? else {
            break;
        };
        let node = trailing_line(line, index)?;
        if preserve {
            empty_nodes_after.push(node);
        }
    }

    let mut document = Document::new(root);
    document.end_keyword = source.end_keyword().map(str::to_string);
    document.empty_nodes_before = empty_nodes_before;
    document.empty_nodes_after = empty_nodes_after;
    tracing::debug!(
        "Parsed SML document with root \"{}\" from {} lines",
        document.root.name(),
        source.line_index()
    );
    Ok(document)
}
