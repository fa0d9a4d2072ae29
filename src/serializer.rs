//! Tree to text.
//!
//! Serialization mirrors the parser's grammar: an element writes its name
//! line, its children one level deeper and then a line holding only the end
//! keyword. A node whose leading whitespace is unset is indented with the
//! default indentation (a tab unless the document sets one) repeated once
//! per level.
//!
//! | Form | Indentation | End keyword | Comments and empty lines |
//! |------|-------------|-------------|--------------------------|
//! | preserving | as parsed | document's | kept |
//! | non-preserving | computed | document's | dropped |
//! | minified | none | `-` | dropped |

use std::borrow::Cow;
use std::fmt;

use crate::attribute::Attribute;
use crate::document::Document;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::node::{EmptyNode, Node, Trivia};
use crate::wsv;

/// Settings shared by every line of one serialization run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineStyle<'a> {
    pub(crate) default_indentation: Option<&'a str>,
    pub(crate) end_keyword: Option<&'a str>,
    pub(crate) preserve: bool,
}

const MINIFIED: LineStyle<'static> = LineStyle {
    default_indentation: Some(""),
    end_keyword: None,
    preserve: false,
};

impl LineStyle<'_> {
    fn trivia<'t>(&self, trivia: &'t Trivia) -> (Option<&'t [Option<String>]>, Option<&'t str>) {
        if self.preserve {
            (trivia.whitespaces.as_deref(), trivia.comment.as_deref())
        } else {
            (None, None)
        }
    }
}

/// Fills an unset leading entry with the computed indentation.
fn indented<'w>(
    whitespaces: Option<&'w [Option<String>]>,
    level: usize,
    default_indentation: Option<&str>,
) -> Cow<'w, [Option<String>]> {
    let indent = || Some(default_indentation.unwrap_or("\t").repeat(level));
    match whitespaces {
        Some(whitespaces) if !whitespaces.is_empty() => {
            if whitespaces[0].is_some() {
                Cow::Borrowed(whitespaces)
            } else {
                let mut owned = whitespaces.to_vec();
                owned[0] = indent();
                Cow::Owned(owned)
            }
        }
        _ => Cow::Owned(vec![indent()]),
    }
}

fn push_line(
    lines: &mut Vec<String>,
    values: &[Option<&str>],
    trivia: (Option<&[Option<String>]>, Option<&str>),
    level: usize,
    style: &LineStyle<'_>,
) {
    let whitespaces = indented(trivia.0, level, style.default_indentation);
    lines.push(wsv::serialize_line(values, &whitespaces, trivia.1));
}

fn check_end_keyword(element: &Element, end_keyword: Option<&str>) -> Result<()> {
    match end_keyword {
        Some(keyword) if element.has_name(keyword) => Err(Error::serialization(format!(
            "Element name matches the end keyword \"{}\"",
            keyword
        ))),
        _ => Ok(()),
    }
}

fn write_empty_node(node: &EmptyNode, lines: &mut Vec<String>, level: usize, style: &LineStyle<'_>) {
    if style.preserve {
        push_line(lines, &[], style.trivia(&node.trivia), level, style);
    }
}

fn write_attribute(attribute: &Attribute, lines: &mut Vec<String>, level: usize, style: &LineStyle<'_>) {
    let values: Vec<Option<&str>> = std::iter::once(Some(attribute.name()))
        .chain(attribute.values_ref().iter().map(Option::as_deref))
        .collect();
    push_line(lines, &values, style.trivia(&attribute.trivia), level, style);
}

fn write_element(
    element: &Element,
    lines: &mut Vec<String>,
    level: usize,
    style: &LineStyle<'_>,
) -> Result<()> {
    check_end_keyword(element, style.end_keyword)?;
    push_line(lines, &[Some(element.name())], style.trivia(&element.trivia), level, style);
    for child in element.nodes() {
        write_node(child, lines, level + 1, style)?;
    }
    push_line(
        lines,
        &[style.end_keyword],
        style.trivia(&element.end_trivia),
        level,
        style,
    );
    Ok(())
}

pub(crate) fn write_node(
    node: &Node,
    lines: &mut Vec<String>,
    level: usize,
    style: &LineStyle<'_>,
) -> Result<()> {
    match node {
        Node::Element(element) => write_element(element, lines, level, style)?,
        Node::Attribute(attribute) => write_attribute(attribute, lines, level, style),
        Node::Empty(node) => write_empty_node(node, lines, level, style),
    }
    Ok(())
}

pub(crate) fn document_to_string(document: &Document, preserve: bool) -> Result<String> {
    let mut lines = Vec::new();
    let outer = LineStyle {
        default_indentation: None,
        end_keyword: None,
        preserve,
    };
    for node in &document.empty_nodes_before {
        write_empty_node(node, &mut lines, 0, &outer);
    }
    let style = LineStyle {
        default_indentation: document.default_indentation(),
        end_keyword: document.end_keyword.as_deref(),
        preserve,
    };
    write_element(&document.root, &mut lines, 0, &style)?;
    for node in &document.empty_nodes_after {
        write_empty_node(node, &mut lines, 0, &outer);
    }
    tracing::trace!("Serialized document to {} lines", lines.len());
    Ok(lines.join("\n"))
}

pub(crate) fn element_to_string(element: &Element, preserve: bool) -> Result<String> {
    let mut lines = Vec::new();
    let style = LineStyle {
        default_indentation: None,
        end_keyword: Some("End"),
        preserve,
    };
    write_element(element, &mut lines, 0, &style)?;
    Ok(lines.join("\n"))
}

pub(crate) fn element_to_minified_string(element: &Element) -> Result<String> {
    let mut lines = Vec::new();
    write_element(element, &mut lines, 0, &MINIFIED)?;
    Ok(lines.join("\n"))
}

/// One value list per line of the non-preserving form.
pub(crate) fn jagged_array(
    element: &Element,
    end_keyword: Option<&str>,
) -> Result<Vec<Vec<Option<String>>>> {
    fn collect(
        element: &Element,
        end_keyword: Option<&str>,
        rows: &mut Vec<Vec<Option<String>>>,
    ) -> Result<()> {
        check_end_keyword(element, end_keyword)?;
        rows.push(vec![Some(element.name().to_string())]);
        for child in element.nodes() {
            match child {
                Node::Element(child) => collect(child, end_keyword, rows)?,
                Node::Attribute(attribute) => rows.push(
                    std::iter::once(Some(attribute.name().to_string()))
                        .chain(attribute.values_ref().iter().cloned())
                        .collect(),
                ),
                Node::Empty(_) => {}
            }
        }
        rows.push(vec![end_keyword.map(str::to_string)]);
        Ok(())
    }

    let mut rows = Vec::new();
    collect(element, end_keyword, &mut rows)?;
    Ok(rows)
}

impl Attribute {
    /// Serializes the attribute as a single unindented line.
    #[must_use]
    pub fn serialize(&self, preserve_whitespace_and_comments: bool) -> String {
        let mut lines = Vec::with_capacity(1);
        let style = LineStyle {
            default_indentation: None,
            end_keyword: None,
            preserve: preserve_whitespace_and_comments,
        };
        write_attribute(self, &mut lines, 0, &style);
        lines.concat()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(true))
    }
}

impl fmt::Display for EmptyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::with_capacity(1);
        let style = LineStyle {
            default_indentation: None,
            end_keyword: None,
            preserve: true,
        };
        write_empty_node(self, &mut lines, 0, &style);
        f.write_str(&lines.concat())
    }
}
