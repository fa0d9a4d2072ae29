//! SML elements: named, ordered lists of child nodes.
//!
//! ```text
//! Configuration
//!   Video
//!     Resolution 1280 720
//!   End
//!   # comment lines are kept as empty nodes
//! End
//! ```
//!
//! ## Queries
//!
//! Children are looked up by kind and case-insensitive name, always in
//! document order. Each lookup comes in several flavours:
//!
//! | Call | Matches | Fails when |
//! |------|---------|------------|
//! | `elements(Some(name))` | all | never |
//! | `element(name)` | first | none |
//! | `element_or_none(name)` | first | never |
//! | `optional_element(name)` | zero or one | more than one |
//! | `required_element(name)` | exactly one | zero or many |
//! | `one_or_more_elements(name)` | at least one | none |
//!
//! The same set exists for attributes and for named nodes of either kind.
//!
//! ## Schema assertions
//!
//! The `assure_*` family validates shape after parsing and returns `&Self`
//! so checks can be chained:
//!
//! ```rust
//! use sml::from_str;
//!
//! let doc = from_str("Root\nSize 3 4\nEnd").unwrap();
//! doc.root
//!     .assure_name("root").unwrap()
//!     .assure_element_count(0, None).unwrap()
//!     .assure_attribute_names(&["Size"]).unwrap();
//! assert_eq!(doc.root.required_attribute("size").unwrap().get_int_array(0).unwrap(), vec![3, 4]);
//! ```

use crate::attribute::Attribute;
use crate::error::{Error, Result};
use crate::node::{equals_ignore_case, trivia_accessors, EmptyNode, Node, Trivia};
use crate::serializer;
use crate::wsv;

/// Child kind selector shared by every query.
#[derive(Clone, Copy, Debug)]
enum Kind {
    Named,
    Element,
    Attribute,
}

impl Kind {
    fn matches(self, node: &Node) -> bool {
        match self {
            Kind::Named => node.is_named_node(),
            Kind::Element => node.is_element(),
            Kind::Attribute => node.is_attribute(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Kind::Named => "named node",
            Kind::Element => "element",
            Kind::Attribute => "attribute",
        }
    }
}

/// A named node that owns an ordered list of children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    name: String,
    nodes: Vec<Node>,
    pub(crate) trivia: Trivia,
    pub(crate) end_trivia: Trivia,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            nodes: Vec::new(),
            trivia: Trivia::default(),
            end_trivia: Trivia::default(),
        }
    }

    /// Parses a complete document and returns its root element.
    ///
    /// # Errors
    ///
    /// Propagates any parse error.
    pub fn parse(content: &str, preserve_whitespace_and_comments: bool) -> Result<Self> {
        let document = if preserve_whitespace_and_comments {
            crate::parser::parse_document(content)?
        } else {
            crate::parser::parse_document_non_preserving(content)?
        };
        Ok(document.root)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        equals_ignore_case(&self.name, name)
    }

    trivia_accessors!(trivia);

    /// Returns a copy of the whitespace fragments of the closing line.
    #[must_use]
    pub fn end_whitespaces(&self) -> Option<Vec<Option<String>>> {
        self.end_trivia.whitespaces.clone()
    }

    /// # Errors
    ///
    /// Returns [`Error::Construction`] for non-whitespace fragments.
    pub fn set_end_whitespaces(&mut self, values: Option<Vec<Option<String>>>) -> Result<()> {
        self.end_trivia.set_whitespaces(values)
    }

    #[must_use]
    pub fn end_comment(&self) -> Option<&str> {
        self.end_trivia.comment.as_deref()
    }

    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the comment contains a line feed.
    pub fn set_end_comment(&mut self, value: Option<&str>) -> Result<()> {
        self.end_trivia.set_comment(value.map(str::to_string))
    }

    #[must_use]
    pub fn has_end_comment(&self) -> bool {
        self.end_trivia.comment.is_some()
    }

    pub(crate) fn set_end_trivia_unchecked(
        &mut self,
        whitespaces: Option<Vec<Option<String>>>,
        comment: Option<String>,
    ) {
        self.end_trivia.whitespaces = whitespaces;
        self.end_trivia.comment = comment;
    }

    // Children

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn add_node(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Appends an attribute and returns it for further configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `values` is empty.
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<&mut Attribute> {
        let attribute = Attribute::new(name, values)?;
        Ok(push_child(&mut self.nodes, attribute, Node::as_attribute_mut))
    }

    /// Appends an empty child element and returns it.
    pub fn add_element(&mut self, name: impl Into<String>) -> &mut Element {
        push_child(&mut self.nodes, Element::new(name), Node::as_element_mut)
    }

    /// Appends an empty node and returns it.
    pub fn add_empty_node(&mut self) -> &mut EmptyNode {
        push_child(&mut self.nodes, EmptyNode::new(), Node::as_empty_node_mut)
    }

    /// Clears all decoration recursively and drops empty nodes.
    pub fn minify(&mut self) {
        self.trivia.clear();
        self.end_trivia.clear();
        self.nodes.retain(|node| !node.is_empty_node());
        for node in &mut self.nodes {
            node.minify();
        }
    }

    // Kind/name filtering, implemented once for every query below.

    fn filter<'a: 'n, 'n>(
        &'a self,
        kind: Kind,
        name: Option<&'n str>,
    ) -> impl Iterator<Item = &'a Node> + 'n {
        self.nodes
            .iter()
            .filter(move |node| kind.matches(node) && name.map_or(true, |name| node.has_name(name)))
    }

    fn count(&self, kind: Kind, name: Option<&str>) -> usize {
        self.filter(kind, name).count()
    }

    fn first<'a, T: ?Sized>(
        &'a self,
        kind: Kind,
        name: &str,
        project: fn(&'a Node) -> Option<&'a T>,
    ) -> Result<&'a T> {
        self.filter(kind, Some(name))
            .find_map(project)
            .ok_or_else(|| not_found(&self.name, kind, name))
    }

    fn optional<'a, T: ?Sized>(
        &'a self,
        kind: Kind,
        name: &str,
        project: fn(&'a Node) -> Option<&'a T>,
    ) -> Result<Option<&'a T>> {
        let mut matches = self.filter(kind, Some(name)).filter_map(project);
        let first = matches.next();
        if first.is_some() && matches.next().is_some() {
            return Err(Error::query(format!(
                "Element \"{}\" must contain one or no {} \"{}\" but contains {}",
                self.name,
                kind.label(),
                name,
                self.count(kind, Some(name))
            )));
        }
        Ok(first)
    }

    fn required<'a, T: ?Sized>(
        &'a self,
        kind: Kind,
        name: &str,
        project: fn(&'a Node) -> Option<&'a T>,
    ) -> Result<&'a T> {
        let count = self.count(kind, Some(name));
        if count != 1 {
            return Err(Error::query(format!(
                "Element \"{}\" must contain one {} \"{}\" but contains {}",
                self.name,
                kind.label(),
                name,
                count
            )));
        }
        self.first(kind, name, project)
    }

    fn one_or_more<'a, T: ?Sized>(
        &'a self,
        kind: Kind,
        name: &str,
        project: fn(&'a Node) -> Option<&'a T>,
    ) -> Result<Vec<&'a T>> {
        let found: Vec<&T> = self.filter(kind, Some(name)).filter_map(project).collect();
        if found.is_empty() {
            return Err(Error::query(format!(
                "Element \"{}\" must contain at least one {} \"{}\" but contains 0",
                self.name,
                kind.label(),
                name
            )));
        }
        Ok(found)
    }

    // Named nodes

    #[must_use]
    pub fn has_named_nodes(&self, name: Option<&str>) -> bool {
        self.filter(Kind::Named, name).next().is_some()
    }

    #[must_use]
    pub fn named_nodes(&self, name: Option<&str>) -> Vec<&Node> {
        self.filter(Kind::Named, name).collect()
    }

    #[must_use]
    pub fn has_named_node(&self, name: &str) -> bool {
        self.has_named_nodes(Some(name))
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if no element or attribute has this name.
    pub fn named_node(&self, name: &str) -> Result<&Node> {
        self.first(Kind::Named, name, Some)
    }

    #[must_use]
    pub fn named_node_or_none(&self, name: &str) -> Option<&Node> {
        self.filter(Kind::Named, Some(name)).next()
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if more than one named node matches.
    pub fn optional_named_node(&self, name: &str) -> Result<Option<&Node>> {
        self.optional(Kind::Named, name, Some)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless exactly one named node matches.
    pub fn required_named_node(&self, name: &str) -> Result<&Node> {
        self.required(Kind::Named, name, Some)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if nothing matches.
    pub fn one_or_more_named_nodes(&self, name: &str) -> Result<Vec<&Node>> {
        self.one_or_more(Kind::Named, name, Some)
    }

    // Elements

    #[must_use]
    pub fn has_elements(&self, name: Option<&str>) -> bool {
        self.filter(Kind::Element, name).next().is_some()
    }

    #[must_use]
    pub fn elements(&self, name: Option<&str>) -> Vec<&Element> {
        self.filter(Kind::Element, name)
            .filter_map(Node::as_element)
            .collect()
    }

    #[must_use]
    pub fn has_element(&self, name: &str) -> bool {
        self.has_elements(Some(name))
    }

    /// Returns the first child element with this name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if there is none.
    pub fn element(&self, name: &str) -> Result<&Element> {
        self.first(Kind::Element, name, Node::as_element)
    }

    /// Mutable access to the first child element with this name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if there is none.
    pub fn element_mut(&mut self, name: &str) -> Result<&mut Element> {
        self.nodes
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|element| element.has_name(name))
            .ok_or_else(|| not_found(&self.name, Kind::Element, name))
    }

    #[must_use]
    pub fn element_or_none(&self, name: &str) -> Option<&Element> {
        self.filter(Kind::Element, Some(name))
            .next()
            .and_then(Node::as_element)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if more than one element matches.
    pub fn optional_element(&self, name: &str) -> Result<Option<&Element>> {
        self.optional(Kind::Element, name, Node::as_element)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless exactly one element matches.
    pub fn required_element(&self, name: &str) -> Result<&Element> {
        self.required(Kind::Element, name, Node::as_element)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if no element matches.
    pub fn one_or_more_elements(&self, name: &str) -> Result<Vec<&Element>> {
        self.one_or_more(Kind::Element, name, Node::as_element)
    }

    // Attributes

    #[must_use]
    pub fn has_attributes(&self, name: Option<&str>) -> bool {
        self.filter(Kind::Attribute, name).next().is_some()
    }

    #[must_use]
    pub fn attributes(&self, name: Option<&str>) -> Vec<&Attribute> {
        self.filter(Kind::Attribute, name)
            .filter_map(Node::as_attribute)
            .collect()
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.has_attributes(Some(name))
    }

    /// Returns the first attribute with this name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if there is none.
    pub fn attribute(&self, name: &str) -> Result<&Attribute> {
        self.first(Kind::Attribute, name, Node::as_attribute)
    }

    /// Mutable access to the first attribute with this name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if there is none.
    pub fn attribute_mut(&mut self, name: &str) -> Result<&mut Attribute> {
        self.nodes
            .iter_mut()
            .filter_map(Node::as_attribute_mut)
            .find(|attribute| attribute.has_name(name))
            .ok_or_else(|| not_found(&self.name, Kind::Attribute, name))
    }

    #[must_use]
    pub fn attribute_or_none(&self, name: &str) -> Option<&Attribute> {
        self.filter(Kind::Attribute, Some(name))
            .next()
            .and_then(Node::as_attribute)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if more than one attribute matches.
    pub fn optional_attribute(&self, name: &str) -> Result<Option<&Attribute>> {
        self.optional(Kind::Attribute, name, Node::as_attribute)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless exactly one attribute matches.
    pub fn required_attribute(&self, name: &str) -> Result<&Attribute> {
        self.required(Kind::Attribute, name, Node::as_attribute)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if no attribute matches.
    pub fn one_or_more_attributes(&self, name: &str) -> Result<Vec<&Attribute>> {
        self.one_or_more(Kind::Attribute, name, Node::as_attribute)
    }

    // Empty nodes

    #[must_use]
    pub fn empty_nodes(&self) -> Vec<&EmptyNode> {
        self.nodes.iter().filter_map(Node::as_empty_node).collect()
    }

    /// `true` when there are no elements and no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_named_nodes(None)
    }

    // Schema assertions

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the name differs (ignoring case).
    pub fn assure_name(&self, name: &str) -> Result<&Self> {
        if !self.has_name(name) {
            return Err(Error::query(format!(
                "Element with name \"{}\" expected but found \"{}\"",
                name, self.name
            )));
        }
        Ok(self)
    }

    fn assure_names(&self, kind: Kind, names: &[&str]) -> Result<&Self> {
        for node in self.filter(kind, None) {
            let name = node.name().unwrap_or_default();
            if !names.iter().any(|allowed| equals_ignore_case(allowed, name)) {
                return Err(Error::query(format!(
                    "Not allowed {} with name \"{}\" found in element \"{}\"",
                    kind.label(),
                    name,
                    self.name
                )));
            }
        }
        Ok(self)
    }

    /// Every child element must carry one of `names`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] naming the first element that does not.
    pub fn assure_element_names(&self, names: &[&str]) -> Result<&Self> {
        self.assure_names(Kind::Element, names)
    }

    /// Every attribute must carry one of `names`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] naming the first attribute that does not.
    pub fn assure_attribute_names(&self, names: &[&str]) -> Result<&Self> {
        self.assure_names(Kind::Attribute, names)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the element has child elements.
    pub fn assure_no_elements(&self) -> Result<&Self> {
        if self.has_elements(None) {
            return Err(Error::query(format!(
                "Element with name \"{}\" cannot have elements",
                self.name
            )));
        }
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the element has attributes.
    pub fn assure_no_attributes(&self) -> Result<&Self> {
        if self.has_attributes(None) {
            return Err(Error::query(format!(
                "Element with name \"{}\" cannot have attributes",
                self.name
            )));
        }
        Ok(self)
    }

    fn assure_count(&self, kind: Kind, count: usize, name: Option<&str>) -> Result<&Self> {
        if self.count(kind, name) != count {
            let suffix = name
                .map(|name| format!(" with name \"{}\"", name))
                .unwrap_or_default();
            return Err(Error::query(format!(
                "Element with name \"{}\" must have {} {}(s){}",
                self.name,
                count,
                kind.label(),
                suffix
            )));
        }
        Ok(self)
    }

    fn assure_count_min_max(
        &self,
        kind: Kind,
        min: Option<usize>,
        max: Option<usize>,
        name: Option<&str>,
    ) -> Result<&Self> {
        let count = self.count(kind, name);
        let suffix = name
            .map(|name| format!(" with name \"{}\"", name))
            .unwrap_or_default();
        if let Some(min) = min.filter(|&min| count < min) {
            return Err(Error::query(format!(
                "Element \"{}\" must have a minimum {} count of {}{} but has {}",
                self.name,
                kind.label(),
                min,
                suffix,
                count
            )));
        }
        if let Some(max) = max.filter(|&max| count > max) {
            return Err(Error::query(format!(
                "Element \"{}\" must have a maximum {} count of {}{} but has {}",
                self.name,
                kind.label(),
                max,
                suffix,
                count
            )));
        }
        Ok(self)
    }

    /// Requires exactly `count` child elements, optionally only those named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] on a count mismatch.
    pub fn assure_element_count(&self, count: usize, name: Option<&str>) -> Result<&Self> {
        self.assure_count(Kind::Element, count, name)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the element count is outside `min..=max`.
    pub fn assure_element_count_min_max(
        &self,
        min: Option<usize>,
        max: Option<usize>,
        name: Option<&str>,
    ) -> Result<&Self> {
        self.assure_count_min_max(Kind::Element, min, max, name)
    }

    /// Requires exactly `count` attributes, optionally only those named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] on a count mismatch.
    pub fn assure_attribute_count(&self, count: usize, name: Option<&str>) -> Result<&Self> {
        self.assure_count(Kind::Attribute, count, name)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the attribute count is outside `min..=max`.
    pub fn assure_attribute_count_min_max(
        &self,
        min: Option<usize>,
        max: Option<usize>,
        name: Option<&str>,
    ) -> Result<&Self> {
        self.assure_count_min_max(Kind::Attribute, min, max, name)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the element has any named child.
    pub fn assure_empty(&self) -> Result<&Self> {
        if !self.is_empty() {
            return Err(Error::query(format!(
                "Element with name \"{}\" must be empty",
                self.name
            )));
        }
        Ok(self)
    }

    /// Requires exactly one of the listed elements or attributes to be present,
    /// once. With `can_be_empty` none of them may be present either.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if both lists are empty, if two of the listed
    /// names are present, if the chosen one occurs more than once, or if none
    /// is present and `can_be_empty` is false.
    pub fn assure_choice(
        &self,
        element_names: &[&str],
        attribute_names: &[&str],
        can_be_empty: bool,
    ) -> Result<&Self> {
        if element_names.is_empty() && attribute_names.is_empty() {
            return Err(Error::query("No element or attribute names specified"));
        }
        let mut found: Option<(Kind, &str)> = None;
        let candidates = element_names
            .iter()
            .map(|name| (Kind::Element, *name))
            .chain(attribute_names.iter().map(|name| (Kind::Attribute, *name)));
        for (kind, name) in candidates {
            if self.filter(kind, Some(name)).next().is_none() {
                continue;
            }
            if let Some((found_kind, found_name)) = found {
                return Err(Error::query(format!(
                    "Element \"{}\" cannot contain an {} \"{}\" and an {} \"{}\"",
                    self.name,
                    found_kind.label(),
                    found_name,
                    kind.label(),
                    name
                )));
            }
            self.assure_count(kind, 1, Some(name))?;
            found = Some((kind, name));
        }
        if found.is_none() && !can_be_empty {
            let mut expected = Vec::new();
            if !element_names.is_empty() {
                expected.push(format!("elements: {}", element_names.join(", ")));
            }
            if !attribute_names.is_empty() {
                expected.push(format!("attributes: {}", attribute_names.join(", ")));
            }
            return Err(Error::query(format!(
                "Element \"{}\" must contain one of the following {}",
                self.name,
                expected.join(" or ")
            )));
        }
        Ok(self)
    }

    /// Column-aligns the values of the direct attribute children.
    ///
    /// Column widths are measured in characters of the serialized values.
    /// `max_columns` limits how many leading columns are padded and
    /// `right_aligned[i]` right-aligns column `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `whitespace_between` is empty or not
    /// whitespace.
    pub fn align_attributes(
        &mut self,
        whitespace_between: &str,
        max_columns: Option<usize>,
        right_aligned: Option<&[bool]>,
    ) -> Result<()> {
        wsv::validate_whitespace(whitespace_between, false)?;
        let rows: Vec<Vec<usize>> = self
            .filter(Kind::Attribute, None)
            .filter_map(Node::as_attribute)
            .map(|attribute| {
                std::iter::once(Some(attribute.name()))
                    .chain(attribute.values_ref().iter().map(Option::as_deref))
                    .map(|value| wsv::serialize_value(value).chars().count())
                    .collect()
            })
            .collect();
        let num_columns =
            max_columns.unwrap_or_else(|| rows.iter().map(Vec::len).max().unwrap_or(0));
        let mut whitespaces: Vec<Vec<Option<String>>> = vec![vec![None]; rows.len()];

        for column in 0..num_columns {
            let width = rows
                .iter()
                .filter_map(|row| row.get(column))
                .copied()
                .max()
                .unwrap_or(0);
            let right = right_aligned
                .and_then(|flags| flags.get(column))
                .copied()
                .unwrap_or(false);
            for (row, row_whitespaces) in rows.iter().zip(whitespaces.iter_mut()) {
                let Some(&len) = row.get(column) else {
                    continue;
                };
                let fill = " ".repeat(width - len);
                let is_last = column + 1 >= row.len();
                if right {
                    if let Some(last) = row_whitespaces.last_mut() {
                        let mut padded = last.take().unwrap_or_default();
                        padded.push_str(&fill);
                        *last = Some(padded);
                    }
                    if !is_last {
                        row_whitespaces.push(Some(whitespace_between.to_string()));
                    }
                } else if !is_last {
                    row_whitespaces.push(Some(fill + whitespace_between));
                }
            }
        }

        let attributes = self.nodes.iter_mut().filter_map(Node::as_attribute_mut);
        for (attribute, row_whitespaces) in attributes.zip(whitespaces) {
            attribute.set_trivia_unchecked(Some(row_whitespaces), attribute.trivia.comment.clone());
        }
        Ok(())
    }

    // Serialization

    /// Serializes with the end keyword `End` and tab indentation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if any element is named `End`.
    pub fn serialize(&self, preserve_whitespace_and_comments: bool) -> Result<String> {
        serializer::element_to_string(self, preserve_whitespace_and_comments)
    }

    /// Serializes without indentation or comments and with `-` as end keyword.
    ///
    /// # Errors
    ///
    /// Never fails in practice: the null end keyword cannot collide with a name.
    pub fn to_minified_string(&self) -> Result<String> {
        serializer::element_to_minified_string(self)
    }

    /// Exports the element as one value list per line (non-preserving).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if an element is named `End` and
    /// `minified` is false.
    pub fn to_jagged_array(&self, minified: bool) -> Result<Vec<Vec<Option<String>>>> {
        let end_keyword = if minified { None } else { Some("End") };
        serializer::jagged_array(self, end_keyword)
    }
}

fn not_found(owner: &str, kind: Kind, name: &str) -> Error {
    Error::query(format!(
        "Element \"{}\" does not contain a \"{}\" {}",
        owner,
        name,
        kind.label()
    ))
}

/// Pushes `child` and returns the stored copy through `project`.
fn push_child<T: Into<Node>, U>(
    nodes: &mut Vec<Node>,
    child: T,
    project: fn(&mut Node) -> Option<&mut U>,
) -> &mut U {
    nodes.push(child.into());
    let Some(child) = nodes.last_mut().and_then(project) else {
        unreachable!("project matches the variant `child` converts into")
    };
    child
}
