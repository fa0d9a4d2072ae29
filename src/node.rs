//! The closed set of SML node kinds.
//!
//! Every line of an SML document maps to exactly one [`Node`]:
//!
//! - [`Element`]: a name line that opens a child list, closed by the end keyword
//! - [`Attribute`]: a name followed by one or more values
//! - [`EmptyNode`]: a blank or comment-only line
//!
//! All kinds carry optional leading whitespace fragments and an optional
//! comment. Whitespace left unset (`None`) is materialized from the document's
//! default indentation when serializing.

use crate::attribute::Attribute;
use crate::element::Element;
use crate::error::Result;
use crate::wsv;

/// Whitespace and comment decoration of a line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Trivia {
    pub(crate) whitespaces: Option<Vec<Option<String>>>,
    pub(crate) comment: Option<String>,
}

impl Trivia {
    pub(crate) fn new(
        whitespaces: Option<Vec<Option<String>>>,
        comment: Option<String>,
    ) -> Result<Self> {
        let mut trivia = Trivia::default();
        trivia.set_whitespaces(whitespaces)?;
        trivia.set_comment(comment)?;
        Ok(trivia)
    }

    pub(crate) fn set_whitespaces(&mut self, values: Option<Vec<Option<String>>>) -> Result<()> {
        if let Some(values) = &values {
            wsv::validate_whitespaces(values)?;
        }
        self.whitespaces = values;
        Ok(())
    }

    pub(crate) fn set_comment(&mut self, value: Option<String>) -> Result<()> {
        if let Some(value) = &value {
            wsv::validate_comment(value)?;
        }
        self.comment = value;
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.whitespaces = None;
        self.comment = None;
    }
}

/// Generates the validated whitespace/comment accessors shared by all node types.
macro_rules! trivia_accessors {
    ($field:ident) => {
        /// Returns a copy of the leading whitespace fragments.
        #[must_use]
        pub fn whitespaces(&self) -> Option<Vec<Option<String>>> {
            self.$field.whitespaces.clone()
        }

        /// Replaces the whitespace fragments.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Construction`](crate::Error::Construction) if any
        /// fragment contains a non-whitespace character.
        pub fn set_whitespaces(&mut self, values: Option<Vec<Option<String>>>) -> crate::Result<()> {
            self.$field.set_whitespaces(values)
        }

        #[must_use]
        pub fn has_whitespaces(&self) -> bool {
            self.$field.whitespaces.is_some()
        }

        #[must_use]
        pub fn comment(&self) -> Option<&str> {
            self.$field.comment.as_deref()
        }

        /// Replaces the comment.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Construction`](crate::Error::Construction) if the
        /// comment contains a line feed.
        pub fn set_comment(&mut self, value: Option<&str>) -> crate::Result<()> {
            self.$field.set_comment(value.map(str::to_string))
        }

        #[must_use]
        pub fn has_comment(&self) -> bool {
            self.$field.comment.is_some()
        }

        /// Parser fast path: assigns decoration without validation.
        pub(crate) fn set_trivia_unchecked(
            &mut self,
            whitespaces: Option<Vec<Option<String>>>,
            comment: Option<String>,
        ) {
            self.$field.whitespaces = whitespaces;
            self.$field.comment = comment;
        }
    };
}

pub(crate) use trivia_accessors;

/// Compares names ignoring case but not accents.
///
/// Case folding is per character, so a character whose uppercase form is
/// several characters (`ß` and `SS`) does not match that form.
pub(crate) fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// A blank or comment-only line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmptyNode {
    pub(crate) trivia: Trivia,
}

impl EmptyNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty node with decoration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`](crate::Error::Construction) for invalid
    /// whitespace or a multi-line comment.
    pub fn with_trivia(whitespaces: Option<Vec<Option<String>>>, comment: Option<&str>) -> Result<Self> {
        Ok(EmptyNode {
            trivia: Trivia::new(whitespaces, comment.map(str::to_string))?,
        })
    }

    trivia_accessors!(trivia);

    pub fn minify(&mut self) {
        self.trivia.clear();
    }
}

/// A node of an element's child list.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Attribute(Attribute),
    Empty(EmptyNode),
}

impl Node {
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    #[must_use]
    pub fn is_attribute(&self) -> bool {
        matches!(self, Node::Attribute(_))
    }

    #[must_use]
    pub fn is_empty_node(&self) -> bool {
        matches!(self, Node::Empty(_))
    }

    /// Elements and attributes are named; empty nodes are not.
    #[must_use]
    pub fn is_named_node(&self) -> bool {
        !self.is_empty_node()
    }

    /// Returns the name of an element or attribute.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element(e) => Some(e.name()),
            Node::Attribute(a) => Some(a.name()),
            Node::Empty(_) => None,
        }
    }

    /// Case-insensitive name check; always `false` for empty nodes.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name().is_some_and(|n| equals_ignore_case(n, name))
    }

    #[must_use]
    pub fn is_element_with_name(&self, name: &str) -> bool {
        self.is_element() && self.has_name(name)
    }

    #[must_use]
    pub fn is_attribute_with_name(&self, name: &str) -> bool {
        self.is_attribute() && self.has_name(name)
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Node::Attribute(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_attribute_mut(&mut self) -> Option<&mut Attribute> {
        match self {
            Node::Attribute(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_empty_node(&self) -> Option<&EmptyNode> {
        match self {
            Node::Empty(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_empty_node_mut(&mut self) -> Option<&mut EmptyNode> {
        match self {
            Node::Empty(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn trivia(&self) -> &Trivia {
        match self {
            Node::Element(e) => &e.trivia,
            Node::Attribute(a) => &a.trivia,
            Node::Empty(n) => &n.trivia,
        }
    }

    /// Returns a copy of the leading whitespace fragments.
    #[must_use]
    pub fn whitespaces(&self) -> Option<Vec<Option<String>>> {
        self.trivia().whitespaces.clone()
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.trivia().comment.as_deref()
    }

    /// Clears decoration recursively and drops nested empty nodes.
    pub fn minify(&mut self) {
        match self {
            Node::Element(e) => e.minify(),
            Node::Attribute(a) => a.minify(),
            Node::Empty(n) => n.minify(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Attribute> for Node {
    fn from(attribute: Attribute) -> Self {
        Node::Attribute(attribute)
    }
}

impl From<EmptyNode> for Node {
    fn from(node: EmptyNode) -> Self {
        Node::Empty(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let nodes: [(Node, [bool; 6]); 3] = [
            (Element::new("Test").into(), [true, false, false, true, true, false]),
            (
                Attribute::new("Test", vec![None]).unwrap().into(),
                [false, true, false, true, false, true],
            ),
            (EmptyNode::new().into(), [false, false, true, false, false, false]),
        ];
        for (node, expected) in nodes {
            assert_eq!(
                [
                    node.is_element(),
                    node.is_attribute(),
                    node.is_empty_node(),
                    node.is_named_node(),
                    node.is_element_with_name("TEST"),
                    node.is_attribute_with_name("test"),
                ],
                expected
            );
        }
    }

    #[test]
    fn test_whitespaces_are_copied_and_validated() {
        let mut node = EmptyNode::new();
        assert!(!node.has_whitespaces());
        node.set_whitespaces(Some(vec![Some(" ".into()), Some("\t".into())]))
            .unwrap();
        let mut copy = node.whitespaces().unwrap();
        copy[0] = Some("a".into());
        assert_eq!(node.whitespaces().unwrap()[0].as_deref(), Some(" "));
        assert!(node.set_whitespaces(Some(copy)).is_err());
        node.set_whitespaces(None).unwrap();
        assert!(!node.has_whitespaces());
    }

    #[test]
    fn test_comment_rejects_line_feed() {
        let mut node = EmptyNode::new();
        node.set_comment(Some("Test")).unwrap();
        assert_eq!(node.comment(), Some("Test"));
        assert!(node.set_comment(Some("\n")).is_err());
        assert_eq!(node.comment(), Some("Test"));
        node.minify();
        assert!(!node.has_comment());
    }

    #[test]
    fn test_equals_ignore_case() {
        assert!(equals_ignore_case("Test", "tEST"));
        assert!(equals_ignore_case("STRASSE", "strasse"));
        assert!(equals_ignore_case("ÄPFEL", "äpfel"));
        assert!(!equals_ignore_case("Apfel", "Äpfel"));
    }
}
