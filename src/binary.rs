//! Binary SML: a compact, non-preserving encoding of the element tree.
//!
//! ## Layout
//!
//! ```text
//! "BSML" '1' <root element header> <root children...>
//! ```
//!
//! Every structural unit starts with a varint (see [`crate::varint`]) whose
//! low bit tells the kinds apart:
//!
//! | Varint | Meaning |
//! |--------|---------|
//! | `0` | end of the current element's children |
//! | even `h > 0` | element header, name is `(h >> 1) - 1` bytes |
//! | odd `h` | attribute header, name is `h >> 1` bytes |
//!
//! An attribute header is followed by its values and a closing `0`:
//!
//! | Varint | Meaning |
//! |--------|---------|
//! | `0` | end of the attribute |
//! | `1` | null value |
//! | `n >= 2` | string value of `n - 2` bytes |
//!
//! The root element runs to the end of the buffer and is never terminated;
//! every nested element ends with exactly one `0`. Whitespace, comments and
//! empty nodes are not encoded.
//!
//! ## Examples
//!
//! ```rust
//! use sml::{binary, Document};
//!
//! let doc = Document::parse("A\nEnd", true).unwrap();
//! let bytes = binary::encode(&doc);
//! assert_eq!(bytes, b"BSML1\x04A");
//! assert_eq!(binary::decode(&bytes).unwrap().root.name(), "A");
//! ```

use crate::attribute::Attribute;
use crate::document::Document;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::varint::{write_varint, ByteReader};

/// Magic bytes opening every binary SML document.
pub const MAGIC: &[u8; 4] = b"BSML";

/// The only format version this crate reads and writes.
pub const VERSION: u8 = b'1';

const PREAMBLE_LEN: usize = MAGIC.len() + 1;

const ELEMENT_END: u64 = 0;
const ATTRIBUTE_END: u64 = 0;
const NULL_VALUE: u64 = 1;
const STRING_OFFSET: u64 = 2;

fn element_header(name_len: usize) -> u64 {
    (name_len as u64 + 1) << 1
}

fn attribute_header(name_len: usize) -> u64 {
    ((name_len as u64) << 1) | 1
}

fn write_element_start(buf: &mut Vec<u8>, element: &Element) {
    write_varint(buf, element_header(element.name().len()));
    buf.extend_from_slice(element.name().as_bytes());
}

fn write_attribute(buf: &mut Vec<u8>, attribute: &Attribute) {
    write_varint(buf, attribute_header(attribute.name().len()));
    buf.extend_from_slice(attribute.name().as_bytes());
    for value in attribute.values_ref() {
        match value {
            None => write_varint(buf, NULL_VALUE),
            Some(value) => {
                write_varint(buf, value.len() as u64 + STRING_OFFSET);
                buf.extend_from_slice(value.as_bytes());
            }
        }
    }
    write_varint(buf, ATTRIBUTE_END);
}

fn write_element(buf: &mut Vec<u8>, element: &Element) {
    write_element_start(buf, element);
    for child in element.nodes() {
        write_node(buf, child);
    }
    write_varint(buf, ELEMENT_END);
}

fn write_node(buf: &mut Vec<u8>, node: &Node) {
    match node {
        Node::Element(element) => write_element(buf, element),
        Node::Attribute(attribute) => write_attribute(buf, attribute),
        Node::Empty(_) => {}
    }
}

/// Encodes a document's root, preamble included.
#[must_use]
pub fn encode(document: &Document) -> Vec<u8> {
    let bytes = encode_root(&document.root);
    tracing::debug!(
        "Encoded binary SML document with root \"{}\" into {} bytes",
        document.root.name(),
        bytes.len()
    );
    bytes
}

/// Encodes `element` as a root: preamble, header and children, no terminator.
#[must_use]
pub fn encode_root(element: &Element) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    write_element_start(&mut buf, element);
    for child in element.nodes() {
        write_node(&mut buf, child);
    }
    buf
}

/// Encodes `element` as a nested element, terminator included.
#[must_use]
pub fn encode_element(element: &Element) -> Vec<u8> {
    let mut buf = Vec::new();
    write_element(&mut buf, element);
    buf
}

#[must_use]
pub fn encode_attribute(attribute: &Attribute) -> Vec<u8> {
    let mut buf = Vec::new();
    write_attribute(&mut buf, attribute);
    buf
}

/// Encodes one node in nested form; empty nodes produce no bytes.
#[must_use]
pub fn encode_node(node: &Node) -> Vec<u8> {
    let mut buf = Vec::new();
    write_node(&mut buf, node);
    buf
}

#[must_use]
pub fn encode_nodes(nodes: &[Node]) -> Vec<u8> {
    let mut buf = Vec::new();
    for node in nodes {
        write_node(&mut buf, node);
    }
    buf
}

/// Returns the version character, or `None` without a valid preamble.
#[must_use]
pub fn version_or_none(bytes: &[u8]) -> Option<char> {
    if bytes.len() < PREAMBLE_LEN || !bytes.starts_with(MAGIC) {
        return None;
    }
    Some(char::from(bytes[MAGIC.len()]))
}

/// Returns the version character of the preamble.
///
/// # Errors
///
/// Returns [`Error::NoPreamble`] when the magic bytes are missing.
pub fn version(bytes: &[u8]) -> Result<char> {
    version_or_none(bytes).ok_or(Error::NoPreamble)
}

fn read_text(reader: &mut ByteReader<'_>, len: u64) -> Result<String> {
    let bytes = reader.read_bytes(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidBinary)
}

fn read_attribute(reader: &mut ByteReader<'_>, header: u64) -> Result<Attribute> {
    let name = read_text(reader, header >> 1)?;
    let mut values = Vec::new();
    loop {
        match reader.read_varint()? {
            ATTRIBUTE_END => break,
            NULL_VALUE => values.push(None),
            len => values.push(Some(read_text(reader, len - STRING_OFFSET)?)),
        }
    }
    Attribute::new(name, values).map_err(|_| Error::InvalidBinary)
}

fn read_element_name(reader: &mut ByteReader<'_>, header: u64) -> Result<Element> {
    Ok(Element::new(read_text(reader, (header >> 1) - 1)?))
}

/// Reads the children of `element`. A nested element stops at its
/// terminator; the root consumes the rest of the buffer.
fn read_content(reader: &mut ByteReader<'_>, mut element: Element, nested: bool) -> Result<Element> {
    let mut open: Vec<Element> = Vec::new();
    loop {
        if reader.is_empty() {
            if nested || !open.is_empty() {
                return Err(Error::InvalidBinary);
            }
            return Ok(element);
        }
        match reader.read_varint()? {
            ELEMENT_END => match open.pop() {
                Some(child) => open.last_mut().unwrap_or(&mut element).add_node(child),
                None if nested => return Ok(element),
                None => return Err(Error::InvalidBinary),
            },
            header if header & 1 == 1 => {
                let attribute = read_attribute(reader, header)?;
                open.last_mut().unwrap_or(&mut element).add_node(attribute);
            }
            header => open.push(read_element_name(reader, header)?),
        }
    }
}

/// Decodes a binary SML document. The result has the end keyword `End`.
///
/// # Errors
///
/// Returns [`Error::NoPreamble`] or [`Error::UnsupportedVersion`] for bad
/// framing, and [`Error::InvalidBinary`] for a truncated or corrupt body,
/// a stray terminator at the root level, or trailing bytes.
pub fn decode(bytes: &[u8]) -> Result<Document> {
    let version = version(bytes)?;
    if version != char::from(VERSION) {
        return Err(Error::UnsupportedVersion(version));
    }
    let mut reader = ByteReader::new(&bytes[PREAMBLE_LEN..]);
    let header = reader.read_varint()?;
    if header == ELEMENT_END || header & 1 == 1 {
        return Err(Error::InvalidBinary);
    }
    let root = read_element_name(&mut reader, header)?;
    let root = read_content(&mut reader, root, false)?;
    tracing::debug!(
        "Decoded binary SML document with root \"{}\" from {} bytes",
        root.name(),
        bytes.len()
    );
    Ok(Document::new(root))
}

/// Decodes exactly one nested node. An empty buffer yields `None`.
///
/// # Errors
///
/// Returns [`Error::InvalidBinary`] for a leading terminator, a missing
/// terminator, a corrupt body or trailing bytes.
pub fn decode_node(bytes: &[u8]) -> Result<Option<Node>> {
    let mut reader = ByteReader::new(bytes);
    if reader.is_empty() {
        return Ok(None);
    }
    let node = match reader.read_varint()? {
        ELEMENT_END => return Err(Error::InvalidBinary),
        header if header & 1 == 1 => Node::Attribute(read_attribute(&mut reader, header)?),
        header => {
            let element = read_element_name(&mut reader, header)?;
            Node::Element(read_content(&mut reader, element, true)?)
        }
    };
    if !reader.is_empty() {
        return Err(Error::InvalidBinary);
    }
    Ok(Some(node))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: &[u8] = b"BSML1";

    fn with_preamble(body: &[u8]) -> Vec<u8> {
        [PREAMBLE, body].concat()
    }

    #[test]
    fn test_reserved_values() {
        // (what, bytes) pairs pin every reserved header and value code.
        let element = Element::new("");
        assert_eq!(encode_element(&element), vec![0x02, 0x00]);
        assert_eq!(encode_root(&element), with_preamble(&[0x02]));

        let attribute = Attribute::new("", vec![None]).unwrap();
        assert_eq!(encode_attribute(&attribute), vec![0x01, 0x01, 0x00]);

        let attribute = Attribute::new("A", vec![Some(String::new())]).unwrap();
        assert_eq!(encode_attribute(&attribute), vec![0x03, b'A', 0x02, 0x00]);

        let attribute = Attribute::new("A", vec![Some("xy".into()), None]).unwrap();
        assert_eq!(
            encode_attribute(&attribute),
            vec![0x03, b'A', 0x04, b'x', b'y', 0x01, 0x00]
        );

        let element = Element::new("AB");
        assert_eq!(encode_element(&element), vec![0x06, b'A', b'B', 0x00]);
    }

    #[test]
    fn test_root_has_no_terminator() {
        let doc = Document::parse("A\nEnd", true).unwrap();
        let bytes = encode(&doc);
        assert_eq!(bytes, with_preamble(&[0x04, b'A']));
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.root.name(), "A");
        assert!(decoded.root.nodes().is_empty());
        assert_eq!(decoded.end_keyword.as_deref(), Some("End"));
    }

    #[test]
    fn test_nested_structure() {
        let doc = Document::parse("E\n  A 1\n  E\n    A 2\n  End\n  A 3\nEnd", true).unwrap();
        let bytes = encode(&doc);
        assert_eq!(
            bytes,
            with_preamble(&[
                0x04, b'E', //
                0x03, b'A', 0x03, b'1', 0x00, //
                0x04, b'E', //
                0x03, b'A', 0x03, b'2', 0x00, //
                0x00, //
                0x03, b'A', 0x03, b'3', 0x00,
            ])
        );
        let decoded = decode(&bytes).unwrap();
        assert_eq!(
            decoded.to_minified_string().unwrap(),
            "E\nA 1\nE\nA 2\n-\nA 3\n-"
        );
    }

    #[test]
    fn test_long_names_use_multi_byte_headers() {
        let name = "n".repeat(100);
        let element = Element::new(name.clone());
        let bytes = encode_element(&element);
        assert_eq!(&bytes[..2], &[0xCA, 0x01]);
        let node = decode_node(&bytes).unwrap().unwrap();
        assert_eq!(node.name(), Some(name.as_str()));
    }

    #[test]
    fn test_decode_errors() {
        let cases: [&[u8]; 9] = [
            &[],
            &[0x04],
            &[0x04, b'E', 0x00],
            &[0x04, b'E', 0x03],
            &[0x04, b'E', 0x03, b'A', 0x00],
            &[0x04, b'E', 0x03, b'A', 0x01],
            &[0x04, b'E', 0x03, b'A', 0x05, b'x'],
            &[0x04, b'E', 0x04, b'F'],
            &[0x03, b'A', 0x01, 0x00],
        ];
        for body in cases {
            assert_eq!(decode(&with_preamble(body)), Err(Error::InvalidBinary), "{:?}", body);
        }
        assert_eq!(decode(&with_preamble(&[0x04, 0xFF])), Err(Error::InvalidBinary));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert_eq!(
            decode(&with_preamble(&[0x04, 0xFF, 0x03, b'A', 0x01, 0x00])),
            Err(Error::InvalidBinary)
        );
    }

    #[test]
    fn test_preamble() {
        assert_eq!(version(b"BSML1"), Ok('1'));
        assert_eq!(version(b"BSML2\x00"), Ok('2'));
        assert_eq!(version_or_none(b"BSML"), None);
        assert_eq!(version_or_none(b"XSML1"), None);
        assert_eq!(decode(b"BSM"), Err(Error::NoPreamble));
        assert_eq!(decode(b"BSML2\x04A"), Err(Error::UnsupportedVersion('2')));
    }

    #[test]
    fn test_decode_node() {
        assert_eq!(decode_node(&[]), Ok(None));
        let node = decode_node(&[0x03, b'A', 0x01, 0x00]).unwrap().unwrap();
        assert_eq!(node.as_attribute().unwrap().to_string(), "A -");
        for bad in [&[0x04, b'E'][..], &[0x03, b'A', 0x01, 0x00, 0x04], &[0x00]] {
            assert_eq!(decode_node(bad), Err(Error::InvalidBinary), "{:?}", bad);
        }
    }

    #[test]
    fn test_empty_nodes_are_skipped() {
        let mut element = Element::new("A");
        element.add_empty_node();
        assert_eq!(encode_node(&Node::Empty(Default::default())), Vec::<u8>::new());
        assert_eq!(encode_nodes(element.nodes()), Vec::<u8>::new());
        assert_eq!(encode_node(&Node::Element(element.clone())), encode_element(&element));
    }
}
