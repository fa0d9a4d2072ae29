use sml::binary::{self, decode, decode_node, encode, encode_element, encode_root};
use sml::{from_str, sml, Attribute, Document, Element, Error, Node};

fn non_preserving(doc: &Document) -> String {
    doc.serialize(false).unwrap()
}

#[test]
fn test_root_has_no_terminator() {
    let doc = from_str("A\nEnd").unwrap();
    let bytes = encode(&doc);
    assert_eq!(bytes, b"BSML1\x04A");
    let back = decode(&bytes).unwrap();
    assert_eq!(back.root.name(), "A");
    assert!(back.root.nodes().is_empty());
    assert_eq!(back.end_keyword.as_deref(), Some("End"));
}

#[test]
fn test_round_trip_keeps_structure() {
    let text = "\
Configuration # comment
  Video
    Resolution 1280 720
    Title \"A \"\"quoted\"\" name\"
    Missing - -
    Empty \"\"
  End

  Nested
    Deeper
      Deepest
        Leaf x
      End
    End
  End
End";
    let doc = from_str(text).unwrap();
    let back = decode(&encode(&doc)).unwrap();
    assert_eq!(non_preserving(&back), non_preserving(&doc));
}

#[test]
fn test_empty_names_use_reserved_headers() {
    let mut root = Element::new("");
    root.add_node(Attribute::with_string("", ""));
    root.add_element("");
    let bytes = encode_root(&root);
    assert_eq!(bytes, b"BSML1\x02\x01\x02\x00\x02\x00");
    let back = decode(&bytes).unwrap();
    assert_eq!(back.root, root);
}

#[test]
fn test_multibyte_names_count_utf8_bytes() {
    let root = sml!("Ä" { "Ö" => ["ü"] });
    let bytes = encode_root(&root);
    // "Ä" is two bytes: (2 + 1) << 1 = 6
    assert_eq!(&bytes[5..8], &[0x06, 0xC3, 0x84]);
    assert_eq!(decode(&bytes).unwrap().root, root);
}

#[test]
fn test_long_values_use_multi_byte_varints() {
    let value = "x".repeat(300);
    let mut root = Element::new("Root");
    root.add_node(Attribute::with_string("Big", &value));
    let back = decode(&encode_root(&root)).unwrap();
    assert_eq!(back.root.attribute("Big").unwrap().as_string().unwrap(), value);
}

#[test]
fn test_framing_errors() {
    assert_eq!(decode(b"").unwrap_err(), Error::NoPreamble);
    assert_eq!(decode(b"XSML1\x04A").unwrap_err(), Error::NoPreamble);
    assert_eq!(decode(b"BSML2\x04A").unwrap_err(), Error::UnsupportedVersion('2'));
    assert_eq!(binary::version(b"BSML1").unwrap(), '1');
    assert_eq!(binary::version_or_none(b"BSM"), None);
}

#[test]
fn test_corrupt_bodies() {
    let cases: &[&[u8]] = &[
        b"BSML1",                     // no root header
        b"BSML1\x00",                 // terminator as root
        b"BSML1\x03A\x00",            // attribute as root
        b"BSML1\x04A\x00",            // terminator at root level
        b"BSML1\x04A\x04B",           // nested element never closed
        b"BSML1\x04A\x03B\x031",      // attribute never ended
        b"BSML1\x04A\x03B\x00",       // attribute without values
        b"BSML1\x06A",                // truncated name
        b"BSML1\x04A\x80",            // truncated varint
        b"BSML1\x04A\x03B\x09xy\x00", // truncated value
    ];
    for bytes in cases {
        assert_eq!(decode(bytes).unwrap_err(), Error::InvalidBinary, "{:?}", bytes);
    }
}

#[test]
fn test_nested_node_coding() {
    let element = sml!("Sub" { "A" => ["1"] });
    let bytes = encode_element(&element);
    assert_eq!(bytes, b"\x08Sub\x03A\x031\x00\x00");
    assert_eq!(decode_node(&bytes).unwrap(), Some(Node::Element(element)));

    assert_eq!(decode_node(b"").unwrap(), None);
    assert_eq!(decode_node(b"\x00").unwrap_err(), Error::InvalidBinary);
    assert_eq!(decode_node(b"\x08Sub\x00\x00").unwrap_err(), Error::InvalidBinary);
}

#[test]
fn test_document_binary_methods() {
    let doc = from_str("Root\n  A 1\nEnd").unwrap();
    let bytes = doc.to_binary().unwrap();
    assert_eq!(Document::from_binary(&bytes).unwrap().root.attribute("A").unwrap().as_int().unwrap(), 1);
}
