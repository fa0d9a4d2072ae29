use sml::{
    from_jagged_array, from_str, from_str_with_options, to_string, to_string_with_options,
    Attribute, Document, Element, Error, ParseErrorKind, SmlOptions,
};

const CONFIG: &str = "\
# Game settings
Configuration
  Video
    Resolution 1280 720
    RefreshRate 60
    Fullscreen true
  End
  Audio
    Volume 0.8
    Music 0.5
  End
  Player
    Name \"Hero 123\"
  End
End";

#[test]
fn test_simple_root() {
    let doc = from_str("Root\nEnd").unwrap();
    assert_eq!(doc.root.name(), "Root");
    assert!(doc.root.nodes().is_empty());
    assert_eq!(doc.end_keyword.as_deref(), Some("End"));
    assert_eq!(to_string(&doc).unwrap(), "Root\nEnd");
}

#[test]
fn test_attribute_values() {
    let doc = from_str("Root\nAttr 1 2 3\nEnd").unwrap();
    let attribute = doc.root.attribute("Attr").unwrap();
    assert_eq!(
        attribute.values(),
        vec![Some("1".to_string()), Some("2".to_string()), Some("3".to_string())]
    );
    assert_eq!(attribute.get_int_array(0).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_minify_document() {
    let mut doc = from_str("Root #c\n\tSub\n\tEnd\nEnd #c").unwrap();
    doc.minify();
    assert_eq!(to_string(&doc).unwrap(), "Root\nSub\n-\n-");
}

#[test]
fn test_missing_end_reports_last_line() {
    let err = from_str("Root\nAttr 1").unwrap_err();
    // "Attr 1" is the last line, so the end keyword cannot be detected
    assert_eq!(
        err,
        Error::Parse {
            line_index: 1,
            kind: ParseErrorKind::EndKeywordNotDetected
        }
    );

    let err = from_str("Root\nAttr 1\nSub\nEnd").unwrap_err();
    assert_eq!(
        err,
        Error::Parse {
            line_index: 3,
            kind: ParseErrorKind::ElementNotClosed("Root".to_string())
        }
    );
}

#[test]
fn test_jagged_array_matches_non_preserving_parse() {
    let rows = vec![
        vec![Some("Root".to_string())],
        vec![Some("Attribute".to_string()), Some("1".to_string()), Some("2".to_string())],
        vec![Some("End".to_string())],
    ];
    let from_rows = from_jagged_array(&rows).unwrap();
    let parsed = Document::parse("Root\nAttribute 1 2\nEnd", false).unwrap();
    assert_eq!(from_rows.root, parsed.root);
    assert_eq!(from_rows.to_jagged_array().unwrap(), rows);
}

#[test]
fn test_preserving_round_trip_of_realistic_document() {
    let doc = from_str(CONFIG).unwrap();
    assert_eq!(doc.empty_nodes_before.len(), 1);
    assert_eq!(to_string(&doc).unwrap(), CONFIG);
}

#[test]
fn test_typed_queries() {
    let doc = from_str(CONFIG).unwrap();
    let root = &doc.root;
    root.assure_name("configuration").unwrap();
    root.assure_element_names(&["Video", "Audio", "Player"]).unwrap();
    root.assure_no_attributes().unwrap();

    let video = root.required_element("Video").unwrap();
    assert_eq!(
        video.required_attribute("Resolution").unwrap().as_int_array(Some(2), Some(2)).unwrap(),
        vec![1280, 720]
    );
    assert!(video.attribute("fullscreen").unwrap().as_bool().unwrap());
    assert_eq!(root.element("Audio").unwrap().attribute("Volume").unwrap().as_float().unwrap(), 0.8);
    assert_eq!(
        root.element("Player").unwrap().attribute("Name").unwrap().as_string().unwrap(),
        "Hero 123"
    );
    assert!(root.optional_element("Network").unwrap().is_none());
    assert!(matches!(root.required_element("Network"), Err(Error::Query(_))));
}

#[test]
fn test_query_errors_for_duplicates() {
    let doc = from_str("Root\nA 1\nA 2\nEnd").unwrap();
    assert_eq!(doc.root.attribute("A").unwrap().as_int().unwrap(), 1);
    assert_eq!(doc.root.attribute_or_none("a").unwrap().as_int().unwrap(), 1);
    assert!(matches!(doc.root.optional_attribute("A"), Err(Error::Query(_))));
    assert!(matches!(doc.root.required_attribute("A"), Err(Error::Query(_))));
    assert_eq!(doc.root.one_or_more_attributes("a").unwrap().len(), 2);
    assert!(doc.root.assure_attribute_count(2, Some("A")).is_ok());
    assert!(doc.root.assure_attribute_count(1, None).is_err());
}

#[test]
fn test_case_insensitive_names() {
    let doc = from_str("Root\nTest 1\nEND").unwrap();
    let attribute = doc.root.attribute("Test").unwrap();
    assert!(attribute.has_name("Test"));
    assert!(attribute.has_name("test"));
    assert!(attribute.has_name("TEST"));
    assert!(doc.root.has_attribute("tEsT"));
}

#[test]
fn test_end_keyword_inference() {
    let doc = from_str("Root\n  Sub\n  Fin\nFin\n\n# trailing").unwrap();
    assert_eq!(doc.end_keyword.as_deref(), Some("Fin"));
    assert_eq!(doc.empty_nodes_after.len(), 2);

    let err = from_str("Root\nA 1 2\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Parse {
            kind: ParseErrorKind::EndKeywordNotDetected,
            ..
        }
    ));
}

#[test]
fn test_null_end_keyword() {
    let doc = from_str("Root\nSub\n-\n-").unwrap();
    assert_eq!(doc.end_keyword, None);
    assert!(doc.root.has_element("Sub"));
}

#[test]
fn test_empty_attribute_values_rejected() {
    assert!(matches!(Attribute::new("A", Vec::new()), Err(Error::Construction(_))));
    let mut attribute = Attribute::with_string("A", "1");
    assert!(attribute.set_values(Vec::new()).is_err());
    assert_eq!(attribute.values(), vec![Some("1".to_string())]);
}

#[test]
fn test_align_attributes() {
    let mut root = Element::new("Root");
    root.add_node(Attribute::with_string("A", "1"));
    root.add_node(Attribute::new("Long", vec![Some("22".into())]).unwrap());
    root.align_attributes(" ", None, None).unwrap();
    let doc = Document::new(root.clone());
    assert_eq!(to_string(&doc).unwrap(), "Root\n\tA    1\n\tLong 22\nEnd");

    root.align_attributes(" ", None, Some(&[false, true])).unwrap();
    let doc = Document::new(root);
    assert_eq!(to_string(&doc).unwrap(), "Root\n\tA     1\n\tLong 22\nEnd");
}

#[test]
fn test_builder_and_options() {
    let mut root = Element::new("Server");
    root.add_attribute("Host", vec![Some("example.org".into())]).unwrap();
    root.add_attribute("Port", vec![Some("0".into())])
        .unwrap()
        .set_int(8080);
    let logging = root.add_element("Logging");
    logging.add_attribute("Level", vec![None]).unwrap();
    logging.set_comment(Some(" optional")).unwrap();
    let doc = Document::new(root);

    let options = SmlOptions::new().with_indentation(Some("  "));
    let text = to_string_with_options(&doc, &options).unwrap();
    assert_eq!(
        text,
        "Server\n  Host example.org\n  Port 8080\n  Logging # optional\n    Level -\n  End\nEnd"
    );

    let back = from_str_with_options(&text, &SmlOptions::new()).unwrap();
    assert_eq!(back.root.attribute("Port").unwrap().as_int().unwrap(), 8080);
    assert_eq!(to_string(&back).unwrap(), text);
}

#[test]
fn test_element_named_like_end_keyword() {
    let mut root = Element::new("Root");
    root.add_element("end");
    let err = to_string(&Document::new(root)).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn test_only_one_root_element() {
    let err = from_str("Root\nEnd\nOther\nEnd").unwrap_err();
    assert_eq!(
        err,
        Error::Parse {
            line_index: 2,
            kind: ParseErrorKind::OnlyOneRootElementAllowed
        }
    );
    assert_eq!(err.to_string(), "Only one root element allowed (3)");
}

#[test]
fn test_tokenizer_errors_surface_as_parse_errors() {
    let err = from_str("Root\nA \"open\nEnd").unwrap_err();
    assert_eq!(
        err,
        Error::Parse {
            line_index: 1,
            kind: ParseErrorKind::StringNotClosed
        }
    );
}

#[test]
fn test_base64_document() {
    let doc = from_str("Root\n  Data \"a b\"\nEnd").unwrap();
    let text = doc.to_base64_string(true).unwrap();
    assert!(text.starts_with("Base64|") && text.ends_with('|'));
    let back = Document::from_base64_string(&text).unwrap();
    assert_eq!(to_string(&back).unwrap(), to_string(&doc).unwrap());
}
