use sml::{sml, to_string, Document, Element};

#[test]
fn test_sml_macro_root_only() {
    let root = sml!("Root" {});
    assert_eq!(root, Element::new("Root"));
}

#[test]
fn test_sml_macro_values() {
    let root = sml!("Root" {
        "Text" => ["hello world"],
        "Numbers" => [1, 0, 2.5],
        "Flags" => [true, false],
        "Nulls" => [null, null],
    });
    let numbers = root.attribute("Numbers").unwrap();
    assert_eq!(numbers.get_string(0).unwrap(), "1");
    assert_eq!(numbers.get_float(2).unwrap(), 2.5);
    assert!(!root.attribute("Flags").unwrap().get_bool(1).unwrap());
    assert_eq!(root.attribute("Nulls").unwrap().values(), vec![None, None]);
    assert_eq!(root.attribute("Text").unwrap().as_string().unwrap(), "hello world");
}

#[test]
fn test_sml_macro_serializes() {
    let doc = Document::new(sml!("Configuration" {
        "Video" {
            "Resolution" => [1280, 720],
        },
        "Player" {
            "Name" => ["Hero 123"]
        }
    }));
    assert_eq!(
        to_string(&doc).unwrap(),
        "Configuration\n\tVideo\n\t\tResolution 1280 720\n\tEnd\n\tPlayer\n\t\tName \"Hero 123\"\n\tEnd\nEnd"
    );
}

#[test]
fn test_sml_macro_matches_parse() {
    let built = sml!("Root" {
        "Sub" { "A" => [1] },
        "B" => ["x", null]
    });
    let parsed = Document::parse("Root\nSub\nA 1\nEnd\nB x -\nEnd", false).unwrap();
    assert_eq!(built, parsed.root);
}
