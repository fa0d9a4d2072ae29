//! Comparing the text and binary forms of a document.
//!
//! Run with: cargo run --example binary

use sml::{from_binary, sml, to_binary, Document};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let doc = Document::new(sml!("Points" {
        "Point" => [0, 0],
        "Point" => [10, 5],
        "Point" => [3, 7],
        "Label" { "Text" => ["origin", null] },
    }));

    let text = doc.serialize(false)?;
    let bytes = to_binary(&doc)?;
    println!("Text ({} bytes):\n{}\n", text.len(), text);
    println!("Binary ({} bytes): {:02X?}\n", bytes.len(), bytes);

    let decoded = from_binary(&bytes)?;
    assert_eq!(decoded.serialize(false)?, text);
    println!("✓ Round-trip successful");

    Ok(())
}
