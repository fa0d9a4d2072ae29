//! Writing and reading a large document one node at a time.
//!
//! Run with: cargo run --example streaming

use sml::io::{SmlStreamReader, SmlStreamWriter};
use sml::{Attribute, Document, Element};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::temp_dir().join("sml-streaming-demo.sml");

    let template = Document::new(Element::new("Log"));
    let mut writer = SmlStreamWriter::create(&template, &path, false)?;
    for i in 0..10_000 {
        let mut entry = Element::new("Entry");
        entry.add_node(Attribute::with_string("Id", &i.to_string()));
        entry.add_node(Attribute::with_string("Message", &format!("event number {}", i)));
        writer.write_node(entry)?;
    }
    writer.close()?;

    let mut reader = SmlStreamReader::open(&path, false)?;
    let mut count = 0;
    let mut last_id = 0;
    for node in reader.by_ref() {
        let node = node?;
        if let Some(entry) = node.as_element() {
            last_id = entry.required_attribute("Id")?.as_int()?;
            count += 1;
        }
    }
    println!("Read {} entries from {}, last id {}", count, path.display(), last_id);
    println!("Root \"{}\" closed", reader.root().name());

    std::fs::remove_file(&path)?;
    Ok(())
}
