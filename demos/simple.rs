//! Parsing, querying and writing an SML document.
//!
//! Run with: cargo run --example simple

use sml::{from_str, to_string, to_string_with_options, SmlOptions};
use std::error::Error;

const TEXT: &str = "\
# Game settings
Configuration
  Video
    Resolution 1280 720
    Fullscreen true
  End
  Player
    Name \"Hero 123\"  # shown in the lobby
  End
End";

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = from_str(TEXT)?;

    let video = doc.root.required_element("Video")?;
    let resolution = video.required_attribute("Resolution")?.as_int_array(Some(2), Some(2))?;
    println!("Resolution: {}x{}", resolution[0], resolution[1]);
    println!("Fullscreen: {}", video.required_attribute("Fullscreen")?.as_bool()?);

    // Edit in place; untouched lines keep their formatting
    doc.root
        .element_mut("Player")?
        .attribute_mut("Name")?
        .set_string("Hero 456");
    println!("\nEdited:\n{}\n", to_string(&doc)?);

    println!("Minified:\n{}", to_string_with_options(&doc, &SmlOptions::minified())?);

    Ok(())
}
