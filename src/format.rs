//! SML Format Reference
//!
//! This module documents the text grammar and the binary layout as
//! implemented by this library. It contains no code.
//!
//! # Overview
//!
//! SML (Simple Markup Language) describes a tree of elements and attributes
//! one line at a time. Nesting is expressed by an end keyword closing every
//! element, not by indentation, so indentation is free decoration that a
//! preserving parse keeps byte for byte.
//!
//! # Text Grammar
//!
//! Every line is tokenized into values separated by whitespace, optionally
//! followed by a `#` comment. The number of values decides the line's role:
//!
//! | Values | Meaning |
//! |--------|---------|
//! | 0 | empty node (blank or comment-only line) |
//! | 1, equal to the end keyword | closes the innermost open element |
//! | 1, anything else | opens an element with that name |
//! | 2 or more | attribute: name followed by its values |
//!
//! ```text
//! # Before the root
//! Configuration
//!   Video
//!     Resolution 1280 720
//!     RefreshRate 60
//!   End
//!   Player
//!     Name "Hero 123"
//!   End
//! End
//! ```
//!
//! ## Values
//!
//! - A value containing whitespace, `#` or `"` is written in double quotes
//! - `""` inside quotes is one double quote; `"/"` between quoted parts is a line feed
//! - `-` unquoted is the null value; `"-"` is the string `-`
//! - `""` is the empty string
//!
//! ## End keyword
//!
//! The end keyword is not fixed. A parser that is not told which one to use
//! takes the single value of the last non-empty line; `-` means a null end
//! keyword. Comparison of the keyword and of names is case-insensitive.
//! Element names must never equal the end keyword, which the serializer
//! enforces.
//!
//! ## Errors
//!
//! Parse errors carry the zero-based index of the offending line and display
//! it one-based:
//!
//! - `Only one root element allowed`
//! - `Root element expected`
//! - `Invalid root element start`
//! - `Null value as element name is not allowed`
//! - `Null value as attribute name is not allowed`
//! - `End keyword could not be detected`
//! - `Element "<name>" not closed`
//!
//! # Binary Layout
//!
//! ```text
//! "BSML" '1' <root header> <root content>
//! ```
//!
//! All integers are unsigned LEB128 varints. A header's low bit tells
//! attributes and elements apart:
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `0` | end of the current element's children |
//! | even `n > 0` | element, name of `n / 2 - 1` UTF-8 bytes follows |
//! | odd `n` | attribute, name of `n / 2` UTF-8 bytes follows |
//!
//! Attribute values follow the attribute name until an end marker:
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `0` | end of the attribute |
//! | `1` | null value |
//! | `n >= 2` | string of `n - 2` UTF-8 bytes follows |
//!
//! The root element's children run to the end of the buffer and carry no
//! terminator; every nested element ends with exactly one `0`. Trailing
//! bytes, a stray terminator at root level and truncated input are all
//! rejected as invalid binary SML.
//!
//! ```text
//! Root            42 53 4D 4C 31  0A 52 6F 6F 74
//!   A 1 -         03 41 03 31 01 00
//!   Sub           08 53 75 62
//!   End           00
//! End
//! ```
//!
//! # Encodings
//!
//! Text documents begin with a byte order mark naming one of UTF-8,
//! UTF-16 big or little endian, or UTF-32 big endian. The binary form is
//! always UTF-8 internally.
