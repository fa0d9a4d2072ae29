//! ReliableTXT text encodings.
//!
//! An SML document on disk always starts with a byte order mark that names
//! its encoding. Reading text without a BOM is an error.

use crate::error::{Error, Result};

/// Text encoding declared by a document and signalled by its BOM.
///
/// # Examples
///
/// ```rust
/// use sml::ReliableTxtEncoding;
///
/// let bytes = ReliableTxtEncoding::Utf16.encode("A");
/// assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, 0x41]);
/// assert_eq!(ReliableTxtEncoding::decode(&bytes).unwrap(), ("A".to_string(), ReliableTxtEncoding::Utf16));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReliableTxtEncoding {
    #[default]
    Utf8,
    /// Big-endian UTF-16
    Utf16,
    /// Little-endian UTF-16
    Utf16Reverse,
    /// Big-endian UTF-32
    Utf32,
}

impl ReliableTxtEncoding {
    /// Returns the byte order mark of this encoding.
    #[must_use]
    pub const fn preamble(&self) -> &'static [u8] {
        match self {
            ReliableTxtEncoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            ReliableTxtEncoding::Utf16 => &[0xFE, 0xFF],
            ReliableTxtEncoding::Utf16Reverse => &[0xFF, 0xFE],
            ReliableTxtEncoding::Utf32 => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }

    /// Detects the encoding from the leading bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] when no known BOM is present.
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        for encoding in [
            ReliableTxtEncoding::Utf32,
            ReliableTxtEncoding::Utf8,
            ReliableTxtEncoding::Utf16,
            ReliableTxtEncoding::Utf16Reverse,
        ] {
            if bytes.starts_with(encoding.preamble()) {
                return Ok(encoding);
            }
        }
        Err(Error::encoding("Document does not have a ReliableTXT preamble"))
    }

    /// Encodes `text` with this encoding, BOM included.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut bytes = self.preamble().to_vec();
        self.encode_into(text, &mut bytes);
        bytes
    }

    /// Appends the encoded form of `text` without a BOM.
    pub fn encode_into(&self, text: &str, bytes: &mut Vec<u8>) {
        match self {
            ReliableTxtEncoding::Utf8 => bytes.extend_from_slice(text.as_bytes()),
            ReliableTxtEncoding::Utf16 => {
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
            }
            ReliableTxtEncoding::Utf16Reverse => {
                bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            }
            ReliableTxtEncoding::Utf32 => {
                bytes.extend(text.chars().flat_map(|c| u32::from(c).to_be_bytes()));
            }
        }
    }

    /// Detects the BOM and decodes the remaining bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for a missing BOM, an odd byte count or an
    /// invalid code unit sequence.
    pub fn decode(bytes: &[u8]) -> Result<(String, Self)> {
        let encoding = Self::detect(bytes)?;
        let body = &bytes[encoding.preamble().len()..];
        let text = match encoding {
            ReliableTxtEncoding::Utf8 => std::str::from_utf8(body)
                .map_err(|e| Error::encoding(e.to_string()))?
                .to_string(),
            ReliableTxtEncoding::Utf16 | ReliableTxtEncoding::Utf16Reverse => {
                if body.len() % 2 != 0 {
                    return Err(Error::encoding("Odd number of UTF-16 bytes"));
                }
                let units: Vec<u16> = body
                    .chunks_exact(2)
                    .map(|pair| {
                        let pair = [pair[0], pair[1]];
                        if encoding == ReliableTxtEncoding::Utf16 {
                            u16::from_be_bytes(pair)
                        } else {
                            u16::from_le_bytes(pair)
                        }
                    })
                    .collect();
                String::from_utf16(&units).map_err(|e| Error::encoding(e.to_string()))?
            }
            ReliableTxtEncoding::Utf32 => {
                if body.len() % 4 != 0 {
                    return Err(Error::encoding("UTF-32 byte count is not a multiple of 4"));
                }
                body.chunks_exact(4)
                    .map(|quad| {
                        let code = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
                        char::from_u32(code)
                            .ok_or_else(|| Error::encoding("Invalid UTF-32 code point"))
                    })
                    .collect::<Result<String>>()?
            }
        };
        Ok((text, encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_all_encodings() {
        let cases: [(ReliableTxtEncoding, &[u8]); 4] = [
            (
                ReliableTxtEncoding::Utf8,
                &[0xEF, 0xBB, 0xBF, 0x41, 0x0A, 0x45, 0x6E, 0x64],
            ),
            (
                ReliableTxtEncoding::Utf16,
                &[0xFE, 0xFF, 0x0, 0x41, 0x0, 0x0A, 0x0, 0x45, 0x0, 0x6E, 0x0, 0x64],
            ),
            (
                ReliableTxtEncoding::Utf16Reverse,
                &[0xFF, 0xFE, 0x41, 0x0, 0x0A, 0x0, 0x45, 0x0, 0x6E, 0x0, 0x64, 0x0],
            ),
            (
                ReliableTxtEncoding::Utf32,
                &[
                    0x0, 0x0, 0xFE, 0xFF, 0x0, 0x0, 0x0, 0x41, 0x0, 0x0, 0x0, 0x0A, 0x0, 0x0,
                    0x0, 0x45, 0x0, 0x0, 0x0, 0x6E, 0x0, 0x0, 0x0, 0x64,
                ],
            ),
        ];
        for (encoding, expected) in cases {
            let bytes = encoding.encode("A\nEnd");
            assert_eq!(bytes, expected);
            assert_eq!(
                ReliableTxtEncoding::decode(&bytes).unwrap(),
                ("A\nEnd".to_string(), encoding)
            );
        }
    }

    #[test]
    fn test_missing_bom() {
        assert!(matches!(
            ReliableTxtEncoding::decode(b"A\nEnd"),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_supplementary_characters_survive_utf16() {
        let bytes = ReliableTxtEncoding::Utf16Reverse.encode("\u{1D11E}");
        assert_eq!(bytes.len(), 2 + 4);
        let (text, _) = ReliableTxtEncoding::decode(&bytes).unwrap();
        assert_eq!(text, "\u{1D11E}");
    }
}
