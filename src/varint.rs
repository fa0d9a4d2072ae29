//! LEB128 variable-length unsigned integers.
//!
//! Seven payload bits per byte, least significant group first; the high bit
//! marks a continuation.

use crate::error::{Error, Result};

/// Appends `value` as a varint.
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Number of bytes [`write_varint`] emits for `value`.
#[must_use]
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Cursor over an encoded buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, offset: 0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.buf.len()
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reads one varint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinary`] when the buffer ends mid-varint or the
    /// value does not fit in 64 bits.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = *self.buf.get(self.offset).ok_or(Error::InvalidBinary)?;
            self.offset += 1;
            let payload = u64::from(byte & 0x7F);
            if shift >= 64 || (shift == 63 && payload > 1) {
                return Err(Error::InvalidBinary);
            }
            result |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    /// Reads `len` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinary`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: u64) -> Result<&'a [u8]> {
        let len = usize::try_from(len).map_err(|_| Error::InvalidBinary)?;
        let end = self.offset.checked_add(len).ok_or(Error::InvalidBinary)?;
        let bytes = self.buf.get(self.offset..end).ok_or(Error::InvalidBinary)?;
        self.offset = end;
        Ok(bytes)
    }
}
