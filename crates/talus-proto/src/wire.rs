//! Wire format reading utilities.

use crate::error::{Error, Result};

/// A cursor for reading DNS wire format data.
///
/// Provides bounds-checked access to fixed-width big-endian fields with
/// position tracking. Name parsing goes through [`crate::name::NameParser`]
/// instead, since names may reference earlier parts of the message.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    /// The underlying data.
    data: &'a [u8],
    /// Current position.
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a new wire reader over the full message.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a wire reader positioned at the given offset.
    #[inline]
    pub const fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Returns the current position.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns true if there are no remaining bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Advances the position by the given amount.
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(Error::unexpected_eof(self.pos + n));
        }
        self.pos += n;
        Ok(())
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(Error::unexpected_eof(self.pos));
        }
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Reads a big-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        if self.pos + 2 > self.data.len() {
            return Err(Error::unexpected_eof(self.pos + 2));
        }
        let value = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    /// Reads a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        if self.pos + 4 > self.data.len() {
            return Err(Error::unexpected_eof(self.pos + 4));
        }
        let mut octets = [0u8; 4];
        octets.copy_from_slice(&self.data[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(u32::from_be_bytes(octets))
    }

    /// Reads a slice of bytes.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.pos + len > self.data.len() {
            return Err(Error::unexpected_eof(self.pos + len));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}
