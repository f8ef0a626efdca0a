//! A moving byte window over a borrowed buffer.

use crate::DecodeError;
use alloc::{format, string::String, vec::Vec};

/// A half-open window `[start, end)` into some byte buffer.
///
/// The cursor holds no reference to the buffer, so it is `Copy` and every
/// read takes the buffer explicitly. Moving the window returns a new cursor
/// instead of mutating shared state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ByteCursor {
    pub start: usize,
    pub end: usize,
}

impl ByteCursor {
    pub const fn at(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shift both bounds by `offset`.
    pub fn advance(self, offset: usize) -> Result<Self, DecodeError> {
        let start = self.start.checked_add(offset).ok_or(DecodeError::IntegerOverflow)?;
        let end = self.end.checked_add(offset).ok_or(DecodeError::IntegerOverflow)?;
        Ok(Self { start, end })
    }

    pub fn read_bytes<'a>(&self, buffer: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        if self.start > self.end || self.end > buffer.len() {
            return Err(DecodeError::OutOfBounds {
                start: self.start,
                end: self.end,
                len: buffer.len(),
            });
        }

        Ok(&buffer[self.start..self.end])
    }

    /// Each byte of the window as an upper-case two-digit hex string.
    pub fn read_hex(&self, buffer: &[u8]) -> Result<Vec<String>, DecodeError> {
        Ok(self.read_bytes(buffer)?.iter().map(|byte| format!("{:02X}", byte)).collect())
    }

    /// The window interpreted as a big-endian unsigned integer.
    pub fn read_uint(&self, buffer: &[u8]) -> Result<u64, DecodeError> {
        let bytes = self.read_bytes(buffer)?;

        if bytes.len() > core::mem::size_of::<u64>() {
            return Err(DecodeError::WindowTooWide { width: bytes.len() });
        }

        Ok(bytes.iter().fold(0u64, |acc, byte| (acc << 8) | *byte as u64))
    }

    pub fn read_u32(&self, buffer: &[u8]) -> Result<u32, DecodeError> {
        let value = self.read_uint(buffer)?;
        u32::try_from(value).map_err(|_| DecodeError::WindowTooWide { width: self.len() })
    }
}
