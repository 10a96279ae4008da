//! Sequential little-endian reader over an in-memory byte buffer.
//!
//! [`ByteCursor`] is the single primitive every decoder in this crate is
//! built on: a borrowed byte slice plus a mutable offset. All state needed
//! for bounds and position tracking is local to the cursor, so any number of
//! cursors may read the same buffer at once (the unit iterator and each
//! abbreviation-table lookup do exactly that).
//!
//! Invariant: `0 <= offset <= buffer.len()` before and after every call.
//! A successful read advances the offset by exactly the number of bytes it
//! consumed; a failing read returns [`DwelfError::OutOfBounds`] and leaves
//! the offset where it was, including for the variable-width reads
//! ([`read_uleb128`](ByteCursor::read_uleb128) and friends) which rewind to
//! their starting offset on failure.

use crate::error::{DwelfError, DwelfResult};

/// Stateful reader over an immutable byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a>
{
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a>
{
    /// Cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self
    {
        Self { data, offset: 0 }
    }

    /// Cursor positioned at `offset` into `data`.
    pub fn at(data: &'a [u8], offset: usize) -> Self
    {
        Self { data, offset }
    }

    /// Current offset into the buffer.
    pub fn offset(&self) -> usize
    {
        self.offset
    }

    /// Reposition the cursor, used to jump to section-relative offsets.
    pub fn set_offset(&mut self, offset: usize)
    {
        self.offset = offset;
    }

    /// Bytes left between the current offset and the end of the buffer.
    pub fn remaining(&self) -> usize
    {
        self.data.len().saturating_sub(self.offset)
    }

    fn check(&self, wanted: usize) -> DwelfResult<()>
    {
        if self.remaining() < wanted {
            return Err(DwelfError::OutOfBounds {
                offset: self.offset,
                wanted,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> DwelfResult<[u8; N]>
    {
        self.check(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        Ok(bytes)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> DwelfResult<u8>
    {
        self.check(1)?;
        let value = self.data[self.offset];
        self.offset += 1;
        Ok(value)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> DwelfResult<u16>
    {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> DwelfResult<u32>
    {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u64`.
    pub fn read_u64_le(&mut self) -> DwelfResult<u64>
    {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Borrow the next `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> DwelfResult<&'a [u8]>
    {
        self.check(n)?;
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Decode an unsigned LEB128 varint.
    ///
    /// Accumulates the low 7 bits of each byte, least-significant group
    /// first, until a byte with the high bit clear ends the run. No upper
    /// bound on the encoded bit width is enforced; bits past the 64th are
    /// not representable in the result and callers are expected not to
    /// encode values that wide.
    pub fn read_uleb128(&mut self) -> DwelfResult<u64>
    {
        let start = self.offset;
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(err) => {
                    self.offset = start;
                    return Err(err);
                }
            };
            if shift < 64 {
                result |= u64::from(byte & 0x7f) << shift;
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok(result)
    }

    /// Decode a signed LEB128 varint.
    ///
    /// Same byte protocol as [`read_uleb128`](Self::read_uleb128), with the
    /// final group's bit 6 sign-extended through the remaining high bits.
    pub fn read_sleb128(&mut self) -> DwelfResult<i64>
    {
        let start = self.offset;
        let mut result = 0i64;
        let mut shift = 0u32;
        let byte = loop {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(err) => {
                    self.offset = start;
                    return Err(err);
                }
            };
            if shift < 64 {
                result |= i64::from(byte & 0x7f) << shift;
            }
            shift += 7;
            if byte & 0x80 == 0 {
                break byte;
            }
        };
        if shift < 64 && byte & 0x40 != 0 {
            result |= -1i64 << shift;
        }
        Ok(result)
    }

    /// Borrow the bytes up to (not including) the next NUL, consuming the
    /// NUL as well.
    ///
    /// Fails with `OutOfBounds` if the cursor already sits past the end of
    /// the buffer, or if the buffer ends before a NUL is found; either way
    /// the offset is left unchanged.
    pub fn read_cstr(&mut self) -> DwelfResult<&'a [u8]>
    {
        let start = self.offset;
        let tail = self.data.get(start..).ok_or(DwelfError::OutOfBounds {
            offset: start,
            wanted: 1,
            len: self.data.len(),
        })?;
        match tail.iter().position(|byte| *byte == 0) {
            Some(len) => {
                let bytes = &tail[..len];
                self.offset = start + len + 1;
                Ok(bytes)
            }
            None => Err(DwelfError::OutOfBounds {
                offset: start,
                wanted: tail.len() + 1,
                len: self.data.len(),
            }),
        }
    }
}
