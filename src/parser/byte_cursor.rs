use encoding_rs::WINDOWS_1252;
use nom::{bytes, number, IResult};

use crate::BiabError;

/// Parse unsigned byte
fn parse_u8(i: &[u8]) -> IResult<&[u8], u8> {
    number::complete::le_u8(i)
}

/// Parse unsigned short
fn parse_u16(i: &[u8]) -> IResult<&[u8], u16> {
    number::complete::le_u16(i)
}

/// Parse unsigned 24 bits
fn parse_u24(i: &[u8]) -> IResult<&[u8], u32> {
    number::complete::le_u24(i)
}

/// Parse unsigned 32
fn parse_u32(i: &[u8]) -> IResult<&[u8], u32> {
    number::complete::le_u32(i)
}

/// Take exactly `len` bytes
fn parse_bytes(i: &[u8], len: usize) -> IResult<&[u8], &[u8]> {
    bytes::complete::take(len)(i)
}

/// Materialize single-byte encoded String
pub fn make_string(i: &[u8]) -> String {
    let (cow, encoding_used, had_errors) = WINDOWS_1252.decode(i);
    if had_errors {
        log::debug!("Error parsing string with {encoding_used:?}");
        String::new()
    } else {
        cow.to_string()
    }
}

/// Bounds-checked little-endian reader over an immutable buffer.
///
/// Each pass owns its own cursor, positioned at the absolute offset it needs.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor starting at an absolute offset
    pub const fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    const fn out_of_bounds(&self, offset: usize, requested: usize) -> BiabError {
        BiabError::OutOfBounds {
            offset,
            requested,
            len: self.data.len(),
        }
    }

    /// Run a complete-input parser on the unread bytes and move past what it consumed
    fn run<T>(
        &mut self,
        requested: usize,
        parser: impl FnOnce(&'a [u8]) -> IResult<&'a [u8], T>,
    ) -> Result<T, BiabError> {
        let input = self.data.get(self.pos..).unwrap_or_default();
        match parser(input) {
            Ok((rest, value)) => {
                self.pos += input.len() - rest.len();
                Ok(value)
            }
            Err(_) => Err(self.out_of_bounds(self.pos, requested)),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, BiabError> {
        self.run(1, parse_u8)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, BiabError> {
        self.run(2, parse_u16)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, BiabError> {
        self.run(4, parse_u32)
    }

    /// Unsigned little-endian value spread over `n` bytes, `n` in 1..=4
    pub fn read_le_uint(&mut self, n: usize) -> Result<u32, BiabError> {
        match n {
            1 => self.read_u8().map(u32::from),
            2 => self.read_u16_le().map(u32::from),
            3 => self.run(3, parse_u24),
            4 => self.read_u32_le(),
            _ => Err(BiabError::InvalidReadWidth(n)),
        }
    }

    /// Single-byte text of `len` bytes, undecodable text becomes an empty string
    pub fn read_string(&mut self, len: usize) -> Result<String, BiabError> {
        let raw = self.run(len, |i| parse_bytes(i, len))?;
        log::debug!("Raw string raw={raw:02X?}");
        Ok(make_string(raw))
    }

    /// Byte at `offset` past the current position, without moving
    pub fn peek(&self, offset: usize) -> Result<u8, BiabError> {
        let at = self.pos.saturating_add(offset);
        self.data
            .get(at)
            .copied()
            .ok_or_else(|| self.out_of_bounds(at, 1))
    }

    /// Skip `n` bytes.
    pub fn advance(&mut self, n: usize) -> Result<(), BiabError> {
        if n > self.remaining() {
            return Err(self.out_of_bounds(self.pos, n));
        }
        log::debug!("skip: {n}");
        self.pos += n;
        Ok(())
    }
}
