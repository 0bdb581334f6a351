// Copyright (c) 2020 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Primitive decoders for fixed-width little-endian integers, length-encoded integers
//! and length-encoded strings.
//!
//! Every reader checks the remaining length before consuming anything, so a failed read
//! leaves the cursor where it was.

use byteorder::{ByteOrder, LittleEndian as LE};

use std::{
    convert::TryFrom,
    io::{ErrorKind::Interrupted, Read},
};

use crate::binlog::error::{BinlogError, Result};

/// Reads a little-endian unsigned integer of `width` bytes (`1..=8`) from the start of `buf`.
pub fn read_fixed_len_int(buf: &[u8], width: usize) -> Result<u64> {
    ParseBuf(buf).eat_uint_le(width)
}

/// Reads a length-encoded integer from the start of `buf`.
///
/// Returns the value (`None` for the `0xFB` NULL marker) and the number of bytes consumed.
pub fn read_lenenc_int(buf: &[u8]) -> Result<(Option<u64>, usize)> {
    let mut parse = ParseBuf(buf);
    let value = parse.eat_lenenc_int()?;
    Ok((value, buf.len() - parse.len()))
}

/// Reads a length-encoded string from the start of `buf`.
///
/// Returns the string payload and the number of bytes consumed (prefix included).
pub fn read_lenenc_str(buf: &[u8]) -> Result<(&[u8], usize)> {
    let mut parse = ParseBuf(buf);
    let value = parse.eat_lenenc_str()?;
    Ok((value, buf.len() - parse.len()))
}

/// Fills `buf` from `input`.
///
/// Returns `Ok(false)` if the stream ended before the first byte, and `Truncated`
/// if it ended somewhere in the middle.
pub fn read_exact_or_eof<T: Read>(mut input: T, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(count) => filled += count,
            Err(err) if err.kind() == Interrupted => (),
            Err(err) => return Err(err.into()),
        }
    }

    if filled == buf.len() {
        Ok(true)
    } else if filled == 0 {
        Ok(false)
    } else {
        Err(BinlogError::Truncated {
            needed: buf.len(),
            available: filled,
        })
    }
}

/// Same as [`read_exact_or_eof`] but end of stream is an error.
pub fn read_exact<T: Read>(input: T, buf: &mut [u8]) -> Result<()> {
    if read_exact_or_eof(input, buf)? {
        Ok(())
    } else {
        Err(BinlogError::Truncated {
            needed: buf.len(),
            available: 0,
        })
    }
}

/// Offset-tracking cursor over a byte slice.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(transparent)]
pub struct ParseBuf<'a>(pub &'a [u8]);

impl<'a> ParseBuf<'a> {
    /// Returns the number of remaining bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing remains.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes `n` bytes.
    pub fn eat(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.0.len() {
            return Err(BinlogError::Truncated {
                needed: n,
                available: self.0.len(),
            });
        }
        let (head, tail) = self.0.split_at(n);
        self.0 = tail;
        Ok(head)
    }

    /// Skips `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.eat(n).map(drop)
    }

    /// Consumes everything that remains.
    pub fn eat_all(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.0)
    }

    pub fn eat_u8(&mut self) -> Result<u8> {
        Ok(self.eat(1)?[0])
    }

    pub fn eat_u16_le(&mut self) -> Result<u16> {
        self.eat(2).map(LE::read_u16)
    }

    pub fn eat_u32_le(&mut self) -> Result<u32> {
        self.eat(4).map(LE::read_u32)
    }

    pub fn eat_u48_le(&mut self) -> Result<u64> {
        self.eat(6).map(LE::read_u48)
    }

    pub fn eat_u64_le(&mut self) -> Result<u64> {
        self.eat(8).map(LE::read_u64)
    }

    /// Consumes a little-endian unsigned integer of `width` bytes.
    pub fn eat_uint_le(&mut self, width: usize) -> Result<u64> {
        if width == 0 || width > 8 {
            return Err(BinlogError::InvalidIntWidth(width));
        }
        self.eat(width).map(|bytes| LE::read_uint(bytes, width))
    }

    /// Consumes a length-encoded integer. `None` stands for the NULL marker (`0xFB`).
    pub fn eat_lenenc_int(&mut self) -> Result<Option<u64>> {
        let first = match self.0.first() {
            Some(first) => *first,
            None => {
                return Err(BinlogError::Truncated {
                    needed: 1,
                    available: 0,
                })
            }
        };

        let width = match first {
            0x00..=0xfa => {
                self.skip(1)?;
                return Ok(Some(first as u64));
            }
            0xfb => {
                self.skip(1)?;
                return Ok(None);
            }
            0xfc => 2,
            0xfd => 3,
            0xfe => 8,
            0xff => return Err(BinlogError::InvalidPackedInt(first)),
        };

        if self.0.len() < 1 + width {
            return Err(BinlogError::Truncated {
                needed: 1 + width,
                available: self.0.len(),
            });
        }

        self.skip(1)?;
        self.eat_uint_le(width).map(Some)
    }

    /// Consumes a length-encoded integer that must not be NULL.
    pub fn eat_lenenc_int_not_null(&mut self) -> Result<u64> {
        self.eat_lenenc_int()?.ok_or(BinlogError::UnexpectedNull)
    }

    /// Consumes a length-encoded integer that counts something stored in this buffer.
    ///
    /// A count that doesn't fit `usize` can't be satisfied, so it is reported as `Truncated`.
    pub fn eat_lenenc_len(&mut self) -> Result<usize> {
        let mut peek = *self;
        let len = peek.eat_lenenc_int_not_null()?;
        let len = usize::try_from(len).map_err(|_| BinlogError::Truncated {
            needed: usize::MAX,
            available: peek.len(),
        })?;
        *self = peek;
        Ok(len)
    }

    /// Consumes a length-encoded string.
    pub fn eat_lenenc_str(&mut self) -> Result<&'a [u8]> {
        let mut peek = *self;
        let len = peek.eat_lenenc_len()?;
        let value = peek.eat(len)?;
        *self = peek;
        Ok(value)
    }

    /// Consumes a string prefixed with its one-byte length.
    pub fn eat_u8_str(&mut self) -> Result<&'a [u8]> {
        let mut peek = *self;
        let len = peek.eat_u8()? as usize;
        let value = peek.eat(len)?;
        *self = peek;
        Ok(value)
    }
}
