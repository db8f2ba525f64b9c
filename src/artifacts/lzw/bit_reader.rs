//! Variable-width code extraction from a byte stream
//!
//! The `.Z` format packs codes least-significant-bit first: the first code's
//! low bits sit in the low bits of the first body byte, and codes straddle
//! byte boundaries in stream order. The reader keeps a small bit accumulator
//! and pulls bytes on demand, so the caller can change the code width
//! between calls without losing or re-reading bits.

use crate::artifacts::errors::{ExtractError, Result};
use crate::artifacts::lzw::{MAX_WIDTH, MIN_WIDTH};
use byteorder::ReadBytesExt;
use std::io::{ErrorKind, Read};

#[derive(Debug)]
pub struct BitReader<R> {
    input: R,
    acc: u32,
    acc_bits: u32,
}

impl<R: Read> BitReader<R> {
    pub fn new(input: R) -> Self {
        BitReader {
            input,
            acc: 0,
            acc_bits: 0,
        }
    }

    /// Reads the next code of `width` bits.
    ///
    /// Returns `Ok(None)` at a clean end of stream: the underlying bytes ran
    /// out before any fresh byte was consumed for this code. Residual
    /// sub-byte bits left over from the final consumed byte are encoder
    /// padding and can never form a code, so they are not treated as data.
    /// Fails with `TruncatedStream` when one or more fresh bytes were
    /// consumed but the stream ended before `width` bits were available.
    pub fn next_code(&mut self, width: u32) -> Result<Option<u16>> {
        debug_assert!((MIN_WIDTH..=MAX_WIDTH).contains(&width));

        let mut consumed_fresh_byte = false;
        while self.acc_bits < width {
            match self.input.read_u8() {
                Ok(byte) => {
                    self.acc |= u32::from(byte) << self.acc_bits;
                    self.acc_bits += 8;
                    consumed_fresh_byte = true;
                }
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                    if consumed_fresh_byte {
                        return Err(ExtractError::TruncatedStream);
                    }
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let code = (self.acc & ((1 << width) - 1)) as u16;
        self.acc >>= width;
        self.acc_bits -= width;

        Ok(Some(code))
    }

    pub fn into_inner(self) -> R {
        self.input
    }
}
