//! `.Z` stream header parsing and validation

use crate::artifacts::errors::{ExtractError, Result};
use crate::artifacts::lzw::{BIT_MASK, BLOCK_MODE, MAGIC, MAX_WIDTH, MIN_WIDTH};
use std::io::{ErrorKind, Read};

/// Decoded form of the 3-byte `.Z` stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressHeader {
    /// Maximum code width the encoder was allowed to reach (9..=16)
    pub max_width: u32,
    /// Whether code 256 is reserved as a dictionary reset signal
    pub block_mode: bool,
}

impl CompressHeader {
    /// Reads and validates the header from the start of a stream.
    pub fn parse<R: Read>(input: &mut R) -> Result<Self> {
        let mut raw = [0u8; 3];
        input.read_exact(&mut raw).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                ExtractError::BadHeader("stream shorter than the 3-byte header".to_string())
            } else {
                ExtractError::Io(err)
            }
        })?;

        if raw[..2] != MAGIC {
            return Err(ExtractError::BadHeader(format!(
                "bad magic bytes {:#04x} {:#04x}",
                raw[0], raw[1]
            )));
        }

        // bits 5 and 6 of the control byte are unused by the classic format
        if raw[2] & !(BIT_MASK | BLOCK_MODE) != 0 {
            return Err(ExtractError::BadHeader(format!(
                "invalid control byte {:#04x}",
                raw[2]
            )));
        }

        let max_width = u32::from(raw[2] & BIT_MASK);
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&max_width) {
            return Err(ExtractError::BadHeader(format!(
                "unsupported maximum code width {max_width}"
            )));
        }

        Ok(CompressHeader {
            max_width,
            block_mode: raw[2] & BLOCK_MODE != 0,
        })
    }
}
