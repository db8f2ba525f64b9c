//! Adaptive-width LZW decoding for `.Z` streams
//!
//! The dictionary is an append-only arena indexed by code: slots 0-255 are
//! byte literals, 256 is the clear code, 257 is reserved, and adaptive
//! entries are appended from slot 258 upward. Each adaptive entry is a
//! (prefix code, suffix byte) pair; resolving a code walks the prefix chain
//! down to a literal root. The chain index strictly decreases at every step,
//! so resolution is bounded by the table depth.
//!
//! The decoder implements [`std::io::Read`] and produces output one decode
//! step at a time, so large payloads stream through without being buffered
//! whole. Engine failures tunnel through `io::Error` and can be recovered
//! with [`ExtractError::from_io`].

use crate::artifacts::errors::{ExtractError, Result};
use crate::artifacts::lzw::bit_reader::BitReader;
use crate::artifacts::lzw::header::CompressHeader;
use crate::artifacts::lzw::{CLEAR_CODE, FIRST_FREE, MIN_WIDTH, TABLE_SIZE};
use std::io::Read;

/// One dictionary slot.
#[derive(Debug, Clone, Copy)]
enum DictionaryEntry {
    /// One of the 256 pre-seeded single-byte strings
    Literal(u8),
    /// An adaptive entry: the string at `prefix` followed by `suffix`
    Pair { prefix: u16, suffix: u8 },
    /// The clear code and the unused slot 257; never valid as data
    Reserved,
}

/// Streaming LZW decoder over a `.Z` code stream.
///
/// The 3-byte stream header is consumed and validated on construction.
#[derive(Debug)]
pub struct LzwDecoder<R> {
    bits: BitReader<R>,
    header: CompressHeader,
    table: Vec<DictionaryEntry>,
    code_width: u32,
    previous: Option<u16>,
    pending: Vec<u8>,
    pending_pos: usize,
    finished: bool,
}

impl<R: Read> LzwDecoder<R> {
    pub fn new(mut input: R) -> Result<Self> {
        let header = CompressHeader::parse(&mut input)?;

        Ok(LzwDecoder {
            bits: BitReader::new(input),
            header,
            table: Self::seed_table(),
            code_width: MIN_WIDTH,
            previous: None,
            pending: Vec::new(),
            pending_pos: 0,
            finished: false,
        })
    }

    pub fn header(&self) -> CompressHeader {
        self.header
    }

    fn seed_table() -> Vec<DictionaryEntry> {
        let mut table = Vec::with_capacity(FIRST_FREE);
        table.extend((0..=255u8).map(DictionaryEntry::Literal));
        table.push(DictionaryEntry::Reserved); // 256: clear code
        table.push(DictionaryEntry::Reserved); // 257: reserved
        table
    }

    fn reset_table(&mut self) {
        self.table.truncate(FIRST_FREE);
        self.code_width = MIN_WIDTH;
        self.previous = None;
    }

    /// Decodes the next code into `pending`. Returns `Ok(false)` at the end
    /// of the stream.
    fn decode_step(&mut self) -> Result<bool> {
        loop {
            let Some(code) = self.bits.next_code(self.code_width)? else {
                return Ok(false);
            };

            if self.header.block_mode && code == CLEAR_CODE {
                self.reset_table();
                continue;
            }

            self.pending.clear();
            self.pending_pos = 0;
            let first_byte = self.resolve(code)?;

            if self.table.len() < TABLE_SIZE {
                if let Some(previous) = self.previous {
                    self.table.push(DictionaryEntry::Pair {
                        prefix: previous,
                        suffix: first_byte,
                    });
                    // the decoder's table runs one entry behind the encoder's,
                    // so the width changes one slot before the table fills
                    if self.table.len() == (1 << self.code_width) - 1
                        && self.code_width < self.header.max_width
                    {
                        self.code_width += 1;
                    }
                }
            }

            self.previous = Some(code);
            return Ok(true);
        }
    }

    /// Expands `code` into `pending` (forward order) and returns the first
    /// byte of the expansion.
    fn resolve(&mut self, code: u16) -> Result<u8> {
        let next_code = self.table.len();
        let invalid = move || ExtractError::InvalidCode { code, next_code };

        // KwKwK special case: the code references the entry about to be
        // created, so it expands to the previous string plus that string's
        // own first byte
        let (mut current, self_referential) = if usize::from(code) == next_code {
            match self.previous {
                Some(previous) => (usize::from(previous), true),
                None => return Err(invalid()),
            }
        } else if usize::from(code) > next_code {
            return Err(invalid());
        } else {
            (usize::from(code), false)
        };

        let mut steps = 0;
        let first_byte = loop {
            match self.table.get(current).copied() {
                Some(DictionaryEntry::Literal(byte)) => {
                    self.pending.push(byte);
                    break byte;
                }
                Some(DictionaryEntry::Pair { prefix, suffix }) => {
                    self.pending.push(suffix);
                    current = usize::from(prefix);
                }
                Some(DictionaryEntry::Reserved) | None => return Err(invalid()),
            }

            steps += 1;
            if steps > self.table.len() {
                // unreachable for well-formed tables; guards a corrupt chain
                return Err(invalid());
            }
        };

        self.pending.reverse();
        if self_referential {
            self.pending.push(first_byte);
        }

        Ok(first_byte)
    }
}

impl<R: Read> Read for LzwDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pending_pos == self.pending.len() {
            if self.finished {
                return Ok(0);
            }
            match self.decode_step() {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    return Ok(0);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let available = &self.pending[self.pending_pos..];
        let count = buf.len().min(available.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.pending_pos += count;

        Ok(count)
    }
}
