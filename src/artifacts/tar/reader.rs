//! Streaming, forward-only tar entry iteration
//!
//! [`TarReader`] yields one [`TarEntry`] at a time from any byte stream
//! (typically the LZW decoder's output). Each entry borrows the reader, so
//! the borrow checker enforces the forward-only contract: the current entry
//! must be dropped before the next one can be parsed. Body bytes a caller
//! leaves unread, and the zero padding up to the next block boundary, are
//! skipped automatically when advancing.

use crate::artifacts::errors::{ExtractError, Result};
use crate::artifacts::tar::header::TarHeader;
use crate::artifacts::tar::BLOCK_SIZE;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug)]
pub struct TarReader<R> {
    input: R,
    /// Unread body plus padding bytes of the entry handed out last
    pending: u64,
    done: bool,
}

impl<R: Read> TarReader<R> {
    pub fn new(input: R) -> Self {
        TarReader {
            input,
            pending: 0,
            done: false,
        }
    }

    /// Parses the next header block and returns the entry, or `None` at the
    /// end of the archive (two consecutive zero blocks, or a clean end of
    /// the stream at a block boundary). Bytes after the terminator are
    /// never touched.
    pub fn next_entry(&mut self) -> Result<Option<TarEntry<'_, R>>> {
        if self.done {
            return Ok(None);
        }
        self.skip_pending()?;

        let mut block = [0u8; BLOCK_SIZE];
        if !self.read_block(&mut block)? {
            self.done = true;
            return Ok(None);
        }

        if is_zero_block(&block) {
            if !self.read_block(&mut block)? || is_zero_block(&block) {
                self.done = true;
                return Ok(None);
            }
            // a lone zero block; the following block is treated as the
            // next header
        }

        let header = TarHeader::parse(&block)?;
        let size = header.size;
        let block_size = BLOCK_SIZE as u64;
        let padding = (block_size - size % block_size) % block_size;
        self.pending = size + padding;

        Ok(Some(TarEntry {
            header,
            remaining: size,
            reader: self,
        }))
    }

    /// Reads one block, returning `false` on a clean end of stream before
    /// the first byte.
    fn read_block(&mut self, block: &mut [u8; BLOCK_SIZE]) -> Result<bool> {
        let mut filled = 0;
        while filled < BLOCK_SIZE {
            match self.input.read(&mut block[filled..]) {
                Ok(0) if filled == 0 => return Ok(false),
                Ok(0) => return Err(ExtractError::TruncatedStream),
                Ok(count) => filled += count,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => return Err(ExtractError::from_io(err)),
            }
        }
        Ok(true)
    }

    fn skip_pending(&mut self) -> Result<()> {
        while self.pending > 0 {
            let skipped = std::io::copy(
                &mut self.input.by_ref().take(self.pending),
                &mut std::io::sink(),
            )
            .map_err(ExtractError::from_io)?;
            if skipped == 0 {
                return Err(ExtractError::TruncatedStream);
            }
            self.pending -= skipped;
        }
        Ok(())
    }
}

fn is_zero_block(block: &[u8; BLOCK_SIZE]) -> bool {
    block.iter().all(|byte| *byte == 0)
}

/// One archive entry: parsed header plus a bounded reader over exactly
/// `size` body bytes.
#[derive(Debug)]
pub struct TarEntry<'a, R> {
    header: TarHeader,
    remaining: u64,
    reader: &'a mut TarReader<R>,
}

impl<R: Read> TarEntry<'_, R> {
    pub fn header(&self) -> &TarHeader {
        &self.header
    }

    pub fn size(&self) -> u64 {
        self.header.size
    }

    /// The entry path, validated against directory traversal.
    pub fn sanitized_path(&self) -> Result<PathBuf> {
        self.header.sanitized_path()
    }
}

impl<R: Read> Read for TarEntry<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let limit = usize::try_from(self.remaining.min(buf.len() as u64)).unwrap_or(buf.len());
        let count = self.reader.input.read(&mut buf[..limit])?;
        if count == 0 {
            // the archive promised `size` bytes; the stream ended early
            return Err(ExtractError::TruncatedStream.into());
        }

        self.remaining -= count as u64;
        self.reader.pending -= count as u64;

        Ok(count)
    }
}
