//! Tar archive stream format
//!
//! A tar archive is a sequence of 512-byte blocks. Each entry starts with a
//! header block followed by `ceil(size / 512)` body blocks, the last one
//! zero-padded. Two consecutive all-zero blocks mark the end of the archive.
//!
//! ```text
//! Header block (512 bytes, classic layout with ustar extension):
//!   offset   0  name      (100 bytes, NUL-padded)
//!   offset 100  mode      (8 bytes, octal ASCII)
//!   offset 108  uid       (8 bytes, octal ASCII)
//!   offset 116  gid       (8 bytes, octal ASCII)
//!   offset 124  size      (12 bytes, octal ASCII)
//!   offset 136  mtime     (12 bytes, octal ASCII)
//!   offset 148  checksum  (8 bytes, octal ASCII; the field itself is
//!                          summed as eight spaces)
//!   offset 156  typeflag  (1 byte)
//!   offset 157  linkname  (100 bytes, NUL-padded)
//!   offset 257  magic     ("ustar\0" when the ustar fields are present)
//!   offset 345  prefix    (155 bytes, NUL-padded; joined before name)
//! ```

pub mod header;
pub mod reader;

/// Size of a tar block in bytes
pub const BLOCK_SIZE: usize = 512;

/// Offset of the checksum field within a header block
pub const CHECKSUM_OFFSET: usize = 148;

/// Length of the checksum field in bytes
pub const CHECKSUM_LEN: usize = 8;
