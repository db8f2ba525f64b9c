//! Classic Unix `.compress` (`.Z`) stream format
//!
//! A `.Z` stream is an LZW code stream with a small fixed header:
//!
//! ```text
//! Header (3 bytes):
//!   - Magic: 0x1F 0x9D (2 bytes)
//!   - Control byte: low 5 bits = maximum code width (9..=16),
//!     bit 0x80 = block mode (code 256 reserved as a table reset)
//!
//! Body:
//!   - Variable-width LZW codes, packed LSB-first: the first code's low
//!     bits occupy the low bits of the first body byte
//! ```

pub mod bit_reader;
pub mod decoder;
pub mod header;

/// Magic bytes identifying a `.Z` stream
pub const MAGIC: [u8; 2] = [0x1f, 0x9d];

/// Control-byte mask for the maximum code width
pub const BIT_MASK: u8 = 0x1f;

/// Control-byte flag for block mode
pub const BLOCK_MODE: u8 = 0x80;

/// Initial (and minimum) code width in bits
pub const MIN_WIDTH: u32 = 9;

/// Maximum supported code width in bits
pub const MAX_WIDTH: u32 = 16;

/// Code reserved as the dictionary reset signal in block mode
pub const CLEAR_CODE: u16 = 256;

/// First dictionary slot available for adaptive entries
/// (0-255 are literals, 256 is the clear code, 257 is reserved)
pub const FIRST_FREE: usize = 258;

/// Hard cap on the dictionary: no code is ever wider than [`MAX_WIDTH`] bits
pub const TABLE_SIZE: usize = 1 << MAX_WIDTH;
