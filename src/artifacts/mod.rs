//! Binary-format engines and data types
//!
//! This module contains the decoding machinery:
//!
//! - `errors`: typed failure modes shared by all engines
//! - `lzw`: `.Z` stream header, bit-level code reader and LZW decoder
//! - `report`: per-file extraction outcome types
//! - `tar`: tar header parsing and streaming entry iteration

pub mod errors;
pub mod lzw;
pub mod report;
pub mod tar;
