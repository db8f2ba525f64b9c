//! Decoder and extractor for classic Unix `.compress` streams
//!
//! `zextract` decodes `.Z` (LZW) streams and unpacks `.tar.Z` archives.
//! The format engines live in [`artifacts`] (bit-level LZW decoding, tar
//! header parsing and entry iteration); [`areas`] holds the directory
//! scanner and the extraction pipeline that materializes results on disk;
//! [`commands`] implements the CLI operations on top of them.

pub mod areas;
pub mod artifacts;
pub mod commands;
