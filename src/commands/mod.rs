//! Command implementations
//!
//! Each file adds one command as an `impl Extractor` block:
//!
//! - `extract`: batch extraction of every discovered `.Z` file
//! - `list`: dry-run listing of archive contents
//! - `cat`: single-stream decompression to the console

pub mod cat;
pub mod extract;
pub mod list;
