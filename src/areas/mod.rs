//! Stateful areas the commands operate on
//!
//! - `workspace`: the scanned data directory and `.Z` file discovery
//! - `pipeline`: the decode-and-materialize orchestrator
//! - `extractor`: ties workspace, pipeline and console output together

pub mod extractor;
pub mod pipeline;
pub mod workspace;
