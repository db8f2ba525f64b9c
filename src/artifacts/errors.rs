//! Error types for the extraction engines
//!
//! The decode and archive layers report failures through [`ExtractError`] so
//! callers can tell stream corruption apart from local filesystem trouble.
//! All variants are terminal for the file being processed: corrupt input
//! cannot be recovered by re-reading, so nothing here is retried.

use std::io::ErrorKind;
use std::path::PathBuf;

/// Result type alias for the extraction engines.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failure modes of the `.Z` decoder, the tar reader and the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The stream does not start with a valid `.Z` header.
    #[error("not a compressed .Z stream: {0}")]
    BadHeader(String),

    /// The stream ended in the middle of a unit of work (an LZW code or a
    /// tar block).
    #[error("compressed stream is truncated")]
    TruncatedStream,

    /// A decoded code references a dictionary slot that does not exist.
    #[error("invalid LZW code {code} (next free slot is {next_code})")]
    InvalidCode { code: u16, next_code: usize },

    /// A tar header block failed validation.
    #[error("corrupt tar header: {0}")]
    CorruptHeader(String),

    /// An archive entry path would escape the target directory.
    #[error("entry path escapes the target directory: {}", .0.display())]
    PathTraversal(PathBuf),

    /// A tar extension record this reader does not understand (PAX or GNU
    /// long-name headers).
    #[error("unsupported tar extension record (type flag {0:?})")]
    UnsupportedFormat(char),

    /// Extraction was cancelled through the pipeline's cancel flag.
    #[error("extraction interrupted")]
    Interrupted,

    /// An underlying read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Recovers a typed error that was tunneled through `std::io::Error` by
    /// one of the `Read` adapters; anything else stays a plain I/O error.
    pub fn from_io(err: std::io::Error) -> Self {
        match err.downcast::<ExtractError>() {
            Ok(inner) => inner,
            Err(err) => ExtractError::Io(err),
        }
    }
}

impl From<ExtractError> for std::io::Error {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Io(inner) => inner,
            other => {
                let kind = match &other {
                    ExtractError::TruncatedStream => ErrorKind::UnexpectedEof,
                    ExtractError::Interrupted => ErrorKind::Interrupted,
                    _ => ErrorKind::InvalidData,
                };
                std::io::Error::new(kind, other)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_error_survives_an_io_round_trip() {
        let err = ExtractError::TruncatedStream;
        let io_err: std::io::Error = err.into();
        assert_eq!(io_err.kind(), ErrorKind::UnexpectedEof);

        match ExtractError::from_io(io_err) {
            ExtractError::TruncatedStream => {}
            other => panic!("expected TruncatedStream, got {other:?}"),
        }
    }

    #[test]
    fn plain_io_error_stays_io() {
        let io_err = std::io::Error::new(ErrorKind::PermissionDenied, "denied");
        match ExtractError::from_io(io_err) {
            ExtractError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
