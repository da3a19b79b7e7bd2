use std::path::PathBuf;

use thiserror::Error;

use crate::wad::ArchiveState;

/// Result type for WAD operations
pub type Result<T> = std::result::Result<T, WadError>;

/// Errors raised while reading or extracting a WAD archive.
///
/// Every variant except [`WadError::LumpIo`] aborts the archive it was
/// raised for. `LumpIo` is scoped to a single lump and extraction moves
/// on to the next directory entry.
#[derive(Debug, Error)]
pub enum WadError {
    /// The archive could not be opened
    #[error("cannot open archive")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive ended before a required field or record
    #[error("truncated read at offset {offset}: wanted {wanted} bytes, {available} available")]
    TruncatedRead {
        offset: u64,
        wanted: u64,
        available: u64,
    },

    /// A seek target or structural offset is negative or otherwise nonsensical
    #[error("invalid offset {offset}: {reason}")]
    InvalidOffset { offset: i64, reason: &'static str },

    /// Reading or writing a single lump failed
    #[error("lump `{name}` [{offset}, +{size}): {source}")]
    LumpIo {
        name: String,
        offset: i64,
        size: i64,
        #[source]
        source: std::io::Error,
    },

    /// The underlying source failed for a reason other than running short
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A controller step was called out of order
    #[error("operation not allowed in state {0:?}")]
    InvalidState(ArchiveState),
}

impl WadError {
    /// Whether this error aborts the whole archive rather than a single lump.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WadError::LumpIo { .. })
    }
}

impl From<WadError> for std::io::Error {
    fn from(err: WadError) -> std::io::Error {
        match err {
            WadError::Io(err) => err,
            err @ WadError::TruncatedRead { .. } => {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err)
            }
            err => std::io::Error::other(err),
        }
    }
}
