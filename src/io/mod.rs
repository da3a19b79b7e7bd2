mod local;
mod memory;
mod reader;

pub use local::LocalFileSource;
pub use memory::MemorySource;
pub use reader::WadReader;

use std::io::{Read, Seek};

use crate::error::Result;

/// Trait for anything an archive can be opened from
pub trait ArchiveSource {
    /// The seekable byte source backing the opened reader
    type Reader: Read + Seek;

    /// Acquire the underlying handle and wrap it in a [`WadReader`]
    fn open(self) -> Result<WadReader<Self::Reader>>;

    /// Human-readable name used in diagnostics
    fn describe(&self) -> String;
}
