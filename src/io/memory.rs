use std::io::Cursor;

use super::{ArchiveSource, WadReader};
use crate::error::Result;

/// Archive held entirely in memory
#[derive(Debug, Clone)]
pub struct MemorySource<T> {
    name: String,
    bytes: T,
}

impl<T: AsRef<[u8]>> MemorySource<T> {
    pub fn new(name: impl Into<String>, bytes: T) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl<T: AsRef<[u8]>> ArchiveSource for MemorySource<T> {
    type Reader = Cursor<T>;

    fn open(self) -> Result<WadReader<Self::Reader>> {
        Ok(WadReader::new(Cursor::new(self.bytes))?)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
