use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{ArchiveSource, WadReader};
use crate::error::{Result, WadError};

/// Archive stored on the local filesystem, opened read-only
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSource for LocalFileSource {
    type Reader = BufReader<File>;

    fn open(self) -> Result<WadReader<Self::Reader>> {
        let not_found = |source| WadError::FileNotFound {
            path: self.path.clone(),
            source,
        };
        let file = File::open(&self.path).map_err(not_found)?;
        WadReader::new(BufReader::new(file)).map_err(not_found)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
