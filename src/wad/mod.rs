//! WAD archive parsing and extraction.
//!
//! This module reads DOOM-style WAD archives and copies each lump out of them.
//!
//! ## Architecture
//!
//! The module is organized into four components:
//!
//! - [`structures`]: Format elements (header, lump entries, directory)
//! - [`parser`]: Decoding the header and directory from raw bytes
//! - [`extractor`]: Copying lump bytes into a [`LumpSink`]
//! - [`archive`]: The controller that runs the stages in order and owns the reader
//!
//! ## WAD Format Overview
//!
//! A WAD file consists of:
//! 1. A 12-byte header: tag (`IWAD`/`PWAD`), entry count, directory offset
//! 2. Lump data, concatenated in any order
//! 3. The directory: one 16-byte record per lump (offset, size, 8-byte name)
//!
//! All integers are 4-byte little-endian signed values.
//!
//! ## Limitations
//!
//! - Lump contents are never interpreted
//! - Archives are read only, never written

mod archive;
mod extractor;
mod parser;
mod structures;

pub use archive::{ArchiveController, ArchiveState};
pub use extractor::{
    DirectorySink, ExtractObserver, ExtractReport, LumpFailure, LumpSink, OUTPUT_DIR_SUFFIX,
    extract_all, output_dir_for,
};
pub use parser::{parse_directory, parse_header};
pub use structures::*;
