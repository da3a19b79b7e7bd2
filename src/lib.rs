//! # wadextract
//!
//! Extract every lump of a DOOM-style WAD archive into its own file.
//!
//! A WAD is a flat container: a 12-byte header, concatenated lump data and a
//! directory of fixed 16-byte records naming each lump. This library decodes
//! the header and directory into plain data, then copies each lump's byte
//! range into a [`LumpSink`]. Zero-length marker lumps are skipped and a bad
//! lump never stops the rest of the archive from being extracted.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use wadextract::{ArchiveController, DirectorySink, LocalFileSource, output_dir_for};
//!
//! fn main() -> anyhow::Result<()> {
//!     let path = Path::new("doom2.wad");
//!     let mut sink = DirectorySink::create(output_dir_for(path, None))?;
//!
//!     let mut archive = ArchiveController::new(LocalFileSource::new(path));
//!     let report = archive.run(&mut sink, &mut ())?;
//!     println!("{} lumps extracted, {} markers", report.extracted, report.markers);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod wad;

pub use cli::{Cli, OutputConflict};
pub use error::{Result, WadError};
pub use io::{ArchiveSource, LocalFileSource, MemorySource, WadReader};
pub use wad::{
    ArchiveController, ArchiveState, Directory, DirectorySink, ExtractObserver, ExtractReport,
    LumpEntry, LumpFailure, LumpSink, WadHeader, WadKind, output_dir_for,
};
