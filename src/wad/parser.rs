//! WAD header and directory decoding.
//!
//! ## Parsing Strategy
//!
//! A WAD is read front to back in two steps:
//! 1. The 12-byte header at offset 0 names the variant and points at the directory
//! 2. The directory is a packed run of 16-byte records, read in one sequential pass
//!
//! Both steps only produce data; nothing here touches lump contents, so the
//! whole module works on in-memory buffers as well as files.

use std::io::{Read, Seek};

use tracing::{debug, warn};

use crate::error::{Result, WadError};
use crate::io::WadReader;

use super::structures::*;

/// Decode the archive header from the start of the source.
///
/// The tag is not validated; unknown variants are logged and accepted.
///
/// # Arguments
///
/// * `reader` - The archive reader; repositioned to offset 0 first
///
/// # Returns
///
/// The decoded [`WadHeader`], with the reader left just past it.
///
/// # Errors
///
/// Returns [`WadError::TruncatedRead`] if the source is shorter than 12 bytes.
pub fn parse_header<R: Read + Seek>(reader: &mut WadReader<R>) -> Result<WadHeader> {
    // Tag is raw ASCII, the two counts are little-endian
    reader.seek(0)?;
    let tag = reader.read_array::<4>()?;
    let entry_count = reader.read_i32_le()?;
    let directory_offset = reader.read_i32_le()?;

    let kind = WadKind::from_tag(tag);
    if !kind.is_known() {
        warn!("unrecognized archive tag {tag:02x?}, continuing as {kind}");
    }
    debug!("header: {kind}, {entry_count} entries, directory at {directory_offset}");

    Ok(WadHeader {
        kind,
        entry_count,
        directory_offset,
    })
}

/// Decode every directory record named by `header`, in order.
///
/// Records are read back to back from `directory_offset` without re-seeking.
/// The full extent of the directory is checked against the archive length
/// before anything is allocated.
///
/// # Arguments
///
/// * `reader` - The archive reader
/// * `header` - Header naming the directory's offset and entry count
///
/// # Returns
///
/// A [`Directory`] with exactly `entry_count` entries, in file order.
///
/// # Errors
///
/// Returns [`WadError::InvalidOffset`] for a negative count or offset, and
/// [`WadError::TruncatedRead`] if the archive ends inside the directory.
pub fn parse_directory<R: Read + Seek>(
    reader: &mut WadReader<R>,
    header: &WadHeader,
) -> Result<Directory> {
    if header.entry_count < 0 {
        return Err(WadError::InvalidOffset {
            offset: header.entry_count as i64,
            reason: "directory entry count is negative",
        });
    }
    if header.directory_offset < 0 {
        return Err(WadError::InvalidOffset {
            offset: header.directory_offset as i64,
            reason: "directory offset is negative",
        });
    }

    // Bounds first, so a corrupt count cannot drive a huge allocation
    let end = header.directory_end() as u64;
    if end > reader.len() {
        let start = header.directory_offset as u64;
        return Err(WadError::TruncatedRead {
            offset: start,
            wanted: end - start,
            available: reader.len().saturating_sub(start),
        });
    }

    // Records are packed back to back; no seek between them
    reader.seek(header.directory_offset as i64)?;

    let mut entries = Vec::with_capacity(header.entry_count as usize);
    for _ in 0..header.entry_count {
        entries.push(parse_entry(reader)?);
    }
    debug!("directory: {} entries", entries.len());

    Ok(Directory::new(entries))
}

fn parse_entry<R: Read + Seek>(reader: &mut WadReader<R>) -> Result<LumpEntry> {
    let data_offset = reader.read_i32_le()?;
    let byte_length = reader.read_i32_le()?;
    let raw_name = reader.read_array::<LUMP_NAME_LEN>()?;
    Ok(LumpEntry::new(data_offset, byte_length, raw_name))
}
