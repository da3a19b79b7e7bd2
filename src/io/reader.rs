use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{Result, WadError};

/// Positioned reader over a seekable byte source.
///
/// The read position is owned by this value; every archive gets its own
/// reader, so nothing about the position is shared between archives.
/// Integers in the WAD format are 4-byte little-endian signed values.
pub struct WadReader<R> {
    inner: R,
    len: u64,
    pos: u64,
}

impl<R: Read + Seek> WadReader<R> {
    /// Wrap a source, measuring its total length and rewinding to the start.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.rewind()?;
        Ok(Self { inner, len, pos: 0 })
    }

    /// Total length of the source in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset the next read starts at
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Reposition for the next read.
    ///
    /// Seeking past the end is allowed; the following read reports the
    /// truncation.
    pub fn seek(&mut self, offset: i64) -> Result<()> {
        if offset < 0 {
            return Err(WadError::InvalidOffset {
                offset,
                reason: "seek target is negative",
            });
        }
        self.pos = self.inner.seek(SeekFrom::Start(offset as u64))?;
        Ok(())
    }

    /// Read exactly `n` bytes, advancing the position.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n as u64)?;
        let mut buf = vec![0u8; n];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read a fixed-size field, advancing the position.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N as u64)?;
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read a 4-byte little-endian signed integer.
    pub fn read_i32_le(&mut self) -> Result<i32> {
        self.ensure(4)?;
        let value = self
            .inner
            .read_i32::<LittleEndian>()
            .map_err(|e| self.map_short_read(e, 4))?;
        self.pos += 4;
        Ok(value)
    }

    /// Seek to `offset` and read `n` bytes from there.
    pub fn read_range(&mut self, offset: i64, n: usize) -> Result<Vec<u8>> {
        self.seek(offset)?;
        self.read_bytes(n)
    }

    fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    fn ensure(&self, wanted: u64) -> Result<()> {
        let available = self.remaining();
        if wanted > available {
            return Err(WadError::TruncatedRead {
                offset: self.pos,
                wanted,
                available,
            });
        }
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let wanted = buf.len() as u64;
        self.inner
            .read_exact(buf)
            .map_err(|e| self.map_short_read(e, wanted))?;
        self.pos += wanted;
        Ok(())
    }

    // The source can shrink underneath us after `len` was measured.
    fn map_short_read(&self, err: io::Error, wanted: u64) -> WadError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            WadError::TruncatedRead {
                offset: self.pos,
                wanted,
                available: self.remaining(),
            }
        } else {
            WadError::Io(err)
        }
    }
}
