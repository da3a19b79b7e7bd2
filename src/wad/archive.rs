use tracing::debug;

use crate::error::{Result, WadError};
use crate::io::{ArchiveSource, WadReader};

use super::extractor::{ExtractObserver, ExtractReport, LumpSink, extract_all};
use super::parser::{parse_directory, parse_header};
use super::structures::{Directory, WadHeader};

/// Lifecycle of one archive.
///
/// `Closed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveState {
    Unopened,
    HeaderRead,
    DirectoryRead,
    Extracted,
    Closed,
    Failed,
}

impl ArchiveState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ArchiveState::Closed | ArchiveState::Failed)
    }
}

/// Drives one archive through open, header, directory and extraction.
///
/// The reader is held only between a successful open and `close` (or the
/// first failure), and is dropped with the controller on any other path.
/// Parsed header and directory stay available after the reader is released.
pub struct ArchiveController<S: ArchiveSource> {
    name: String,
    state: ArchiveState,
    source: Option<S>,
    reader: Option<WadReader<S::Reader>>,
    header: Option<WadHeader>,
    directory: Option<Directory>,
}

impl<S: ArchiveSource> ArchiveController<S> {
    pub fn new(source: S) -> Self {
        Self {
            name: source.describe(),
            state: ArchiveState::Unopened,
            source: Some(source),
            reader: None,
            header: None,
            directory: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ArchiveState {
        self.state
    }

    pub fn header(&self) -> Option<&WadHeader> {
        self.header.as_ref()
    }

    pub fn directory(&self) -> Option<&Directory> {
        self.directory.as_ref()
    }

    /// Length of the open archive, if the reader is still held
    pub fn archive_len(&self) -> Option<u64> {
        self.reader.as_ref().map(WadReader::len)
    }

    /// `Unopened -> HeaderRead`: acquire the reader and decode the header.
    pub fn read_header(&mut self) -> Result<&WadHeader> {
        self.expect_state(ArchiveState::Unopened)?;
        let source = self
            .source
            .take()
            .ok_or(WadError::InvalidState(self.state))?;

        let mut reader = match source.open() {
            Ok(reader) => reader,
            Err(err) => return Err(self.fail(err)),
        };
        debug!("{}: opened, {} bytes", self.name, reader.len());

        match parse_header(&mut reader) {
            Ok(header) => {
                self.reader = Some(reader);
                self.state = ArchiveState::HeaderRead;
                Ok(self.header.insert(header))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// `HeaderRead -> DirectoryRead`: decode the lump table.
    pub fn read_directory(&mut self) -> Result<&Directory> {
        self.expect_state(ArchiveState::HeaderRead)?;
        let (Some(reader), Some(header)) = (self.reader.as_mut(), self.header.as_ref()) else {
            return Err(WadError::InvalidState(self.state));
        };

        match parse_directory(reader, header) {
            Ok(directory) => {
                self.state = ArchiveState::DirectoryRead;
                Ok(self.directory.insert(directory))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// `DirectoryRead -> Extracted`: copy every lump into `sink`.
    ///
    /// Per-lump failures are in the report and do not fail the archive.
    pub fn extract<K, O>(&mut self, sink: &mut K, observer: &mut O) -> Result<ExtractReport>
    where
        K: LumpSink + ?Sized,
        O: ExtractObserver + ?Sized,
    {
        self.expect_state(ArchiveState::DirectoryRead)?;
        let (Some(reader), Some(directory)) = (self.reader.as_mut(), self.directory.as_ref())
        else {
            return Err(WadError::InvalidState(self.state));
        };

        let report = extract_all(reader, directory, sink, observer);
        debug!(
            "{}: {} extracted, {} markers, {} failed",
            self.name,
            report.extracted,
            report.markers,
            report.failures.len()
        );
        self.state = ArchiveState::Extracted;
        Ok(report)
    }

    /// Release the reader. Terminal states are left as they are.
    pub fn close(&mut self) {
        self.reader = None;
        self.source = None;
        if !self.state.is_terminal() {
            debug!("{}: closed from {:?}", self.name, self.state);
            self.state = ArchiveState::Closed;
        }
    }

    /// Read header and directory, then close.
    pub fn inspect(&mut self) -> Result<(&WadHeader, &Directory)> {
        let result = self.read_tables();
        self.close();
        result?;
        match (self.header.as_ref(), self.directory.as_ref()) {
            (Some(header), Some(directory)) => Ok((header, directory)),
            _ => Err(WadError::InvalidState(self.state)),
        }
    }

    /// Run the whole pipeline, closing the reader on every exit path.
    pub fn run<K, O>(&mut self, sink: &mut K, observer: &mut O) -> Result<ExtractReport>
    where
        K: LumpSink + ?Sized,
        O: ExtractObserver + ?Sized,
    {
        let result = self.run_stages(sink, observer);
        self.close();
        result
    }

    fn read_tables(&mut self) -> Result<()> {
        self.read_header()?;
        self.read_directory()?;
        Ok(())
    }

    fn run_stages<K, O>(&mut self, sink: &mut K, observer: &mut O) -> Result<ExtractReport>
    where
        K: LumpSink + ?Sized,
        O: ExtractObserver + ?Sized,
    {
        self.read_tables()?;
        self.extract(sink, observer)
    }

    fn expect_state(&self, expected: ArchiveState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(WadError::InvalidState(self.state))
        }
    }

    fn fail(&mut self, err: WadError) -> WadError {
        debug!("{}: failed while {:?}: {err}", self.name, self.state);
        self.reader = None;
        self.source = None;
        self.state = ArchiveState::Failed;
        err
    }
}
