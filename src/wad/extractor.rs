use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::WadError;
use crate::io::WadReader;

use super::structures::{Directory, LumpEntry};

/// Appended to the archive's file name to name its output directory
pub const OUTPUT_DIR_SUFFIX: &str = " Files";

/// Output directory for `archive`: next to it, or inside `parent` when given.
pub fn output_dir_for(archive: &Path, parent: Option<&Path>) -> PathBuf {
    let mut name = archive
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("archive"));
    name.push(OUTPUT_DIR_SUFFIX);
    match parent {
        Some(dir) => dir.join(name),
        None => archive.with_file_name(name),
    }
}

/// Destination for extracted lump bytes
pub trait LumpSink {
    /// Store `data` under `name`, replacing anything stored under that name before.
    fn write(&mut self, name: &str, data: &[u8]) -> io::Result<()>;
}

/// Writes each lump as a file named after it inside one output directory
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Use `root` as the output directory, creating it if absent.
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output path for a lump name.
    ///
    /// Only names that form a single plain path component are accepted.
    pub fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == name => Ok(self.root.join(part)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("lump name {name:?} is not usable as a file name"),
            )),
        }
    }
}

impl LumpSink for DirectorySink {
    fn write(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        let path = self.path_for(name)?;
        fs::write(path, data)
    }
}

/// Progress callbacks fired while extracting.
///
/// All methods default to doing nothing.
pub trait ExtractObserver {
    fn lump_extracted(&mut self, _entry: &LumpEntry) {}

    fn marker_skipped(&mut self, _entry: &LumpEntry) {}

    fn lump_failed(&mut self, _entry: &LumpEntry, _error: &WadError) {}
}

impl ExtractObserver for () {}

/// A lump that could not be extracted
#[derive(Debug)]
pub struct LumpFailure {
    /// Position in the directory
    pub index: usize,
    pub error: WadError,
}

/// Outcome of one extraction pass
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub extracted: usize,
    pub markers: usize,
    pub failures: Vec<LumpFailure>,
}

impl ExtractReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Copy every non-marker lump from `reader` into `sink`, in directory order.
///
/// Failures are collected per lump; one bad entry never stops the pass.
/// They are handed to `observer` and logged only at debug level.
/// Later lumps with a duplicate name overwrite earlier ones in the sink.
///
/// # Arguments
///
/// * `reader` - The archive reader
/// * `directory` - Lump table from [`parse_directory`](super::parse_directory)
/// * `sink` - Where lump bytes are written
/// * `observer` - Receives one callback per directory entry
///
/// # Returns
///
/// An [`ExtractReport`] counting written lumps and skipped markers, with
/// every per-lump failure in directory order.
pub fn extract_all<R, S, O>(
    reader: &mut WadReader<R>,
    directory: &Directory,
    sink: &mut S,
    observer: &mut O,
) -> ExtractReport
where
    R: Read + Seek,
    S: LumpSink + ?Sized,
    O: ExtractObserver + ?Sized,
{
    let mut report = ExtractReport::default();

    for (index, entry) in directory.iter().enumerate() {
        if entry.is_marker() {
            debug!("skipping marker {}", entry.name);
            report.markers += 1;
            observer.marker_skipped(entry);
            continue;
        }

        match extract_one(reader, entry, sink) {
            Ok(()) => {
                report.extracted += 1;
                observer.lump_extracted(entry);
            }
            Err(error) => {
                // Reporting is the observer's job.
                debug!("{error}");
                observer.lump_failed(entry, &error);
                report.failures.push(LumpFailure { index, error });
            }
        }
    }

    report
}

fn extract_one<R, S>(
    reader: &mut WadReader<R>,
    entry: &LumpEntry,
    sink: &mut S,
) -> Result<(), WadError>
where
    R: Read + Seek,
    S: LumpSink + ?Sized,
{
    let lump_error = |source: io::Error| WadError::LumpIo {
        name: entry.name.clone(),
        offset: entry.data_offset as i64,
        size: entry.byte_length as i64,
        source,
    };

    // Check the range up front so a bogus length never allocates
    if !entry.fits_within(reader.len()) {
        return Err(lump_error(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("range lies outside the {}-byte archive", reader.len()),
        )));
    }

    let data = reader
        .read_range(entry.data_offset as i64, entry.byte_length as usize)
        .map_err(|e| lump_error(e.into()))?;
    sink.write(&entry.name, &data).map_err(lump_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Default)]
    struct MemorySink {
        files: HashMap<String, Vec<u8>>,
        writes: Vec<String>,
        refuse: Option<String>,
    }

    impl LumpSink for MemorySink {
        fn write(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
            if self.refuse.as_deref() == Some(name) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "refused"));
            }
            self.writes.push(name.to_string());
            self.files.insert(name.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ExtractObserver for Recorder {
        fn lump_extracted(&mut self, entry: &LumpEntry) {
            self.events.push(format!("ok {}", entry.name));
        }

        fn marker_skipped(&mut self, entry: &LumpEntry) {
            self.events.push(format!("marker {}", entry.name));
        }

        fn lump_failed(&mut self, entry: &LumpEntry, _error: &WadError) {
            self.events.push(format!("fail {}", entry.name));
        }
    }

    fn name(s: &str) -> [u8; 8] {
        let mut raw = [0u8; 8];
        raw[..s.len()].copy_from_slice(s.as_bytes());
        raw
    }

    fn data_reader() -> WadReader<Cursor<Vec<u8>>> {
        WadReader::new(Cursor::new((0u8..32).collect::<Vec<_>>())).unwrap()
    }

    #[test]
    fn copies_lumps_and_skips_markers() {
        let dir = Directory::new(vec![
            LumpEntry::new(0, 4, name("FIRST")),
            LumpEntry::new(4, 0, name("M_START")),
            LumpEntry::new(10, 3, name("SECOND")),
        ]);
        let mut sink = MemorySink::default();
        let mut recorder = Recorder::default();

        let report = extract_all(&mut data_reader(), &dir, &mut sink, &mut recorder);

        assert_eq!(report.extracted, 2);
        assert_eq!(report.markers, 1);
        assert!(report.is_clean());
        assert_eq!(sink.files["FIRST"], vec![0, 1, 2, 3]);
        assert_eq!(sink.files["SECOND"], vec![10, 11, 12]);
        assert!(!sink.files.contains_key("M_START"));
        assert_eq!(
            recorder.events,
            ["ok FIRST", "marker M_START", "ok SECOND"]
        );
    }

    #[test]
    fn later_duplicate_wins() {
        let dir = Directory::new(vec![
            LumpEntry::new(0, 2, name("DUP")),
            LumpEntry::new(20, 3, name("DUP")),
        ]);
        let mut sink = MemorySink::default();

        let report = extract_all(&mut data_reader(), &dir, &mut sink, &mut ());

        assert_eq!(report.extracted, 2);
        assert_eq!(sink.writes, ["DUP", "DUP"]);
        assert_eq!(sink.files["DUP"], vec![20, 21, 22]);
    }

    #[test]
    fn bad_lumps_do_not_stop_extraction() {
        let dir = Directory::new(vec![
            LumpEntry::new(30, 8, name("PASTEND")),
            LumpEntry::new(-4, 2, name("NEGATIVE")),
            LumpEntry::new(0, -1, name("NEGLEN")),
            LumpEntry::new(0, 1, name("DENIED")),
            LumpEntry::new(5, 1, name("GOOD")),
        ]);
        let mut sink = MemorySink {
            refuse: Some("DENIED".to_string()),
            ..Default::default()
        };
        let mut recorder = Recorder::default();

        let report = extract_all(&mut data_reader(), &dir, &mut sink, &mut recorder);

        assert_eq!(report.extracted, 1);
        let failed: Vec<_> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, [0, 1, 2, 3]);
        assert!(report.failures.iter().all(|f| !f.error.is_fatal()));
        assert_eq!(sink.files["GOOD"], vec![5]);
        assert_eq!(recorder.events.last().unwrap(), "ok GOOD");

        match &report.failures[0].error {
            WadError::LumpIo {
                name, offset, size, ..
            } => assert_eq!((name.as_str(), *offset, *size), ("PASTEND", 30, 8)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn lump_failures_stay_below_warn() {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_max_level(tracing::Level::WARN)
            .finish();
        let dir = Directory::new(vec![LumpEntry::new(9999, 8, name("PAST"))]);
        let mut recorder = Recorder::default();

        let report = tracing::subscriber::with_default(subscriber, || {
            extract_all(&mut data_reader(), &dir, &mut MemorySink::default(), &mut recorder)
        });

        assert_eq!(report.failures.len(), 1);
        assert_eq!(recorder.events, ["fail PAST"]);
        assert!(log.0.lock().unwrap().is_empty());
    }

    #[test]
    fn output_dir_naming() {
        assert_eq!(
            output_dir_for(Path::new("wads/doom2.wad"), None),
            PathBuf::from("wads/doom2.wad Files")
        );
        assert_eq!(
            output_dir_for(Path::new("wads/doom2.wad"), Some(Path::new("out"))),
            PathBuf::from("out/doom2.wad Files")
        );
    }

    #[test]
    fn directory_sink_rejects_path_like_names() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::create(tmp.path().join("out")).unwrap();

        assert!(sink.path_for("PLAYPAL").is_ok());
        for bad in ["", ".", "..", "../X", "A/B", "/ABS", "A/"] {
            assert!(sink.path_for(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn directory_sink_creates_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("out");
        let mut sink = DirectorySink::create(&root).unwrap();
        assert!(root.is_dir());

        sink.write("LUMP", b"first").unwrap();
        sink.write("LUMP", b"2nd").unwrap();
        assert_eq!(fs::read(root.join("LUMP")).unwrap(), b"2nd");
    }
}
