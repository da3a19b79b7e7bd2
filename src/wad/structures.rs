use std::fmt;

/// WAD header - 12 bytes at offset 0
pub const HEADER_SIZE: u64 = 12;

/// Directory record - 16 bytes each
pub const DIRECTORY_ENTRY_SIZE: u64 = 16;

/// Raw lump name field width
pub const LUMP_NAME_LEN: usize = 8;

/// Archive variant named by the header tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    /// Internal WAD: a complete game data set
    Iwad,
    /// Patch WAD: overrides layered on an IWAD
    Pwad,
    /// Any other tag; accepted, since the variant does not change extraction
    Unknown([u8; 4]),
}

impl WadKind {
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            _ => WadKind::Unknown(tag),
        }
    }

    pub fn tag(&self) -> [u8; 4] {
        match self {
            WadKind::Iwad => *b"IWAD",
            WadKind::Pwad => *b"PWAD",
            WadKind::Unknown(tag) => *tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WadKind::Unknown(_))
    }
}

impl fmt::Display for WadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.tag()))
    }
}

/// Decoded archive header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadHeader {
    pub kind: WadKind,
    pub entry_count: i32,
    pub directory_offset: i32,
}

impl WadHeader {
    /// Byte offset one past the last directory record.
    pub fn directory_end(&self) -> i64 {
        self.directory_offset as i64 + self.entry_count as i64 * DIRECTORY_ENTRY_SIZE as i64
    }
}

/// One directory record: where a lump lives and what it is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumpEntry {
    pub data_offset: i32,
    pub byte_length: i32,
    /// Name with trailing NUL/whitespace padding removed
    pub name: String,
    pub raw_name: [u8; LUMP_NAME_LEN],
}

impl LumpEntry {
    pub fn new(data_offset: i32, byte_length: i32, raw_name: [u8; LUMP_NAME_LEN]) -> Self {
        Self {
            data_offset,
            byte_length,
            name: decode_lump_name(&raw_name),
            raw_name,
        }
    }

    /// Zero-length entries are structural separators with no content.
    pub fn is_marker(&self) -> bool {
        self.byte_length == 0
    }

    /// Offset one past the lump's last byte
    pub fn end(&self) -> i64 {
        self.data_offset as i64 + self.byte_length as i64
    }

    /// Whether the lump's byte range lies inside an archive of `len` bytes.
    pub fn fits_within(&self, len: u64) -> bool {
        self.data_offset >= 0 && self.byte_length >= 0 && self.end() as u64 <= len
    }
}

impl fmt::Display for LumpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({} bytes)",
            self.name, self.data_offset, self.byte_length
        )
    }
}

/// Decode an 8-byte name field, trimming trailing padding only.
pub fn decode_lump_name(raw: &[u8; LUMP_NAME_LEN]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

/// Ordered lump table; duplicates are kept in directory order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<LumpEntry>,
}

impl Directory {
    pub fn new(entries: Vec<LumpEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LumpEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LumpEntry> {
        self.entries.iter()
    }

    /// The entry that wins when several share `name`: the last one.
    pub fn find_last(&self, name: &str) -> Option<&LumpEntry> {
        self.entries.iter().rev().find(|e| e.name == name)
    }

    pub fn markers(&self) -> impl Iterator<Item = &LumpEntry> {
        self.entries.iter().filter(|e| e.is_marker())
    }

    pub fn lumps(&self) -> impl Iterator<Item = &LumpEntry> {
        self.entries.iter().filter(|e| !e.is_marker())
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a LumpEntry;
    type IntoIter = std::slice::Iter<'a, LumpEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
