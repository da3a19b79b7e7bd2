//! Synthetic WAD archives for integration tests.

#![allow(dead_code)]

/// Lays out header, lump data, then the directory at the end of the file
pub struct WadBuilder {
    tag: [u8; 4],
    lumps: Vec<(String, Vec<u8>)>,
    dangling: Vec<(String, i32, i32)>,
}

impl WadBuilder {
    pub fn new(tag: &[u8; 4]) -> Self {
        Self {
            tag: *tag,
            lumps: Vec::new(),
            dangling: Vec::new(),
        }
    }

    pub fn lump(mut self, name: &str, data: &[u8]) -> Self {
        self.lumps.push((name.to_string(), data.to_vec()));
        self
    }

    pub fn marker(self, name: &str) -> Self {
        self.lump(name, &[])
    }

    /// Directory record with no backing data, listed after the real lumps
    pub fn dangling(mut self, name: &str, offset: i32, len: i32) -> Self {
        self.dangling.push((name.to_string(), offset, len));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        let mut directory = Vec::new();
        for (name, bytes) in &self.lumps {
            let offset = 12 + data.len() as i32;
            directory.extend_from_slice(&offset.to_le_bytes());
            directory.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
            directory.extend_from_slice(&raw_name(name));
            data.extend_from_slice(bytes);
        }
        for (name, offset, len) in &self.dangling {
            directory.extend_from_slice(&offset.to_le_bytes());
            directory.extend_from_slice(&len.to_le_bytes());
            directory.extend_from_slice(&raw_name(name));
        }

        let count = self.lumps.len() + self.dangling.len();
        let mut out = self.tag.to_vec();
        out.extend_from_slice(&(count as i32).to_le_bytes());
        out.extend_from_slice(&(12 + data.len() as i32).to_le_bytes());
        out.extend(data);
        out.extend(directory);
        out
    }
}

/// NUL-padded 8-byte name field
pub fn raw_name(name: &str) -> [u8; 8] {
    let mut raw = [0u8; 8];
    raw[..name.len()].copy_from_slice(name.as_bytes());
    raw
}

/// Archive from the format description: directory first, then one lump and a marker
pub fn two_entry_scenario() -> Vec<u8> {
    let mut out = b"PWAD".to_vec();
    out.extend_from_slice(&2i32.to_le_bytes());
    out.extend_from_slice(&12i32.to_le_bytes());
    for (offset, len, name) in [(44i32, 4i32, "LUMP1"), (48, 0, "MARK")] {
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&raw_name(name));
    }
    out.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    out
}
