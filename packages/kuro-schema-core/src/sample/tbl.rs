use std::path::{Path, PathBuf};

use crate::catalog::read_file;
use crate::error::{Result, SchemaError};

/// Marker at the start of every TBL file.
pub const TBL_MAGIC: [u8; 4] = *b"#TBL";

/// Width of the null-padded section name.
pub const SECTION_NAME_LEN: usize = 64;

const SECTION_HEADER_LEN: usize = SECTION_NAME_LEN + 16;

/// One section header of a TBL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TblSection {
    /// Section (table) name
    pub name: String,
    /// Stored checksum, not verified
    pub crc: u32,
    /// Byte offset of the first record
    pub start_offset: u32,
    /// Fixed record length in bytes
    pub entry_length: u32,
    /// Number of records
    pub num_entries: u32,
}

/// Parsed TBL file: section headers plus the raw bytes.
#[derive(Debug, Clone)]
pub struct TblFile {
    path: PathBuf,
    sections: Vec<TblSection>,
    bytes: Vec<u8>,
}

/// Little-endian reader over a byte slice with truncation errors.
struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    path: &'a Path,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize, context: &str) -> Result<&'a [u8]> {
        let available = self.bytes.len().saturating_sub(self.offset);
        if available < len {
            return Err(SchemaError::Truncated {
                path: self.path.to_path_buf(),
                context: context.to_string(),
                needed: len,
                available,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn u32(&mut self, context: &str) -> Result<u32> {
        let slice = self.take(4, context)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(slice);
        Ok(u32::from_le_bytes(buf))
    }
}

impl TblFile {
    /// Reads and parses a TBL file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = read_file(path)?;
        Self::parse(bytes, path)
    }

    /// Parses TBL bytes.
    ///
    /// # Arguments
    /// * `bytes` - Whole file contents
    /// * `path` - Source path for error context
    ///
    /// # Returns
    /// `Result<TblFile>` with all section headers decoded.
    pub fn parse(bytes: Vec<u8>, path: &Path) -> Result<Self> {
        let mut cursor = Cursor {
            bytes: &bytes,
            offset: 0,
            path,
        };

        let magic = cursor.take(4, "magic")?;
        if magic != TBL_MAGIC {
            return Err(SchemaError::BadMagic {
                path: path.to_path_buf(),
                expected: TBL_MAGIC,
                found: magic.to_vec(),
            });
        }

        let count = cursor.u32("section count")? as usize;
        let mut sections = Vec::with_capacity(count.min(bytes.len() / SECTION_HEADER_LEN));
        for index in 0..count {
            let raw_name = cursor.take(SECTION_NAME_LEN, &format!("section {} name", index))?;
            let name_bytes: Vec<u8> = raw_name.iter().copied().filter(|b| *b != 0).collect();
            let name = String::from_utf8(name_bytes).map_err(|_| SchemaError::InvalidUtf8 {
                path: path.to_path_buf(),
                context: format!("section {} name", index),
            })?;

            let context = format!("section '{}' header", name);
            let crc = cursor.u32(&context)?;
            let start_offset = cursor.u32(&context)?;
            let entry_length = cursor.u32(&context)?;
            let num_entries = cursor.u32(&context)?;

            sections.push(TblSection {
                name,
                crc,
                start_offset,
                entry_length,
                num_entries,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            sections,
            bytes,
        })
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Section headers in file order.
    pub fn sections(&self) -> &[TblSection] {
        &self.sections
    }

    /// Looks up a section by name.
    pub fn section(&self, name: &str) -> Option<&TblSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Bytes of the first record of a section, if they lie within the file.
    pub fn first_record(&self, section: &TblSection) -> Option<&[u8]> {
        let start = section.start_offset as usize;
        let end = start.checked_add(section.entry_length as usize)?;
        self.bytes.get(start..end)
    }
}
