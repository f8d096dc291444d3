//! Zip container access for OOXML (`.docx`, `.xlsx`, `.pptx`) and OWPML (`.hwpx`) documents.
//!
//! Every member read goes through a size limit so that a small archive cannot
//! expand into an unbounded amount of memory.

use crate::{ConvertError, Result};
use std::io::{self, Cursor, Read};
use zip::ZipArchive;

/// Upper bound for buffer preallocation taken from sizes an archive declares.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Initial buffer capacity for a member that claims to be `declared` bytes long.
pub fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOCATION) as usize
}

pub struct ZipContainer<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    max_entry_bytes: u64,
}

impl<'a> ZipContainer<'a> {
    /// Open `bytes` as a zip archive. `kind` names the document type in error messages.
    pub fn open(bytes: &'a [u8], max_entry_bytes: u64, kind: &str) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ConvertError::conversion_with_source(format!("Failed to read {} archive", kind), e))?;

        Ok(Self {
            archive,
            max_entry_bytes,
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a member that must exist.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        self.read_optional(name)?
            .ok_or_else(|| ConvertError::conversion(format!("Missing archive member '{}'", name)))
    }

    pub fn read_optional(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(index) = self.archive.index_for_name(name) else {
            return Ok(None);
        };

        let limit = self.max_entry_bytes;
        let file = self
            .archive
            .by_index(index)
            .map_err(|e| ConvertError::conversion_with_source(format!("Failed to open archive member '{}'", name), e))?;

        let declared = file.size();
        if declared > limit {
            return Err(ConvertError::LimitExceeded {
                what: format!("archive member '{}'", name),
                size: declared,
                limit,
            });
        }

        let mut contents = Vec::with_capacity(initial_capacity(declared));
        file.take(limit + 1)
            .read_to_end(&mut contents)
            .map_err(|e| ConvertError::conversion_with_source(format!("Failed to decompress '{}'", name), e))?;

        if contents.len() as u64 > limit {
            return Err(ConvertError::LimitExceeded {
                what: format!("archive member '{}'", name),
                size: contents.len() as u64,
                limit,
            });
        }

        Ok(Some(contents))
    }

    /// Read a member as UTF-8 XML, dropping a leading byte-order mark.
    pub fn read_xml(&mut self, name: &str) -> Result<String> {
        let bytes = self.read(name)?;
        xml_string(bytes, name)
    }

    pub fn read_xml_optional(&mut self, name: &str) -> Result<Option<String>> {
        match self.read_optional(name)? {
            Some(bytes) => Ok(Some(xml_string(bytes, name)?)),
            None => Ok(None),
        }
    }

    /// Check every member against the limit by decompressing it into a sink.
    ///
    /// For backends that read the archive themselves and would otherwise
    /// inflate members without a bound. Declared sizes are checked first, then
    /// each member is read up to one byte past the limit, so a member whose
    /// header understates its size is still caught.
    pub fn check_entry_sizes(&mut self) -> Result<()> {
        let limit = self.max_entry_bytes;
        for index in 0..self.archive.len() {
            let file = self
                .archive
                .by_index(index)
                .map_err(|e| ConvertError::conversion_with_source("Failed to read archive directory", e))?;
            let name = file.name().to_string();

            let declared = file.size();
            if declared > limit {
                return Err(ConvertError::LimitExceeded {
                    what: format!("archive member '{}'", name),
                    size: declared,
                    limit,
                });
            }

            let inflated = io::copy(&mut file.take(limit + 1), &mut io::sink())
                .map_err(|e| ConvertError::conversion_with_source(format!("Failed to decompress '{}'", name), e))?;
            if inflated > limit {
                return Err(ConvertError::LimitExceeded {
                    what: format!("archive member '{}'", name),
                    size: inflated,
                    limit,
                });
            }
        }
        Ok(())
    }
}

fn xml_string(bytes: Vec<u8>, name: &str) -> Result<String> {
    let mut text = String::from_utf8(bytes)
        .map_err(|e| ConvertError::conversion_with_source(format!("Invalid UTF-8 in '{}'", name), e))?;
    if text.starts_with('\u{feff}') {
        text.drain(..'\u{feff}'.len_utf8());
    }
    Ok(text)
}

/// Trailing decimal number of a member name, e.g. 12 for `ppt/slides/slide12.xml`.
pub fn member_number(name: &str, prefix: &str, suffix: &str) -> Option<u32> {
    name.strip_prefix(prefix)?.strip_suffix(suffix)?.parse().ok()
}
