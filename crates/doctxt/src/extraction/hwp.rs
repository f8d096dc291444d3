//! HWP 5.x (Hangul Word Processor) binary document text extraction.
//!
//! An HWP 5 file is an OLE compound file. `FileHeader` carries the format
//! version and the property flags; the body text lives in
//! `BodyText/Section0`, `BodyText/Section1`, ... as a sequence of records,
//! raw-deflate compressed when the compression flag is set.
//!
//! Each record starts with a 32-bit little-endian header:
//!
//! | bits  | field                                   |
//! |-------|-----------------------------------------|
//! | 0-9   | tag id                                  |
//! | 10-19 | nesting level                           |
//! | 20-31 | payload size (0xFFF: size follows as u32) |
//!
//! Paragraph text is stored in `PARA_TEXT` records as UTF-16LE code units with
//! embedded control characters.

use crate::error::{ConvertError, Result};
use crate::extraction::archive::initial_capacity;
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};

pub const HWP5_SIGNATURE: &[u8] = b"HWP Document File";

const FILE_HEADER_STREAM: &str = "/FileHeader";
const FILE_HEADER_MIN_LEN: usize = 40;

const FLAG_COMPRESSED: u32 = 1 << 0;
const FLAG_PASSWORD: u32 = 1 << 1;
const FLAG_DISTRIBUTION: u32 = 1 << 2;

const HWPTAG_BEGIN: u16 = 0x010;
pub const HWPTAG_PARA_HEADER: u16 = HWPTAG_BEGIN + 50;
pub const HWPTAG_PARA_TEXT: u16 = HWPTAG_BEGIN + 51;

const EXTENDED_SIZE_MARKER: u32 = 0xFFF;

/// Parsed `FileHeader` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Major, minor, build, revision.
    pub version: [u8; 4],
    pub properties: u32,
}

impl FileHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FILE_HEADER_MIN_LEN || !data.starts_with(HWP5_SIGNATURE) {
            return Err(ConvertError::conversion("Invalid HWP file header"));
        }

        let version = u32::from_le_bytes([data[32], data[33], data[34], data[35]]);
        let properties = u32::from_le_bytes([data[36], data[37], data[38], data[39]]);

        Ok(Self {
            version: version.to_be_bytes(),
            properties,
        })
    }

    pub fn is_compressed(&self) -> bool {
        self.properties & FLAG_COMPRESSED != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.properties & FLAG_PASSWORD != 0
    }

    pub fn is_distribution(&self) -> bool {
        self.properties & FLAG_DISTRIBUTION != 0
    }
}

/// One record from a section stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub tag_id: u16,
    pub level: u16,
    pub data: &'a [u8],
}

/// Iterator over the records of a decompressed section stream.
pub struct RecordReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.data.get(self.offset..self.offset + 4)?;
        self.offset += 4;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn truncated(&mut self) -> Option<Result<Record<'a>>> {
        self.offset = self.data.len();
        Some(Err(ConvertError::conversion("Truncated HWP record stream")))
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }

        let Some(header) = self.read_u32() else {
            return self.truncated();
        };
        let tag_id = (header & 0x3FF) as u16;
        let level = ((header >> 10) & 0x3FF) as u16;
        let mut size = header >> 20;

        if size == EXTENDED_SIZE_MARKER {
            match self.read_u32() {
                Some(extended) => size = extended,
                None => return self.truncated(),
            }
        }

        let end = self.offset.checked_add(size as usize)?;
        let Some(data) = self.data.get(self.offset..end) else {
            return self.truncated();
        };
        self.offset = end;

        Some(Ok(Record { tag_id, level, data }))
    }
}

/// Extract text from an HWP 5 compound file.
pub fn extract_text(bytes: &[u8], max_entry_bytes: u64) -> Result<String> {
    let mut compound = cfb::CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| ConvertError::conversion_with_source("Failed to open HWP compound file", e))?;

    if !compound.is_stream(FILE_HEADER_STREAM) {
        return Err(ConvertError::conversion("Not an HWP document: missing FileHeader stream"));
    }
    let header = FileHeader::parse(&read_stream(&mut compound, FILE_HEADER_STREAM, max_entry_bytes)?)?;

    if header.version[0] != 5 {
        return Err(ConvertError::conversion(format!(
            "Unsupported HWP version {}.{}.{}.{}",
            header.version[0], header.version[1], header.version[2], header.version[3]
        )));
    }
    if header.is_encrypted() {
        return Err(ConvertError::conversion("HWP document is password protected"));
    }
    if header.is_distribution() {
        return Err(ConvertError::conversion("HWP distribution documents are encrypted and cannot be read"));
    }

    let mut paragraphs = Vec::new();
    for index in 0.. {
        let path = format!("/BodyText/Section{}", index);
        if !compound.is_stream(&path) {
            break;
        }

        let raw = read_stream(&mut compound, &path, max_entry_bytes)?;
        let section = if header.is_compressed() {
            inflate(&raw, max_entry_bytes, &path)?
        } else {
            raw
        };

        tracing::debug!(section = index, bytes = section.len(), "Parsing HWP section");
        collect_paragraphs(&section, &mut paragraphs)?;
    }

    if paragraphs.is_empty() && !compound.is_stream("/BodyText/Section0") {
        return Err(ConvertError::conversion("HWP document has no BodyText sections"));
    }

    Ok(paragraphs.join("\n"))
}

fn read_stream(compound: &mut cfb::CompoundFile<Cursor<&[u8]>>, path: &str, limit: u64) -> Result<Vec<u8>> {
    let stream = compound
        .open_stream(path)
        .map_err(|e| ConvertError::conversion_with_source(format!("Failed to open HWP stream {}", path), e))?;

    if stream.len() > limit {
        return Err(ConvertError::LimitExceeded {
            what: format!("HWP stream {}", path),
            size: stream.len(),
            limit,
        });
    }

    let mut data = Vec::with_capacity(initial_capacity(stream.len()));
    stream
        .take(limit)
        .read_to_end(&mut data)
        .map_err(|e| ConvertError::conversion_with_source(format!("Failed to read HWP stream {}", path), e))?;
    Ok(data)
}

fn inflate(compressed: &[u8], limit: u64, path: &str) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    DeflateDecoder::new(compressed)
        .take(limit + 1)
        .read_to_end(&mut data)
        .map_err(|e| ConvertError::conversion_with_source(format!("Failed to decompress HWP stream {}", path), e))?;

    if data.len() as u64 > limit {
        return Err(ConvertError::LimitExceeded {
            what: format!("decompressed HWP stream {}", path),
            size: data.len() as u64,
            limit,
        });
    }
    Ok(data)
}

/// Append the text of every `PARA_TEXT` record in `section` to `paragraphs`.
pub fn collect_paragraphs(section: &[u8], paragraphs: &mut Vec<String>) -> Result<()> {
    for record in RecordReader::new(section) {
        let record = record?;
        if record.tag_id == HWPTAG_PARA_TEXT {
            let text = decode_para_text(record.data);
            paragraphs.push(text.trim_end_matches('\n').to_string());
        }
    }
    Ok(())
}

/// Decode a `PARA_TEXT` payload.
///
/// Control characters below U+0020 are either one code unit (char controls)
/// or eight code units (inline and extended controls, whose remaining units
/// carry parameters and are skipped).
pub fn decode_para_text(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let mut text = String::with_capacity(units.len());
    let mut run: Vec<u16> = Vec::new();
    let mut i = 0;

    while i < units.len() {
        let unit = units[i];
        if unit >= 0x20 {
            run.push(unit);
            i += 1;
            continue;
        }

        flush_utf16(&mut run, &mut text);
        match unit {
            10 | 13 => text.push('\n'),
            9 => text.push('\t'),
            24 => text.push('-'),
            30 | 31 => text.push(' '),
            _ => {}
        }
        i += control_width(unit);
    }
    flush_utf16(&mut run, &mut text);

    text
}

fn control_width(unit: u16) -> usize {
    match unit {
        1..=9 | 11 | 12 | 14..=23 => 8,
        _ => 1,
    }
}

fn flush_utf16(run: &mut Vec<u16>, text: &mut String) {
    if run.is_empty() {
        return;
    }
    text.extend(char::decode_utf16(run.drain(..)).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)));
}
