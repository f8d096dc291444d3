//! Supported formats and filename extension handling.
//!
//! The set of formats is closed. Every dispatch site matches on [`Format`], so
//! adding a converter means adding a variant here first.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const PLAIN_TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".text", ".csv", ".tsv", ".json", ".xml", ".md", ".markdown", ".log", ".yaml", ".yml",
];
pub const PDF_EXTENSIONS: &[&str] = &[".pdf"];
pub const WORD_EXTENSIONS: &[&str] = &[".docx", ".doc"];
pub const EXCEL_EXTENSIONS: &[&str] = &[".xlsx", ".xlsm", ".xls"];
pub const POWERPOINT_EXTENSIONS: &[&str] = &[".pptx", ".ppt"];
pub const HWP_EXTENSIONS: &[&str] = &[".hwp", ".hwpx"];

/// Document formats the pipeline can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    PlainText,
    Pdf,
    Word,
    Excel,
    #[serde(rename = "powerpoint")]
    PowerPoint,
    Hwp,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::PlainText,
        Format::Pdf,
        Format::Word,
        Format::Excel,
        Format::PowerPoint,
        Format::Hwp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Format::PlainText => "plain-text",
            Format::Pdf => "pdf",
            Format::Word => "word",
            Format::Excel => "excel",
            Format::PowerPoint => "powerpoint",
            Format::Hwp => "hwp",
        }
    }

    /// Every extension registered for this format, legacy ones included.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::PlainText => PLAIN_TEXT_EXTENSIONS,
            Format::Pdf => PDF_EXTENSIONS,
            Format::Word => WORD_EXTENSIONS,
            Format::Excel => EXCEL_EXTENSIONS,
            Format::PowerPoint => POWERPOINT_EXTENSIONS,
            Format::Hwp => HWP_EXTENSIONS,
        }
    }

    /// Extensions that are recognized but have no decoder.
    pub fn legacy_extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Word => &[".doc"],
            Format::Excel => &[".xls"],
            Format::PowerPoint => &[".ppt"],
            Format::PlainText | Format::Pdf | Format::Hwp => &[],
        }
    }

    pub fn is_legacy_extension(&self, extension: &str) -> bool {
        self.legacy_extensions()
            .iter()
            .any(|legacy| legacy.eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position where the final path component starts.
fn file_name_start(filename: &str) -> usize {
    filename.rfind(['/', '\\']).map(|idx| idx + 1).unwrap_or(0)
}

/// Position of the extension dot inside `filename`, if it has one.
///
/// A leading dot (`.bashrc`) and a trailing dot (`name.`) do not start an extension.
fn extension_dot(filename: &str) -> Option<usize> {
    let start = file_name_start(filename);
    let name = &filename[start..];
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 == name.len() => None,
        Some(idx) => Some(start + idx),
    }
}

/// Lowercased extension of `filename` including the leading dot, or `""`.
///
/// ```rust
/// use doctxt::core::format::extension_of;
///
/// assert_eq!(extension_of("Report.PDF"), ".pdf");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(filename: &str) -> String {
    match extension_dot(filename) {
        Some(idx) => filename[idx..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Replaces the extension of `filename` with `.txt`, appending it when there is none.
pub fn txt_filename(filename: &str) -> String {
    let stem = match extension_dot(filename) {
        Some(idx) => &filename[..idx],
        None => filename,
    };
    format!("{}.txt", stem)
}
