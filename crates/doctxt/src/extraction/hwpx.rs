//! HWPX (OWPML) text extraction.
//!
//! An HWPX file is a zip archive; the body is split across
//! `Contents/section0.xml`, `Contents/section1.xml`, ... Paragraphs are `hp:p`
//! elements whose runs (`hp:run`) hold text in `hp:t`. Table cells contain
//! their own nested paragraphs, which are emitted after the paragraph that
//! anchors the table.

use crate::error::{ConvertError, Result};
use crate::extraction::archive::{ZipContainer, member_number};
use roxmltree::{Document, Node};

const SECTION_PREFIX: &str = "Contents/section";
const SECTION_SUFFIX: &str = ".xml";

/// Extract text from HWPX bytes.
pub fn extract_text(bytes: &[u8], max_entry_bytes: u64) -> Result<String> {
    let mut container = ZipContainer::open(bytes, max_entry_bytes, "HWPX")?;

    let mut sections: Vec<(u32, String)> = container
        .names()
        .into_iter()
        .filter_map(|name| member_number(&name, SECTION_PREFIX, SECTION_SUFFIX).map(|n| (n, name)))
        .collect();
    sections.sort();

    if sections.is_empty() {
        return Err(ConvertError::conversion("Not an HWPX document: no Contents/sectionN.xml parts"));
    }

    let mut paragraphs = Vec::new();
    for (_, name) in sections {
        let xml = container.read_xml(&name)?;
        paragraphs.extend(section_paragraphs(&xml)?);
    }

    Ok(paragraphs.join("\n"))
}

/// One string per `hp:p` element of a section, in document order.
pub fn section_paragraphs(section_xml: &str) -> Result<Vec<String>> {
    let doc = Document::parse(section_xml)?;

    Ok(doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "p")
        .map(|p| paragraph_text(&p))
        .collect())
}

fn paragraph_text(p: &Node) -> String {
    let mut text = String::new();
    for run in p.children().filter(|n| n.is_element() && n.tag_name().name() == "run") {
        for t in run.children().filter(|n| n.is_element() && n.tag_name().name() == "t") {
            push_text_element(&t, &mut text);
        }
    }
    text
}

fn push_text_element(t: &Node, text: &mut String) {
    for child in t.children() {
        if child.is_text() {
            if let Some(value) = child.text() {
                text.push_str(value);
            }
            continue;
        }

        match child.tag_name().name() {
            "tab" => text.push('\t'),
            "lineBreak" => text.push('\n'),
            "nbSpace" | "fwSpace" => text.push(' '),
            "hyphen" => text.push('-'),
            _ => {}
        }
    }
}
