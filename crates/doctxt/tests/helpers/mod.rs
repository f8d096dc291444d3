//! Fixture builders shared by the integration tests.
//!
//! Documents are assembled in memory so the tests do not depend on binary
//! files in the repository.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
</Types>"#;

/// Zip archive from `(member name, contents)` pairs.
pub fn zip_archive(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();
        for (name, contents) in members {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

/// Rewrite the uncompressed size recorded for `member` in both its local and
/// central directory headers, leaving the compressed data untouched.
pub fn understate_member_size(bytes: &mut [u8], member: &str, size: u32) {
    let u16_at = |b: &[u8], at: usize| u16::from_le_bytes([b[at], b[at + 1]]) as usize;
    let mut patched = 0;
    for offset in 0..bytes.len().saturating_sub(46) {
        let (size_at, name_at, name_len) = match &bytes[offset..offset + 4] {
            b"PK\x03\x04" => (offset + 22, offset + 30, u16_at(bytes, offset + 26)),
            b"PK\x01\x02" => (offset + 24, offset + 46, u16_at(bytes, offset + 28)),
            _ => continue,
        };
        if bytes.get(name_at..name_at + name_len) == Some(member.as_bytes()) {
            bytes[size_at..size_at + 4].copy_from_slice(&size.to_le_bytes());
            patched += 1;
        }
    }
    assert_eq!(patched, 2, "expected a local and a central header for {}", member);
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// DOCX with one `w:p` per entry of `paragraphs`.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", escape(p)))
        .collect();

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

    zip_archive(&[
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", rels.as_bytes()),
        ("word/document.xml", document.as_bytes()),
    ])
}

/// Cell value for [`xlsx`].
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Empty,
}

/// XLSX with one worksheet per `(name, rows)` entry. Strings are inline.
pub fn xlsx(sheets: &[(&str, Vec<Vec<Cell<'_>>>)]) -> Vec<u8> {
    let mut workbook_sheets = String::new();
    let mut workbook_rels = String::new();
    let mut worksheets = Vec::new();

    for (index, (name, rows)) in sheets.iter().enumerate() {
        let number = index + 1;
        workbook_sheets.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            number,
            number
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            number, number
        ));

        let mut sheet_data = String::new();
        for (r, row) in rows.iter().enumerate() {
            sheet_data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", (b'A' + c as u8) as char, r + 1);
                match cell {
                    Cell::Text(text) => sheet_data.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        reference,
                        escape(text)
                    )),
                    Cell::Number(value) => {
                        sheet_data.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value))
                    }
                    Cell::Bool(value) => sheet_data.push_str(&format!(
                        r#"<c r="{}" t="b"><v>{}</v></c>"#,
                        reference,
                        u8::from(*value)
                    )),
                    Cell::Empty => {}
                }
            }
            sheet_data.push_str("</row>");
        }

        worksheets.push((
            format!("xl/worksheets/sheet{}.xml", number),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                sheet_data
            ),
        ));
    }

    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
        workbook_sheets
    );
    let workbook_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        workbook_rels
    );
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

    let mut members: Vec<(&str, &[u8])> = vec![
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", root_rels.as_bytes()),
        ("xl/workbook.xml", workbook.as_bytes()),
        ("xl/_rels/workbook.xml.rels", workbook_rels.as_bytes()),
    ];
    for (name, xml) in &worksheets {
        members.push((name.as_str(), xml.as_bytes()));
    }

    zip_archive(&members)
}

const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Text box at `(x, y)` with one paragraph per entry.
pub fn text_shape(x: i64, y: i64, paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", escape(p)))
        .collect();
    format!(
        r#"<p:sp><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr><p:txBody>{}</p:txBody></p:sp>"#,
        x, y, body
    )
}

/// A slide for [`pptx`]: its shapes and optional speaker notes.
pub struct Slide<'a> {
    pub shapes: Vec<String>,
    pub notes: Option<&'a str>,
}

/// PPTX whose slide list references the slides in the given order.
///
/// Slide parts are numbered in reverse so that presentation order and file
/// order differ.
pub fn pptx(slides: &[Slide<'_>]) -> Vec<u8> {
    let count = slides.len();
    let mut members: Vec<(String, String)> = Vec::new();
    let mut slide_ids = String::new();
    let mut presentation_rels = String::new();

    for (index, slide) in slides.iter().enumerate() {
        let part_number = count - index;
        let rel_id = format!("rId{}", index + 1);
        slide_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + index, rel_id));
        presentation_rels.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            rel_id, part_number
        ));

        members.push((
            format!("ppt/slides/slide{}.xml", part_number),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<p:sld xmlns:p="{P_NS}" xmlns:a="{A_NS}" xmlns:r="{R_NS}"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
                slide.shapes.concat()
            ),
        ));

        if let Some(notes) = slide.notes {
            members.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", part_number),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide{}.xml"/></Relationships>"#,
                    part_number
                ),
            ));
            members.push((
                format!("ppt/notesSlides/notesSlide{}.xml", part_number),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?>
<p:notes xmlns:p="{P_NS}" xmlns:a="{A_NS}"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Notes"/><p:cNvSpPr/><p:nvPr><p:ph type="body"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#,
                    escape(notes)
                ),
            ));
        }
    }

    members.push((
        "ppt/presentation.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<p:presentation xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:sldIdLst>{}</p:sldIdLst></p:presentation>"#,
            slide_ids
        ),
    ));
    members.push((
        "ppt/_rels/presentation.xml.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            presentation_rels
        ),
    ));

    let mut all: Vec<(&str, &[u8])> = vec![("[Content_Types].xml", CONTENT_TYPES.as_bytes())];
    for (name, xml) in &members {
        all.push((name.as_str(), xml.as_bytes()));
    }
    zip_archive(&all)
}

/// HWPX archive with one section per entry, each a list of paragraphs.
pub fn hwpx(sections: &[&[&str]]) -> Vec<u8> {
    let mut parts = Vec::new();
    for (index, paragraphs) in sections.iter().enumerate() {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<hp:p><hp:run><hp:t>{}</hp:t></hp:run></hp:p>", escape(p)))
            .collect();
        parts.push((
            format!("Contents/section{}.xml", index),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<hs:sec xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph">{}</hs:sec>"#,
                body
            ),
        ));
    }

    let mut members: Vec<(&str, &[u8])> = vec![("mimetype", &b"application/hwp+zip"[..])];
    for (name, xml) in &parts {
        members.push((name.as_str(), xml.as_bytes()));
    }
    zip_archive(&members)
}

const HWPTAG_PARA_TEXT: u32 = 0x43;

/// Body text record stream: one `PARA_TEXT` record per paragraph.
pub fn hwp_section(paragraphs: &[&str]) -> Vec<u8> {
    let mut stream = Vec::new();
    for paragraph in paragraphs {
        let mut payload = Vec::new();
        for unit in paragraph.encode_utf16().chain(std::iter::once(13u16)) {
            payload.extend_from_slice(&unit.to_le_bytes());
        }

        let header = HWPTAG_PARA_TEXT | ((payload.len() as u32) << 20);
        stream.extend_from_slice(&header.to_le_bytes());
        stream.extend_from_slice(&payload);
    }
    stream
}

/// `FileHeader` stream for HWP 5.0.3.0 with the given property flags.
pub fn hwp_file_header(properties: u32) -> Vec<u8> {
    let mut header = vec![0u8; 256];
    let signature = b"HWP Document File";
    header[..signature.len()].copy_from_slice(signature);
    header[32..36].copy_from_slice(&0x0500_0300u32.to_le_bytes());
    header[36..40].copy_from_slice(&properties.to_le_bytes());
    header
}

/// HWP 5 compound file with compressed body text sections.
pub fn hwp5(sections: &[&[&str]]) -> Vec<u8> {
    use flate2::Compression;
    use flate2::write::DeflateEncoder;

    let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    {
        let mut stream = compound.create_stream("/FileHeader").unwrap();
        stream.write_all(&hwp_file_header(1)).unwrap();
    }
    compound.create_storage("/BodyText").unwrap();

    for (index, paragraphs) in sections.iter().enumerate() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&hwp_section(paragraphs)).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut stream = compound
            .create_stream(format!("/BodyText/Section{}", index))
            .unwrap();
        stream.write_all(&compressed).unwrap();
    }

    compound.flush().unwrap();
    compound.into_inner().into_inner()
}
