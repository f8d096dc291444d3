//! PowerPoint presentation (.pptx) text extraction.
//!
//! Slides are read in the order of the presentation's slide list
//! (`p:sldIdLst` resolved through `ppt/_rels/presentation.xml.rels`). When that
//! list is missing, `ppt/slides/slideN.xml` members are used in numeric order.
//!
//! Within a slide, shapes are emitted top-to-bottom, left-to-right using their
//! `a:xfrm` offsets. Text boxes contribute one line per paragraph; tables
//! contribute one line per row with cells joined by ` | `.

use crate::error::{ConvertError, Result};
use crate::extraction::archive::{ZipContainer, member_number};
use roxmltree::{Document, Node};
use std::collections::HashMap;

const P_NAMESPACE: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const A_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const RELS_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
const NOTES_SLIDE_TYPE_SUFFIX: &str = "/notesSlide";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
struct ElementPosition {
    y: i64,
    x: i64,
}

struct Relationship {
    rel_type: String,
    target: String,
}

/// Extract text from PPTX bytes.
pub fn extract_text(bytes: &[u8], include_notes: bool, max_entry_bytes: u64) -> Result<String> {
    let mut container = ZipContainer::open(bytes, max_entry_bytes, "PPTX")?;
    if !container.contains(PRESENTATION_PART) {
        return Err(ConvertError::conversion(format!(
            "Not a PowerPoint presentation: missing {}",
            PRESENTATION_PART
        )));
    }

    let slide_paths = find_slide_paths(&mut container)?;
    let mut output = Vec::with_capacity(slide_paths.len());

    for (index, slide_path) in slide_paths.iter().enumerate() {
        let Some(slide_xml) = container.read_xml_optional(slide_path)? else {
            tracing::warn!(slide = %slide_path, "Slide listed in presentation but missing from archive");
            continue;
        };

        let mut rendered = format!("[Slide {}]", index + 1);
        let body = render_slide(&slide_xml)?;
        if !body.is_empty() {
            rendered.push('\n');
            rendered.push_str(&body);
        }

        if include_notes
            && let Some(notes) = read_notes(&mut container, slide_path)?
            && !notes.is_empty()
        {
            rendered.push_str("\n[Notes]\n");
            rendered.push_str(&notes);
        }

        output.push(rendered);
    }

    Ok(output.join("\n\n"))
}

fn find_slide_paths(container: &mut ZipContainer<'_>) -> Result<Vec<String>> {
    if let Some(presentation) = container.read_xml_optional(PRESENTATION_PART)?
        && let Some(rels) = container.read_xml_optional(PRESENTATION_RELS)?
    {
        let relationships = parse_relationships(&rels)?;
        let doc = Document::parse(&presentation)?;

        let ordered: Vec<String> = doc
            .descendants()
            .filter(|n| n.has_tag_name((P_NAMESPACE, "sldId")))
            .filter_map(|n| n.attribute((RELS_NAMESPACE, "id")))
            .filter_map(|id| relationships.get(id))
            .map(|rel| resolve_target("ppt", &rel.target))
            .collect();

        if !ordered.is_empty() {
            return Ok(ordered);
        }
    }

    let mut numbered: Vec<(u32, String)> = container
        .names()
        .into_iter()
        .filter_map(|name| member_number(&name, "ppt/slides/slide", ".xml").map(|n| (n, name)))
        .collect();
    numbered.sort();

    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

fn parse_relationships(rels_xml: &str) -> Result<HashMap<String, Relationship>> {
    let doc = Document::parse(rels_xml)?;
    let mut relationships = HashMap::new();

    for node in doc.descendants().filter(|n| n.tag_name().name() == "Relationship") {
        if let (Some(id), Some(rel_type), Some(target)) =
            (node.attribute("Id"), node.attribute("Type"), node.attribute("Target"))
        {
            relationships.insert(
                id.to_string(),
                Relationship {
                    rel_type: rel_type.to_string(),
                    target: target.to_string(),
                },
            );
        }
    }

    Ok(relationships)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn slide_rels_path(slide_path: &str) -> String {
    match slide_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", slide_path),
    }
}

fn read_notes(container: &mut ZipContainer<'_>, slide_path: &str) -> Result<Option<String>> {
    let Some(rels) = container.read_xml_optional(&slide_rels_path(slide_path))? else {
        return Ok(None);
    };

    let base_dir = slide_path.rsplit_once('/').map_or("", |(dir, _)| dir);
    let notes_path = parse_relationships(&rels)?
        .into_values()
        .find(|rel| rel.rel_type.ends_with(NOTES_SLIDE_TYPE_SUFFIX))
        .map(|rel| resolve_target(base_dir, &rel.target));

    let Some(notes_path) = notes_path else {
        return Ok(None);
    };
    let Some(notes_xml) = container.read_xml_optional(&notes_path)? else {
        return Ok(None);
    };

    Ok(Some(extract_notes_text(&notes_xml)?))
}

/// Text of the body placeholder of a notes slide.
fn extract_notes_text(notes_xml: &str) -> Result<String> {
    let doc = Document::parse(notes_xml)?;

    let paragraphs: Vec<String> = doc
        .descendants()
        .filter(|n| n.has_tag_name((P_NAMESPACE, "sp")) && is_body_placeholder(n))
        .flat_map(|sp| text_body_paragraphs(&sp))
        .filter(|p| !p.is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn is_body_placeholder(sp: &Node) -> bool {
    sp.descendants()
        .find(|n| n.has_tag_name((P_NAMESPACE, "ph")))
        .is_some_and(|ph| ph.attribute("type") == Some("body"))
}

fn render_slide(slide_xml: &str) -> Result<String> {
    let doc = Document::parse(slide_xml)?;

    let sp_tree = doc
        .descendants()
        .find(|n| n.has_tag_name((P_NAMESPACE, "spTree")))
        .ok_or_else(|| ConvertError::conversion("No <p:spTree> found in slide"))?;

    let mut elements = Vec::new();
    for child in sp_tree.children().filter(|n| n.is_element()) {
        collect_elements(&child, &mut elements);
    }
    elements.sort_by_key(|(position, _)| *position);

    Ok(elements
        .into_iter()
        .map(|(_, text)| text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn collect_elements(node: &Node, elements: &mut Vec<(ElementPosition, String)>) {
    if node.tag_name().namespace() != Some(P_NAMESPACE) {
        return;
    }

    match node.tag_name().name() {
        "sp" => {
            let text = text_body_paragraphs(node).join("\n");
            elements.push((extract_position(node), text));
        }
        "graphicFrame" => {
            if let Some(table) = node.descendants().find(|n| n.has_tag_name((A_NAMESPACE, "tbl"))) {
                elements.push((extract_position(node), render_table(&table)));
            }
        }
        "grpSp" => {
            for child in node.children().filter(|n| n.is_element()) {
                collect_elements(&child, elements);
            }
        }
        _ => {}
    }
}

fn text_body_paragraphs(sp: &Node) -> Vec<String> {
    let Some(tx_body) = sp
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "txBody")
    else {
        return Vec::new();
    };

    tx_body
        .children()
        .filter(|n| n.has_tag_name((A_NAMESPACE, "p")))
        .map(|p| paragraph_text(&p))
        .collect()
}

fn paragraph_text(p: &Node) -> String {
    let mut text = String::new();
    for child in p.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(A_NAMESPACE) {
            continue;
        }
        match child.tag_name().name() {
            "r" | "fld" => {
                if let Some(t) = child
                    .children()
                    .find(|n| n.has_tag_name((A_NAMESPACE, "t")))
                    .and_then(|t| t.text())
                {
                    text.push_str(t);
                }
            }
            "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

fn render_table(tbl: &Node) -> String {
    tbl.children()
        .filter(|n| n.has_tag_name((A_NAMESPACE, "tr")))
        .map(|tr| {
            tr.children()
                .filter(|n| n.has_tag_name((A_NAMESPACE, "tc")))
                .map(|tc| {
                    tc.descendants()
                        .filter(|n| n.has_tag_name((A_NAMESPACE, "p")))
                        .map(|p| paragraph_text(&p))
                        .filter(|p| !p.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_position(node: &Node) -> ElementPosition {
    node.descendants()
        .find(|n| n.tag_name().name() == "xfrm")
        .and_then(|xfrm| xfrm.children().find(|n| n.has_tag_name((A_NAMESPACE, "off"))))
        .and_then(|off| {
            Some(ElementPosition {
                x: off.attribute("x")?.parse().ok()?,
                y: off.attribute("y")?.parse().ok()?,
            })
        })
        .unwrap_or_default()
}
