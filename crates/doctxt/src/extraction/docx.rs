//! DOCX (Microsoft Word) text extraction using docx-lite.

use crate::error::{ConvertError, Result};
use crate::extraction::archive::ZipContainer;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract text from DOCX bytes.
///
/// The archive is checked first: it must contain `word/document.xml` and no
/// member may be larger than `max_entry_bytes`. docx-lite then parses the body.
pub fn extract_text(bytes: &[u8], max_entry_bytes: u64) -> Result<String> {
    let mut container = ZipContainer::open(bytes, max_entry_bytes, "DOCX")?;
    if !container.contains(DOCUMENT_PART) {
        return Err(ConvertError::conversion(format!(
            "Not a Word document: missing {}",
            DOCUMENT_PART
        )));
    }
    container.check_entry_sizes()?;

    docx_lite::extract_text_from_bytes(bytes)
        .map_err(|e| ConvertError::conversion(format!("DOCX text extraction failed: {}", e)))
}
