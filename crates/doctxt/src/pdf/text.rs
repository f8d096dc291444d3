//! PDF text extraction using pdfium-render.

use super::bindings::PdfiumSource;
use super::error::{PdfError, Result};
use pdfium_render::prelude::*;

pub struct PdfTextExtractor {
    pdfium: Pdfium,
}

impl PdfTextExtractor {
    pub fn new(source: &PdfiumSource) -> Result<Self> {
        Ok(Self {
            pdfium: Pdfium::new(source.bind()?),
        })
    }

    /// Text of each page, in page order.
    pub fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>> {
        let document = self.pdfium.load_pdf_from_byte_slice(pdf_bytes, None).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("password") || err_msg.contains("Password") {
                PdfError::PasswordRequired
            } else {
                PdfError::InvalidPdf(err_msg)
            }
        })?;

        let pages = document.pages();
        let mut texts = Vec::with_capacity(pages.len() as usize);
        for (index, page) in pages.iter().enumerate() {
            let text = page
                .text()
                .map_err(|e| PdfError::TextExtractionFailed(format!("page {}: {}", index + 1, e)))?;
            texts.push(text.all());
        }

        Ok(texts)
    }
}

/// Extract the text of every page and join the pages with `page_separator`.
pub fn extract_text_from_pdf(source: &PdfiumSource, pdf_bytes: &[u8], page_separator: &str) -> Result<String> {
    let pages = PdfTextExtractor::new(source)?.extract_pages(pdf_bytes)?;
    tracing::debug!(pages = pages.len(), "Extracted PDF text");
    Ok(pages.join(page_separator))
}
