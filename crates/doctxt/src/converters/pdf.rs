//! PDF converter.

use super::Converter;
use crate::core::capabilities::Capability;
use crate::core::config::PdfConfig;
use crate::core::format::Format;
use crate::types::ConvertedText;
use crate::{ConvertError, Result};

/// Extracts PDF text through PDFium.
///
/// Whether PDFium is usable is decided once in [`PdfConverter::new`]. When it is
/// not, every conversion fails with `MissingDependency`.
#[derive(Debug, Clone)]
pub struct PdfConverter {
    #[cfg_attr(not(feature = "pdf"), allow(dead_code))]
    page_separator: String,
    #[cfg(feature = "pdf")]
    source: Option<crate::pdf::PdfiumSource>,
    capability: Capability,
}

impl PdfConverter {
    #[cfg(feature = "pdf")]
    pub fn new(config: &PdfConfig) -> Self {
        let library_dir = config.resolved_library_path();
        match crate::pdf::PdfiumSource::probe(library_dir.as_deref()) {
            Ok(source) => Self {
                page_separator: config.page_separator.clone(),
                source: Some(source),
                capability: Capability::Available,
            },
            Err(e) => Self {
                page_separator: config.page_separator.clone(),
                source: None,
                capability: Capability::Unavailable { reason: e.to_string() },
            },
        }
    }

    #[cfg(not(feature = "pdf"))]
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            page_separator: config.page_separator.clone(),
            capability: super::feature_capability(false, "pdf"),
        }
    }

    fn missing_dependency(&self) -> ConvertError {
        ConvertError::MissingDependency(
            self.capability
                .reason()
                .unwrap_or("PDFium library unavailable")
                .to_string(),
        )
    }
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new(&PdfConfig::default())
    }
}

impl Converter for PdfConverter {
    fn name(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &str {
        "Extracts text from PDF documents using PDFium"
    }

    fn format(&self) -> Format {
        Format::Pdf
    }

    fn capability(&self) -> Capability {
        self.capability.clone()
    }

    #[cfg(feature = "pdf")]
    fn convert(&self, content: &[u8], _filename: &str) -> Result<ConvertedText> {
        let Some(source) = &self.source else {
            return Err(self.missing_dependency());
        };

        let text = crate::pdf::extract_text_from_pdf(source, content, &self.page_separator)?;
        Ok(ConvertedText::new(crate::text::normalize_whitespace(&text)))
    }

    #[cfg(not(feature = "pdf"))]
    fn convert(&self, _content: &[u8], _filename: &str) -> Result<ConvertedText> {
        Err(self.missing_dependency())
    }
}
