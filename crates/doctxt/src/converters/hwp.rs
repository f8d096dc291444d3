//! HWP converter.
//!
//! The content is sniffed rather than trusted to match the extension:
//!
//! | leading bytes          | handled as                         |
//! |------------------------|------------------------------------|
//! | `<` (after whitespace) | HTML/HWPML markup export           |
//! | `PK\x03\x04`           | HWPX (OWPML zip)                   |
//! | OLE magic              | HWP 5.x compound file              |
//! | `HWP Document File`    | HWP 3.x, rejected as legacy        |

use super::Converter;
use crate::core::config::{LimitsConfig, TextConfig};
use crate::core::format::{Format, extension_of};
use crate::text::encoding::TextDecoder;
use crate::text::html::{html_to_text, looks_like_markup};
use crate::types::ConvertedText;
use crate::{ConvertError, Result};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const HWP3_SIGNATURE: &[u8] = b"HWP Document File";

#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "hwp"), allow(dead_code))]
pub struct HwpConverter {
    decoder: TextDecoder,
    max_entry_bytes: u64,
}

impl HwpConverter {
    pub fn new(text: &TextConfig, limits: &LimitsConfig) -> Result<Self> {
        Ok(Self {
            decoder: TextDecoder::new(text)?,
            max_entry_bytes: limits.max_entry_bytes,
        })
    }

    fn convert_markup(&self, content: &[u8]) -> ConvertedText {
        let decoded = self.decoder.decode(content);
        let lossy = decoded.lossy;
        let converted = ConvertedText::new(html_to_text(&decoded.text)).with_encoding(decoded.encoding.name());
        if lossy {
            converted.with_diagnostic(crate::types::Diagnostic::LossyDecode)
        } else {
            converted
        }
    }

    #[cfg(feature = "hwp")]
    fn convert_hwpx(&self, content: &[u8]) -> Result<String> {
        crate::extraction::hwpx::extract_text(content, self.max_entry_bytes)
    }

    #[cfg(not(feature = "hwp"))]
    fn convert_hwpx(&self, _content: &[u8]) -> Result<String> {
        Err(ConvertError::MissingDependency(
            "HWPX support requires the 'hwp' feature".to_string(),
        ))
    }

    #[cfg(feature = "hwp")]
    fn convert_hwp5(&self, content: &[u8]) -> Result<String> {
        crate::extraction::hwp::extract_text(content, self.max_entry_bytes)
    }

    #[cfg(not(feature = "hwp"))]
    fn convert_hwp5(&self, _content: &[u8]) -> Result<String> {
        Err(ConvertError::MissingDependency(
            "HWP 5 support requires the 'hwp' feature".to_string(),
        ))
    }
}

impl Default for HwpConverter {
    fn default() -> Self {
        Self {
            decoder: TextDecoder::default(),
            max_entry_bytes: LimitsConfig::default().max_entry_bytes,
        }
    }
}

impl Converter for HwpConverter {
    fn name(&self) -> &str {
        "hwp"
    }

    fn description(&self) -> &str {
        "Extracts text from Hangul documents (.hwp, .hwpx) and their HTML exports"
    }

    fn format(&self) -> Format {
        Format::Hwp
    }

    fn convert(&self, content: &[u8], filename: &str) -> Result<ConvertedText> {
        if looks_like_markup(content) {
            tracing::debug!("HWP content is markup; converting as HTML");
            return Ok(self.convert_markup(content));
        }

        let text = if content.starts_with(ZIP_MAGIC) {
            self.convert_hwpx(content)?
        } else if content.starts_with(OLE_MAGIC) {
            self.convert_hwp5(content)?
        } else if content.starts_with(HWP3_SIGNATURE) {
            return Err(ConvertError::NotSupported {
                format: Format::Hwp,
                extension: extension_of(filename),
            });
        } else {
            return Err(ConvertError::conversion("Unrecognized HWP content"));
        };

        Ok(ConvertedText::new(crate::text::normalize_whitespace(&text)))
    }
}
