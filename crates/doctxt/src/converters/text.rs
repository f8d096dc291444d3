//! Plain text converter.

use super::Converter;
use crate::Result;
use crate::core::config::TextConfig;
use crate::core::format::Format;
use crate::text::encoding::TextDecoder;
use crate::types::ConvertedText;

/// Decodes line-oriented text files (`.txt`, `.csv`, `.json`, `.md`, ...).
///
/// The content is not parsed or validated; only the character set is
/// detected. Output is byte-exact apart from removal of a UTF-8 BOM.
#[derive(Debug, Clone, Default)]
pub struct PlainTextConverter {
    decoder: TextDecoder,
}

impl PlainTextConverter {
    pub fn new(config: &TextConfig) -> Result<Self> {
        Ok(Self {
            decoder: TextDecoder::new(config)?,
        })
    }
}

impl Converter for PlainTextConverter {
    fn name(&self) -> &str {
        "plain-text"
    }

    fn description(&self) -> &str {
        "Decodes text files, trying UTF-8 and then the configured fallback encodings"
    }

    fn format(&self) -> Format {
        Format::PlainText
    }

    fn convert(&self, content: &[u8], _filename: &str) -> Result<ConvertedText> {
        Ok(self.decoder.decode(content).into_converted())
    }
}
