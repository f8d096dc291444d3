//! Word converter.

use super::{Converter, feature_capability, reject_legacy};
use crate::Result;
use crate::core::capabilities::Capability;
use crate::core::config::LimitsConfig;
use crate::core::format::Format;
use crate::types::ConvertedText;

/// Converts `.docx`. Legacy `.doc` files are rejected with `NotSupported`.
#[derive(Debug, Clone)]
pub struct WordConverter {
    #[cfg_attr(not(feature = "office"), allow(dead_code))]
    max_entry_bytes: u64,
}

impl WordConverter {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            max_entry_bytes: limits.max_entry_bytes,
        }
    }
}

impl Default for WordConverter {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}

impl Converter for WordConverter {
    fn name(&self) -> &str {
        "word"
    }

    fn description(&self) -> &str {
        "Extracts text from Word documents (.docx)"
    }

    fn format(&self) -> Format {
        Format::Word
    }

    fn capability(&self) -> Capability {
        feature_capability(cfg!(feature = "office"), "office")
    }

    fn convert(&self, content: &[u8], filename: &str) -> Result<ConvertedText> {
        reject_legacy(Format::Word, filename)?;

        #[cfg(feature = "office")]
        {
            let text = crate::extraction::docx::extract_text(content, self.max_entry_bytes)?;
            Ok(ConvertedText::new(crate::text::normalize_whitespace(&text)))
        }

        #[cfg(not(feature = "office"))]
        {
            let _ = content;
            Err(crate::ConvertError::MissingDependency(
                "Word support requires the 'office' feature".to_string(),
            ))
        }
    }
}
