//! PowerPoint converter.

use super::{Converter, feature_capability, reject_legacy};
use crate::Result;
use crate::core::capabilities::Capability;
use crate::core::config::{LimitsConfig, PresentationConfig};
use crate::core::format::Format;
use crate::types::ConvertedText;

/// Converts `.pptx` presentations. Legacy `.ppt` is rejected with `NotSupported`.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "office"), allow(dead_code))]
pub struct PowerPointConverter {
    include_notes: bool,
    max_entry_bytes: u64,
}

impl PowerPointConverter {
    pub fn new(presentation: &PresentationConfig, limits: &LimitsConfig) -> Self {
        Self {
            include_notes: presentation.include_notes,
            max_entry_bytes: limits.max_entry_bytes,
        }
    }
}

impl Default for PowerPointConverter {
    fn default() -> Self {
        Self::new(&PresentationConfig::default(), &LimitsConfig::default())
    }
}

impl Converter for PowerPointConverter {
    fn name(&self) -> &str {
        "powerpoint"
    }

    fn description(&self) -> &str {
        "Extracts slide text from PowerPoint presentations (.pptx)"
    }

    fn format(&self) -> Format {
        Format::PowerPoint
    }

    fn capability(&self) -> Capability {
        feature_capability(cfg!(feature = "office"), "office")
    }

    fn convert(&self, content: &[u8], filename: &str) -> Result<ConvertedText> {
        reject_legacy(Format::PowerPoint, filename)?;

        #[cfg(feature = "office")]
        {
            let text = crate::extraction::pptx::extract_text(content, self.include_notes, self.max_entry_bytes)?;
            Ok(ConvertedText::new(crate::text::normalize_whitespace(&text)))
        }

        #[cfg(not(feature = "office"))]
        {
            let _ = content;
            Err(crate::ConvertError::MissingDependency(
                "PowerPoint support requires the 'office' feature".to_string(),
            ))
        }
    }
}
