//! Excel converter.

use super::{Converter, feature_capability, reject_legacy};
use crate::Result;
use crate::core::capabilities::Capability;
use crate::core::config::{LimitsConfig, SpreadsheetConfig};
use crate::core::format::Format;
use crate::types::ConvertedText;

/// Converts `.xlsx` and `.xlsm` workbooks. Legacy `.xls` is rejected with `NotSupported`.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "office"), allow(dead_code))]
pub struct ExcelConverter {
    include_sheet_names: bool,
    max_entry_bytes: u64,
}

impl ExcelConverter {
    pub fn new(spreadsheet: &SpreadsheetConfig, limits: &LimitsConfig) -> Self {
        Self {
            include_sheet_names: spreadsheet.include_sheet_names,
            max_entry_bytes: limits.max_entry_bytes,
        }
    }
}

impl Default for ExcelConverter {
    fn default() -> Self {
        Self::new(&SpreadsheetConfig::default(), &LimitsConfig::default())
    }
}

impl Converter for ExcelConverter {
    fn name(&self) -> &str {
        "excel"
    }

    fn description(&self) -> &str {
        "Extracts cell text from Excel workbooks (.xlsx, .xlsm)"
    }

    fn format(&self) -> Format {
        Format::Excel
    }

    fn capability(&self) -> Capability {
        feature_capability(cfg!(feature = "office"), "office")
    }

    fn convert(&self, content: &[u8], filename: &str) -> Result<ConvertedText> {
        reject_legacy(Format::Excel, filename)?;

        #[cfg(feature = "office")]
        {
            let text =
                crate::extraction::excel::extract_text(content, self.include_sheet_names, self.max_entry_bytes)?;
            Ok(ConvertedText::new(crate::text::normalize_whitespace(&text)))
        }

        #[cfg(not(feature = "office"))]
        {
            let _ = content;
            Err(crate::ConvertError::MissingDependency(
                "Excel support requires the 'office' feature".to_string(),
            ))
        }
    }
}
