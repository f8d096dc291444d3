//! Configuration loading and management.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Files can be TOML, YAML or JSON.

use crate::text::encoding::resolve_encoding;
use crate::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the file [`ConversionConfig::discover`] looks for.
pub const CONFIG_FILE_NAME: &str = "doctxt.toml";

/// Environment variable naming a directory that contains the PDFium shared library.
pub const PDFIUM_LIB_DIR_ENV: &str = "DOCTXT_PDFIUM_LIB_DIR";

/// Main conversion configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub pdf: PdfConfig,

    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,

    #[serde(default)]
    pub presentation: PresentationConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Character decoding for plain-text input and markup exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Encodings tried strictly, in order, after UTF-8 fails.
    #[serde(default = "default_fallback_encodings")]
    pub fallback_encodings: Vec<String>,

    /// Guess the encoding statistically when every fallback fails.
    #[serde(default)]
    pub statistical_detection: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            fallback_encodings: default_fallback_encodings(),
            statistical_detection: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Directory containing the PDFium shared library.
    ///
    /// Falls back to `DOCTXT_PDFIUM_LIB_DIR`, then to the system library search path.
    #[serde(default)]
    pub library_path: Option<PathBuf>,

    #[serde(default = "default_page_separator")]
    pub page_separator: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            page_separator: default_page_separator(),
        }
    }
}

impl PdfConfig {
    pub fn resolved_library_path(&self) -> Option<PathBuf> {
        self.library_path.clone().or_else(|| {
            std::env::var_os(PDFIUM_LIB_DIR_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetConfig {
    /// Emit a `[Sheet: name]` heading before each sheet.
    #[serde(default = "default_true")]
    pub include_sheet_names: bool,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            include_sheet_names: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Append speaker notes after each slide.
    #[serde(default)]
    pub include_notes: bool,
}

/// Size guards, in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,

    /// Largest decompressed zip member or OLE stream a converter will read.
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_entry_bytes: default_max_entry_bytes(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fallback_encodings() -> Vec<String> {
    vec!["cp949".to_string()]
}

fn default_page_separator() -> String {
    "\n\n".to_string()
}

fn default_max_input_bytes() -> u64 {
    100 * 1024 * 1024
}

fn default_max_entry_bytes() -> u64 {
    256 * 1024 * 1024
}

impl ConversionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        toml::from_str(&content)
            .map_err(|e| ConvertError::validation(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| ConvertError::validation(format!("Invalid YAML in {}: {}", path.display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        serde_json::from_str(&content)
            .map_err(|e| ConvertError::validation(format!("Invalid JSON in {}: {}", path.display(), e)))
    }

    /// Load configuration, choosing the parser from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConvertError::validation(format!(
                "Unsupported config file format: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `doctxt.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(ConvertError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Using discovered configuration");
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Check values that serde cannot: encoding labels and limits.
    pub fn validate(&self) -> Result<()> {
        for label in &self.text.fallback_encodings {
            if resolve_encoding(label).is_none() {
                return Err(ConvertError::validation(format!("Unknown encoding label '{}'", label)));
            }
        }

        if self.limits.max_input_bytes == 0 {
            return Err(ConvertError::validation("limits.max_input_bytes must be greater than zero"));
        }
        if self.limits.max_entry_bytes == 0 {
            return Err(ConvertError::validation("limits.max_entry_bytes must be greater than zero"));
        }

        Ok(())
    }
}
