//! Format converters.
//!
//! One converter per [`Format`]. Each converter is built once from the
//! configuration when the pipeline is constructed and only reads that
//! configuration afterwards, so all of them are `Send + Sync` and can be called
//! from several threads at once.
//!
//! The parsing itself lives in [`crate::extraction`]; converters add format
//! checks (legacy extensions, markup sniffing), size guards and output
//! normalization.

use crate::core::capabilities::Capability;
use crate::core::format::{Format, extension_of};
use crate::types::ConvertedText;
use crate::{ConvertError, Result};

pub mod docx;
pub mod excel;
pub mod hwp;
pub mod pdf;
pub mod pptx;
pub mod text;

pub use docx::WordConverter;
pub use excel::ExcelConverter;
pub use hwp::HwpConverter;
pub use pdf::PdfConverter;
pub use pptx::PowerPointConverter;
pub use text::PlainTextConverter;

/// Converts the bytes of one document format to plain text.
pub trait Converter: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn format(&self) -> Format;

    /// Extensions this converter is registered for, lowercase with the leading dot.
    fn supported_extensions(&self) -> &'static [&'static str] {
        self.format().extensions()
    }

    /// Case-insensitive exact match against [`supported_extensions`](Self::supported_extensions).
    fn supports(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Whether the parsing backend is usable, decided when the converter was built.
    fn capability(&self) -> Capability {
        Capability::Available
    }

    /// Convert `content`. `filename` is only consulted for its extension.
    fn convert(&self, content: &[u8], filename: &str) -> Result<ConvertedText>;
}

/// Reject legacy sub-formats that are registered but have no decoder.
pub(crate) fn reject_legacy(format: Format, filename: &str) -> Result<()> {
    let extension = extension_of(filename);
    if format.is_legacy_extension(&extension) {
        return Err(ConvertError::NotSupported { format, extension });
    }
    Ok(())
}

/// Capability for converters whose backend is compiled in behind a cargo feature.
pub(crate) fn feature_capability(enabled: bool, feature: &str) -> Capability {
    if enabled {
        Capability::Available
    } else {
        Capability::Unavailable {
            reason: format!("doctxt was built without the '{}' feature", feature),
        }
    }
}
