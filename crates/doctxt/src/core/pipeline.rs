//! Conversion pipeline: extension registry plus dispatcher.
//!
//! [`ConversionPipeline`] owns one converter per [`Format`] and a read-only
//! map from extension to format, both built once at construction. A
//! conversion never fails outward: every error, including a converter panic,
//! ends up in the error slot of the returned [`ConversionResult`].
//!
//! Applications normally build their own pipeline from their configuration and
//! pass it around. [`get_conversion_pipeline`] provides a process-wide
//! instance with default configuration for callers that prefer a global.
//!
//! # Example
//!
//! ```rust
//! use doctxt::{ConversionConfig, ConversionPipeline};
//!
//! # fn example() -> doctxt::Result<()> {
//! let pipeline = ConversionPipeline::new(ConversionConfig::default())?;
//! let result = pipeline.convert("안녕하세요".as_bytes(), "greeting.txt");
//! assert_eq!(result.text.as_deref(), Some("안녕하세요"));
//! assert_eq!(pipeline.convert_to_txt_filename("report.pdf"), "report.txt");
//! # Ok(())
//! # }
//! ```

use crate::converters::{
    Converter, ExcelConverter, HwpConverter, PdfConverter, PlainTextConverter, PowerPointConverter, WordConverter,
    reject_legacy,
};
use crate::core::capabilities::{Capability, CapabilityReport};
use crate::core::config::ConversionConfig;
use crate::core::format::{Format, extension_of, txt_filename};
use crate::types::{ConversionResult, ConvertedText};
use crate::{ConvertError, Result};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::panic::{AssertUnwindSafe, catch_unwind};

pub struct ConversionPipeline {
    config: ConversionConfig,
    plain_text: PlainTextConverter,
    pdf: PdfConverter,
    word: WordConverter,
    excel: ExcelConverter,
    powerpoint: PowerPointConverter,
    hwp: HwpConverter,
    extensions: HashMap<&'static str, Format>,
    capabilities: CapabilityReport,
    #[cfg(test)]
    substitute: Option<(Format, Box<dyn Converter>)>,
}

impl ConversionPipeline {
    /// Build a pipeline, validating `config` and probing every converter backend.
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;

        let plain_text = PlainTextConverter::new(&config.text)?;
        let hwp = HwpConverter::new(&config.text, &config.limits)?;

        Ok(Self::assemble(config, plain_text, hwp))
    }

    fn assemble(config: ConversionConfig, plain_text: PlainTextConverter, hwp: HwpConverter) -> Self {
        let pdf = PdfConverter::new(&config.pdf);
        let word = WordConverter::new(&config.limits);
        let excel = ExcelConverter::new(&config.spreadsheet, &config.limits);
        let powerpoint = PowerPointConverter::new(&config.presentation, &config.limits);

        let mut pipeline = Self {
            config,
            plain_text,
            pdf,
            word,
            excel,
            powerpoint,
            hwp,
            extensions: HashMap::new(),
            capabilities: CapabilityReport::new(),
            #[cfg(test)]
            substitute: None,
        };

        for format in Format::ALL {
            let converter = pipeline.converter_for(format);
            let capability = converter.capability();
            let extensions = converter.supported_extensions();

            for extension in extensions {
                let previous = pipeline.extensions.insert(extension, format);
                debug_assert!(previous.is_none(), "extension {} registered twice", extension);
            }
            pipeline.capabilities.insert(format, capability);
        }

        tracing::debug!(extensions = pipeline.extensions.len(), "Conversion pipeline ready");
        pipeline
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// The converter responsible for `format`.
    pub fn converter_for(&self, format: Format) -> &dyn Converter {
        #[cfg(test)]
        if let Some((substituted, converter)) = &self.substitute
            && *substituted == format
        {
            return converter.as_ref();
        }

        match format {
            Format::PlainText => &self.plain_text,
            Format::Pdf => &self.pdf,
            Format::Word => &self.word,
            Format::Excel => &self.excel,
            Format::PowerPoint => &self.powerpoint,
            Format::Hwp => &self.hwp,
        }
    }

    /// Union of the extensions of all converters, legacy ones included.
    pub fn get_supported_extensions(&self) -> BTreeSet<&'static str> {
        self.extensions.keys().copied().collect()
    }

    /// Format registered for the extension of `filename`.
    pub fn resolve(&self, filename: &str) -> Option<Format> {
        self.extensions.get(extension_of(filename).as_str()).copied()
    }

    pub fn can_convert(&self, filename: &str) -> bool {
        self.resolve(filename).is_some()
    }

    pub fn get_converter(&self, filename: &str) -> Option<&dyn Converter> {
        self.resolve(filename).map(|format| self.converter_for(format))
    }

    pub fn capabilities(&self) -> &CapabilityReport {
        &self.capabilities
    }

    pub fn capability(&self, format: Format) -> Capability {
        self.capabilities.get(format)
    }

    /// Convert `content`, using `filename` only for its extension.
    ///
    /// Exactly one of `text` and `error` is set on the result.
    pub fn convert(&self, content: &[u8], filename: &str) -> ConversionResult {
        let format = self.resolve(filename);
        match self.try_convert(format, content, filename) {
            Ok((format, converted)) => ConversionResult::success(format, converted),
            Err(err) => {
                tracing::debug!(filename, error = %err, kind = %err.kind(), "Conversion failed");
                ConversionResult::failure(format, &err)
            }
        }
    }

    fn try_convert(&self, format: Option<Format>, content: &[u8], filename: &str) -> Result<(Format, ConvertedText)> {
        let Some(format) = format else {
            return Err(ConvertError::UnsupportedFormat(extension_of(filename)));
        };

        let limit = self.config.limits.max_input_bytes;
        if content.len() as u64 > limit {
            return Err(ConvertError::LimitExceeded {
                what: "input".to_string(),
                size: content.len() as u64,
                limit,
            });
        }

        reject_legacy(format, filename)?;

        if let Capability::Unavailable { reason } = self.capabilities.get(format) {
            return Err(ConvertError::MissingDependency(reason));
        }

        let converter = self.converter_for(format);
        tracing::debug!(
            filename,
            converter = converter.name(),
            bytes = content.len(),
            "Dispatching conversion"
        );

        let converted = catch_unwind(AssertUnwindSafe(|| converter.convert(content, filename)))
            .map_err(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::warn!(converter = converter.name(), panic = %message, "Converter panicked");
                ConvertError::conversion(format!("{} converter panicked: {}", converter.name(), message))
            })??;

        Ok((format, converted))
    }

    /// Sibling filename for persisted output: the extension replaced with `.txt`.
    pub fn convert_to_txt_filename(&self, filename: &str) -> String {
        txt_filename(filename)
    }

    /// Convert several inputs in parallel. Results are in input order.
    pub fn convert_batch<B, S>(&self, inputs: &[(B, S)]) -> Vec<ConversionResult>
    where
        B: AsRef<[u8]> + Sync,
        S: AsRef<str> + Sync,
    {
        inputs
            .par_iter()
            .map(|(content, filename)| self.convert(content.as_ref(), filename.as_ref()))
            .collect()
    }

    /// Run [`convert`](Self::convert) on tokio's blocking thread pool.
    #[cfg(feature = "tokio-runtime")]
    pub async fn convert_async(self: &std::sync::Arc<Self>, content: Vec<u8>, filename: String) -> ConversionResult {
        let pipeline = std::sync::Arc::clone(self);
        let task_filename = filename.clone();

        match tokio::task::spawn_blocking(move || pipeline.convert(&content, &task_filename)).await {
            Ok(result) => result,
            Err(join_error) => {
                let err = ConvertError::conversion(format!("Conversion task failed: {}", join_error));
                ConversionResult::failure(self.resolve(&filename), &err)
            }
        }
    }
}

impl Default for ConversionPipeline {
    /// Pipeline with the default configuration.
    fn default() -> Self {
        let config = ConversionConfig::default();
        let plain_text = PlainTextConverter::default();
        let hwp = HwpConverter::default();
        Self::assemble(config, plain_text, hwp)
    }
}

impl std::fmt::Debug for ConversionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionPipeline")
            .field("extensions", &self.get_supported_extensions())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

static SHARED_PIPELINE: Lazy<ConversionPipeline> = Lazy::new(ConversionPipeline::default);

/// Process-wide pipeline with default configuration.
///
/// Built on first access; every later call returns the same instance.
/// Concurrent first access is safe.
pub fn get_conversion_pipeline() -> &'static ConversionPipeline {
    &SHARED_PIPELINE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Diagnostic, ErrorKind};

    struct PanickingConverter;

    impl Converter for PanickingConverter {
        fn name(&self) -> &str {
            "panicking"
        }

        fn format(&self) -> Format {
            Format::PlainText
        }

        fn convert(&self, _content: &[u8], _filename: &str) -> Result<ConvertedText> {
            panic!("malformed document");
        }
    }

    #[test]
    fn test_registry_covers_all_formats() {
        let pipeline = ConversionPipeline::default();
        let expected: usize = Format::ALL.iter().map(|f| f.extensions().len()).sum();
        assert_eq!(pipeline.get_supported_extensions().len(), expected);

        for format in Format::ALL {
            for ext in format.extensions() {
                let filename = format!("file{}", ext);
                assert_eq!(pipeline.resolve(&filename), Some(format));
                let converter = pipeline.get_converter(&filename).unwrap();
                assert!(converter.supports(ext));
                assert_eq!(converter.format(), format);
            }
        }
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let pipeline = ConversionPipeline::default();
        assert!(pipeline.can_convert("REPORT.PDF"));
        assert!(pipeline.can_convert("Notes.Md"));
        assert_eq!(pipeline.resolve("Sheet.XLSX"), Some(Format::Excel));
    }

    #[test]
    fn test_unsupported_extension() {
        let pipeline = ConversionPipeline::default();
        assert!(!pipeline.can_convert("archive.xyz"));
        assert!(pipeline.get_converter("archive.xyz").is_none());

        let result = pipeline.convert(b"data", "archive.xyz");
        assert!(result.text.is_none());
        assert_eq!(result.error.as_deref(), Some("unsupported file type: .xyz"));
        assert_eq!(result.error_kind, Some(ErrorKind::UnsupportedFormat));
    }

    #[test]
    fn test_no_extension() {
        let pipeline = ConversionPipeline::default();
        let result = pipeline.convert(b"data", "Makefile");
        assert!(result.error.unwrap().contains("unsupported"));
    }

    #[test]
    fn test_plain_text_success() {
        let pipeline = ConversionPipeline::default();
        let result = pipeline.convert("한국어 텍스트".as_bytes(), "memo.txt");
        assert_eq!(result.text.as_deref(), Some("한국어 텍스트"));
        assert!(result.error.is_none());
        assert_eq!(result.format, Some(Format::PlainText));
        assert_eq!(result.encoding.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_empty_text_policy() {
        let pipeline = ConversionPipeline::default();
        let result = pipeline.convert(b"", "empty.txt");
        assert_eq!(result.text.as_deref(), Some(""));
        assert!(result.error.is_none());
        assert!(result.has_diagnostic(Diagnostic::EmptyText));
    }

    #[test]
    fn test_input_size_limit() {
        let mut config = ConversionConfig::default();
        config.limits.max_input_bytes = 8;
        let pipeline = ConversionPipeline::new(config).unwrap();

        let result = pipeline.convert(b"0123456789", "big.txt");
        assert!(result.text.is_none());
        assert_eq!(result.error_kind, Some(ErrorKind::LimitExceeded));

        let result = pipeline.convert(b"01234567", "ok.txt");
        assert_eq!(result.text.as_deref(), Some("01234567"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ConversionConfig::default();
        config.text.fallback_encodings = vec!["not-an-encoding".to_string()];
        let err = ConversionPipeline::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unavailable_capability_short_circuits() {
        let mut pipeline = ConversionPipeline::default();
        pipeline.capabilities.insert(
            Format::Word,
            Capability::Unavailable {
                reason: "docx backend disabled".to_string(),
            },
        );

        let result = pipeline.convert(b"PK\x03\x04", "memo.docx");
        assert_eq!(result.error_kind, Some(ErrorKind::MissingDependency));
        assert!(result.error.unwrap().contains("docx backend disabled"));
    }

    #[test]
    fn test_converter_panic_is_caught() {
        let mut pipeline = ConversionPipeline::default();
        pipeline.substitute = Some((Format::PlainText, Box::new(PanickingConverter)));

        let result = pipeline.convert(b"anything", "broken.txt");
        assert!(result.text.is_none());
        assert_eq!(result.format, Some(Format::PlainText));
        assert_eq!(result.error_kind, Some(ErrorKind::ConversionError));
        assert_eq!(
            result.error.as_deref(),
            Some("conversion failed: panicking converter panicked: malformed document")
        );

        let results = pipeline.convert_batch(&[(&b"one"[..], "a.txt"), (&b"two"[..], "b.md")]);
        assert!(results.iter().all(|r| r.error_kind == Some(ErrorKind::ConversionError)));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static message"), "static message");
        assert_eq!(panic_message(&String::from("owned message")), "owned message");
        assert_eq!(panic_message(&42u32), "unknown panic");
    }

    #[test]
    fn test_legacy_extension_wins_over_missing_backend() {
        let mut pipeline = ConversionPipeline::default();
        for format in [Format::Word, Format::Excel, Format::PowerPoint] {
            pipeline.capabilities.insert(
                format,
                Capability::Unavailable {
                    reason: "office support not compiled in".to_string(),
                },
            );
        }

        for filename in ["old.doc", "old.XLS", "old.ppt"] {
            let result = pipeline.convert(b"\xD0\xCF\x11\xE0", filename);
            assert_eq!(result.error_kind, Some(ErrorKind::NotSupported), "{}", filename);
        }
        let result = pipeline.convert(b"PK\x03\x04", "new.docx");
        assert_eq!(result.error_kind, Some(ErrorKind::MissingDependency));
    }

    #[test]
    fn test_convert_to_txt_filename() {
        let pipeline = ConversionPipeline::default();
        assert_eq!(pipeline.convert_to_txt_filename("document.pdf"), "document.txt");
        assert_eq!(pipeline.convert_to_txt_filename("file.docx"), "file.txt");
        assert_eq!(pipeline.convert_to_txt_filename("data.xlsx"), "data.txt");
    }

    #[test]
    fn test_batch_preserves_order() {
        let pipeline = ConversionPipeline::default();
        let inputs: Vec<(Vec<u8>, String)> = (0..32)
            .map(|i| (format!("document {}", i).into_bytes(), format!("doc{}.txt", i)))
            .chain(std::iter::once((b"x".to_vec(), "unknown.bin".to_string())))
            .collect();

        let results = pipeline.convert_batch(&inputs);
        assert_eq!(results.len(), 33);
        for (i, result) in results.iter().take(32).enumerate() {
            assert_eq!(result.text.as_deref(), Some(format!("document {}", i).as_str()));
        }
        assert_eq!(results[32].error_kind, Some(ErrorKind::UnsupportedFormat));
    }

    #[test]
    fn test_shared_pipeline_identity() {
        let first = get_conversion_pipeline();
        let second = get_conversion_pipeline();
        assert!(std::ptr::eq(first, second));
    }
}
