use crate::core::format::Format;
use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Machine-readable tag for a failed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedFormat,
    NotSupported,
    MissingDependency,
    ConversionError,
    LimitExceeded,
    Validation,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::NotSupported => "not_supported",
            ErrorKind::MissingDependency => "missing_dependency",
            ErrorKind::ConversionError => "conversion_error",
            ErrorKind::LimitExceeded => "limit_exceeded",
            ErrorKind::Validation => "validation",
            ErrorKind::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal observations attached to a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    /// No strict decoding succeeded; undecodable bytes were replaced with U+FFFD.
    LossyDecode,
    /// The document parsed but contained no text.
    EmptyText,
}

/// Text produced by a single converter, before the pipeline wraps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedText {
    pub text: String,
    /// Name of the character encoding used, for decoded text formats.
    pub encoding: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConvertedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            encoding: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
        self
    }
}

/// Outcome of [`ConversionPipeline::convert`](crate::ConversionPipeline::convert).
///
/// Exactly one of `text` and `error` is set. A document whose extracted text is
/// empty is a success: `text` is `Some("")` and the `EmptyText` diagnostic is
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub text: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ConversionResult {
    pub fn success(format: Format, converted: ConvertedText) -> Self {
        let mut diagnostics = converted.diagnostics;
        if converted.text.is_empty() && !diagnostics.contains(&Diagnostic::EmptyText) {
            diagnostics.push(Diagnostic::EmptyText);
        }
        Self {
            text: Some(converted.text),
            error: None,
            error_kind: None,
            format: Some(format),
            encoding: converted.encoding,
            diagnostics,
        }
    }

    pub fn failure(format: Option<Format>, error: &ConvertError) -> Self {
        Self {
            text: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            format,
            encoding: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }

    pub fn has_diagnostic(&self, diagnostic: Diagnostic) -> bool {
        self.diagnostics.contains(&diagnostic)
    }

    /// Splits into the `(text, error)` pair.
    pub fn into_pair(self) -> (Option<String>, Option<String>) {
        (self.text, self.error)
    }
}
