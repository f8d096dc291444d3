use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfError {
    /// The PDFium shared library could not be loaded.
    BindingFailed(String),
    InvalidPdf(String),
    PasswordRequired,
    TextExtractionFailed(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::BindingFailed(msg) => write!(f, "PDFium library unavailable: {}", msg),
            PdfError::InvalidPdf(msg) => write!(f, "Invalid PDF: {}", msg),
            PdfError::PasswordRequired => write!(f, "PDF is password-protected"),
            PdfError::TextExtractionFailed(msg) => write!(f, "Text extraction failed: {}", msg),
        }
    }
}

impl std::error::Error for PdfError {}

pub type Result<T> = std::result::Result<T, PdfError>;
