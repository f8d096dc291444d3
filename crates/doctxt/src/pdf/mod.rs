//! PDF text extraction backed by the PDFium shared library.
//!
//! Requires the `pdf` feature. PDFium itself is loaded at runtime; see
//! [`bindings::PdfiumSource::probe`].
#[cfg(feature = "pdf")]
pub mod bindings;
#[cfg(feature = "pdf")]
pub mod error;
#[cfg(feature = "pdf")]
pub mod text;

#[cfg(feature = "pdf")]
pub use bindings::PdfiumSource;
#[cfg(feature = "pdf")]
pub use error::PdfError;
#[cfg(feature = "pdf")]
pub use text::{PdfTextExtractor, extract_text_from_pdf};
