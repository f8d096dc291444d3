//! doctxt - attachment text conversion
//!
//! Turns the bytes of an uploaded attachment into plain text, picking a
//! converter from the filename extension. Supported families are plain text
//! (with Korean legacy encoding fallback), PDF, Word, Excel, PowerPoint and
//! HWP/HWPX.
//!
//! # Quick Start
//!
//! ```rust
//! use doctxt::get_conversion_pipeline;
//!
//! let pipeline = get_conversion_pipeline();
//! let result = pipeline.convert(b"quarterly numbers", "notes.txt");
//! assert_eq!(result.text.as_deref(), Some("quarterly numbers"));
//! assert!(result.error.is_none());
//!
//! let result = pipeline.convert(b"data", "archive.xyz");
//! assert!(result.text.is_none());
//! assert_eq!(result.error.as_deref(), Some("unsupported file type: .xyz"));
//! ```
//!
//! # Architecture
//!
//! - **Core** (`core`): formats, configuration, capability probing and the [`ConversionPipeline`]
//! - **Converters** (`converters`): one [`Converter`] per [`Format`]
//! - **Extraction** (`extraction`, `pdf`): container parsers for OOXML, HWP 5, HWPX and PDF
//! - **Text** (`text`): encoding detection, markup stripping, whitespace normalization
//!
//! # Features
//!
//! - `pdf`: PDF text through a runtime-loaded PDFium library
//! - `office`: DOCX, XLSX and PPTX
//! - `hwp`: binary HWP 5 and HWPX (HWPML markup works without it)
//! - `tokio-runtime`: [`ConversionPipeline::convert_async`]

#![deny(unsafe_code)]

pub mod converters;
pub mod core;
pub mod error;
pub mod extraction;
pub mod pdf;
pub mod text;
pub mod types;

pub use error::{ConvertError, Result};
pub use types::{ConversionResult, ConvertedText, Diagnostic, ErrorKind};

pub use converters::Converter;

pub use core::capabilities::{Capability, CapabilityReport};
pub use core::config::{
    ConversionConfig, LimitsConfig, PdfConfig, PresentationConfig, SpreadsheetConfig, TextConfig,
};
pub use core::format::Format;
pub use core::pipeline::{ConversionPipeline, get_conversion_pipeline};
