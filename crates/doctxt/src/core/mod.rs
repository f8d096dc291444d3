//! Pipeline orchestration: formats, configuration, capability probing and dispatch.

pub mod capabilities;
pub mod config;
pub mod format;
pub mod pipeline;

pub use capabilities::{Capability, CapabilityReport};
pub use config::{
    ConversionConfig, LimitsConfig, PdfConfig, PresentationConfig, SpreadsheetConfig, TextConfig,
};
pub use format::{Format, extension_of, txt_filename};
pub use pipeline::{ConversionPipeline, get_conversion_pipeline};
