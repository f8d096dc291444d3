//! Format parsers.
//!
//! Each submodule turns the bytes of one container format into raw text.
//! Converters in [`crate::converters`] wrap these with format checks and
//! whitespace normalization.

#[cfg(any(feature = "office", feature = "hwp"))]
pub mod archive;

#[cfg(feature = "office")]
pub mod docx;

#[cfg(feature = "office")]
pub mod excel;

#[cfg(feature = "office")]
pub mod pptx;

#[cfg(feature = "hwp")]
pub mod hwp;

#[cfg(feature = "hwp")]
pub mod hwpx;
