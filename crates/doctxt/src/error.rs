//! Error types for doctxt.
//!
//! Every failure a converter can signal is a variant of [`ConvertError`]. The
//! pipeline never lets one of these escape to its caller: it folds them into
//! the error slot of a [`ConversionResult`](crate::types::ConversionResult),
//! keeping the [`ErrorKind`] tag so callers can still tell the cases apart.
//!
//! # Taxonomy
//!
//! - `UnsupportedFormat` - the filename's extension is not registered
//! - `NotSupported` - a recognized legacy sub-format with no decoder (`.doc`, `.xls`, `.ppt`)
//! - `MissingDependency` - the parsing backend for a format is not available
//! - `Conversion` - the backend rejected the input (corrupt, encrypted, truncated)
//! - `LimitExceeded` - an input or archive member is larger than the configured limit
//! - `Validation` - invalid configuration
//! - `Io` - configuration file I/O
//!
//! Lossy text decoding is not an error; it is reported as
//! [`Diagnostic::LossyDecode`](crate::types::Diagnostic::LossyDecode).
use crate::core::format::Format;
use crate::types::ErrorKind;
use thiserror::Error;

/// Result type alias using [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Main error type for all doctxt operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The message text is part of the public contract; callers match on it.
    #[error("unsupported file type: {}", display_extension(.0))]
    UnsupportedFormat(String),

    #[error("{extension} files are not supported by the {format} converter (legacy binary format)")]
    NotSupported { format: Format, extension: String },

    #[error("missing dependency: {0}")]
    MissingDependency(String),

    #[error("conversion failed: {message}")]
    Conversion {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{what} is {size} bytes, exceeding the limit of {limit} bytes")]
    LimitExceeded { what: String, size: u64, limit: u64 },

    #[error("validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() { "(none)" } else { extension }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl ConvertError {
    error_constructor!(conversion, Conversion);
    error_constructor!(validation, Validation);

    /// Machine-readable tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Io(_) => ErrorKind::Io,
            ConvertError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ConvertError::NotSupported { .. } => ErrorKind::NotSupported,
            ConvertError::MissingDependency(_) => ErrorKind::MissingDependency,
            ConvertError::Conversion { .. } => ErrorKind::ConversionError,
            ConvertError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            ConvertError::Validation { .. } => ErrorKind::Validation,
        }
    }
}

#[cfg(feature = "office")]
impl From<calamine::Error> for ConvertError {
    fn from(err: calamine::Error) -> Self {
        ConvertError::Conversion {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(any(feature = "office", feature = "hwp"))]
impl From<roxmltree::Error> for ConvertError {
    fn from(err: roxmltree::Error) -> Self {
        ConvertError::Conversion {
            message: format!("malformed XML: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "pdf")]
impl From<crate::pdf::error::PdfError> for ConvertError {
    fn from(err: crate::pdf::error::PdfError) -> Self {
        use crate::pdf::error::PdfError;
        match err {
            PdfError::BindingFailed(reason) => ConvertError::MissingDependency(reason),
            other => ConvertError::Conversion {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
