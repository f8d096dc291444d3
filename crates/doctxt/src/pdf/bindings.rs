//! Locating and binding the PDFium shared library.
//!
//! The library is looked up once, when the PDF converter is built: in the
//! configured directory if there is one, otherwise through the system library
//! search path. The successful location is remembered and each conversion
//! binds to it again, since bindings are not `Clone`.

use super::error::{PdfError, Result};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// Where a working PDFium library was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfiumSource {
    Directory(PathBuf),
    System,
}

impl PdfiumSource {
    /// Check that PDFium can be bound, returning where it was found.
    pub fn probe(library_dir: Option<&Path>) -> Result<Self> {
        let source = match library_dir {
            Some(dir) => PdfiumSource::Directory(dir.to_path_buf()),
            None => PdfiumSource::System,
        };

        source.bind()?;
        tracing::debug!(source = ?source, "PDFium library available");
        Ok(source)
    }

    pub fn bind(&self) -> Result<Box<dyn PdfiumLibraryBindings>> {
        match self {
            PdfiumSource::Directory(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .map_err(|e| PdfError::BindingFailed(format!("{} ({})", e, dir.display()))),
            PdfiumSource::System => {
                Pdfium::bind_to_system_library().map_err(|e| PdfError::BindingFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfiumSource::probe(Some(dir.path())).unwrap_err();
        assert!(matches!(err, PdfError::BindingFailed(_)));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }
}
