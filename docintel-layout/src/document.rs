//! Local document inspection: existence, supported type, page count.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, info};

use crate::error::ToolError;

/// File types accepted by the layout model, keyed by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DocumentKind {
    Pdf,
    Jpg,
    Jpeg,
    Png,
    Tiff,
    Bmp,
    Docx,
    Doc,
    Pptx,
    Ppt,
    Txt,
    Md,
}

impl DocumentKind {
    /// MIME type sent as the request content type
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Jpg | DocumentKind::Jpeg => "image/jpeg",
            DocumentKind::Png => "image/png",
            DocumentKind::Tiff => "image/tiff",
            DocumentKind::Bmp => "image/bmp",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Doc => "application/msword",
            DocumentKind::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            DocumentKind::Ppt => "application/vnd.ms-powerpoint",
            DocumentKind::Txt => "text/plain",
            DocumentKind::Md => "text/markdown",
        }
    }

    /// Only PDFs are split into page windows
    pub fn is_paged(&self) -> bool {
        matches!(self, DocumentKind::Pdf)
    }

    /// Supported extensions as shown to users (`.pdf, .jpg, ...`)
    pub fn supported_extensions() -> String {
        DocumentKind::iter()
            .map(|kind| format!(".{}", kind))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A local file that passed inspection
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub kind: DocumentKind,
}

impl SourceDocument {
    /// Check that `path` exists and has a supported extension
    pub fn inspect(path: impl Into<PathBuf>) -> Result<Self, ToolError> {
        let path = path.into();

        if !path.exists() {
            return Err(ToolError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let kind = extension
            .parse::<DocumentKind>()
            .map_err(|_| ToolError::UnsupportedFileType {
                extension: if extension.is_empty() {
                    String::new()
                } else {
                    format!(".{}", extension)
                },
                supported: DocumentKind::supported_extensions(),
            })?;

        debug!(path = %path.display(), kind = %kind, "Document accepted");

        Ok(Self { path, kind })
    }

    /// Pages to analyze: the real page count for PDFs, 1 for everything else
    pub async fn page_count(&self) -> Result<u32, ToolError> {
        if !self.kind.is_paged() {
            return Ok(1);
        }

        let path = self.path.clone();
        let pages = tokio::task::spawn_blocking(move || count_pdf_pages(&path))
            .await
            .map_err(|e| ToolError::Failure {
                message: format!("PDF page count task failed: {}", e),
            })??;

        info!(path = %self.path.display(), pages, "Counted PDF pages");
        Ok(pages)
    }
}

/// Create a new Pdfium instance (dynamically linked).
///
/// Searches for libpdfium in:
/// 1. Current directory (./libpdfium.so)
/// 2. vendor/pdfium/lib/
/// 3. System library paths
fn create_pdfium() -> Result<Pdfium, ToolError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "./vendor/pdfium/lib/",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| ToolError::Failure {
            message: format!("Failed to load PDFium library: {:?}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Count the pages of a PDF file
fn count_pdf_pages(path: &Path) -> Result<u32, ToolError> {
    let pdfium = create_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| ToolError::Failure {
            message: format!("Failed to load PDF: {:?}", e),
        })?;

    Ok(document.pages().len() as u32)
}
