//! Rendering analysis results into downloadable artifacts.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::document_intelligence::{
    AnalyzeResult, ContentFormat, DocumentPage, DocumentParagraph, DocumentSpan, DocumentTable,
    DocumentTableCell,
};
use crate::error::ToolError;

/// Artifact format requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Markdown,
    Json,
    Text,
}

impl OutputFormat {
    /// Markdown when absent, text for anything unrecognised
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None => OutputFormat::Markdown,
            Some(value) => value.parse().unwrap_or(OutputFormat::Text),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Json => "application/json",
            OutputFormat::Text => "text/plain",
        }
    }
}

impl From<OutputFormat> for ContentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ContentFormat::Markdown,
            OutputFormat::Json => ContentFormat::Json,
            OutputFormat::Text => ContentFormat::Text,
        }
    }
}

/// JSON projection of an analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutExport {
    pub content: String,
    pub pages: Vec<PageExport>,
    pub tables: Vec<TableExport>,
    pub paragraphs: Vec<ParagraphExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExport {
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    pub unit: String,
    pub spans: Vec<SpanExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanExport {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableExport {
    pub row_count: u32,
    pub column_count: u32,
    pub cells: Vec<CellExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellExport {
    pub text: String,
    pub row_index: u32,
    pub column_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphExport {
    pub content: String,
    pub role: Option<String>,
}

impl From<&AnalyzeResult> for LayoutExport {
    fn from(result: &AnalyzeResult) -> Self {
        Self {
            content: result.content.clone(),
            pages: result.pages.iter().map(PageExport::from).collect(),
            tables: result.tables.iter().map(TableExport::from).collect(),
            paragraphs: result.paragraphs.iter().map(ParagraphExport::from).collect(),
        }
    }
}

impl From<&DocumentPage> for PageExport {
    fn from(page: &DocumentPage) -> Self {
        Self {
            page_number: page.page_number.unwrap_or(0),
            width: page.width.unwrap_or(0.0),
            height: page.height.unwrap_or(0.0),
            unit: page.unit.clone().unwrap_or_else(|| "pixel".to_string()),
            spans: page.spans.iter().map(SpanExport::from).collect(),
        }
    }
}

impl From<&DocumentSpan> for SpanExport {
    fn from(span: &DocumentSpan) -> Self {
        Self {
            text: span.content.clone().unwrap_or_default(),
            confidence: span.confidence.unwrap_or(0.0),
        }
    }
}

impl From<&DocumentTable> for TableExport {
    fn from(table: &DocumentTable) -> Self {
        Self {
            row_count: table.row_count.unwrap_or(0),
            column_count: table.column_count.unwrap_or(0),
            cells: table.cells.iter().map(CellExport::from).collect(),
        }
    }
}

impl From<&DocumentTableCell> for CellExport {
    fn from(cell: &DocumentTableCell) -> Self {
        Self {
            text: cell.content.clone().unwrap_or_default(),
            row_index: cell.row_index.unwrap_or(0),
            column_index: cell.column_index.unwrap_or(0),
        }
    }
}

impl From<&DocumentParagraph> for ParagraphExport {
    fn from(paragraph: &DocumentParagraph) -> Self {
        Self {
            content: paragraph.content.clone().unwrap_or_default(),
            role: paragraph.role.clone(),
        }
    }
}

/// Delivery metadata attached to a blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMeta {
    pub name: String,
    pub mime_type: String,
    pub download: bool,
    pub disposition: String,
    pub save_as: String,
}

/// A rendered result ready to hand to the caller
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub display_text: String,
    pub blob: Vec<u8>,
    pub meta: BlobMeta,
}

/// `document_export_YYYYMMDD_HHMMSS.<ext>`
pub fn export_file_name(format: OutputFormat, now: DateTime<Local>) -> String {
    format!(
        "document_export_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Render `result` in `format`, stamping the file name with `now`
pub fn render(
    result: &AnalyzeResult,
    format: OutputFormat,
    display_text: String,
    now: DateTime<Local>,
) -> Result<OutputArtifact, ToolError> {
    let blob = match format {
        OutputFormat::Json => serde_json::to_vec_pretty(&LayoutExport::from(result)).map_err(
            |e| ToolError::Failure {
                message: format!("Failed to serialize result: {}", e),
            },
        )?,
        OutputFormat::Markdown | OutputFormat::Text => result.content.as_bytes().to_vec(),
    };

    let name = export_file_name(format, now);

    Ok(OutputArtifact {
        display_text,
        blob,
        meta: BlobMeta {
            name: name.clone(),
            mime_type: format.mime_type().to_string(),
            download: true,
            disposition: "attachment".to_string(),
            save_as: name,
        },
    })
}
