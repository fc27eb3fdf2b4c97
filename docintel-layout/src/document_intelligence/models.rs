//! Response types for the Document Intelligence API.
//!
//! The service omits most fields it has nothing to say about, so everything
//! except `content` is optional here and callers pick their own defaults.

use serde::{Deserialize, Serialize};

/// Resource details returned by `GET /documentintelligence/info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetails {
    #[serde(default)]
    pub custom_document_models: Option<CustomDocumentModelsDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDocumentModelsDetails {
    pub count: Option<u32>,
    pub limit: Option<u32>,
}

/// State of a long-running analyze operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Body returned when polling an analyze operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    pub status: OperationStatus,
    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    pub error: Option<ServiceErrorDetail>,
}

/// Error envelope used by the service (`{"error": {...}}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorResponse {
    pub error: ServiceErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceErrorDetail {
    /// Human-readable summary, `code: message` when both are present
    pub fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// Result of a layout analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pages: Vec<DocumentPage>,
    #[serde(default)]
    pub tables: Vec<DocumentTable>,
    #[serde(default)]
    pub paragraphs: Vec<DocumentParagraph>,
}

impl AnalyzeResult {
    /// A result carrying only text content, with no structural collections
    pub fn from_content(content: String) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub page_number: Option<u32>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<String>,
    #[serde(default)]
    pub spans: Vec<DocumentSpan>,
}

/// Text span on a page.
///
/// Layout results normally only carry `offset`/`length`; `content` and
/// `confidence` are read when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSpan {
    pub offset: Option<u32>,
    pub length: Option<u32>,
    #[serde(default, alias = "value")]
    pub content: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTable {
    pub row_count: Option<u32>,
    pub column_count: Option<u32>,
    #[serde(default)]
    pub cells: Vec<DocumentTableCell>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTableCell {
    pub row_index: Option<u32>,
    pub column_index: Option<u32>,
    #[serde(default, alias = "value")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentParagraph {
    #[serde(default, alias = "value")]
    pub content: Option<String>,
    pub role: Option<String>,
}
