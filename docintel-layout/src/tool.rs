//! The layout analysis tool: parameters, invocation and message stream.
//!
//! An invocation always runs to completion. Every failure is turned into a
//! single localized text message; success yields a text message followed by
//! the exported blob.

use std::sync::Arc;

use async_stream::stream;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Local;
use futures::Stream;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

use crate::analysis::analyze_document;
use crate::config::AzureConfig;
use crate::credentials::CredentialSource;
use crate::document::{DocumentKind, SourceDocument};
use crate::document_intelligence::DocumentIntelligenceClient;
use crate::error::ToolError;
use crate::export::{BlobMeta, OutputArtifact, OutputFormat, render};
use crate::i18n::I18n;

/// Name the tool is registered under
pub const TOOL_NAME: &str = "document_layout";

/// Parameters accepted by an invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
}

/// One message in an invocation's output sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolInvokeMessage {
    Text {
        text: String,
    },
    Blob {
        #[serde(serialize_with = "encode_base64", deserialize_with = "decode_base64")]
        blob: Vec<u8>,
        meta: BlobMeta,
    },
}

impl ToolInvokeMessage {
    pub fn text(text: impl Into<String>) -> Self {
        ToolInvokeMessage::Text { text: text.into() }
    }

    pub fn is_blob(&self) -> bool {
        matches!(self, ToolInvokeMessage::Blob { .. })
    }
}

fn encode_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

fn decode_base64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD.decode(encoded).map_err(serde::de::Error::custom)
}

/// Tool declaration returned to hosts
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Layout analysis tool
#[derive(Clone)]
pub struct LayoutTool {
    config: AzureConfig,
    credentials: Arc<dyn CredentialSource>,
    i18n: Arc<I18n>,
    locale: String,
}

impl LayoutTool {
    pub fn new(
        config: AzureConfig,
        credentials: Arc<dyn CredentialSource>,
        i18n: Arc<I18n>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            config,
            credentials,
            i18n,
            locale: locale.into(),
        }
    }

    pub fn declaration() -> ToolDeclaration {
        ToolDeclaration {
            name: TOOL_NAME.to_string(),
            description: "Analyze a local document with Azure Document Intelligence \
                          prebuilt-layout and return the extracted content as a \
                          downloadable text, markdown or JSON file."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": format!(
                            "Path of the local document to analyze ({})",
                            DocumentKind::supported_extensions()
                        )
                    },
                    "output_format": {
                        "type": "string",
                        "enum": ["markdown", "json", "text"],
                        "default": "markdown",
                        "description": "Format of the exported file"
                    }
                },
                "required": ["file_path"]
            }),
        }
    }

    /// Run an invocation, producing its messages as they become available
    pub fn invoke(self, params: ToolParameters) -> impl Stream<Item = ToolInvokeMessage> + Send {
        stream! {
            let format = OutputFormat::from_param(params.output_format.as_deref());

            match self.run(params.file_path.as_deref(), format).await {
                Ok(artifact) => {
                    metrics::counter!("docintel_tool_invocations_total", "outcome" => "success")
                        .increment(1);
                    yield ToolInvokeMessage::text(artifact.display_text);
                    yield ToolInvokeMessage::Blob {
                        blob: artifact.blob,
                        meta: artifact.meta,
                    };
                }
                Err(error) => {
                    metrics::counter!(
                        "docintel_tool_invocations_total",
                        "outcome" => error.error_code()
                    )
                    .increment(1);
                    warn!(
                        code = error.error_code(),
                        error = %error,
                        "Layout tool invocation failed"
                    );
                    yield ToolInvokeMessage::text(error.user_message(&self.i18n, &self.locale));
                }
            }
        }
    }

    async fn run(
        &self,
        file_path: Option<&str>,
        format: OutputFormat,
    ) -> Result<OutputArtifact, ToolError> {
        let file_path = file_path
            .filter(|p| !p.is_empty())
            .ok_or(ToolError::MissingInput)?;

        let document = SourceDocument::inspect(file_path)?;
        let credentials = self
            .credentials
            .load()
            .ok_or(ToolError::MissingCredentials)?;
        let client = DocumentIntelligenceClient::new(&credentials, &self.config)?;

        let total_pages = document.page_count().await?;
        let result = analyze_document(&client, &document, total_pages, format.into()).await?;

        info!(
            path = %document.path.display(),
            format = %format,
            bytes = result.content.len(),
            "Layout analysis complete"
        );

        render(
            &result,
            format,
            self.i18n.get(&self.locale, "tool-export-ready", None),
            Local::now(),
        )
    }
}
