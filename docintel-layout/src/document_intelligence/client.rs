//! Document Intelligence API client implementation.

use reqwest::{Client, Response, StatusCode, header};
use std::time::Duration;
use tracing::debug;

use crate::config::AzureConfig;
use crate::credentials::Credentials;

use super::error::DocumentIntelligenceError;
use super::models::{
    AnalyzeOperation, AnalyzeResult, OperationStatus, ResourceDetails, ServiceErrorResponse,
};
use super::options::AnalyzeOptions;

/// Model used for general-purpose layout extraction
pub const LAYOUT_MODEL: &str = "prebuilt-layout";

/// Header carrying the resource key
const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Header carrying the URL to poll for an accepted analysis
const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// Document Intelligence API client
#[derive(Clone)]
pub struct DocumentIntelligenceClient {
    client: Client,
    base_url: String,
    key: String,
    api_version: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl DocumentIntelligenceClient {
    /// Create a client for the resource named by `credentials`
    pub fn new(
        credentials: &Credentials,
        config: &AzureConfig,
    ) -> Result<Self, DocumentIntelligenceError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("docintel-layout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(credentials.endpoint.as_str());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: credentials.key.clone(),
            api_version: config.api_version.clone(),
            poll_interval: config.poll_interval(),
            max_poll_attempts: config.max_poll_attempts.max(1),
        })
    }

    /// Fetch resource details; the cheapest call that proves the key is accepted
    pub async fn resource_info(&self) -> Result<ResourceDetails, DocumentIntelligenceError> {
        let url = format!(
            "{}/documentintelligence/info?api-version={}",
            self.base_url,
            urlencoding::encode(&self.api_version)
        );

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.key)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(ResourceDetails::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Analyze a document and wait for the long-running operation to finish
    pub async fn analyze(
        &self,
        model_id: &str,
        document: Vec<u8>,
        content_type: &str,
        options: &AnalyzeOptions,
    ) -> Result<AnalyzeResult, DocumentIntelligenceError> {
        let operation_location = self
            .begin_analyze(model_id, document, content_type, options)
            .await?;
        self.wait_for_result(&operation_location).await
    }

    /// Submit a document for analysis, returning the operation URL to poll
    async fn begin_analyze(
        &self,
        model_id: &str,
        document: Vec<u8>,
        content_type: &str,
        options: &AnalyzeOptions,
    ) -> Result<String, DocumentIntelligenceError> {
        let mut url = format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
            self.base_url,
            urlencoding::encode(model_id),
            urlencoding::encode(&self.api_version)
        );
        if let Some(pages) = options.pages {
            url.push_str(&format!(
                "&pages={}",
                urlencoding::encode(&pages.to_string())
            ));
        }
        url.push_str(&format!("&outputContentFormat={}", options.content_format));

        debug!(
            model = %model_id,
            pages = ?options.pages.map(|p| p.to_string()),
            bytes = document.len(),
            "Submitting document for analysis"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.key)
            .header(header::CONTENT_TYPE, content_type)
            .body(document)
            .send()
            .await?;
        let response = check_status(response).await?;

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(DocumentIntelligenceError::MissingOperationLocation)
    }

    /// Poll an analyze operation until it succeeds, fails, or we give up
    async fn wait_for_result(
        &self,
        operation_location: &str,
    ) -> Result<AnalyzeResult, DocumentIntelligenceError> {
        for attempt in 1..=self.max_poll_attempts {
            let response = self
                .client
                .get(operation_location)
                .header(API_KEY_HEADER, &self.key)
                .send()
                .await?;
            let delay = retry_after(&response).unwrap_or(self.poll_interval);
            let response = check_status(response).await?;

            let body = response.text().await?;
            let operation: AnalyzeOperation = serde_json::from_str(&body)?;

            match operation.status {
                OperationStatus::Succeeded => {
                    debug!(attempt, "Analysis succeeded");
                    return Ok(operation.analyze_result.unwrap_or_default());
                }
                OperationStatus::Failed | OperationStatus::Canceled => {
                    let message = operation
                        .error
                        .map(|e| e.describe())
                        .unwrap_or_else(|| format!("operation {:?}", operation.status));
                    return Err(DocumentIntelligenceError::OperationFailed { message });
                }
                status => {
                    debug!(
                        attempt,
                        ?status,
                        delay_ms = delay.as_millis() as u64,
                        "Analysis in progress"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(DocumentIntelligenceError::PollTimeout {
            attempts: self.max_poll_attempts,
        })
    }
}

/// Map non-success statuses onto client errors
async fn check_status(response: Response) -> Result<Response, DocumentIntelligenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(DocumentIntelligenceError::Unauthorized),
        StatusCode::NOT_FOUND => Err(DocumentIntelligenceError::NotFound),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(DocumentIntelligenceError::ApiError {
                status: status.as_u16(),
                message: error_message(status, &body),
            })
        }
    }
}

/// Prefer the service's error envelope, then the raw body, then the status reason
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ServiceErrorResponse>(body) {
        return envelope.error.describe();
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

/// Delay requested by the service through `Retry-After` (seconds)
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
