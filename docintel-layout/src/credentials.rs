//! Azure credential loading and validation.

use std::fmt;

use tracing::{debug, info};

use crate::config::AzureConfig;
use crate::document_intelligence::DocumentIntelligenceClient;
use crate::error::{CredentialIssue, CredentialValidationError};

/// Environment variable holding the resource endpoint
pub const ENDPOINT_ENV: &str = "AZURE_ENDPOINT";

/// Environment variable holding the resource key
pub const KEY_ENV: &str = "AZURE_KEY";

/// Every Document Intelligence endpoint ends with this
pub const ENDPOINT_SUFFIX: &str = ".cognitiveservices.azure.com/";

/// Shortest key the service issues
pub const MIN_KEY_LENGTH: usize = 32;

/// Endpoint and key for a Document Intelligence resource
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub key: String,
}

impl Credentials {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
        }
    }

    /// Read `AZURE_ENDPOINT` and `AZURE_KEY`; `None` unless both are non-empty
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty())?;
        let key = std::env::var(KEY_ENV).ok().filter(|v| !v.is_empty())?;
        Some(Self::new(endpoint, key))
    }

    /// Check endpoint and key shape without contacting the service
    pub fn check_format(&self) -> Result<(), CredentialIssue> {
        if self.endpoint.is_empty() || self.key.is_empty() {
            return Err(CredentialIssue::Missing);
        }
        if !self.endpoint.starts_with("https://") || !self.endpoint.ends_with(ENDPOINT_SUFFIX) {
            return Err(CredentialIssue::InvalidEndpoint);
        }
        if self.key.chars().count() < MIN_KEY_LENGTH {
            return Err(CredentialIssue::InvalidKeyFormat);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Where credentials come from at the moment they are needed
pub trait CredentialSource: Send + Sync {
    fn load(&self) -> Option<Credentials>;
}

/// Reads the process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn load(&self) -> Option<Credentials> {
        Credentials::from_env()
    }
}

/// Fixed credentials, or none at all
impl CredentialSource for Option<Credentials> {
    fn load(&self) -> Option<Credentials> {
        self.clone()
    }
}

/// Validate credentials: format checks first, then one resource-info round trip
pub async fn validate(
    credentials: Option<Credentials>,
    config: &AzureConfig,
) -> Result<(), CredentialValidationError> {
    let credentials = credentials.ok_or(CredentialIssue::Missing)?;
    credentials.check_format()?;

    let client =
        DocumentIntelligenceClient::new(&credentials, config).map_err(CredentialIssue::from)?;
    let details = client.resource_info().await.map_err(CredentialIssue::from)?;

    debug!(details = ?details, "Resource info retrieved");
    info!(endpoint = %credentials.endpoint, "Azure credentials validated");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "https://x.cognitiveservices.azure.com/";

    fn key(len: usize) -> String {
        "k".repeat(len)
    }

    fn mock_config(server: &MockServer) -> AzureConfig {
        AzureConfig {
            base_url: Some(server.uri()),
            ..AzureConfig::default()
        }
    }

    async fn info_server(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documentintelligence/info"))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_format_checks() {
        assert!(Credentials::new(ENDPOINT, key(40)).check_format().is_ok());
        assert!(Credentials::new(ENDPOINT, key(32)).check_format().is_ok());

        assert!(matches!(
            Credentials::new("", key(40)).check_format(),
            Err(CredentialIssue::Missing)
        ));
        assert!(matches!(
            Credentials::new("http://x.cognitiveservices.azure.com/", key(40)).check_format(),
            Err(CredentialIssue::InvalidEndpoint)
        ));
        assert!(matches!(
            Credentials::new("https://x.cognitiveservices.azure.com", key(40)).check_format(),
            Err(CredentialIssue::InvalidEndpoint)
        ));
        assert!(matches!(
            Credentials::new("https://example.com/", key(40)).check_format(),
            Err(CredentialIssue::InvalidEndpoint)
        ));
        assert!(matches!(
            Credentials::new(ENDPOINT, key(31)).check_format(),
            Err(CredentialIssue::InvalidKeyFormat)
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", Credentials::new(ENDPOINT, key(40)));
        assert!(rendered.contains(ENDPOINT));
        assert!(!rendered.contains(&key(40)));
    }

    #[tokio::test]
    async fn test_validate_success() {
        let server = info_server(200).await;
        let credentials = Credentials::new(ENDPOINT, key(40));
        let result = validate(Some(credentials), &mock_config(&server)).await;
        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn test_validate_missing_credentials() {
        let err = validate(None, &AzureConfig::default()).await.unwrap_err();
        assert!(matches!(err.issue, CredentialIssue::Missing));
        assert!(err.to_string().starts_with("Credential validation failed"));
    }

    #[tokio::test]
    async fn test_validate_rejects_format_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = validate(Some(Credentials::new(ENDPOINT, key(8))), &mock_config(&server))
            .await
            .unwrap_err();
        assert!(matches!(err.issue, CredentialIssue::InvalidKeyFormat));
    }

    #[tokio::test]
    async fn test_validate_remote_statuses() {
        let server = info_server(401).await;
        let err = validate(Some(Credentials::new(ENDPOINT, key(40))), &mock_config(&server))
            .await
            .unwrap_err();
        assert!(matches!(err.issue, CredentialIssue::InvalidKey));
        assert!(err.to_string().contains("invalid API key"));

        let server = info_server(404).await;
        let err = validate(Some(Credentials::new(ENDPOINT, key(40))), &mock_config(&server))
            .await
            .unwrap_err();
        assert!(matches!(err.issue, CredentialIssue::ServiceUnavailable));

        let server = info_server(500).await;
        let err = validate(Some(Credentials::new(ENDPOINT, key(40))), &mock_config(&server))
            .await
            .unwrap_err();
        assert!(matches!(err.issue, CredentialIssue::Service { .. }));
        assert!(err.to_string().contains("500"));
    }
}
