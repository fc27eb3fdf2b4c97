//! Credential check entrypoint for the plugin provider.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::config::AzureConfig;
use crate::credentials::{self, CredentialSource};
use crate::error::CredentialValidationError;

/// Provider-level operations exposed to hosts
#[derive(Clone)]
pub struct LayoutProvider {
    config: AzureConfig,
    credentials: Arc<dyn CredentialSource>,
}

impl LayoutProvider {
    pub fn new(config: AzureConfig, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Validate the Azure credentials this plugin will use.
    ///
    /// The host-supplied mapping is accepted but not consulted: the process
    /// environment is what invocations read, so that is what gets checked.
    pub async fn validate_credentials(
        &self,
        _credentials: &Map<String, Value>,
    ) -> Result<(), CredentialValidationError> {
        let result = credentials::validate(self.credentials.load(), &self.config).await;

        let outcome = match &result {
            Ok(()) => "success",
            Err(e) => {
                warn!(error = %e, "Credential validation failed");
                "failure"
            }
        };
        metrics::counter!("docintel_credential_validations_total", "outcome" => outcome)
            .increment(1);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use crate::error::CredentialIssue;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "https://x.cognitiveservices.azure.com/";

    fn provider(credentials: Option<Credentials>, config: AzureConfig) -> LayoutProvider {
        LayoutProvider::new(config, Arc::new(credentials))
    }

    #[tokio::test]
    async fn test_valid_credentials_against_resource_info() {
        let key = "a".repeat(40);
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documentintelligence/info"))
            .and(query_param("api-version", "2024-11-30"))
            .and(header("Ocp-Apim-Subscription-Key", key.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "customDocumentModels": { "count": 0, "limit": 500 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(
            Some(Credentials::new(ENDPOINT, key)),
            AzureConfig {
                base_url: Some(server.uri()),
                ..AzureConfig::default()
            },
        );

        tokio_test::assert_ok!(provider.validate_credentials(&Map::new()).await);
    }

    #[tokio::test]
    async fn test_supplied_mapping_is_ignored() {
        let mut supplied = Map::new();
        supplied.insert("azure_endpoint".to_string(), Value::from(ENDPOINT));
        supplied.insert("azure_key".to_string(), Value::from("a".repeat(40)));

        let err = provider(None, AzureConfig::default())
            .validate_credentials(&supplied)
            .await
            .unwrap_err();
        assert!(matches!(err.issue, CredentialIssue::Missing));
    }

    #[tokio::test]
    async fn test_localized_failure() {
        let err = provider(
            Some(Credentials::new("https://example.com/", "a".repeat(40))),
            AzureConfig::default(),
        )
        .validate_credentials(&Map::new())
        .await
        .unwrap_err();

        let i18n = crate::i18n::I18n::new();
        assert_eq!(
            err.user_message(&i18n, "en"),
            "Credential validation failed: invalid endpoint format"
        );
        assert_eq!(
            err.user_message(&i18n, "zh-CN"),
            "凭证验证失败: 无效的endpoint格式"
        );
    }
}
