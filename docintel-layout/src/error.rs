use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::document_intelligence::DocumentIntelligenceError;
use crate::i18n::I18n;

/// Errors surfaced by a layout tool invocation.
///
/// None of these escape the invocation boundary: each one is rendered into a
/// single localized text message for the caller.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("No document path was provided")]
    MissingInput,

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported file type {extension}, supported types: {supported}")]
    UnsupportedFileType { extension: String, supported: String },

    #[error("Azure Document Intelligence credentials are not configured")]
    MissingCredentials,

    #[error("Azure Document Intelligence rejected the credentials")]
    RemoteAuth,

    #[error("Azure Document Intelligence service unavailable")]
    RemoteServiceUnavailable,

    #[error("Azure Document Intelligence service error: {message}")]
    RemoteService { message: String },

    #[error("{message}")]
    Failure { message: String },
}

impl ToolError {
    /// Stable machine-readable code, used for logs and metrics labels
    pub fn error_code(&self) -> &'static str {
        match self {
            ToolError::MissingInput => "missing_input",
            ToolError::FileNotFound { .. } => "file_not_found",
            ToolError::UnsupportedFileType { .. } => "unsupported_file_type",
            ToolError::MissingCredentials => "missing_credentials",
            ToolError::RemoteAuth => "remote_auth",
            ToolError::RemoteServiceUnavailable => "remote_service_unavailable",
            ToolError::RemoteService { .. } => "remote_service",
            ToolError::Failure { .. } => "failure",
        }
    }

    /// Get a user-friendly translated message
    pub fn user_message(&self, i18n: &I18n, locale: &str) -> String {
        match self {
            ToolError::MissingInput => i18n.get(locale, "tool-error-missing-input", None),
            ToolError::FileNotFound { path } => {
                i18n.format(locale, "tool-error-file-not-found", &[("path", path)])
            }
            ToolError::UnsupportedFileType {
                extension,
                supported,
            } => i18n.format(
                locale,
                "tool-error-unsupported-type",
                &[("extension", extension), ("supported", supported)],
            ),
            ToolError::MissingCredentials => {
                i18n.get(locale, "tool-error-missing-credentials", None)
            }
            ToolError::RemoteAuth => i18n.get(locale, "tool-error-invalid-credentials", None),
            ToolError::RemoteServiceUnavailable => {
                i18n.get(locale, "tool-error-service-unavailable", None)
            }
            ToolError::RemoteService { message } => {
                i18n.format(locale, "tool-error-service", &[("message", message)])
            }
            ToolError::Failure { message } => {
                i18n.format(locale, "tool-error-failure", &[("message", message)])
            }
        }
    }
}

impl From<DocumentIntelligenceError> for ToolError {
    fn from(error: DocumentIntelligenceError) -> Self {
        match error {
            DocumentIntelligenceError::Unauthorized => ToolError::RemoteAuth,
            DocumentIntelligenceError::NotFound => ToolError::RemoteServiceUnavailable,
            DocumentIntelligenceError::ApiError { .. }
            | DocumentIntelligenceError::OperationFailed { .. } => ToolError::RemoteService {
                message: error.to_string(),
            },
            other => ToolError::Failure {
                message: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for ToolError {
    fn from(error: std::io::Error) -> Self {
        ToolError::Failure {
            message: error.to_string(),
        }
    }
}

/// Reason a credential check did not pass
#[derive(Error, Debug)]
pub enum CredentialIssue {
    #[error("missing required credential information")]
    Missing,

    #[error("invalid endpoint format")]
    InvalidEndpoint,

    #[error("invalid API key format")]
    InvalidKeyFormat,

    #[error("invalid API key")]
    InvalidKey,

    #[error("service unavailable")]
    ServiceUnavailable,

    #[error("service error: {message}")]
    Service { message: String },
}

impl CredentialIssue {
    fn user_message(&self, i18n: &I18n, locale: &str) -> String {
        match self {
            CredentialIssue::Missing => i18n.get(locale, "credential-issue-missing", None),
            CredentialIssue::InvalidEndpoint => {
                i18n.get(locale, "credential-issue-invalid-endpoint", None)
            }
            CredentialIssue::InvalidKeyFormat => {
                i18n.get(locale, "credential-issue-invalid-key-format", None)
            }
            CredentialIssue::InvalidKey => i18n.get(locale, "credential-issue-invalid-key", None),
            CredentialIssue::ServiceUnavailable => {
                i18n.get(locale, "credential-issue-service-unavailable", None)
            }
            CredentialIssue::Service { message } => {
                i18n.format(locale, "credential-issue-service", &[("message", message)])
            }
        }
    }
}

impl From<DocumentIntelligenceError> for CredentialIssue {
    fn from(error: DocumentIntelligenceError) -> Self {
        match error {
            DocumentIntelligenceError::Unauthorized => CredentialIssue::InvalidKey,
            DocumentIntelligenceError::NotFound => CredentialIssue::ServiceUnavailable,
            other => CredentialIssue::Service {
                message: other.to_string(),
            },
        }
    }
}

/// Credential validation failure, always wrapping the underlying issue
#[derive(Error, Debug)]
#[error("Credential validation failed: {issue}")]
pub struct CredentialValidationError {
    #[source]
    pub issue: CredentialIssue,
}

impl CredentialValidationError {
    /// Get a user-friendly translated message
    pub fn user_message(&self, i18n: &I18n, locale: &str) -> String {
        let reason = self.issue.user_message(i18n, locale);
        i18n.format(locale, "credential-validation-failed", &[("reason", &reason)])
    }
}

impl From<CredentialIssue> for CredentialValidationError {
    fn from(issue: CredentialIssue) -> Self {
        Self { issue }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
#[error("Configuration error: {message}")]
pub struct ConfigError {
    pub message: String,
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Error returned by an HTTP handler, already rendered for the caller
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn credential_validation(
        error: &CredentialValidationError,
        i18n: &I18n,
        locale: &str,
    ) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "credential_validation",
            message: error.user_message(i18n, locale),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = ErrorResponse {
            message: self.message,
            code: Some(self.code.to_string()),
        };

        (self.status, Json(response)).into_response()
    }
}
