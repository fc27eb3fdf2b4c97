//! Error types for the Document Intelligence API.

#[derive(Debug, thiserror::Error)]
pub enum DocumentIntelligenceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Access denied: invalid key or wrong endpoint")]
    Unauthorized,

    #[error("Resource not found")]
    NotFound,

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Analysis was accepted but no Operation-Location header was returned")]
    MissingOperationLocation,

    #[error("Analysis operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Analysis did not complete after {attempts} polls")]
    PollTimeout { attempts: u32 },

    #[error("Invalid response from Document Intelligence: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
