//! Provider endpoints.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Map, Value};

use crate::error::ApiError;

use super::AppState;

/// Check the Azure credentials; `204` when they are accepted
pub async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Map<String, Value>>,
) -> Result<StatusCode, ApiError> {
    state
        .provider
        .validate_credentials(&credentials)
        .await
        .map_err(|e| ApiError::credential_validation(&e, &state.i18n, &state.locale))?;

    Ok(StatusCode::NO_CONTENT)
}
