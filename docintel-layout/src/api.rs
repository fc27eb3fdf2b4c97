//! HTTP API for the layout plugin.
//!
//! This module provides the REST API endpoints for:
//! - Health and metrics monitoring
//! - The layout tool declaration and invocation
//! - Provider credential validation

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::credentials::CredentialSource;
use crate::i18n::I18n;
use crate::provider::LayoutProvider;
use crate::tool::LayoutTool;

pub mod provider;
pub mod tools;
use provider::validate_handler;
use tools::{declaration_handler, invoke_handler};

/// Application state
pub struct AppState {
    pub tool: LayoutTool,
    pub provider: LayoutProvider,
    pub credentials: Arc<dyn CredentialSource>,
    pub i18n: Arc<I18n>,
    pub locale: String,
    pub metrics: PrometheusHandle,
    pub start_time: Instant,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/tools/layout", get(declaration_handler))
        .route("/tools/layout/invoke", post(invoke_handler))
        .route("/provider/validate", post(validate_handler));

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Health & Metrics ===

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let configured = state.credentials.load().is_some();

    let status = if configured {
        state.i18n.get(&state.locale, "health-status-ready", None)
    } else {
        state.i18n.get(&state.locale, "health-status-unconfigured", None)
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        credentials_configured: configured,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
    credentials_configured: bool,
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AzureConfig;
    use crate::credentials::Credentials;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::io::Write;
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "https://x.cognitiveservices.azure.com/";

    fn state(credentials: Option<Credentials>, config: AzureConfig) -> AppState {
        let credentials: Arc<dyn CredentialSource> = Arc::new(credentials);
        let i18n = Arc::new(I18n::new());

        AppState {
            tool: LayoutTool::new(config.clone(), credentials.clone(), i18n.clone(), "en"),
            provider: LayoutProvider::new(config, credentials.clone()),
            credentials,
            i18n,
            locale: "en".to_string(),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
            start_time: Instant::now(),
        }
    }

    /// Serve the router on an ephemeral port, returning its base URL
    async fn serve(state: AppState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health_reports_missing_credentials() {
        let base = serve(state(None, AzureConfig::default())).await;

        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["credentials_configured"], false);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let base = serve(state(None, AzureConfig::default())).await;

        let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(
            response.headers()[header::CONTENT_TYPE.as_str()]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
    }

    #[tokio::test]
    async fn test_declaration() {
        let base = serve(state(None, AzureConfig::default())).await;

        let body: serde_json::Value = reqwest::get(format!("{}/api/tools/layout", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["name"], crate::tool::TOOL_NAME);
        assert_eq!(
            body["parameters"]["properties"]["output_format"]["enum"],
            serde_json::json!(["markdown", "json", "text"])
        );
    }

    #[tokio::test]
    async fn test_invoke_streams_ndjson() {
        let remote = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/documentintelligence/documentModels/prebuilt-layout:analyze",
            ))
            .respond_with(ResponseTemplate::new(202).insert_header(
                "Operation-Location",
                format!("{}/operations/7", remote.uri()).as_str(),
            ))
            .mount(&remote)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "succeeded",
                "analyzeResult": { "content": "hello" }
            })))
            .mount(&remote)
            .await;

        let config = AzureConfig {
            poll_interval_ms: 0,
            base_url: Some(remote.uri()),
            ..AzureConfig::default()
        };
        let base = serve(state(
            Some(Credentials::new(ENDPOINT, "k".repeat(40))),
            config,
        ))
        .await;

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"hello").unwrap();
        file.flush().unwrap();

        let response = reqwest::Client::new()
            .post(format!("{}/api/tools/layout/invoke", base))
            .json(&serde_json::json!({
                "file_path": file.path().to_str().unwrap(),
                "output_format": "text"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE.as_str()],
            "application/x-ndjson"
        );

        let body = response.text().await.unwrap();
        let lines: Vec<serde_json::Value> = body
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "text");
        assert_eq!(lines[1]["type"], "blob");
        assert_eq!(lines[1]["blob"], "aGVsbG8=");
        assert_eq!(lines[1]["meta"]["mime_type"], "text/plain");
    }

    #[tokio::test]
    async fn test_invoke_error_is_single_line() {
        let base = serve(state(None, AzureConfig::default())).await;

        let body = reqwest::Client::new()
            .post(format!("{}/api/tools/layout/invoke", base))
            .json(&serde_json::json!({ "file_path": "/missing/file.pdf" }))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("/missing/file.pdf"));
    }

    #[tokio::test]
    async fn test_validate_failure_is_unprocessable() {
        let base = serve(state(None, AzureConfig::default())).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/provider/validate", base))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 422);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["code"], "credential_validation");
        assert_eq!(
            body["message"],
            "Credential validation failed: missing required credential information"
        );
    }

    #[tokio::test]
    async fn test_validate_success_is_no_content() {
        let remote = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documentintelligence/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&remote)
            .await;

        let config = AzureConfig {
            base_url: Some(remote.uri()),
            ..AzureConfig::default()
        };
        let base = serve(state(
            Some(Credentials::new(ENDPOINT, "k".repeat(40))),
            config,
        ))
        .await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/provider/validate", base))
            .json(&serde_json::json!({ "ignored": true }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 204);
    }
}
