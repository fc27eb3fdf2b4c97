//! Layout tool endpoints.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use tracing::info;

use crate::tool::{LayoutTool, ToolDeclaration, ToolInvokeMessage, ToolParameters};

use super::AppState;

const NDJSON: &str = "application/x-ndjson";

/// Describe the layout tool and its parameters
pub async fn declaration_handler() -> Json<ToolDeclaration> {
    Json(LayoutTool::declaration())
}

/// Invoke the layout tool, streaming one JSON message per line
pub async fn invoke_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<ToolParameters>,
) -> Response {
    info!(
        file_path = ?params.file_path,
        output_format = ?params.output_format,
        "Layout tool invoked"
    );

    let lines = state
        .tool
        .clone()
        .invoke(params)
        .map(|message| Ok::<_, Infallible>(to_line(&message)));

    ([(header::CONTENT_TYPE, NDJSON)], Body::from_stream(lines)).into_response()
}

fn to_line(message: &ToolInvokeMessage) -> String {
    let mut line = serde_json::to_string(message).unwrap_or_default();
    line.push('\n');
    line
}
