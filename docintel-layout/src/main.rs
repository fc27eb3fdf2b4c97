use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod analysis;
mod api;
mod config;
mod credentials;
mod document;
mod document_intelligence;
mod error;
mod export;
mod i18n;
mod provider;
mod tool;

use crate::api::AppState;
use crate::config::load_config;
use crate::credentials::{CredentialSource, EnvCredentials};
use crate::i18n::I18n;
use crate::provider::LayoutProvider;
use crate::tool::LayoutTool;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // AZURE_ENDPOINT / AZURE_KEY may come from a .env file
    let dotenv = dotenvy::dotenv();

    init_logging();

    info!(
        "Starting docintel-layout plugin v{}",
        env!("CARGO_PKG_VERSION")
    );
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = load_config()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        api_version = %config.azure.api_version,
        locale = %config.tool.locale,
        "Configuration loaded"
    );

    let metrics = PrometheusBuilder::new().install_recorder()?;

    let i18n = Arc::new(I18n::new());
    if !i18n.has_locale(&config.tool.locale) {
        warn!(locale = %config.tool.locale, "No translations for locale, using English");
    }

    let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredentials);
    if credentials.load().is_none() {
        warn!("AZURE_ENDPOINT / AZURE_KEY not set; invocations will fail until they are");
    }

    let state = AppState {
        tool: LayoutTool::new(
            config.azure.clone(),
            credentials.clone(),
            i18n.clone(),
            config.tool.locale.clone(),
        ),
        provider: LayoutProvider::new(config.azure.clone(), credentials.clone()),
        credentials,
        i18n,
        locale: config.tool.locale.clone(),
        metrics,
        start_time: Instant::now(),
    };

    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("docintel_layout=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
