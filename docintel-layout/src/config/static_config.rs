//! Configuration sections and their defaults.

use serde::Deserialize;
use std::time::Duration;

/// Top-level plugin configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_azure")]
    pub azure: AzureConfig,

    #[serde(default = "default_tool")]
    pub tool: ToolConfig,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            azure: default_azure(),
            tool: default_tool(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Azure Document Intelligence client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AzureConfig {
    /// REST API version sent with every request
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout for each individual HTTP request in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay between polls when the service sends no Retry-After
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Polls before a long-running analysis is abandoned
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Send requests here instead of the credential endpoint (proxies, emulators).
    /// The endpoint is still validated as configured.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl AzureConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        default_azure()
    }
}

/// Layout tool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    /// Locale for messages returned to the host (`en` or `zh-CN`)
    #[serde(default = "default_locale")]
    pub locale: String,
}

// ==================== Default Value Functions ====================

pub(crate) fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    5003
}

pub(crate) fn default_azure() -> AzureConfig {
    AzureConfig {
        api_version: default_api_version(),
        request_timeout_secs: default_request_timeout_secs(),
        poll_interval_ms: default_poll_interval_ms(),
        max_poll_attempts: default_max_poll_attempts(),
        base_url: None,
    }
}

pub(crate) fn default_api_version() -> String {
    "2024-11-30".to_string()
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    120
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    1000
}

pub(crate) fn default_max_poll_attempts() -> u32 {
    300
}

pub(crate) fn default_tool() -> ToolConfig {
    ToolConfig {
        locale: default_locale(),
    }
}

pub(crate) fn default_locale() -> String {
    crate::i18n::DEFAULT_LOCALE.to_string()
}
