//! Configuration for the layout plugin.
//!
//! Settings are layered from an optional `config` file and `DOCINTEL__*`
//! environment variables. Azure credentials are not part of this layer; they
//! are read from `AZURE_ENDPOINT` and `AZURE_KEY` on every use.

mod loader;
mod static_config;

pub use loader::load_config;
pub use static_config::{AzureConfig, PluginConfig};
