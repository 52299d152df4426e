//! PNCP CORS proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────▶│ http server ─▶ routing ─▶ proxy handler ─────┼──▶ PNCP API
//!                              │ (request id)  (path/query)  (one request)    │
//!     Browser Response         │                                              │
//!     ◀────────────────────────┤ response (CORS, no-store) ◀──────────────────┼───
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use pncp_proxy::config::{read_config, validate_config, ConfigError, ProxyConfig};
use pncp_proxy::lifecycle::startup;
use pncp_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "pncp-proxy")]
#[command(about = "CORS-bypassing reverse proxy for the PNCP API", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "PNCP_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long, env = "PNCP_PROXY_BIND")]
    bind: Option<String>,

    /// Override upstream.base_url.
    #[arg(short, long, env = "PNCP_PROXY_UPSTREAM")]
    upstream: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(upstream) = self.upstream {
            config.upstream.base_url = upstream;
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        prefixes = ?config.routing.prefixes,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
