//! Daemon entry point for the NIRS toolbox MCP server.
//!
//! Loads configuration from arguments and the environment, then serves the MCP
//! protocol over stdio, streamable HTTP, or both.

mod config;

use std::sync::Arc;

use nirs_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::NirsConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = NirsConfig::from_args()?;
    init_tracing(&config.log_filter);

    let ctx = Arc::new(config.toolbox_context());
    info!(
        root = %ctx.root().display(),
        namespace = %ctx.namespace_dir().display(),
        demos = %ctx.demos_dir().display(),
        stdio = config.enable_stdio,
        http = config.enable_http,
        "starting nirs-mcpd"
    );
    if !ctx.namespace_dir().is_dir() {
        warn!(namespace = %ctx.namespace_dir().display(), "namespace directory does not exist");
    }

    let http_config = McpHttpServerConfig::new(config.mcp_http_addr);
    match (config.enable_stdio, config.enable_http) {
        (true, true) => {
            tokio::select! {
                result = serve_stdio(ctx.clone()) => result?,
                result = serve_streamable_http(ctx, http_config) => result?,
            }
        }
        (true, false) => serve_stdio(ctx).await?,
        (false, true) => serve_streamable_http(ctx, http_config).await?,
        (false, false) => warn!("no transport enabled"),
    }
    Ok(())
}

/// Logs go to stderr; stdout carries the stdio MCP transport.
fn init_tracing(filter: &str) {
    let (env_filter, invalid) = match EnvFilter::try_new(filter) {
        Ok(env_filter) => (env_filter, false),
        Err(_) => (EnvFilter::new("info"), true),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();
    if invalid {
        warn!(%filter, "invalid log filter, using 'info'");
    }
}
