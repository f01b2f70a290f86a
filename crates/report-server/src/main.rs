//! Report backend server
//!
//! # Usage
//!
//! ```bash
//! export POLYGON_API_KEY="..."
//! export OPENAI_API_KEY="..."
//!
//! cargo run --bin report-server -p report-server
//! ```

use clap::Parser;
use report_server::{AppState, ServerConfig, router};
use report_utils::Config;
use std::net::SocketAddr;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "report-server")]
#[command(about = "Price-history proxy and report endpoint for stock-report", long_about = None)]
struct Args {
    /// Listen address, overrides REPORT_SERVER_ADDR
    #[arg(short, long)]
    addr: Option<SocketAddr>,

    /// Model used for reports, overrides REPORT_MODEL
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let app_config = Config::for_app("report-server").with_env();
    if app_config.is_production() {
        report_utils::init_json_tracing("info");
    } else {
        report_utils::init_tracing_with("info,tower_http=debug");
    }

    let mut config = ServerConfig::from_env()?;
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }
    if let Some(model) = args.model {
        config.model = model;
    }

    let state = AppState::from_config(&config)?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        app = %app_config.app_name,
        environment = %app_config.environment,
        "API server on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}
