use clap::Parser;
use tracing_subscriber::EnvFilter;

use dave_router_lib::config::TunnelConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dave_router_lib::run(TunnelConfig::parse()).await
}
