//! Process configuration.

use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Default broker endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:8000/dave-router-wss";

/// Command-line / environment configuration for the tunnel process.
#[derive(Clone, Debug, Parser)]
#[command(name = "dave-router", version, about = "Relay SQL requests from a remote broker to local databases")]
pub struct TunnelConfig {
    /// WebSocket URL of the broker.
    #[arg(long, env = "DAVE_ROUTER_URL", default_value = DEFAULT_URL)]
    pub url: String,

    #[arg(long, env = "DAVE_ROUTER_USERNAME", default_value = "")]
    pub username: String,

    #[arg(long, env = "DAVE_ROUTER_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    #[command(flatten)]
    pub pool: PoolSettings,
}

/// Sizing applied to every database pool the engine opens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, clap::Args)]
pub struct PoolSettings {
    /// Maximum connections per database pool.
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    #[arg(long, default_value_t = 3)]
    pub acquire_timeout_secs: u64,

    /// Database pools kept open at once; the least recently used is closed.
    #[arg(long, default_value_t = 8)]
    pub max_pools: usize,
}

impl PoolSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 3,
            max_pools: 8,
        }
    }
}
