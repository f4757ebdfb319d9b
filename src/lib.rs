pub mod coerce;
pub mod commands;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod models;
pub mod notify;
pub mod session;
mod state;

use std::sync::Arc;

use tracing::{error, info, warn};

use commands::TunnelClient;
use config::TunnelConfig;
use db::SqlxEngine;
use executor::QueryExecutor;
use notify::{NotificationEvent, NotificationStream};
use session::WebSocketConnector;

/// Wire the sqlx engine and WebSocket transport into a client.
pub fn build_client(config: &TunnelConfig) -> (TunnelClient, NotificationStream) {
    let (notifier, events) = notify::channel();
    let engine = Arc::new(SqlxEngine::new(config.pool.clone()));
    let executor = Arc::new(QueryExecutor::new(engine, notifier.clone()));
    let client = TunnelClient::new(
        config.url.clone(),
        Arc::new(WebSocketConnector),
        executor,
        notifier,
    );
    (client, events)
}

fn log_event(event: &NotificationEvent) {
    match event {
        NotificationEvent::Connected { message } | NotificationEvent::SqlSuccess { message } => {
            info!(kind = event.kind(), "{message}")
        }
        NotificationEvent::Disconnected { message }
        | NotificationEvent::LoginFailed { message }
        | NotificationEvent::SqlError { message } => warn!(kind = event.kind(), "{message}"),
        NotificationEvent::SqlExecutionInfo {
            message,
            request_id,
            params,
            ..
        } => info!(
            kind = event.kind(),
            request_id = %request_id,
            params = %serde_json::Value::Object(params.clone()),
            "{message}"
        ),
        NotificationEvent::Info { message } => info!(kind = event.kind(), "{message}"),
    }
}

/// Headless shell: connect, log every event, disconnect on Ctrl-C.
///
/// Returns once the session has ended.
pub async fn run(config: TunnelConfig) -> anyhow::Result<()> {
    let (mut client, mut events) = build_client(&config);
    if let Err(err) = client.connect(&config.username, &config.password) {
        for event in events.drain() {
            log_event(&event);
        }
        return Err(err.into());
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                log_event(&event);
                if matches!(
                    event,
                    NotificationEvent::Disconnected { .. } | NotificationEvent::LoginFailed { .. }
                ) {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    error!(%err, "failed to listen for Ctrl-C");
                }
                if let Err(err) = client.disconnect().await {
                    warn!(%err, "disconnect");
                }
                for event in events.drain() {
                    log_event(&event);
                }
                break;
            }
        }
    }
    Ok(())
}
