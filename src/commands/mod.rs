//! The two commands the UI side may issue: connect and disconnect.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::executor::QueryExecutor;
use crate::notify::{NotificationEvent, Notifier};
use crate::session::{Connector, LoginParams, SessionState, SessionStatus, SessionWorker};

struct SessionHandle {
    status: watch::Receiver<SessionStatus>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    fn is_live(&self) -> bool {
        let state = self.status.borrow().state;
        !self.task.is_finished()
            && !matches!(state, SessionState::Disconnected | SessionState::LoginFailed)
    }
}

/// Owns at most one live session and the worker task that runs it.
pub struct TunnelClient {
    url: String,
    connector: Arc<dyn Connector>,
    executor: Arc<QueryExecutor>,
    notifier: Notifier,
    session: Option<SessionHandle>,
}

impl TunnelClient {
    pub fn new(
        url: impl Into<String>,
        connector: Arc<dyn Connector>,
        executor: Arc<QueryExecutor>,
        notifier: Notifier,
    ) -> Self {
        Self {
            url: url.into(),
            connector,
            executor,
            notifier,
            session: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.session
            .as_ref()
            .map(|s| s.status.borrow().clone())
            .unwrap_or_default()
    }

    /// A receiver that follows the current session's status, if one exists.
    pub fn subscribe(&self) -> Option<watch::Receiver<SessionStatus>> {
        self.session.as_ref().map(|s| s.status.clone())
    }

    /// Start a session on a worker task. Must be called within a tokio runtime.
    ///
    /// Rejected while another session is live; nothing is queued.
    pub fn connect(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        if self.session.as_ref().is_some_and(SessionHandle::is_live) {
            self.notifier
                .notify(NotificationEvent::info(SessionError::AlreadyConnected.to_string()));
            return Err(SessionError::AlreadyConnected);
        }

        if username.is_empty() || password.is_empty() {
            self.notifier.notify(NotificationEvent::LoginFailed {
                message: "Login failed: Missing username or password".into(),
            });
            return Err(SessionError::MissingCredentials);
        }

        info!(url = %self.url, username, "connecting");
        self.notifier.notify(NotificationEvent::info(format!(
            "Connecting to {} as {}...",
            self.url, username
        )));

        let (status_tx, status) = watch::channel(SessionStatus::connecting());
        let (shutdown, shutdown_rx) = oneshot::channel();
        let worker = SessionWorker::new(
            self.connector.clone(),
            self.executor.clone(),
            self.notifier.clone(),
            status_tx,
        );
        let params = LoginParams {
            url: self.url.clone(),
            username: username.to_string(),
            password: password.to_string(),
        };
        let task = tokio::spawn(worker.run(params, shutdown_rx));

        self.session = Some(SessionHandle {
            status,
            shutdown,
            task,
        });
        Ok(())
    }

    /// Close the live session and wait for its worker to finish.
    ///
    /// Only valid once authenticated. The session ends in `Disconnected` even
    /// if closing the transport fails.
    pub async fn disconnect(&mut self) -> Result<(), SessionError> {
        let connected = self
            .session
            .as_ref()
            .is_some_and(|s| !s.task.is_finished() && s.status.borrow().is_connected());
        let session = match self.session.take() {
            Some(session) if connected => session,
            other => {
                self.session = other;
                self.notifier
                    .notify(NotificationEvent::info(SessionError::NotConnected.to_string()));
                return Err(SessionError::NotConnected);
            }
        };

        // The worker may already be gone; either way it ends up disconnected.
        let _ = session.shutdown.send(());
        if let Err(err) = session.task.await {
            warn!(%err, "session worker did not finish cleanly");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseEngine, StatementOutcome};
    use crate::dialect::ResolvedConnection;
    use crate::error::EngineError;
    use crate::models::QueryParams;
    use crate::notify::{self, NotificationStream};
    use crate::session::testing::{pair, Broker};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct NoopEngine;

    #[async_trait]
    impl DatabaseEngine for NoopEngine {
        async fn execute(
            &self,
            _target: &ResolvedConnection,
            _sql: &str,
            _params: &QueryParams,
        ) -> Result<StatementOutcome, EngineError> {
            Ok(StatementOutcome::Affected { rowcount: Some(0) })
        }

        async fn list_tables(
            &self,
            _target: &ResolvedConnection,
        ) -> Result<Vec<String>, EngineError> {
            Ok(Vec::new())
        }
    }

    fn client(close_fails: bool) -> (TunnelClient, Broker, NotificationStream) {
        let (connector, broker) = pair(close_fails, Arc::new(Mutex::new(Vec::new())));
        let (notifier, events) = notify::channel();
        let executor = Arc::new(QueryExecutor::new(Arc::new(NoopEngine), notifier.clone()));
        let client = TunnelClient::new("ws://broker", Arc::new(connector), executor, notifier);
        (client, broker, events)
    }

    async fn connected(
        client: &mut TunnelClient,
        broker: &mut Broker,
        events: &mut NotificationStream,
    ) {
        client.connect("admin", "adminPass").unwrap();
        broker.next_json().await;
        broker.push(json!({"success": true}));
        loop {
            let event = events.recv().await.unwrap();
            if event.kind() == "connected" {
                break;
            }
        }
    }

    #[tokio::test]
    async fn second_connect_is_rejected() {
        let (mut client, mut broker, mut events) = client(false);
        connected(&mut client, &mut broker, &mut events).await;

        assert_matches!(client.connect("admin", "adminPass"), Err(SessionError::AlreadyConnected));
        assert_eq!(
            events.drain(),
            vec![NotificationEvent::info("Already connected. Disconnect first if needed.")]
        );
        assert_eq!(client.status().state, SessionState::Relaying);
    }

    #[tokio::test]
    async fn missing_credentials_never_open_a_transport() {
        let (mut client, _broker, mut events) = client(false);
        assert_matches!(client.connect("", "pw"), Err(SessionError::MissingCredentials));
        assert_matches!(
            events.drain().as_slice(),
            [NotificationEvent::LoginFailed { message }] if message.contains("Missing username or password")
        );
        assert_eq!(client.status(), SessionStatus::default());
    }

    #[tokio::test]
    async fn disconnect_clears_state_even_if_close_fails() {
        let (mut client, mut broker, mut events) = client(true);
        connected(&mut client, &mut broker, &mut events).await;
        assert_eq!(client.status().username.as_deref(), Some("admin"));

        client.disconnect().await.unwrap();

        let status = client.status();
        assert_eq!(status.state, SessionState::Disconnected);
        assert_eq!(status.username, None);
        assert_matches!(
            events.drain().as_slice(),
            [NotificationEvent::Info { message }] if message.starts_with("Error disconnecting")
        );
    }

    #[tokio::test]
    async fn disconnect_when_idle_is_rejected() {
        let (mut client, _broker, mut events) = client(false);
        assert_matches!(client.disconnect().await, Err(SessionError::NotConnected));
        assert_eq!(events.drain(), vec![NotificationEvent::info("Not connected")]);
    }

    #[tokio::test]
    async fn clean_disconnect_reports_manual_close() {
        let (mut client, mut broker, mut events) = client(false);
        connected(&mut client, &mut broker, &mut events).await;

        client.disconnect().await.unwrap();
        assert_eq!(
            events.drain(),
            vec![NotificationEvent::info("Manually disconnected")]
        );
        assert!(!client.status().is_connected());
    }
}
