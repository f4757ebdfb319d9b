//! Tunnel session lifecycle and the receive → execute → respond loop.
//!
//! A [`SessionWorker`] owns the transport for the whole life of a session.
//! It is the only writer of the session status; everything else observes it
//! through a `watch` receiver.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use crate::error::{SessionError, TransportError};
use crate::executor::QueryExecutor;
use crate::models::{InboundFrame, LoginReply, LoginRequest, OutboundFrame};
use crate::notify::{NotificationEvent, Notifier};

pub mod transport;

pub use transport::{Connector, Transport, WebSocketConnector};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Authenticated,
    Relaying,
    /// Transient; always followed by `Disconnected`.
    LoginFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: SessionState,
    /// Set only while authenticated.
    pub username: Option<String>,
}

impl SessionStatus {
    pub fn connecting() -> Self {
        Self {
            state: SessionState::Connecting,
            username: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(
            self.state,
            SessionState::Authenticated | SessionState::Relaying
        )
    }
}

/// Credentials and endpoint for one session.
#[derive(Debug, Clone)]
pub struct LoginParams {
    pub url: String,
    pub username: String,
    pub password: String,
}

enum SessionEnd {
    /// `disconnect()` was requested (or the controlling handle went away).
    Shutdown,
    /// Transport failure or unexpected close.
    Lost(TransportError),
}

pub struct SessionWorker {
    connector: Arc<dyn Connector>,
    executor: Arc<QueryExecutor>,
    notifier: Notifier,
    status: watch::Sender<SessionStatus>,
}

impl SessionWorker {
    pub fn new(
        connector: Arc<dyn Connector>,
        executor: Arc<QueryExecutor>,
        notifier: Notifier,
        status: watch::Sender<SessionStatus>,
    ) -> Self {
        Self {
            connector,
            executor,
            notifier,
            status,
        }
    }

    fn set_state(&self, state: SessionState, username: Option<String>) {
        debug!(?state, "session state");
        self.status.send_replace(SessionStatus { state, username });
    }

    /// Run one session from login to teardown.
    pub async fn run(self, params: LoginParams, mut shutdown: oneshot::Receiver<()>) {
        self.set_state(SessionState::Connecting, None);

        let mut transport = match self.login(&params).await {
            Ok(transport) => transport,
            Err(SessionError::Authentication(reason)) => {
                info!(username = %params.username, "login rejected");
                self.set_state(SessionState::LoginFailed, None);
                self.notifier.notify(NotificationEvent::LoginFailed {
                    message: format!("Login failed: {reason}"),
                });
                self.set_state(SessionState::Disconnected, None);
                return;
            }
            Err(err) => {
                warn!(%err, "could not establish session");
                self.notifier.notify(NotificationEvent::Disconnected {
                    message: format!("Disconnected: {err}"),
                });
                self.set_state(SessionState::Disconnected, None);
                return;
            }
        };

        self.set_state(SessionState::Authenticated, Some(params.username.clone()));
        self.set_state(SessionState::Relaying, Some(params.username.clone()));
        info!(username = %params.username, "session established");
        self.notifier.notify(NotificationEvent::Connected {
            message: format!("Connected as {}", params.username),
        });

        match self.relay(transport.as_mut(), &mut shutdown).await {
            SessionEnd::Shutdown => {
                match transport.close().await {
                    Ok(()) => self
                        .notifier
                        .notify(NotificationEvent::info("Manually disconnected")),
                    Err(err) => {
                        warn!(%err, "error closing transport");
                        self.notifier.notify(NotificationEvent::info(format!(
                            "Error disconnecting: {err}"
                        )));
                    }
                }
                info!("session closed on request");
            }
            SessionEnd::Lost(err) => {
                warn!(%err, "session lost");
                self.notifier.notify(NotificationEvent::Disconnected {
                    message: format!("Disconnected: {err}"),
                });
            }
        }

        // The transport is released here whether or not close succeeded.
        drop(transport);
        self.executor.release_connections().await;
        self.set_state(SessionState::Disconnected, None);
    }

    async fn login(&self, params: &LoginParams) -> Result<Box<dyn Transport>, SessionError> {
        let mut transport = self.connector.connect(&params.url).await?;
        let login = serde_json::to_string(&LoginRequest {
            username: params.username.clone(),
            password: params.password.clone(),
        })
        .map_err(TransportError::from)?;
        transport.send(login).await?;

        let Some(text) = transport.recv().await? else {
            return Err(TransportError::Closed.into());
        };
        let reply = serde_json::from_str::<LoginReply>(&text).unwrap_or_else(|err| LoginReply {
            success: serde_json::Value::Bool(false),
            message: format!("unreadable login reply: {err}").into(),
        });

        if !reply.is_success() {
            if let Err(err) = transport.close().await {
                debug!(%err, "close after rejected login failed");
            }
            return Err(SessionError::Authentication(reply.reason()));
        }
        Ok(transport)
    }

    async fn relay(
        &self,
        transport: &mut dyn Transport,
        shutdown: &mut oneshot::Receiver<()>,
    ) -> SessionEnd {
        loop {
            let frame = tokio::select! {
                biased;
                _ = &mut *shutdown => return SessionEnd::Shutdown,
                frame = transport.recv() => frame,
            };
            let text = match frame {
                Ok(Some(text)) => text,
                Ok(None) => return SessionEnd::Lost(TransportError::Closed),
                Err(err) => return SessionEnd::Lost(err),
            };
            // One request at a time: the response goes out before the next read.
            if let Err(err) = self.dispatch(transport, &text).await {
                return SessionEnd::Lost(err);
            }
        }
    }

    async fn dispatch(&self, transport: &mut dyn Transport, text: &str) -> Result<(), TransportError> {
        debug!(frame = text, "received frame");
        let frame = match serde_json::from_str::<InboundFrame>(text) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "ignoring malformed frame");
                self.notifier.notify(NotificationEvent::info(format!(
                    "Ignoring malformed frame: {err}"
                )));
                return Ok(());
            }
        };

        match frame {
            InboundFrame::SqlQuery(request) => {
                let response = self.executor.execute(&request).await;
                let payload = serde_json::to_string(&OutboundFrame::SqlQueryResult(response))?;
                transport.send(payload).await
            }
            InboundFrame::Unrecognized => {
                debug!("ignoring frame of unrecognized type");
                Ok(())
            }
        }
    }
}

/// In-memory transport for exercising sessions without a network.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::{Connector, Transport};
    use crate::error::TransportError;

    pub type Log = Arc<Mutex<Vec<String>>>;

    /// The broker's end of a [`ChannelConnector`].
    pub struct Broker {
        pub to_client: mpsc::UnboundedSender<String>,
        pub from_client: mpsc::UnboundedReceiver<String>,
    }

    impl Broker {
        pub fn push(&self, frame: serde_json::Value) {
            self.to_client.send(frame.to_string()).unwrap();
        }

        pub async fn next_json(&mut self) -> serde_json::Value {
            let text = self.from_client.recv().await.expect("client frame");
            serde_json::from_str(&text).unwrap()
        }
    }

    pub struct ChannelConnector {
        transport: Mutex<Option<ChannelTransport>>,
    }

    pub struct ChannelTransport {
        inbound: mpsc::UnboundedReceiver<String>,
        outbound: mpsc::UnboundedSender<String>,
        close_fails: bool,
        log: Log,
    }

    /// A connector that hands out exactly one transport wired to the broker.
    pub fn pair(close_fails: bool, log: Log) -> (ChannelConnector, Broker) {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        let transport = ChannelTransport {
            inbound,
            outbound,
            close_fails,
            log,
        };
        (
            ChannelConnector {
                transport: Mutex::new(Some(transport)),
            },
            Broker {
                to_client,
                from_client,
            },
        )
    }

    #[async_trait]
    impl Connector for ChannelConnector {
        async fn connect(&self, _url: &str) -> Result<Box<dyn Transport>, TransportError> {
            match self.transport.lock().unwrap().take() {
                Some(t) => Ok(Box::new(t)),
                None => Err(TransportError::Closed),
            }
        }
    }

    #[async_trait]
    impl Transport for ChannelTransport {
        async fn send(&mut self, text: String) -> Result<(), TransportError> {
            self.log.lock().unwrap().push("send".to_string());
            self.outbound.send(text).map_err(|_| TransportError::Closed)
        }

        async fn recv(&mut self) -> Result<Option<String>, TransportError> {
            Ok(self.inbound.recv().await)
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            self.log.lock().unwrap().push("close".to_string());
            if self.close_fails {
                return Err(TransportError::Json(
                    serde_json::from_str::<()>("x").unwrap_err(),
                ));
            }
            self.inbound.close();
            Ok(())
        }
    }
}
