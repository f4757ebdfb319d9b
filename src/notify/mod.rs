//! Ordered delivery of session and query events to the UI side.
//!
//! Producers hold a cloneable [`Notifier`] and never block. The single
//! consumer owns the [`NotificationStream`] and drains it on its own schedule.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::QueryParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    Connected {
        message: String,
    },
    Disconnected {
        message: String,
    },
    LoginFailed {
        message: String,
    },
    Info {
        message: String,
    },
    /// Emitted before a statement runs, with everything needed to audit it.
    SqlExecutionInfo {
        message: String,
        request_id: String,
        query: String,
        params: QueryParams,
    },
    SqlSuccess {
        message: String,
    },
    SqlError {
        message: String,
    },
}

impl NotificationEvent {
    pub fn info(message: impl Into<String>) -> Self {
        NotificationEvent::Info {
            message: message.into(),
        }
    }

    /// The wire tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::Connected { .. } => "connected",
            NotificationEvent::Disconnected { .. } => "disconnected",
            NotificationEvent::LoginFailed { .. } => "login_failed",
            NotificationEvent::Info { .. } => "info",
            NotificationEvent::SqlExecutionInfo { .. } => "sql_execution_info",
            NotificationEvent::SqlSuccess { .. } => "sql_success",
            NotificationEvent::SqlError { .. } => "sql_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            NotificationEvent::Connected { message }
            | NotificationEvent::Disconnected { message }
            | NotificationEvent::LoginFailed { message }
            | NotificationEvent::Info { message }
            | NotificationEvent::SqlExecutionInfo { message, .. }
            | NotificationEvent::SqlSuccess { message }
            | NotificationEvent::SqlError { message } => message,
        }
    }
}

/// Producer half.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl Notifier {
    pub fn notify(&self, event: NotificationEvent) {
        if let Err(err) = self.tx.send(event) {
            debug!(kind = err.0.kind(), "notification consumer is gone");
        }
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct NotificationStream {
    rx: mpsc::UnboundedReceiver<NotificationEvent>,
}

impl NotificationStream {
    /// Wait for the next event. `None` once every producer is dropped.
    pub async fn recv(&mut self) -> Option<NotificationEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<NotificationEvent> {
        self.rx.try_recv().ok()
    }

    /// Everything queued right now, oldest first.
    pub fn drain(&mut self) -> Vec<NotificationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn channel() -> (Notifier, NotificationStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, NotificationStream { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_production_order() {
        let (notifier, mut stream) = channel();
        let other = notifier.clone();
        notifier.notify(NotificationEvent::info("one"));
        other.notify(NotificationEvent::SqlSuccess {
            message: "two".into(),
        });
        notifier.notify(NotificationEvent::info("three"));

        let messages: Vec<String> = stream
            .drain()
            .iter()
            .map(|e| e.message().to_string())
            .collect();
        assert_eq!(messages, ["one", "two", "three"]);
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn producers_on_other_tasks_keep_order() {
        let (notifier, mut stream) = channel();
        let producer = tokio::spawn(async move {
            for i in 0..100 {
                notifier.notify(NotificationEvent::info(i.to_string()));
            }
        });
        producer.await.unwrap();

        let mut seen = Vec::new();
        while let Some(event) = stream.recv().await {
            seen.push(event.message().parse::<i32>().unwrap());
        }
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn notify_without_consumer_does_not_panic() {
        let (notifier, stream) = channel();
        drop(stream);
        notifier.notify(NotificationEvent::info("lost"));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = NotificationEvent::LoginFailed {
            message: "Login failed: nope".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "login_failed");
        assert_eq!(json["message"], "Login failed: nope");
        assert_eq!(event.kind(), "login_failed");
    }
}
