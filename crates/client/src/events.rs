//! UI-facing events: navigation requests and toast-style notifications.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use stockpad_auth::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientEvent {
    Navigate { route: Route },
    Notify(Notification),
}

/// Broadcast channel shared by every module of one application context.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.publish(ClientEvent::Navigate { route });
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.publish(ClientEvent::Notify(Notification {
            level,
            message: message.into(),
            at: Utc::now(),
        }));
    }

    fn publish(&self, event: ClientEvent) {
        // Nobody listening is fine.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.navigate(Route::Dashboard);
        bus.notify(NotificationLevel::Success, "saved");

        assert_eq!(
            rx.recv().await.unwrap(),
            ClientEvent::Navigate {
                route: Route::Dashboard
            }
        );
        match rx.recv().await.unwrap() {
            ClientEvent::Notify(n) => {
                assert_eq!(n.level, NotificationLevel::Success);
                assert_eq!(n.message, "saved");
            }
            other => panic!("Expected notification, got {other:?}"),
        }
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        EventBus::new(4).navigate(Route::SignIn);
    }
}
