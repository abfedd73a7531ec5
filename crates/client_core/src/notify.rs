//! Single-slot transient notification with an auto-dismiss timer.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::debug;

pub(crate) const DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Shown(Notification),
    Cleared,
}

struct ChannelState {
    current: Option<Notification>,
    // Each `show` bumps the generation; a dismiss task only clears the slot
    // if its generation is still the live one.
    generation: u64,
    dismiss_task: Option<JoinHandle<()>>,
}

/// At most one notification is visible at a time. A new `show` replaces the
/// current one and restarts the dismissal window; the replaced timer can
/// never erase the newer notification.
#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<Mutex<ChannelState>>,
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Mutex::new(ChannelState {
                current: None,
                generation: 0,
                dismiss_task: None,
            })),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    pub async fn current(&self) -> Option<Notification> {
        self.inner.lock().await.current.clone()
    }

    /// Must be called from within a tokio runtime; the dismissal timer runs
    /// as a spawned task.
    pub async fn show(&self, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification {
            kind,
            message: message.into(),
        };

        let mut state = self.inner.lock().await;
        if let Some(task) = state.dismiss_task.take() {
            task.abort();
        }
        state.generation += 1;
        let generation = state.generation;
        state.current = Some(notification.clone());

        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        state.dismiss_task = Some(tokio::spawn(async move {
            tokio::time::sleep(DISMISS_AFTER).await;
            let mut state = inner.lock().await;
            if state.generation == generation {
                state.current = None;
                state.dismiss_task = None;
                let _ = events.send(NotificationEvent::Cleared);
            }
        }));
        drop(state);

        debug!(kind = ?notification.kind, "notify: showing notification");
        let _ = self.events.send(NotificationEvent::Shown(notification));
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}
