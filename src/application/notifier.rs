use crate::domain::notification::{NotificationEvent, Severity};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Default)]
struct Slot {
    current: Option<NotificationEvent>,
    expiry: Option<CancellationToken>,
}

/// Shows one notification at a time and clears it after a fixed duration.
///
/// Cloning shares the same slot. Every shown event is also pushed to the
/// event channel for whoever renders notifications.
#[derive(Clone)]
pub struct NotificationEmitter {
    slot: Arc<Mutex<Slot>>,
    display: Duration,
    cancel: CancellationToken,
    event_tx: UnboundedSender<NotificationEvent>,
    event_rx: Arc<std::sync::Mutex<Option<UnboundedReceiver<NotificationEvent>>>>,
}

impl NotificationEmitter {
    pub fn new(display: Duration, cancel: CancellationToken) -> Self {
        let (event_tx, event_rx) = unbounded_channel();
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            display,
            cancel,
            event_tx,
            event_rx: Arc::new(std::sync::Mutex::new(Some(event_rx))),
        }
    }

    /// Takes the receiving end of the event channel. Only the first call gets it.
    pub fn take_event_receiver(&self) -> Option<UnboundedReceiver<NotificationEvent>> {
        self.event_rx.lock().ok().and_then(|mut rx| rx.take())
    }

    /// Replaces the current notification and restarts the expiry timer.
    pub async fn show(&self, message: impl Into<String>, severity: Severity) {
        let event = NotificationEvent::new(message, severity);
        let expiry = self.cancel.child_token();

        {
            let mut slot = self.slot.lock().await;
            if let Some(previous) = slot.expiry.replace(expiry.clone()) {
                previous.cancel();
            }
            slot.current = Some(event.clone());
        }
        debug!(%event, "notification shown");
        let _ = self.event_tx.send(event);

        let slot = Arc::clone(&self.slot);
        let display = self.display;
        tokio::spawn(async move {
            tokio::select! {
                _ = expiry.cancelled() => {}
                _ = tokio::time::sleep(display) => {
                    let mut slot = slot.lock().await;
                    // a newer notification owns the slot unless our token is still current
                    if !expiry.is_cancelled() {
                        slot.current = None;
                        slot.expiry = None;
                    }
                }
            }
        });
    }

    pub async fn current(&self) -> Option<NotificationEvent> {
        self.slot.lock().await.current.clone()
    }

    pub async fn clear(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(expiry) = slot.expiry.take() {
            expiry.cancel();
        }
        slot.current = None;
    }

    /// Stops the pending expiry timer and drops the current notification.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.clear().await;
    }
}
