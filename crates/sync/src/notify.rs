//! Notification seam
//!
//! The engine reports user-facing warnings through a handle instead of
//! ambient globals, so teardown and tests stay deterministic. The
//! presentation layer decides how a warning is rendered.

use tokio::sync::mpsc;
use tracing::warn;

/// Sink for user-facing warnings
pub trait Notify: Send + Sync {
    fn warn(&self, message: &str);
}

/// Notifier that forwards warnings to the tracing subscriber
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notify for TracingNotifier {
    fn warn(&self, message: &str) {
        warn!("{message}");
    }
}

/// Notifier that queues warnings on a channel for a consumer to render
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notify for ChannelNotifier {
    fn warn(&self, message: &str) {
        // A closed receiver just means the view is gone
        let _ = self.tx.send(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_queues_messages() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.warn("first");
        notifier.warn("second");
        assert_eq!(rx.try_recv().unwrap(), "first");
        assert_eq!(rx.try_recv().unwrap(), "second");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_notifier_survives_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.warn("nobody listening");
    }
}
