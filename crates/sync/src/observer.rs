//! Sentinel visibility observer
//!
//! Drives infinite scrolling without knowing anything about a real
//! viewport: given a visibility signal for the current sentinel (the
//! last rendered task) and a callback, it invokes the callback on the
//! first transition into visibility, at most once per arming. The
//! presentation layer re-arms with a fresh signal on every re-render
//! that changes the last item.

use std::future::Future;
use std::sync::Mutex;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

fn take_handle(slot: &Mutex<Option<JoinHandle<()>>>) -> Option<JoinHandle<()>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take()
}

/// Observes one sentinel visibility signal at a time
#[derive(Debug, Default)]
pub struct SentinelObserver {
    armed: Mutex<Option<JoinHandle<()>>>,
}

impl SentinelObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the observer with a fresh sentinel signal
    ///
    /// Any previous observation is torn down first; there is at most
    /// one active arming. The callback fires once, on the first `true`
    /// value (a sentinel already visible at arming time counts), and
    /// the arming is spent once the callback's future settles.
    pub fn arm<F, Fut>(&self, mut visibility: watch::Receiver<bool>, on_visible: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.disarm();
        let handle = tokio::spawn(async move {
            loop {
                if *visibility.borrow_and_update() {
                    break;
                }
                if visibility.changed().await.is_err() {
                    debug!("sentinel signal dropped before triggering");
                    return;
                }
            }
            on_visible().await;
        });
        let mut slot = self
            .armed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(handle);
    }

    /// Tear down the current observation, if any
    pub fn disarm(&self) {
        if let Some(handle) = take_handle(&self.armed) {
            handle.abort();
        }
    }

    /// Whether an arming is still waiting or mid-trigger
    pub fn is_armed(&self) -> bool {
        self.armed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SentinelObserver {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const TICK: Duration = Duration::from_millis(100);

    fn fired_channel() -> (mpsc::UnboundedSender<()>, mpsc::UnboundedReceiver<()>) {
        mpsc::unbounded_channel()
    }

    #[tokio::test(start_paused = true)]
    async fn test_triggers_on_first_visibility() {
        let observer = SentinelObserver::new();
        let (visible_tx, visible_rx) = watch::channel(false);
        let (fired_tx, mut fired_rx) = fired_channel();

        observer.arm(visible_rx, move || async move {
            let _ = fired_tx.send(());
        });

        // Not visible yet, nothing fires
        assert!(timeout(TICK, fired_rx.recv()).await.is_err());

        visible_tx.send(true).unwrap();
        assert!(timeout(TICK, fired_rx.recv()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_triggers_at_most_once_per_arming() {
        let observer = SentinelObserver::new();
        let (visible_tx, visible_rx) = watch::channel(false);
        let (fired_tx, mut fired_rx) = fired_channel();
        // Keeps the channel open once the spent arming drops its sender,
        // so "nothing fired" shows up as a timeout rather than a close
        let _open = fired_tx.clone();

        observer.arm(visible_rx, move || async move {
            let _ = fired_tx.send(());
        });

        visible_tx.send(true).unwrap();
        assert!(timeout(TICK, fired_rx.recv()).await.is_ok());

        // Flickering in and out of the viewport does not re-trigger
        visible_tx.send_replace(false);
        visible_tx.send_replace(true);
        assert!(timeout(TICK, fired_rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_visible_sentinel_triggers() {
        let observer = SentinelObserver::new();
        let (_visible_tx, visible_rx) = watch::channel(true);
        let (fired_tx, mut fired_rx) = fired_channel();

        observer.arm(visible_rx, move || async move {
            let _ = fired_tx.send(());
        });

        assert!(timeout(TICK, fired_rx.recv()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_tears_down_previous_observation() {
        let observer = SentinelObserver::new();
        let (old_tx, old_rx) = watch::channel(false);
        let (new_tx, new_rx) = watch::channel(false);
        let (fired_tx, mut fired_rx) = fired_channel();

        let old_fired = fired_tx.clone();
        observer.arm(old_rx, move || async move {
            let _ = old_fired.send(());
        });
        observer.arm(new_rx, move || async move {
            let _ = fired_tx.send(());
        });

        // The superseded sentinel must never fire
        let _ = old_tx.send(true);
        assert!(timeout(TICK, fired_rx.recv()).await.is_err());

        new_tx.send(true).unwrap();
        assert!(timeout(TICK, fired_rx.recv()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_prevents_trigger() {
        let observer = SentinelObserver::new();
        let (visible_tx, visible_rx) = watch::channel(false);
        let (fired_tx, mut fired_rx) = fired_channel();
        // Keeps the channel open after the aborted arming drops its
        // sender, so "nothing fired" shows up as a timeout
        let _open = fired_tx.clone();

        observer.arm(visible_rx, move || async move {
            let _ = fired_tx.send(());
        });
        observer.disarm();
        assert!(!observer.is_armed());

        let _ = visible_tx.send(true);
        assert!(timeout(TICK, fired_rx.recv()).await.is_err());
    }
}
