//! Cancellable one-shot timers that post a message when they fire.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A slot holding at most one scheduled timer.
///
/// Scheduling always cancels the previous timer first. Cancelling aborts the
/// sleeping task and bumps the generation, so a message that was already
/// queued before the abort is recognised as stale by [`TimerSlot::fire`].
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending timer, then schedule `make(generation)` to be sent
    /// on `tx` after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn schedule<M, F>(&mut self, delay: Duration, tx: &UnboundedSender<M>, make: F)
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M,
    {
        self.cancel();
        let deadline = Instant::now() + delay;
        let message = make(self.generation);
        let tx = tx.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(message);
        }));
    }

    /// Cancel the pending timer, if any.
    pub(crate) fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a timer is scheduled and has not fired yet.
    pub(crate) fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Consume a fired message. Returns false if it belongs to a cancelled
    /// or superseded timer.
    pub(crate) fn fire(&mut self, generation: u64) -> bool {
        if self.handle.is_some() && generation == self.generation {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
