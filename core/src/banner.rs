//! Cancellable auto-clear task for the order status banner.
//!
//! At most one clear task is pending. Scheduling a new one aborts the
//! previous task first, and dropping the banner aborts whatever is pending.
//! The owner should still guard the expiry callback (the orchestrator checks
//! a generation number under its state lock) because a task that already
//! woke up on another worker thread cannot be recalled by `abort`.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

#[derive(Debug, Default)]
pub struct StatusBanner {
    pending: Mutex<Option<AbortHandle>>,
}

impl StatusBanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `on_expire` after `delay` unless cancelled or replaced first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            on_expire();
        });
    }

    /// Aborts the pending clear task, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn spawn<Fut>(&self, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(task).abort_handle());
    }
}

impl Drop for StatusBanner {
    fn drop(&mut self) {
        self.cancel();
    }
}
