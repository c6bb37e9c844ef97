//! Cancellable delayed delivery of the latest input
//!
//! Each [`Debouncer::schedule`] call aborts the previously scheduled task and
//! starts a new timer. Delivered values carry a generation number, so a value
//! that slipped into the channel just before being superseded is still
//! rejected by [`Debouncer::accept`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A value that survived its quiet period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounced<T> {
    generation: u64,
    value: T,
}

pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<Debounced<T>>,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<Debounced<T>>) -> Self {
        Debouncer {
            delay,
            tx,
            generation: 0,
            pending: None,
        }
    }

    /// Deliver `value` after the quiet period unless rescheduled or cancelled first
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        self.generation += 1;

        let delay = self.delay;
        let tx = self.tx.clone();
        let debounced = Debounced {
            generation: self.generation,
            value,
        };
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(debounced);
        }));
    }

    /// Drop the pending value, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                self.generation += 1;
                tracing::debug!(generation = self.generation, "Debounce timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Unwrap a delivered value, or `None` if it has been superseded
    pub fn accept(&mut self, debounced: Debounced<T>) -> Option<T> {
        if debounced.generation != self.generation {
            return None;
        }
        self.pending = None;
        Some(debounced.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
