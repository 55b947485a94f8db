#![forbid(unsafe_code)]

//! One-shot completion rendezvous between a dialog and its caller.
//!
//! [`completion`] returns a sender/waiter pair scoped to a single
//! negotiation. The sender is consumed by [`CompletionSender::complete`], so
//! a value is delivered at most once by construction; dropping the sender
//! without completing marks the rendezvous as abandoned so the waiter never
//! blocks forever on a dead UI thread.
//!
//! The waiter sleeps on a condition variable and re-checks the slot after
//! every wake-up, so spurious wake-ups are absorbed.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;

enum Slot<T> {
    Pending,
    Ready(T),
    Taken,
    Abandoned,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    cvar: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(&self, value: Slot<T>) {
        let mut slot = self.lock();
        if matches!(*slot, Slot::Pending) {
            *slot = value;
            self.cvar.notify_all();
        }
    }
}

/// Why a wait ended without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionError {
    /// The sender was dropped without completing.
    Abandoned,
    /// The value was already taken by an earlier wait.
    AlreadyTaken,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abandoned => write!(f, "completion abandoned before a value was sent"),
            Self::AlreadyTaken => write!(f, "completion value already taken"),
        }
    }
}

impl std::error::Error for CompletionError {}

/// Create a one-shot completion pair.
pub fn completion<T>() -> (CompletionSender<T>, CompletionWaiter<T>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot::Pending),
        cvar: Condvar::new(),
    });
    (
        CompletionSender {
            shared: Some(Arc::clone(&shared)),
        },
        CompletionWaiter { shared },
    )
}

/// Producing half. Completes at most once.
pub struct CompletionSender<T> {
    shared: Option<Arc<Shared<T>>>,
}

impl<T> CompletionSender<T> {
    /// Deliver the value and wake the waiter.
    pub fn complete(mut self, value: T) {
        if let Some(shared) = self.shared.take() {
            shared.settle(Slot::Ready(value));
        }
    }
}

impl<T> Drop for CompletionSender<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.settle(Slot::Abandoned);
        }
    }
}

impl<T> fmt::Debug for CompletionSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSender").finish_non_exhaustive()
    }
}

/// Consuming half.
pub struct CompletionWaiter<T> {
    shared: Arc<Shared<T>>,
}

impl<T> CompletionWaiter<T> {
    /// Block until the value arrives or the sender is dropped.
    pub fn wait(self) -> Result<T, CompletionError> {
        let mut slot = self.shared.lock();
        loop {
            if let Some(result) = Self::take(&mut slot) {
                return result;
            }
            slot = self
                .shared
                .cvar
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
            if matches!(*slot, Slot::Pending) {
                trace!("spurious wake-up while waiting for completion");
            }
        }
    }

    /// Block for at most `timeout`. Returns `None` if still pending.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, CompletionError>> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.shared.lock();
        loop {
            if let Some(result) = Self::take(&mut slot) {
                return Some(result);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, _) = self
                .shared
                .cvar
                .wait_timeout(slot, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            slot = guard;
        }
    }

    /// Whether the sender has completed or been dropped.
    pub fn is_settled(&self) -> bool {
        !matches!(*self.shared.lock(), Slot::Pending)
    }

    fn take(slot: &mut Slot<T>) -> Option<Result<T, CompletionError>> {
        match std::mem::replace(slot, Slot::Taken) {
            Slot::Pending => {
                *slot = Slot::Pending;
                None
            }
            Slot::Ready(value) => Some(Ok(value)),
            Slot::Taken => Some(Err(CompletionError::AlreadyTaken)),
            Slot::Abandoned => {
                *slot = Slot::Abandoned;
                Some(Err(CompletionError::Abandoned))
            }
        }
    }
}

impl<T> fmt::Debug for CompletionWaiter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionWaiter")
            .field("settled", &self.is_settled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn delivers_across_threads() {
        let (tx, rx) = completion();
        let handle = thread::spawn(move || tx.complete(42));
        assert_eq!(rx.wait(), Ok(42));
        handle.join().unwrap();
    }

    #[test]
    fn value_sent_before_wait_is_kept() {
        let (tx, rx) = completion();
        tx.complete("done");
        assert!(rx.is_settled());
        assert_eq!(rx.wait(), Ok("done"));
    }

    #[test]
    fn dropped_sender_abandons() {
        let (tx, rx) = completion::<u8>();
        let handle = thread::spawn(move || drop(tx));
        assert_eq!(rx.wait(), Err(CompletionError::Abandoned));
        handle.join().unwrap();
    }

    #[test]
    fn wait_timeout_pending_then_ready() {
        let (tx, rx) = completion();
        assert_eq!(rx.wait_timeout(Duration::from_millis(10)), None);
        tx.complete(1);
        assert_eq!(rx.wait_timeout(Duration::from_millis(10)), Some(Ok(1)));
        assert_eq!(
            rx.wait_timeout(Duration::from_millis(10)),
            Some(Err(CompletionError::AlreadyTaken))
        );
    }

    #[test]
    fn notify_without_value_keeps_waiting() {
        let (tx, rx) = completion();
        let shared = Arc::clone(&rx.shared);
        let handle = thread::spawn(move || {
            for _ in 0..5 {
                shared.cvar.notify_all();
                thread::sleep(Duration::from_millis(2));
            }
            tx.complete("real");
        });
        assert_eq!(rx.wait(), Ok("real"));
        handle.join().unwrap();
    }
}
