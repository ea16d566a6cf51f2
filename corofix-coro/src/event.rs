/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Binary event signal for cooperative tasks.
//!
//! Same single-word encoding as the mutex:
//!
//! - `NOT_SET` (0): unset, no waiters
//! - `SET` (1): set
//! - any other value: unset, head of an intrusive LIFO waiter list
//!
//! `set` resumes every waiter that was enqueued before the atomic exchange,
//! exactly once. A waiter arriving after the exchange observes `SET` and
//! never suspends. Each node carries a SIGNALED phase so the wake stays
//! exactly-once even if the event is reset between the wake and the waiter's
//! next step.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::task::{Context, Poll, Waker};

/// State word: not set, no waiters.
const NOT_SET: usize = 0;
/// State word: set. Distinct from any heap address.
const SET: usize = 1;

const WAITING: u8 = 0;
const SIGNALED: u8 = 1;
const ABANDONED: u8 = 2;

/// Intrusive waiter node for the event list.
struct Waiter {
    waker: Waker,
    phase: AtomicU8,
    /// Next node in the LIFO list. Written once, before publication.
    next: Cell<*const Waiter>,
}

// `next` is written only before publication and read only by the single
// `set` call that claimed the whole list via the exchange.
unsafe impl Send for Waiter {}
unsafe impl Sync for Waiter {}

/// One-shot or resettable binary event.
///
/// Used for cooperative cancellation: the session's shutdown request is an
/// `Event` observed by the active phase.
pub struct Event {
    state: AtomicUsize,
}

impl Event {
    /// Creates an unset event.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicUsize::new(NOT_SET),
        }
    }

    /// Sets the event, resuming all waiters enqueued before this call.
    pub fn set(&self) {
        let previous = self.state.swap(SET, Ordering::AcqRel);
        if previous == NOT_SET || previous == SET {
            return;
        }

        // Walk the claimed list. `next` must be read before waking: the
        // resumed task may drop its future (and our wake target) immediately.
        let mut current = previous as *const Waiter;
        while !current.is_null() {
            let node = unsafe { Arc::from_raw(current) };
            current = node.next.get();
            if node
                .phase
                .compare_exchange(WAITING, SIGNALED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                node.waker.wake_by_ref();
            }
        }
    }

    /// Resets the event to unset. No-op unless the event was set.
    ///
    /// A set event has no waiters, so no waiter list is touched.
    pub fn reset(&self) {
        let _ = self
            .state
            .compare_exchange(SET, NOT_SET, Ordering::AcqRel, Ordering::Relaxed);
    }

    /// Returns true if the event is set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.state.load(Ordering::Acquire) == SET
    }

    /// Waits until the event is set. Ready immediately if already set.
    #[must_use = "futures do nothing unless awaited"]
    pub fn wait(&self) -> EventFuture<'_> {
        EventFuture {
            event: self,
            node: None,
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Event {
    fn drop(&mut self) {
        // Reclaim any nodes still enqueued (set was never called).
        let state = *self.state.get_mut();
        if state != NOT_SET && state != SET {
            let mut current = state as *const Waiter;
            while !current.is_null() {
                let node = unsafe { Arc::from_raw(current) };
                current = node.next.get();
            }
        }
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event").field("set", &self.is_set()).finish()
    }
}

/// Future returned by [`Event::wait`].
pub struct EventFuture<'a> {
    event: &'a Event,
    /// Waiter node, present while enqueued.
    node: Option<Arc<Waiter>>,
}

impl Future for EventFuture<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if let Some(node) = this.node.as_ref() {
            return if node.phase.load(Ordering::Acquire) == SIGNALED {
                this.node = None;
                Poll::Ready(())
            } else {
                Poll::Pending
            };
        }

        let mut current = this.event.state.load(Ordering::Acquire);
        if current == SET {
            return Poll::Ready(());
        }

        let node = Arc::new(Waiter {
            waker: cx.waker().clone(),
            phase: AtomicU8::new(WAITING),
            next: Cell::new(std::ptr::null()),
        });
        let raw = Arc::into_raw(Arc::clone(&node));

        loop {
            if current == SET {
                // Set raced with the enqueue; never published.
                drop(unsafe { Arc::from_raw(raw) });
                return Poll::Ready(());
            }

            node.next.set(if current == NOT_SET {
                std::ptr::null()
            } else {
                current as *const Waiter
            });

            match this.event.state.compare_exchange_weak(
                current,
                raw as usize,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    this.node = Some(node);
                    return Poll::Pending;
                }
                Err(actual) => current = actual,
            }
        }
    }
}

impl Drop for EventFuture<'_> {
    fn drop(&mut self) {
        if let Some(node) = self.node.take() {
            // The list entry is reclaimed by `set` or by `Event::drop`.
            let _ = node
                .phase
                .compare_exchange(WAITING, ABANDONED, Ordering::AcqRel, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use std::cell::Cell;

    async fn wait_and_return(event: &Event, value: i32) -> i32 {
        event.wait().await;
        value
    }

    async fn wait_and_flag(event: &Event, reached: &Cell<bool>) {
        event.wait().await;
        reached.set(true);
    }

    #[test]
    fn test_wait_after_set_is_immediate() {
        let event = Event::new();
        event.set();

        let task = Task::new(wait_and_return(&event, 1));
        assert_eq!(task.get(), 1);
    }

    #[test]
    fn test_is_set_reflects_state() {
        let event = Event::new();
        assert!(!event.is_set());

        event.set();
        assert!(event.is_set());

        event.reset();
        assert!(!event.is_set());
    }

    #[test]
    fn test_set_resumes_waiter() {
        let event = Event::new();
        let reached = Cell::new(false);

        let mut waiter = Task::new(wait_and_flag(&event, &reached));
        waiter.resume();
        assert!(!reached.get());

        event.set();
        waiter.resume();
        assert!(reached.get());
        assert!(waiter.is_ready());
    }

    #[test]
    fn test_set_resumes_all_waiters() {
        let event = Event::new();
        let a = Cell::new(false);
        let b = Cell::new(false);

        let mut t1 = Task::new(wait_and_flag(&event, &a));
        let mut t2 = Task::new(wait_and_flag(&event, &b));
        t1.resume();
        t2.resume();

        event.set();
        t1.resume();
        t2.resume();
        assert!(a.get());
        assert!(b.get());
    }

    #[test]
    fn test_reset_and_reset_again() {
        let event = Event::new();

        // Reset on an unset event is a no-op.
        event.reset();
        assert!(!event.is_set());

        event.set();
        event.reset();
        event.set();
        assert!(event.is_set());

        let task = Task::new(wait_and_return(&event, 99));
        assert_eq!(task.get(), 99);
    }

    #[test]
    fn test_signal_survives_reset_before_resume() {
        let event = Event::new();
        let reached = Cell::new(false);

        let mut waiter = Task::new(wait_and_flag(&event, &reached));
        waiter.resume();

        event.set();
        event.reset();

        // The waiter was signaled before the reset, so it must still run.
        waiter.resume();
        assert!(reached.get());
    }
}
