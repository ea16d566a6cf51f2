/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Lock-free async mutex for cooperative tasks.
//!
//! The entire mutex is one atomic word with three encodings:
//!
//! - `UNLOCKED` (0): nobody holds the lock
//! - `LOCKED` (1): held, no waiters
//! - any other value: held, and the value is the address of the head of an
//!   intrusive LIFO list of waiter nodes
//!
//! Waiter nodes live on the heap (`Arc`) and are handed to the list as raw
//! pointers, so a suspended lock future can be dropped without invalidating
//! the list: the dropped future marks its node `ABANDONED` and `unlock`
//! skips it when popping. Unlocking hands the lock directly to the popped
//! waiter; the resumed future returns its [`ScopedLock`] without touching
//! the state word again.
//!
//! Fairness is LIFO by construction: a single aggressor re-locking in a
//! tight loop can starve older waiters. Callers that need FIFO ordering
//! must build it on top of an [`Event`](crate::Event) chain.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::task::{Context, Poll, Waker};

/// State word: nobody holds the lock.
const UNLOCKED: usize = 0;
/// State word: lock held, no waiters. Distinct from any heap address.
const LOCKED: usize = 1;

/// Waiter node phase: enqueued, waiting for the lock.
const WAITING: u8 = 0;
/// Waiter node phase: the lock was handed to this waiter.
const GRANTED: u8 = 1;
/// Waiter node phase: the owning future was dropped while enqueued.
const ABANDONED: u8 = 2;

/// Intrusive waiter node. Enqueued by `LockFuture::poll`, dequeued by
/// `AsyncMutex::unlock`.
struct Waiter {
    /// Waker captured when the node was published.
    waker: Waker,
    /// WAITING / GRANTED / ABANDONED handshake between future and unlocker.
    phase: AtomicU8,
    /// Next node in the LIFO list. Written once, before publication.
    next: Cell<*const Waiter>,
}

// `next` is written only before the node is published and read only by the
// single unlocker that won the pop CAS, so the Cell is never raced.
unsafe impl Send for Waiter {}
unsafe impl Sync for Waiter {}

/// CAS-based non-blocking mutex for coroutines.
///
/// At most one task holds the lock at any time. `unlock` resumes exactly one
/// waiter (if any). The atomic protocol stays correct under multi-threaded
/// access even though the intended deployment is a single cooperative thread.
pub struct AsyncMutex {
    state: AtomicUsize,
}

impl AsyncMutex {
    /// Creates an unlocked mutex.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicUsize::new(UNLOCKED),
        }
    }

    /// Acquires the lock, returning an RAII guard.
    ///
    /// Await-ready fast path: a single CAS from `UNLOCKED` to `LOCKED`. On
    /// contention the future enqueues itself as the new list head and
    /// suspends until an unlock hands it the lock.
    #[must_use = "the lock is held only while the returned guard is awaited and alive"]
    pub fn scoped_lock(&self) -> LockFuture<'_> {
        LockFuture {
            mutex: self,
            node: None,
            acquired: false,
        }
    }

    /// Releases the lock, resuming the head waiter if any.
    fn unlock(&self) {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            if current == LOCKED {
                // No waiters.
                match self.state.compare_exchange_weak(
                    LOCKED,
                    UNLOCKED,
                    Ordering::Release,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return,
                    Err(actual) => {
                        current = actual;
                        continue;
                    }
                }
            }

            debug_assert_ne!(current, UNLOCKED, "unlock of an unlocked mutex");

            // Pop the head waiter. Only the lock holder pops, so the head's
            // `next` pointer is stable once observed.
            let head = current as *const Waiter;
            let next = unsafe { (*head).next.get() };
            let new_state = if next.is_null() {
                LOCKED
            } else {
                next as usize
            };

            match self.state.compare_exchange_weak(
                current,
                new_state,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    // Reclaim the list's reference to the node.
                    let node = unsafe { Arc::from_raw(head) };
                    if node
                        .phase
                        .compare_exchange(WAITING, GRANTED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        node.waker.wake_by_ref();
                        return;
                    }
                    // The waiter abandoned its future; pass the lock on.
                    current = self.state.load(Ordering::Acquire);
                }
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AsyncMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AsyncMutex {
    fn drop(&mut self) {
        // Reclaim any abandoned nodes still enqueued.
        let state = *self.state.get_mut();
        if state != UNLOCKED && state != LOCKED {
            let mut current = state as *const Waiter;
            while !current.is_null() {
                let node = unsafe { Arc::from_raw(current) };
                current = node.next.get();
            }
        }
    }
}

impl std::fmt::Debug for AsyncMutex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load(Ordering::Relaxed);
        f.debug_struct("AsyncMutex")
            .field("locked", &(state != UNLOCKED))
            .field("has_waiters", &(state != UNLOCKED && state != LOCKED))
            .finish()
    }
}

/// RAII lock ownership handle.
///
/// Dropping the guard releases the lock exactly once; moving it transfers
/// ownership.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScopedLock<'a> {
    mutex: &'a AsyncMutex,
}

impl Drop for ScopedLock<'_> {
    fn drop(&mut self) {
        self.mutex.unlock();
    }
}

impl std::fmt::Debug for ScopedLock<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedLock").finish()
    }
}

/// Future returned by [`AsyncMutex::scoped_lock`].
pub struct LockFuture<'a> {
    mutex: &'a AsyncMutex,
    /// Waiter node, present while enqueued.
    node: Option<Arc<Waiter>>,
    /// True once a guard has been handed out.
    acquired: bool,
}

impl<'a> Future for LockFuture<'a> {
    type Output = ScopedLock<'a>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<ScopedLock<'a>> {
        let this = self.get_mut();

        if this.acquired {
            // Polled after completion.
            return Poll::Pending;
        }

        if let Some(node) = this.node.as_ref() {
            // Enqueued earlier; the unlocker hands the lock over by flipping
            // the phase to GRANTED before waking us.
            return if node.phase.load(Ordering::Acquire) == GRANTED {
                this.node = None;
                this.acquired = true;
                Poll::Ready(ScopedLock { mutex: this.mutex })
            } else {
                Poll::Pending
            };
        }

        // Fast path: uncontended acquire.
        if this
            .mutex
            .state
            .compare_exchange(UNLOCKED, LOCKED, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            this.acquired = true;
            return Poll::Ready(ScopedLock { mutex: this.mutex });
        }

        let node = Arc::new(Waiter {
            waker: cx.waker().clone(),
            phase: AtomicU8::new(WAITING),
            next: Cell::new(std::ptr::null()),
        });
        let raw = Arc::into_raw(Arc::clone(&node));

        let mut current = this.mutex.state.load(Ordering::Relaxed);
        loop {
            if current == UNLOCKED {
                // The lock was released while we prepared; try to take it.
                match this.mutex.state.compare_exchange_weak(
                    UNLOCKED,
                    LOCKED,
                    Ordering::Acquire,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // Never published; reclaim the list reference.
                        drop(unsafe { Arc::from_raw(raw) });
                        this.acquired = true;
                        return Poll::Ready(ScopedLock { mutex: this.mutex });
                    }
                    Err(actual) => {
                        current = actual;
                        continue;
                    }
                }
            }

            // Locked: install ourselves as the new list head.
            node.next.set(if current == LOCKED {
                std::ptr::null()
            } else {
                current as *const Waiter
            });

            match this.mutex.state.compare_exchange_weak(
                current,
                raw as usize,
                Ordering::Release,
                Ordering::Relaxed,
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

impl Drop for LockFuture<'_> {
    fn drop(&mut self) {
        if self.acquired {
            // The guard owns the lock now.
            return;
        }
        if let Some(node) = self.node.take() {
            if node
                .phase
                .compare_exchange(WAITING, ABANDONED, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                // GRANTED raced with the drop: we own the lock, release it.
                self.mutex.unlock();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::task::Task;
    use std::cell::RefCell;

    async fn lock_and_return(mutex: &AsyncMutex, value: i32) -> i32 {
        let _lock = mutex.scoped_lock().await;
        value
    }

    async fn lock_and_push(mutex: &AsyncMutex, order: &RefCell<Vec<i32>>, id: i32) {
        let _lock = mutex.scoped_lock().await;
        order.borrow_mut().push(id);
    }

    async fn hold_until(mutex: &AsyncMutex, gate: &Event) {
        let _lock = mutex.scoped_lock().await;
        gate.wait().await;
    }

    #[test]
    fn test_single_lock_unlock() {
        let mutex = AsyncMutex::new();
        let task = Task::new(lock_and_return(&mutex, 42));
        assert_eq!(task.get(), 42);
    }

    #[test]
    fn test_scoped_lock_releases_on_drop() {
        let mutex = AsyncMutex::new();
        let order = RefCell::new(Vec::new());

        Task::new(lock_and_push(&mutex, &order, 1)).get();
        // Re-acquirable after the RAII release.
        Task::new(lock_and_push(&mutex, &order, 2)).get();

        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_sequential_tasks_share_lock() {
        let mutex = AsyncMutex::new();
        let order = RefCell::new(Vec::new());

        let mut t1 = Task::new(lock_and_push(&mutex, &order, 1));
        let mut t2 = Task::new(lock_and_push(&mutex, &order, 2));
        let mut t3 = Task::new(lock_and_push(&mutex, &order, 3));

        t1.resume();
        t2.resume();
        t3.resume();
        while !(t1.is_ready() && t2.is_ready() && t3.is_ready()) {
            t1.resume();
            t2.resume();
            t3.resume();
        }

        let order = order.borrow();
        assert_eq!(order.len(), 3);
        for id in 1..=3 {
            assert!(order.contains(&id));
        }
    }

    #[test]
    fn test_contended_waiter_receives_handoff() {
        let mutex = AsyncMutex::new();
        let gate = Event::new();
        let order = RefCell::new(Vec::new());

        let mut holder = Task::new(hold_until(&mutex, &gate));
        holder.resume();
        assert!(!holder.is_ready());

        // Second task suspends in the waiter list.
        let mut waiter = Task::new(lock_and_push(&mutex, &order, 2));
        waiter.resume();
        assert!(!waiter.is_ready());
        assert!(order.borrow().is_empty());

        // Releasing the holder unlocks and hands the lock to the waiter.
        gate.set();
        holder.resume();
        assert!(holder.is_ready());

        waiter.resume();
        assert!(waiter.is_ready());
        assert_eq!(*order.borrow(), vec![2]);
    }

    #[test]
    fn test_dropped_waiter_does_not_hold_lock() {
        let mutex = AsyncMutex::new();
        let gate = Event::new();
        let order = RefCell::new(Vec::new());

        let mut holder = Task::new(hold_until(&mutex, &gate));
        holder.resume();

        // Enqueue a waiter, then drop it while suspended.
        let mut abandoned = Task::new(lock_and_push(&mutex, &order, 9));
        abandoned.resume();
        drop(abandoned);

        gate.set();
        holder.resume();
        assert!(holder.is_ready());

        // The abandoned node must not swallow the lock.
        let task = Task::new(lock_and_return(&mutex, 3));
        assert_eq!(task.get(), 3);
        assert!(order.borrow().is_empty());
    }
}
