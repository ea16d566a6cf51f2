/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Lazy cooperative task type and the `Yield` awaitable.
//!
//! A [`Task`] wraps a future and is driven by explicit [`resume`](Task::resume)
//! calls, one cooperative step at a time. No executor thread exists anywhere:
//! the root task is driven by [`get`](Task::get), and child tasks are driven
//! by whichever task awaits them. All blocking in the engine is layered as
//! `WouldBlock` plus [`Yield`], so a step never parks the OS thread.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

/// A unit of suspendable computation producing a value of type `T`.
///
/// Tasks are lazy: nothing runs until the first [`resume`](Task::resume) (or
/// a poll from an awaiting parent). Tasks are move-only and own their frame
/// (the boxed future).
///
/// A `Task` can be awaited from another task; the parent's poll drives the
/// child, so the parent observes completion on the same cooperative step the
/// child finishes in.
pub struct Task<'a, T> {
    future: Option<Pin<Box<dyn Future<Output = T> + 'a>>>,
    result: Option<T>,
}

// The inner future is heap-pinned; moving the `Task` shell never moves the
// frame, and the result slot is never pinned.
impl<T> Unpin for Task<'_, T> {}

impl<'a, T> Task<'a, T> {
    /// Creates a new task from a future. The future does not run until the
    /// task is first resumed.
    #[must_use]
    pub fn new(future: impl Future<Output = T> + 'a) -> Self {
        Self {
            future: Some(Box::pin(future)),
            result: None,
        }
    }

    /// Runs the task until its next suspension point or completion.
    ///
    /// No-op on a completed task.
    pub fn resume(&mut self) {
        if let Some(fut) = self.future.as_mut() {
            let mut cx = Context::from_waker(Waker::noop());
            if let Poll::Ready(value) = fut.as_mut().poll(&mut cx) {
                self.result = Some(value);
                self.future = None;
            }
        }
    }

    /// Returns true if the task has run to completion.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.future.is_none()
    }

    /// Drives the task to completion and returns its result.
    ///
    /// This is the blocking entry point for a root task: it resumes the task
    /// in a tight loop until it is ready.
    ///
    /// # Panics
    /// Panics if the result was already consumed through a `Future` poll.
    pub fn get(mut self) -> T {
        while !self.is_ready() {
            self.resume();
        }
        self.result.take().expect("task result already consumed")
    }
}

impl<T> Future for Task<'_, T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        if let Some(value) = this.result.take() {
            return Poll::Ready(value);
        }
        match this.future.as_mut() {
            Some(fut) => match fut.as_mut().poll(cx) {
                Poll::Ready(value) => {
                    this.future = None;
                    Poll::Ready(value)
                }
                Poll::Pending => Poll::Pending,
            },
            // Completed and already consumed; nothing left to produce.
            None => Poll::Pending,
        }
    }
}

impl<T> std::fmt::Debug for Task<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// Awaitable that suspends the current task for exactly one step.
///
/// The first poll returns `Pending` (after waking the driver), the second
/// returns `Ready`: control returns to the resumer and the continuation runs
/// one step later.
#[derive(Debug, Default)]
pub struct Yield {
    yielded: bool,
}

impl Yield {
    /// Creates a new yield point.
    #[must_use]
    pub const fn new() -> Self {
        Self { yielded: false }
    }
}

impl Future for Yield {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Suspends the current task for one cooperative step.
#[must_use = "futures do nothing unless awaited"]
pub fn yield_now() -> Yield {
    Yield::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn return_value(v: i32) -> i32 {
        v
    }

    async fn yield_once_then(v: i32) -> i32 {
        yield_now().await;
        v
    }

    #[test]
    fn test_task_is_lazy() {
        let mut ran = false;
        {
            let _task = Task::new(async {
                ran = true;
            });
            // never resumed
        }
        assert!(!ran);
    }

    #[test]
    fn test_task_get() {
        let task = Task::new(return_value(42));
        assert_eq!(task.get(), 42);
    }

    #[test]
    fn test_task_resume_until_ready() {
        let mut task = Task::new(yield_once_then(7));
        assert!(!task.is_ready());

        task.resume();
        assert!(!task.is_ready());

        task.resume();
        assert!(task.is_ready());
        assert_eq!(task.get(), 7);
    }

    #[test]
    fn test_resume_on_completed_task_is_noop() {
        let mut task = Task::new(return_value(1));
        task.resume();
        assert!(task.is_ready());
        task.resume();
        assert!(task.is_ready());
        assert_eq!(task.get(), 1);
    }

    #[test]
    fn test_task_awaited_from_parent() {
        let child = Task::new(yield_once_then(5));
        let parent = Task::new(async move {
            let v = child.await;
            v * 2
        });
        assert_eq!(parent.get(), 10);
    }

    #[test]
    fn test_yield_suspends_exactly_once() {
        let mut task = Task::new(async {
            yield_now().await;
            yield_now().await;
        });
        task.resume();
        assert!(!task.is_ready());
        task.resume();
        assert!(!task.is_ready());
        task.resume();
        assert!(task.is_ready());
    }
}
