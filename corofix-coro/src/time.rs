/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Deadline-polled sleep and operation timeout.
//!
//! Time is cooperative like everything else here: a sleeping task is stepped
//! by its driver and re-checks a steady-clock deadline each step. There is
//! no timer wheel; that is adequate for a busy-polling session loop and for
//! benchmarks, and it keeps the substrate free of background threads.

use crate::task::Task;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Future that completes once its deadline has passed.
///
/// Each poll checks the deadline and yields otherwise, so the wait burns
/// cooperative steps rather than parking the thread.
#[derive(Debug)]
pub struct Sleep {
    deadline: Instant,
}

impl Sleep {
    /// Returns the deadline this sleep completes at.
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if Instant::now() >= self.deadline {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Creates a cooperative sleep for the given duration.
#[must_use = "futures do nothing unless awaited"]
pub fn sleep_for(duration: Duration) -> Sleep {
    Sleep {
        deadline: Instant::now() + duration,
    }
}

/// Creates a cooperative sleep until the given deadline.
#[must_use = "futures do nothing unless awaited"]
pub fn sleep_until(deadline: Instant) -> Sleep {
    Sleep { deadline }
}

/// Races an operation against a deadline.
///
/// Returns `Some(result)` if the operation completes within `timeout`
/// steady-clock time, `None` otherwise. The operation is polled before the
/// deadline check on every step, so completion on the deadline edge favors
/// the operation. A timed-out operation is not aborted; it is dropped with
/// this future and simply never stepped again.
#[must_use = "futures do nothing unless awaited"]
pub fn with_timeout<'a, T>(operation: Task<'a, T>, timeout: Duration) -> WithTimeout<'a, T> {
    WithTimeout {
        operation,
        deadline: Instant::now() + timeout,
    }
}

/// Future returned by [`with_timeout`].
pub struct WithTimeout<'a, T> {
    operation: Task<'a, T>,
    deadline: Instant,
}

impl<T> Future for WithTimeout<'_, T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();

        if let Poll::Ready(value) = Pin::new(&mut this.operation).poll(cx) {
            return Poll::Ready(Some(value));
        }
        if Instant::now() >= this.deadline {
            return Poll::Ready(None);
        }
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, yield_now};

    async fn return_value(v: i32) -> i32 {
        v
    }

    async fn yield_forever() {
        loop {
            yield_now().await;
        }
    }

    #[test]
    fn test_sleep_completes_after_deadline() {
        let start = Instant::now();
        Task::new(sleep_for(Duration::from_millis(10))).get();
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_sleep_zero_is_immediate() {
        let mut task = Task::new(sleep_for(Duration::ZERO));
        task.resume();
        assert!(task.is_ready());
    }

    #[test]
    fn test_with_timeout_operation_completes() {
        let task = Task::new(with_timeout(
            Task::new(return_value(42)),
            Duration::from_secs(1),
        ));
        assert_eq!(task.get(), Some(42));
    }

    #[test]
    fn test_with_timeout_unit_operation_completes() {
        let completed = std::cell::Cell::new(false);
        let op = Task::new(async {
            completed.set(true);
        });
        let result = Task::new(with_timeout(op, Duration::from_secs(1))).get();
        assert_eq!(result, Some(()));
        assert!(completed.get());
    }

    #[test]
    fn test_with_timeout_deadline_expires() {
        let task = Task::new(with_timeout(
            Task::new(yield_forever()),
            Duration::from_millis(10),
        ));
        assert_eq!(task.get(), None);
    }
}
