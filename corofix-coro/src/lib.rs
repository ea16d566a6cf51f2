/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # Corofix Coro
//!
//! Cooperative coroutine substrate for the corofix session engine.
//!
//! This crate provides:
//! - **[`Task`]**: Lazy move-only task driven by explicit `resume` calls or a
//!   blocking `get`, with no executor thread anywhere
//! - **[`Yield`]**: One-step suspension awaitable
//! - **[`AsyncMutex`]**: Lock-free mutex encoding its waiter list in a single
//!   atomic word, with RAII [`ScopedLock`] handoff
//! - **[`Event`]**: Multi-waiter broadcast signal with the same encoding
//! - **[`when_all`] / [`when_any`]**: Concurrency combinators over child tasks
//! - **[`with_timeout`] / [`sleep_for`]**: Deadline-polled timing
//!
//! Everything runs on one thread of control; the atomic protocols in
//! [`AsyncMutex`] and [`Event`] nonetheless stay correct if tasks are ever
//! driven from several threads.

pub mod combine;
pub mod event;
pub mod mutex;
pub mod task;
pub mod time;

pub use combine::{WhenAll, WhenAny, when_all, when_any};
pub use event::{Event, EventFuture};
pub use mutex::{AsyncMutex, LockFuture, ScopedLock};
pub use task::{Task, Yield, yield_now};
pub use time::{Sleep, WithTimeout, sleep_for, sleep_until, with_timeout};
