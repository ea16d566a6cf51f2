/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Awaitable wrapper around a [`Transport`].
//!
//! Each operation issues the underlying non-blocking call; while the result
//! is `WouldBlock` it yields one cooperative step and retries. Any other
//! error, and any success, is returned as-is. The adapter never blocks the
//! OS thread.

use crate::Transport;
use corofix_core::error::TransportError;
use corofix_coro::yield_now;
use std::cell::{Ref, RefCell, RefMut};

/// Cooperative async adapter over a [`Transport`].
///
/// The inner transport lives in a `RefCell` so the session's concurrent
/// loops (which never overlap between suspension points) can share it; the
/// borrow is taken per attempt, never held across a yield.
#[derive(Debug)]
pub struct AsyncTransport<T: Transport> {
    inner: RefCell<T>,
}

impl<T: Transport> AsyncTransport<T> {
    /// Wraps a transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            inner: RefCell::new(transport),
        }
    }

    /// Connects to the remote endpoint, yielding while the underlying
    /// transport reports `WouldBlock`.
    ///
    /// # Errors
    /// Propagates any non-`WouldBlock` transport error.
    pub async fn connect_async(&self, host: &str, port: u16) -> Result<(), TransportError> {
        loop {
            match self.inner.borrow_mut().connect(host, port) {
                Err(TransportError::WouldBlock) => yield_now().await,
                result => return result,
            }
        }
    }

    /// Sends data, yielding while the underlying transport reports
    /// `WouldBlock`.
    ///
    /// # Errors
    /// Propagates any non-`WouldBlock` transport error.
    pub async fn send_async(&self, data: &[u8]) -> Result<usize, TransportError> {
        loop {
            match self.inner.borrow_mut().send(data) {
                Err(TransportError::WouldBlock) => yield_now().await,
                result => return result,
            }
        }
    }

    /// Receives data, yielding while the underlying transport reports
    /// `WouldBlock`. A return of `Ok(0)` means "no data yet".
    ///
    /// # Errors
    /// Propagates any non-`WouldBlock` transport error.
    pub async fn receive_async(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        loop {
            match self.inner.borrow_mut().receive(buf) {
                Err(TransportError::WouldBlock) => yield_now().await,
                result => return result,
            }
        }
    }

    /// Returns true if the underlying transport is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.borrow().is_connected()
    }

    /// Disconnects the underlying transport.
    pub fn disconnect(&self) {
        self.inner.borrow_mut().disconnect();
    }

    /// Borrows the underlying transport.
    #[must_use]
    pub fn inner(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// Mutably borrows the underlying transport.
    #[must_use]
    pub fn inner_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    /// Consumes the adapter, returning the underlying transport.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corofix_coro::Task;

    /// Transport that reports `WouldBlock` a fixed number of times before
    /// succeeding.
    struct FlakyTransport {
        blocks_remaining: u32,
        attempts: u32,
        connected: bool,
    }

    impl FlakyTransport {
        fn new(blocks: u32) -> Self {
            Self {
                blocks_remaining: blocks,
                attempts: 0,
                connected: false,
            }
        }

        fn step(&mut self) -> Result<(), TransportError> {
            self.attempts += 1;
            if self.blocks_remaining > 0 {
                self.blocks_remaining -= 1;
                return Err(TransportError::WouldBlock);
            }
            Ok(())
        }
    }

    impl Transport for FlakyTransport {
        fn connect(&mut self, _host: &str, _port: u16) -> Result<(), TransportError> {
            self.step()?;
            self.connected = true;
            Ok(())
        }

        fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
            self.step()?;
            Ok(data.len())
        }

        fn receive(&mut self, _buf: &mut [u8]) -> Result<usize, TransportError> {
            self.step()?;
            Ok(4)
        }

        fn disconnect(&mut self) {
            self.connected = false;
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[test]
    fn test_connect_retries_through_would_block() {
        let transport = AsyncTransport::new(FlakyTransport::new(3));
        let result = Task::new(transport.connect_async("localhost", 1234)).get();

        assert!(result.is_ok());
        assert!(transport.is_connected());
        assert_eq!(transport.inner().attempts, 4);
    }

    #[test]
    fn test_send_retries_through_would_block() {
        let transport = AsyncTransport::new(FlakyTransport::new(2));
        let sent = Task::new(transport.send_async(b"data")).get();
        assert_eq!(sent.unwrap(), 4);
        assert_eq!(transport.inner().attempts, 3);
    }

    #[test]
    fn test_hard_error_is_returned_as_is() {
        struct RefusingTransport;
        impl Transport for RefusingTransport {
            fn connect(&mut self, _: &str, _: u16) -> Result<(), TransportError> {
                Err(TransportError::ConnectionRefused)
            }
            fn send(&mut self, _: &[u8]) -> Result<usize, TransportError> {
                Err(TransportError::NotConnected)
            }
            fn receive(&mut self, _: &mut [u8]) -> Result<usize, TransportError> {
                Err(TransportError::NotConnected)
            }
            fn disconnect(&mut self) {}
            fn is_connected(&self) -> bool {
                false
            }
        }

        let transport = AsyncTransport::new(RefusingTransport);
        let result = Task::new(transport.connect_async("localhost", 1234)).get();
        assert_eq!(result.unwrap_err(), TransportError::ConnectionRefused);
    }
}
