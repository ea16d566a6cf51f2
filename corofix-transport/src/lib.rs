/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # Corofix Transport
//!
//! Network transport layer for the corofix session engine.
//!
//! This crate provides:
//! - **[`Transport`]**: The non-blocking transport contract; `WouldBlock`
//!   is a retry signal, a zero-byte receive means "no data yet"
//! - **[`TcpTransport`]**: TCP implementation over a non-blocking
//!   `std::net::TcpStream`
//! - **[`AsyncTransport`]**: Adapter that converts `WouldBlock` results into
//!   cooperative yields so no operation ever blocks the OS thread

pub mod adapter;
pub mod tcp;

use corofix_core::error::TransportError;

pub use adapter::AsyncTransport;
pub use tcp::TcpTransport;

/// Non-blocking transport contract.
///
/// Implementations must never block: an operation that cannot make progress
/// returns [`TransportError::WouldBlock`] (or `Ok(0)` from `receive`, which
/// means "no data yet"). The async adapter turns `WouldBlock` into a
/// cooperative yield and retries.
pub trait Transport {
    /// Establishes a connection to the remote endpoint.
    ///
    /// # Errors
    /// Returns a `TransportError` if the connection cannot be established.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TransportError>;

    /// Sends data, returning the number of bytes written.
    ///
    /// # Errors
    /// Returns `WouldBlock` if the socket cannot accept data right now.
    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Receives data into the buffer, returning the number of bytes read.
    /// A return of `Ok(0)` means "no data yet", not end-of-stream.
    ///
    /// # Errors
    /// Returns `ConnectionClosed` when the peer has shut the stream down.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Closes the connection.
    fn disconnect(&mut self);

    /// Returns true if a connection is established.
    fn is_connected(&self) -> bool;
}
