/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! TCP transport over a non-blocking `std::net::TcpStream`.

use crate::Transport;
use corofix_core::error::TransportError;
use std::io::{Read, Write};
use std::net::TcpStream;
use tracing::debug;

/// TCP implementation of the [`Transport`] contract.
///
/// The stream is switched to non-blocking mode right after connecting and
/// Nagle's algorithm is disabled; `receive` maps the socket's `WouldBlock`
/// onto the contract's "no data yet" zero return.
#[derive(Debug, Default)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Creates a disconnected TCP transport.
    #[must_use]
    pub fn new() -> Self {
        Self { stream: None }
    }

    /// Returns the local address of the connected stream, if any.
    #[must_use]
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.stream.as_ref().and_then(|s| s.local_addr().ok())
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TransportError> {
        let stream = TcpStream::connect((host, port)).map_err(TransportError::from)?;
        stream.set_nonblocking(true).map_err(TransportError::from)?;
        stream.set_nodelay(true).map_err(TransportError::from)?;

        debug!(host, port, "tcp transport connected");
        self.stream = Some(stream);
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        stream.write(data).map_err(TransportError::from)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        match stream.read(buf) {
            // A zero read on TCP is the peer's FIN.
            Ok(0) => Err(TransportError::ConnectionClosed),
            Ok(n) => Ok(n),
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => Ok(0),
            Err(err) => Err(TransportError::from(err)),
        }
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
            debug!("tcp transport disconnected");
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_errors() {
        let mut transport = TcpTransport::new();
        assert!(!transport.is_connected());

        assert_eq!(
            transport.send(b"data").unwrap_err(),
            TransportError::NotConnected
        );

        let mut buf = [0u8; 16];
        assert_eq!(
            transport.receive(&mut buf).unwrap_err(),
            TransportError::NotConnected
        );
    }

    #[test]
    fn test_connect_refused_maps_error() {
        let mut transport = TcpTransport::new();
        // Port 1 on localhost is closed in practice; accept any hard failure.
        let result = transport.connect("127.0.0.1", 1);
        assert!(result.is_err());
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_loopback_send_receive() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut transport = TcpTransport::new();
        transport.connect("127.0.0.1", addr.port()).unwrap();
        assert!(transport.is_connected());

        let (mut server_side, _) = listener.accept().unwrap();
        let sent = transport.send(b"8=FIX.4.4\x01").unwrap();
        assert_eq!(sent, 10);

        let mut server_buf = [0u8; 16];
        let n = server_side.read(&mut server_buf).unwrap();
        assert_eq!(&server_buf[..n], b"8=FIX.4.4\x01");

        // Nothing queued for us yet: "no data yet".
        let mut buf = [0u8; 16];
        assert_eq!(transport.receive(&mut buf).unwrap(), 0);

        server_side.write_all(b"pong").unwrap();
        // Give the loopback a moment to deliver.
        let mut received = 0;
        for _ in 0..100 {
            received = transport.receive(&mut buf).unwrap();
            if received > 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(&buf[..received], b"pong");

        transport.disconnect();
        assert!(!transport.is_connected());
    }
}
