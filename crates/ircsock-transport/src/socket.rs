//! The byte-stream seam under [`Transport`](crate::Transport).
//!
//! [`Socket`] only moves bytes and reports raw
//! `std::io` outcomes. All state tracking and error classification lives in
//! the transport, so a scripted socket is enough to exercise every branch
//! in tests.

use std::io;
use std::time::Duration;

/// A single outbound stream socket.
///
/// Implementations report an elapsed timeout as
/// [`io::ErrorKind::TimedOut`]; the transport relies on that kind to tell
/// a slow peer apart from a dead one.
pub trait Socket: Send + 'static {
    /// Opens the connection to `host:port`.
    async fn connect(&mut self, host: &str, port: u16) -> io::Result<()>;

    /// Sets the budget for each subsequent connect/send/recv call.
    fn set_timeout(&mut self, timeout: Duration);

    /// Writes some prefix of `buf`, returning how many bytes were accepted.
    async fn send(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Reads into `buf`, returning how many bytes arrived. `Ok(0)` means
    /// the peer closed the stream.
    async fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Gracefully shuts the stream down.
    async fn shutdown(&mut self) -> io::Result<()>;

    /// Releases the underlying resource. Must be safe to call repeatedly.
    fn close(&mut self);

    /// Returns a new, unconnected socket of the same kind.
    fn fresh(&self) -> Self
    where
        Self: Sized;
}

pub use tcp::TcpSocket;

mod tcp {
    use super::*;

    use std::future::Future;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    /// A [`Socket`] over `tokio::net::TcpStream`.
    ///
    /// Timeouts are enforced per call with `tokio::time::timeout`.
    #[derive(Debug, Default)]
    pub struct TcpSocket {
        stream: Option<TcpStream>,
        timeout: Option<Duration>,
    }

    impl TcpSocket {
        pub fn new() -> Self {
            Self::default()
        }

        /// Local address of the open stream, if any.
        pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
            self.stream.as_ref().and_then(|s| s.local_addr().ok())
        }
    }

    impl Socket for TcpSocket {
        async fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
            let stream =
                within(self.timeout, TcpStream::connect((host, port))).await?;
            self.stream = Some(stream);
            Ok(())
        }

        fn set_timeout(&mut self, timeout: Duration) {
            self.timeout = Some(timeout);
        }

        async fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
            let stream = self.stream.as_mut().ok_or_else(not_open)?;
            within(self.timeout, stream.write(buf)).await
        }

        async fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let stream = self.stream.as_mut().ok_or_else(not_open)?;
            within(self.timeout, stream.read(buf)).await
        }

        async fn shutdown(&mut self) -> io::Result<()> {
            match self.stream.as_mut() {
                Some(stream) => stream.shutdown().await,
                None => Ok(()),
            }
        }

        fn close(&mut self) {
            // Dropping the stream closes the file descriptor.
            self.stream = None;
        }

        fn fresh(&self) -> Self {
            Self::new()
        }
    }

    async fn within<T>(
        limit: Option<Duration>,
        fut: impl Future<Output = io::Result<T>>,
    ) -> io::Result<T> {
        match limit {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no progress within {limit:?}"),
                )),
            },
            None => fut.await,
        }
    }

    fn not_open() -> io::Error {
        io::Error::new(io::ErrorKind::NotConnected, "socket is not open")
    }
}
