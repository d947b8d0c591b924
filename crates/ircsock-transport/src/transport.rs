//! The connection state machine.
//!
//! ```text
//!               connect() ok
//!  Unconnected ─────────────→ Connected
//!      ↑                          │
//!      └──────────────────────────┘
//!   disconnect() / reset() / peer closed / I/O failure
//! ```
//!
//! `connected` is the only source of truth. Every operation checks it
//! before touching the socket, and every path that loses the connection
//! clears it before reporting the error.

use std::io;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::framing::{encode_line, pong_reply, FramingMode, LineFramer};
use crate::{Operation, Socket, TransportError};

/// Largest number of bytes taken from the socket in one `receive`.
pub const MAX_RECV_BYTES: usize = 4096;

// ---------------------------------------------------------------------------
// TransportConfig
// ---------------------------------------------------------------------------

/// Timeouts and tracing behavior for a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Budget for establishing the connection. Default: 30 seconds.
    pub connect_timeout: Duration,

    /// Budget for each write while sending a line. Default: 180 seconds.
    pub send_timeout: Duration,

    /// Budget for a single read. Default: 180 seconds.
    pub recv_timeout: Duration,

    /// Emit debug traces for connection steps and every line sent or
    /// received. Warnings and errors are traced regardless.
    pub trace_io: bool,

    /// How inbound reads are cut into lines.
    pub framing: FramingMode,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            send_timeout: Duration::from_secs(180),
            recv_timeout: Duration::from_secs(180),
            trace_io: false,
            framing: FramingMode::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// Externally observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconnected => write!(f, "Unconnected"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// One outbound IRC connection: lifecycle, line framing, and automatic
/// `PING`/`PONG` handling.
///
/// Every operation takes `&mut self`, so calls on one transport are
/// serialized by construction. To share a transport between tasks, put it
/// behind a `tokio::sync::Mutex`.
pub struct Transport<S: Socket> {
    socket: S,
    connected: bool,
    config: TransportConfig,
    /// Last timeout pushed to `socket`.
    active_timeout: Option<Duration>,
    framer: LineFramer,
    recv_buf: Vec<u8>,
}

impl Transport<crate::TcpSocket> {
    /// Creates an unconnected transport over TCP.
    pub fn tcp(config: TransportConfig) -> Self {
        Self::new(crate::TcpSocket::new(), config)
    }
}

impl<S: Socket> Transport<S> {
    /// Wraps an unconnected socket.
    pub fn new(socket: S, config: TransportConfig) -> Self {
        let framer = LineFramer::new(config.framing);
        Self {
            socket,
            connected: false,
            config,
            active_timeout: None,
            framer,
            recv_buf: vec![0; MAX_RECV_BYTES],
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        if self.connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Unconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Borrows the underlying socket.
    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Connects to `host:port`.
    ///
    /// # Errors
    /// - [`TransportError::AlreadyConnected`] if a connection is open; the
    ///   socket is not touched at all in that case.
    /// - [`TransportError::Timeout`] if the connect budget elapses.
    /// - [`TransportError::ConnectFailed`] for resolution or refusal errors.
    pub async fn connect(
        &mut self,
        host: &str,
        port: u16,
    ) -> Result<(), TransportError> {
        if self.connected {
            return Err(TransportError::AlreadyConnected);
        }

        let limit = self.config.connect_timeout;
        self.apply_timeout(limit);
        if self.config.trace_io {
            debug!(host, port, timeout = ?limit, "connecting");
        }

        match self.socket.connect(host, port).await {
            Ok(()) => {
                self.connected = true;
                self.framer.clear();
                if self.config.trace_io {
                    debug!(host, port, "connection established");
                }
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                warn!(host, port, timeout = ?limit, "connect timed out");
                Err(TransportError::Timeout {
                    op: Operation::Connect,
                    after: limit,
                })
            }
            Err(e) => {
                error!(host, port, error = %e, "connect failed");
                Err(TransportError::ConnectFailed {
                    addr: format!("{host}:{port}"),
                    source: e,
                })
            }
        }
    }

    /// Closes the connection. Safe to call in any state; never fails.
    ///
    /// The state flips to unconnected before the socket is shut down, and
    /// the socket is closed even when the shutdown itself fails.
    pub async fn disconnect(&mut self) {
        let was_connected = std::mem::replace(&mut self.connected, false);
        if was_connected {
            if self.config.trace_io {
                debug!("shutting down the connection");
            }
            if let Err(e) = self.socket.shutdown().await {
                warn!(error = %e, "shutdown failed, closing anyway");
            }
        }
        self.socket.close();
        self.framer.clear();
    }

    /// Disconnects and swaps in a fresh socket, ready for a new
    /// [`connect`](Self::connect).
    pub async fn reset(&mut self) {
        self.disconnect().await;
        self.socket = self.socket.fresh();
        self.active_timeout = None;
    }

    /// Sends `text` as one line, appending CR LF.
    ///
    /// Blank input sends nothing and returns `Ok(0)`. Otherwise returns the
    /// number of bytes written, terminator included.
    ///
    /// # Errors
    /// - [`TransportError::NotConnected`] when unconnected.
    /// - [`TransportError::Timeout`] if a write stalls past the send
    ///   budget. The connection stays open; the line may be half-sent.
    /// - [`TransportError::ConnectionBroken`] if the socket accepts zero
    ///   bytes or fails. The transport is unconnected afterwards.
    pub async fn send(&mut self, text: &str) -> Result<usize, TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected { op: Operation::Send });
        }
        if text.trim().is_empty() {
            return Ok(0);
        }

        let bytes = encode_line(text);
        let limit = self.config.send_timeout;
        self.apply_timeout(limit);

        let mut sent = 0;
        while sent < bytes.len() {
            match self.socket.send(&bytes[sent..]).await {
                Ok(0) => {
                    return Err(self.broken(
                        Operation::Send,
                        "socket accepted zero bytes".to_string(),
                    ));
                }
                Ok(n) => sent += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Err(TransportError::Timeout {
                        op: Operation::Send,
                        after: limit,
                    });
                }
                Err(e) => return Err(self.broken(Operation::Send, e.to_string())),
            }
        }

        if self.config.trace_io {
            debug!(bytes = sent, text, ">> sent");
        }
        Ok(sent)
    }

    /// Performs one read and returns the lines it carried.
    ///
    /// Any line starting with `PING` is answered with the matching `PONG`
    /// before this returns. The lines are still handed back to the caller.
    ///
    /// # Errors
    /// - [`TransportError::NotConnected`] when unconnected.
    /// - [`TransportError::Timeout`] if nothing arrives within the receive
    ///   budget. The connection stays open.
    /// - [`TransportError::ConnectionBroken`] if the peer closed the stream
    ///   or the read failed. The transport is unconnected afterwards.
    /// - Any error from sending a `PONG`, unchanged.
    pub async fn receive(&mut self) -> Result<Vec<String>, TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected {
                op: Operation::Receive,
            });
        }

        let limit = self.config.recv_timeout;
        self.apply_timeout(limit);

        let n = loop {
            match self.socket.recv(&mut self.recv_buf).await {
                Ok(0) => {
                    return Err(self.broken(
                        Operation::Receive,
                        "peer closed the connection".to_string(),
                    ));
                }
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Err(TransportError::Timeout {
                        op: Operation::Receive,
                        after: limit,
                    });
                }
                Err(e) => {
                    return Err(self.broken(Operation::Receive, e.to_string()));
                }
            }
        };

        let lines = self.framer.push(&self.recv_buf[..n]);
        if self.config.trace_io {
            debug!(bytes = n, lines = lines.len(), "<< received");
            for line in &lines {
                debug!(line = %line, "<<");
            }
        }

        for line in &lines {
            if let Some(reply) = pong_reply(line) {
                self.send(&reply).await?;
            }
        }

        Ok(lines)
    }

    /// Pushes `timeout` to the socket unless it is already in effect.
    fn apply_timeout(&mut self, timeout: Duration) {
        if self.active_timeout != Some(timeout) {
            if self.config.trace_io {
                debug!(?timeout, "socket timeout changed");
            }
            self.socket.set_timeout(timeout);
            self.active_timeout = Some(timeout);
        }
    }

    /// Marks the connection dead without a graceful shutdown.
    fn broken(&mut self, op: Operation, reason: String) -> TransportError {
        self.connected = false;
        self.socket.close();
        self.framer.clear();
        error!(%op, %reason, "connection broken");
        TransportError::ConnectionBroken { op, reason }
    }
}

impl<S: Socket> Drop for Transport<S> {
    fn drop(&mut self) {
        self.socket.close();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    // =====================================================================
    // Scripted socket
    // =====================================================================

    enum Write {
        /// Accept at most this many bytes.
        Accept(usize),
        Fail(io::ErrorKind),
    }

    #[derive(Default)]
    struct Script {
        connects: VecDeque<io::Result<()>>,
        reads: VecDeque<io::Result<Vec<u8>>>,
        writes: VecDeque<Write>,
        shutdown_fails: bool,
        wire: Vec<u8>,
        timeouts: Vec<Duration>,
        connect_calls: usize,
        send_calls: usize,
        recv_calls: usize,
        shutdown_calls: usize,
        close_calls: usize,
        fresh_calls: usize,
    }

    /// A fake socket driven by a shared [`Script`]. Clones share state, so
    /// tests keep a handle while the transport owns the socket.
    #[derive(Clone, Default)]
    struct ScriptedSocket(Arc<Mutex<Script>>);

    impl ScriptedSocket {
        fn script(&self) -> std::sync::MutexGuard<'_, Script> {
            self.0.lock().unwrap()
        }

        fn wire(&self) -> String {
            String::from_utf8(self.script().wire.clone()).unwrap()
        }

        fn touches(&self) -> usize {
            let s = self.script();
            s.timeouts.len()
                + s.connect_calls
                + s.send_calls
                + s.recv_calls
                + s.shutdown_calls
        }
    }

    impl Socket for ScriptedSocket {
        async fn connect(&mut self, _host: &str, _port: u16) -> io::Result<()> {
            let mut s = self.script();
            s.connect_calls += 1;
            s.connects.pop_front().unwrap_or(Ok(()))
        }

        fn set_timeout(&mut self, timeout: Duration) {
            self.script().timeouts.push(timeout);
        }

        async fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut s = self.script();
            s.send_calls += 1;
            let n = match s.writes.pop_front() {
                Some(Write::Accept(max)) => max.min(buf.len()),
                Some(Write::Fail(kind)) => return Err(kind.into()),
                None => buf.len(),
            };
            s.wire.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        async fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let mut s = self.script();
            s.recv_calls += 1;
            match s.reads.pop_front() {
                Some(Ok(data)) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                Some(Err(e)) => Err(e),
                None => Ok(0),
            }
        }

        async fn shutdown(&mut self) -> io::Result<()> {
            let mut s = self.script();
            s.shutdown_calls += 1;
            if s.shutdown_fails {
                Err(io::ErrorKind::NotConnected.into())
            } else {
                Ok(())
            }
        }

        fn close(&mut self) {
            self.script().close_calls += 1;
        }

        fn fresh(&self) -> Self {
            self.script().fresh_calls += 1;
            self.clone()
        }
    }

    // =====================================================================
    // Helpers
    // =====================================================================

    fn config() -> TransportConfig {
        TransportConfig {
            connect_timeout: Duration::from_secs(5),
            send_timeout: Duration::from_secs(7),
            recv_timeout: Duration::from_secs(9),
            trace_io: true,
            framing: FramingMode::PerRead,
        }
    }

    fn transport() -> (Transport<ScriptedSocket>, ScriptedSocket) {
        let socket = ScriptedSocket::default();
        (Transport::new(socket.clone(), config()), socket)
    }

    async fn connected() -> (Transport<ScriptedSocket>, ScriptedSocket) {
        let (mut t, socket) = transport();
        t.connect("irc.example.net", 6667).await.unwrap();
        (t, socket)
    }

    // =====================================================================
    // connect
    // =====================================================================

    #[tokio::test]
    async fn test_connect_transitions_to_connected() {
        let (mut t, socket) = transport();
        assert_eq!(t.state(), ConnectionState::Unconnected);

        t.connect("irc.example.net", 6667).await.unwrap();

        assert_eq!(t.state(), ConnectionState::Connected);
        assert_eq!(socket.script().timeouts, vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn test_connect_twice_fails_without_touching_socket() {
        let (mut t, socket) = connected().await;
        let before = socket.touches();

        let err = t.connect("irc.example.net", 6667).await.unwrap_err();

        assert!(matches!(err, TransportError::AlreadyConnected));
        assert_eq!(socket.touches(), before);
        assert!(t.is_connected());
    }

    #[tokio::test]
    async fn test_connect_refused_is_connect_failed() {
        let (mut t, socket) = transport();
        socket
            .script()
            .connects
            .push_back(Err(io::ErrorKind::ConnectionRefused.into()));

        let err = t.connect("irc.example.net", 6667).await.unwrap_err();

        match err {
            TransportError::ConnectFailed { addr, source } => {
                assert_eq!(addr, "irc.example.net:6667");
                assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
            }
            other => panic!("expected ConnectFailed, got {other:?}"),
        }
        assert_eq!(t.state(), ConnectionState::Unconnected);
    }

    #[tokio::test]
    async fn test_connect_timeout_is_timeout() {
        let (mut t, socket) = transport();
        socket
            .script()
            .connects
            .push_back(Err(io::ErrorKind::TimedOut.into()));

        let err = t.connect("irc.example.net", 6667).await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::Timeout { op: Operation::Connect, after }
                if after == Duration::from_secs(5)
        ));
        assert!(!t.is_connected());
    }

    // =====================================================================
    // Unconnected guards
    // =====================================================================

    #[tokio::test]
    async fn test_send_and_receive_require_connection() {
        let (mut t, socket) = transport();

        let err = t.send("NICK bob").await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::NotConnected { op: Operation::Send }
        ));

        let err = t.receive().await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::NotConnected { op: Operation::Receive }
        ));

        assert_eq!(socket.touches(), 0);
    }

    // =====================================================================
    // send
    // =====================================================================

    #[tokio::test]
    async fn test_send_appends_crlf_in_call_order() {
        let (mut t, socket) = connected().await;

        assert_eq!(t.send("NICK bob").await.unwrap(), 10);
        t.send("USER bob 0 * :Bob").await.unwrap();

        assert_eq!(socket.wire(), "NICK bob\r\nUSER bob 0 * :Bob\r\n");
    }

    #[tokio::test]
    async fn test_send_blank_text_writes_nothing() {
        let (mut t, socket) = connected().await;

        assert_eq!(t.send("").await.unwrap(), 0);
        assert_eq!(t.send("  ").await.unwrap(), 0);

        assert_eq!(socket.wire(), "");
        assert_eq!(socket.script().send_calls, 0);
    }

    #[tokio::test]
    async fn test_send_loops_over_partial_writes() {
        let (mut t, socket) = connected().await;
        {
            let mut s = socket.script();
            s.writes.push_back(Write::Accept(3));
            s.writes.push_back(Write::Accept(2));
        }

        assert_eq!(t.send("PRIVMSG #rust :hi").await.unwrap(), 19);

        assert_eq!(socket.wire(), "PRIVMSG #rust :hi\r\n");
        assert_eq!(socket.script().send_calls, 3);
    }

    #[tokio::test]
    async fn test_send_zero_bytes_accepted_breaks_connection() {
        let (mut t, socket) = connected().await;
        socket.script().writes.push_back(Write::Accept(0));

        let err = t.send("NICK bob").await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::ConnectionBroken { op: Operation::Send, .. }
        ));
        assert_eq!(t.state(), ConnectionState::Unconnected);
        let s = socket.script();
        assert_eq!(s.shutdown_calls, 0);
        assert_eq!(s.close_calls, 1);
    }

    #[tokio::test]
    async fn test_send_io_error_breaks_connection() {
        let (mut t, socket) = connected().await;
        socket
            .script()
            .writes
            .push_back(Write::Fail(io::ErrorKind::BrokenPipe));

        let err = t.send("NICK bob").await.unwrap_err();

        assert!(matches!(err, TransportError::ConnectionBroken { .. }));
        assert!(!t.is_connected());
    }

    #[tokio::test]
    async fn test_send_timeout_keeps_connection() {
        let (mut t, socket) = connected().await;
        socket
            .script()
            .writes
            .push_back(Write::Fail(io::ErrorKind::TimedOut));

        let err = t.send("NICK bob").await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::Timeout { op: Operation::Send, .. }
        ));
        assert!(t.is_connected());
    }

    // =====================================================================
    // receive
    // =====================================================================

    #[tokio::test]
    async fn test_receive_splits_lines() {
        let (mut t, socket) = connected().await;
        socket
            .script()
            .reads
            .push_back(Ok(b"LINE1\r\nLINE2\r\n".to_vec()));

        assert_eq!(t.receive().await.unwrap(), vec!["LINE1", "LINE2"]);
    }

    #[tokio::test]
    async fn test_receive_answers_ping() {
        let (mut t, socket) = connected().await;
        socket
            .script()
            .reads
            .push_back(Ok(b"PING :server123\r\n".to_vec()));

        let lines = t.receive().await.unwrap();

        assert_eq!(lines, vec!["PING :server123"]);
        assert_eq!(socket.wire(), "PONG :server123\r\n");
        assert_eq!(socket.script().send_calls, 1);
    }

    #[tokio::test]
    async fn test_receive_answers_every_ping_in_order() {
        let (mut t, socket) = connected().await;
        let read = b"PING :one\r\n:srv NOTICE * :hi\r\nPING :two\r\n";
        socket.script().reads.push_back(Ok(read.to_vec()));

        let lines = t.receive().await.unwrap();

        assert_eq!(lines, vec!["PING :one", ":srv NOTICE * :hi", "PING :two"]);
        assert_eq!(socket.wire(), "PONG :one\r\nPONG :two\r\n");
        assert_eq!(socket.script().send_calls, 2);
    }

    #[tokio::test]
    async fn test_receive_retries_interrupted_read() {
        let (mut t, socket) = connected().await;
        {
            let mut s = socket.script();
            s.reads.push_back(Err(io::ErrorKind::Interrupted.into()));
            s.reads.push_back(Ok(b":srv 001 bob :Welcome\r\n".to_vec()));
        }

        let lines = t.receive().await.unwrap();

        assert_eq!(lines, vec![":srv 001 bob :Welcome"]);
        assert!(t.is_connected());
        assert_eq!(socket.script().recv_calls, 2);
    }

    #[tokio::test]
    async fn test_receive_zero_bytes_breaks_then_not_connected() {
        let (mut t, socket) = connected().await;
        socket.script().reads.push_back(Ok(Vec::new()));

        let err = t.receive().await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::ConnectionBroken { op: Operation::Receive, .. }
        ));
        assert_eq!(t.state(), ConnectionState::Unconnected);

        let err = t.receive().await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected { .. }));
    }

    #[tokio::test]
    async fn test_receive_timeout_keeps_connection() {
        let (mut t, socket) = connected().await;
        socket
            .script()
            .reads
            .push_back(Err(io::ErrorKind::TimedOut.into()));

        let err = t.receive().await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::Timeout { op: Operation::Receive, after }
                if after == Duration::from_secs(9)
        ));
        assert!(t.is_connected());
    }

    #[tokio::test]
    async fn test_receive_io_error_breaks_connection() {
        let (mut t, socket) = connected().await;
        socket
            .script()
            .reads
            .push_back(Err(io::ErrorKind::ConnectionReset.into()));

        let err = t.receive().await.unwrap_err();

        assert!(matches!(err, TransportError::ConnectionBroken { .. }));
        assert!(!t.is_connected());
    }

    #[tokio::test]
    async fn test_failed_pong_propagates_from_receive() {
        let (mut t, socket) = connected().await;
        {
            let mut s = socket.script();
            s.reads.push_back(Ok(b"PING :abc\r\n".to_vec()));
            s.writes.push_back(Write::Accept(0));
        }

        let err = t.receive().await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::ConnectionBroken { op: Operation::Send, .. }
        ));
        assert!(!t.is_connected());
    }

    #[tokio::test]
    async fn test_receive_reassembles_across_reads() {
        let socket = ScriptedSocket::default();
        let mut t = Transport::new(
            socket.clone(),
            TransportConfig {
                framing: FramingMode::Reassemble,
                ..config()
            },
        );
        t.connect("irc.example.net", 6667).await.unwrap();
        {
            let mut s = socket.script();
            s.reads.push_back(Ok(b":srv 001 bob :Welcome\r\nPI".to_vec()));
            s.reads.push_back(Ok(b"NG :tok\r\n".to_vec()));
        }

        assert_eq!(t.receive().await.unwrap(), vec![":srv 001 bob :Welcome"]);
        assert_eq!(socket.wire(), "");
        assert_eq!(t.receive().await.unwrap(), vec!["PING :tok"]);
        assert_eq!(socket.wire(), "PONG :tok\r\n");
    }

    // =====================================================================
    // Timeout caching
    // =====================================================================

    #[tokio::test]
    async fn test_timeout_applied_only_when_changed() {
        let (mut t, socket) = connected().await;
        {
            let mut s = socket.script();
            s.reads.push_back(Ok(b"A\r\n".to_vec()));
            s.reads.push_back(Ok(b"B\r\n".to_vec()));
        }

        t.send("ONE").await.unwrap();
        t.send("TWO").await.unwrap();
        t.receive().await.unwrap();
        t.receive().await.unwrap();
        t.send("THREE").await.unwrap();

        let secs: Vec<u64> = socket
            .script()
            .timeouts
            .iter()
            .map(Duration::as_secs)
            .collect();
        assert_eq!(secs, vec![5, 7, 9, 7]);
    }

    // =====================================================================
    // disconnect / reset
    // =====================================================================

    #[tokio::test]
    async fn test_disconnect_swallows_shutdown_failure_and_closes() {
        let (mut t, socket) = connected().await;
        socket.script().shutdown_fails = true;

        t.disconnect().await;

        assert_eq!(t.state(), ConnectionState::Unconnected);
        let s = socket.script();
        assert_eq!(s.shutdown_calls, 1);
        assert_eq!(s.close_calls, 1);
    }

    #[tokio::test]
    async fn test_disconnect_when_unconnected_skips_shutdown() {
        let (mut t, socket) = transport();

        t.disconnect().await;
        t.disconnect().await;

        assert_eq!(socket.script().shutdown_calls, 0);
        assert!(!t.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_reset_connect_round_trip() {
        let (mut t, socket) = connected().await;

        t.disconnect().await;
        t.reset().await;
        t.connect("irc.example.net", 6667).await.unwrap();

        assert_eq!(t.state(), ConnectionState::Connected);
        let s = socket.script();
        assert_eq!(s.fresh_calls, 1);
        assert_eq!(s.connect_calls, 2);
        // The fresh socket gets the connect timeout again.
        assert_eq!(
            s.timeouts,
            vec![Duration::from_secs(5), Duration::from_secs(5)]
        );
    }
}
