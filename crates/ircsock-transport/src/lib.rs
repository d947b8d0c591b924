//! Client-side IRC transport for ircsock.
//!
//! Provides [`Transport`], which owns one outbound stream socket and turns
//! it into a line-oriented channel:
//!
//! - **Lifecycle**: `connect` / `disconnect` / `reset` with a single
//!   connected flag as the source of truth.
//! - **Framing**: outbound lines get CR LF appended; inbound reads are split
//!   on CR LF ([`FramingMode`] decides what happens to a partial tail).
//! - **Keep-alive**: inbound `PING <token>` is answered with `PONG <token>`
//!   before the lines are returned.
//! - **Errors**: the closed [`TransportError`] taxonomy; raw socket errors
//!   never leak out unclassified.
//!
//! The byte stream itself sits behind the [`Socket`] trait so the state
//! machine can be driven by a scripted socket in tests.

#![allow(async_fn_in_trait)]

mod error;
mod framing;
mod socket;
mod transport;

pub use error::{Operation, TransportError};
pub use framing::{
    encode_line, pong_reply, FramingMode, LineFramer, LINE_TERMINATOR,
    MAX_PENDING_BYTES,
};
pub use socket::{Socket, TcpSocket};
pub use transport::{ConnectionState, Transport, TransportConfig, MAX_RECV_BYTES};

/// A [`Transport`] over TCP.
pub type TcpTransport = Transport<TcpSocket>;
