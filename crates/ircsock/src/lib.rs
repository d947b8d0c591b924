//! # ircsock
//!
//! Client-side plumbing for IRC over a plain TCP stream.
//!
//! The heart of the crate is [`Transport`](ircsock_transport::Transport):
//! one connection, CR LF line framing, automatic `PING`/`PONG`, and a closed
//! error taxonomy. Around it sit a persisted [`ClientConfig`], logging
//! setup, command formatting helpers, and a [`Client`] that registers and
//! pumps lines with optional auto-reconnect.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::ops::ControlFlow;
//!
//! use ircsock::prelude::*;
//!
//! # async fn demo() -> Result<(), IrcsockError> {
//! let transport = TcpTransport::tcp(TransportConfig::default());
//! let mut client = Client::new(transport, Registration::new("bob"));
//! client.connect("irc.libera.chat", 6667).await?;
//! client
//!     .run(|line| {
//!         println!("{line}");
//!         ControlFlow::Continue(())
//!     })
//!     .await
//! # }
//! ```
//!
//! ```text
//! ircsock-config (ClientConfig) ──→ Client ──→ Transport ──→ Socket (TCP)
//! ```

mod client;
mod error;
pub mod logging;
pub mod message;
mod reconnect;

pub use client::{Client, Registration};
pub use error::IrcsockError;
pub use reconnect::ReconnectPolicy;

pub use ircsock_config as config;
pub use ircsock_transport as transport;

pub mod prelude {
    pub use crate::logging::{LogSettings, Severity};
    pub use crate::{Client, IrcsockError, ReconnectPolicy, Registration};
    pub use ircsock_config::{
        ClientConfig, ConfigError, FileProblem, LoadOutcome,
    };
    pub use ircsock_transport::{
        ConnectionState, FramingMode, Operation, Socket, TcpSocket,
        TcpTransport, Transport, TransportConfig, TransportError,
    };
}
