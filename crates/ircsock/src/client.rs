//! A small client driver: register, pump lines, reconnect.
//!
//! The flow for one connection is:
//!   1. Connect the transport
//!   2. Register: `PASS` (if any) → `NICK` → `USER`
//!   3. Loop: receive lines, hand each to the caller
//!   4. On the `001` welcome: identify with NickServ, join autojoin channels
//!
//! [`Client::serve`] wraps that in a reconnect loop driven by a
//! [`ReconnectPolicy`].

use std::ops::ControlFlow;

use ircsock_config::ClientConfig;
use ircsock_transport::{Socket, Transport, TransportError};
use tracing::{debug, info, warn};

use crate::{message, IrcsockError, ReconnectPolicy};

/// What the client registers as and does once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    /// Sent as `PASS` before `NICK`/`USER`.
    pub server_password: Option<String>,
    /// Sent to NickServ after the welcome numeric.
    pub nickserv_password: Option<String>,
    /// Joined after the welcome numeric.
    pub autojoin: Vec<String>,
}

impl Registration {
    /// A registration using `nickname` for every identity field.
    pub fn new(nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        Self {
            username: nickname.clone(),
            realname: nickname.clone(),
            nickname,
            server_password: None,
            nickserv_password: None,
            autojoin: Vec::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            nickname: config.identity.nickname.clone(),
            username: config.username().to_string(),
            realname: config.realname().to_string(),
            server_password: non_empty(&config.connection.server_password),
            nickserv_password: non_empty(&config.identity.nickserv_password),
            autojoin: config.connection.autojoin_channels.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Drives one [`Transport`] through registration and the receive loop.
pub struct Client<S: Socket> {
    transport: Transport<S>,
    registration: Registration,
}

impl<S: Socket> Client<S> {
    pub fn new(transport: Transport<S>, registration: Registration) -> Self {
        Self {
            transport,
            registration,
        }
    }

    pub fn transport(&self) -> &Transport<S> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport<S> {
        &mut self.transport
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    /// Connects and registers.
    pub async fn connect(
        &mut self,
        host: &str,
        port: u16,
    ) -> Result<(), IrcsockError> {
        self.transport.connect(host, port).await?;
        info!(host, port, nickname = %self.registration.nickname, "connected");
        self.register().await
    }

    /// Sends the registration commands, password first.
    pub async fn register(&mut self) -> Result<(), IrcsockError> {
        let reg = &self.registration;
        if let Some(password) = &reg.server_password {
            self.transport.send(&message::pass(password)).await?;
        }
        self.transport.send(&message::nick(&reg.nickname)).await?;
        self.transport
            .send(&message::user(&reg.username, &reg.realname))
            .await?;
        Ok(())
    }

    /// Sends one raw line.
    pub async fn send(&mut self, line: &str) -> Result<(), IrcsockError> {
        self.transport.send(line).await?;
        Ok(())
    }

    /// Receives until the connection ends or `on_line` breaks.
    ///
    /// Receive timeouts are treated as an idle connection and the loop
    /// keeps waiting. When `on_line` returns [`ControlFlow::Break`] the
    /// client sends `QUIT`, disconnects, and returns `Ok(())`.
    ///
    /// # Errors
    /// The transport error that ended the connection, typically
    /// [`TransportError::ConnectionBroken`].
    pub async fn run<F>(&mut self, mut on_line: F) -> Result<(), IrcsockError>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        loop {
            let lines = match self.transport.receive().await {
                Ok(lines) => lines,
                Err(TransportError::Timeout { after, .. }) => {
                    debug!(?after, "no traffic, still waiting");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            for line in &lines {
                if message::is_welcome(line) {
                    self.on_welcome().await?;
                }
                if on_line(line).is_break() {
                    self.quit(None).await;
                    return Ok(());
                }
            }
        }
    }

    /// Connects, registers, and runs, reconnecting per `policy` whenever
    /// the connection is lost or cannot be established.
    ///
    /// Returns `Ok(())` once `on_line` breaks.
    ///
    /// # Errors
    /// The last error once the policy gives up, or any error reconnecting
    /// cannot fix.
    pub async fn serve<F>(
        &mut self,
        host: &str,
        port: u16,
        policy: &ReconnectPolicy,
        mut on_line: F,
    ) -> Result<(), IrcsockError>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let mut attempt = 0;
        loop {
            let outcome = match self.connect(host, port).await {
                Ok(()) => {
                    attempt = 0;
                    self.run(&mut on_line).await
                }
                Err(e) => Err(e),
            };

            let err = match outcome {
                Ok(()) => return Ok(()),
                Err(e) if e.is_recoverable() => e,
                Err(e) => return Err(e),
            };

            attempt += 1;
            let Some(delay) = policy.delay_for(attempt) else {
                warn!(attempt, error = %err, "giving up on reconnecting");
                return Err(err);
            };
            warn!(attempt, ?delay, error = %err, "connection lost, reconnecting");
            self.transport.reset().await;
            tokio::time::sleep(delay).await;
        }
    }

    /// Sends `QUIT` if connected, then disconnects. Never fails; a `QUIT`
    /// that cannot be sent is only logged.
    pub async fn quit(&mut self, reason: Option<&str>) {
        if self.transport.is_connected() {
            if let Err(e) = self.transport.send(&message::quit(reason)).await {
                warn!(error = %e, "failed to send QUIT");
            }
        }
        self.transport.disconnect().await;
    }

    async fn on_welcome(&mut self) -> Result<(), IrcsockError> {
        info!(nickname = %self.registration.nickname, "registered");
        if let Some(password) = &self.registration.nickserv_password {
            self.transport
                .send(&message::nickserv_identify(password))
                .await?;
        }
        for channel in &self.registration.autojoin {
            self.transport.send(&message::join(channel)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_new_uses_nickname_everywhere() {
        let reg = Registration::new("bob");
        assert_eq!(reg.username, "bob");
        assert_eq!(reg.realname, "bob");
        assert!(reg.server_password.is_none());
        assert!(reg.autojoin.is_empty());
    }

    #[test]
    fn test_registration_from_config() {
        let mut config = ClientConfig::default();
        config.identity.nickname = "bob".into();
        config.identity.realname = "Bob Builder".into();
        config.identity.nickserv_password = "pw".into();
        config.connection.autojoin_channels = vec!["#rust".into()];

        let reg = Registration::from_config(&config);

        assert_eq!(reg.nickname, "bob");
        assert_eq!(reg.username, "bob");
        assert_eq!(reg.realname, "Bob Builder");
        assert_eq!(reg.server_password, None);
        assert_eq!(reg.nickserv_password.as_deref(), Some("pw"));
        assert_eq!(reg.autojoin, vec!["#rust"]);
    }
}
