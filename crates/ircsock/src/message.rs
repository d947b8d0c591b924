//! Formatting helpers for the handful of commands a client sends.
//!
//! These only build text; pass the result to
//! [`Transport::send`](ircsock_transport::Transport::send), which adds the
//! line terminator.

pub fn pass(password: &str) -> String {
    format!("PASS {password}")
}

pub fn nick(nickname: &str) -> String {
    format!("NICK {nickname}")
}

/// `USER` with the realname as a trailing parameter, so it may contain
/// spaces.
pub fn user(username: &str, realname: &str) -> String {
    format!("USER {username} 0 * :{realname}")
}

pub fn join(channel: &str) -> String {
    format!("JOIN {channel}")
}

pub fn privmsg(target: &str, text: &str) -> String {
    format!("PRIVMSG {target} :{text}")
}

pub fn quit(reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("QUIT :{reason}"),
        None => "QUIT".to_string(),
    }
}

pub fn nickserv_identify(password: &str) -> String {
    privmsg("NickServ", &format!("IDENTIFY {password}"))
}

/// Returns the command (or numeric) of a raw line, skipping any
/// `:prefix`.
pub fn command(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    if first.starts_with(':') {
        parts.next()
    } else {
        Some(first)
    }
}

/// `true` for the `001` welcome numeric that ends registration.
pub fn is_welcome(line: &str) -> bool {
    command(line) == Some("001")
}
