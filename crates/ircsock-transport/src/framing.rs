//! Line framing: bytes on the wire ↔ terminator-free lines.
//!
//! IRC is purely terminator-based. Outbound text gets CR LF appended;
//! inbound reads are split on CR LF. A single read is not guaranteed to end
//! on a line boundary, so [`FramingMode`] chooses between trusting each read
//! as a complete batch of lines or holding back an unterminated tail until
//! the next read completes it.

use tracing::warn;

/// The protocol's canonical line terminator.
pub const LINE_TERMINATOR: &str = "\r\n";

const TERMINATOR_BYTES: &[u8] = LINE_TERMINATOR.as_bytes();

/// Most bytes reassembly holds back waiting for a terminator. A longer
/// unterminated run is flushed as a line of its own.
pub const MAX_PENDING_BYTES: usize = 4096;

/// How inbound reads are cut into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingMode {
    /// Every read stands alone: strip one trailing CR LF if present, then
    /// split on CR LF. A partial line at the end of a read is returned as
    /// if it were complete.
    #[default]
    PerRead,
    /// Unterminated trailing bytes are buffered and prepended to the next
    /// read, so only complete lines are ever returned.
    Reassemble,
}

/// Encodes `text` as one wire line (UTF-8 with CR LF appended).
pub fn encode_line(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + TERMINATOR_BYTES.len());
    bytes.extend_from_slice(text.as_bytes());
    bytes.extend_from_slice(TERMINATOR_BYTES);
    bytes
}

/// Splits inbound bytes into lines according to a [`FramingMode`].
#[derive(Debug, Default)]
pub struct LineFramer {
    mode: FramingMode,
    /// Unterminated bytes carried over from the previous read
    /// (reassembly mode only).
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new(mode: FramingMode) -> Self {
        Self {
            mode,
            pending: Vec::new(),
        }
    }

    pub fn mode(&self) -> FramingMode {
        self.mode
    }

    /// Number of bytes held back waiting for a terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drops any buffered partial line.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Feeds one read's worth of bytes and returns the lines it produced,
    /// in wire order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        match self.mode {
            FramingMode::PerRead => split_read(bytes),
            FramingMode::Reassemble => self.reassemble(bytes),
        }
    }

    fn reassemble(&mut self, bytes: &[u8]) -> Vec<String> {
        // A terminator can straddle the old tail and the new bytes.
        let mut search_from = self
            .pending
            .len()
            .saturating_sub(TERMINATOR_BYTES.len() - 1);
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = find_terminator(&self.pending[search_from..]) {
            let end = search_from + offset;
            lines.push(decode(&self.pending[start..end]));
            start = end + TERMINATOR_BYTES.len();
            search_from = start;
        }
        self.pending.drain(..start);

        if self.pending.len() > MAX_PENDING_BYTES {
            // Keep a trailing CR; its LF may be in the next read.
            let held = usize::from(self.pending.ends_with(b"\r"));
            let cut = self.pending.len() - held;
            warn!(
                bytes = cut,
                limit = MAX_PENDING_BYTES,
                "unterminated line over limit, flushing"
            );
            lines.push(decode(&self.pending[..cut]));
            self.pending.drain(..cut);
        }
        lines
    }
}

fn split_read(bytes: &[u8]) -> Vec<String> {
    let text = decode(bytes);
    let body = text.strip_suffix(LINE_TERMINATOR).unwrap_or(&text);
    body.split(LINE_TERMINATOR).map(str::to_owned).collect()
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(TERMINATOR_BYTES.len())
        .position(|window| window == TERMINATOR_BYTES)
}

// Invalid UTF-8 becomes U+FFFD.
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Builds the reply to a server `PING`.
///
/// Returns `Some("PONG <token>")` when `line` starts with `PING`, where
/// `<token>` is the first whitespace-delimited argument after the command.
/// A bare `PING` is answered with a bare `PONG`.
pub fn pong_reply(line: &str) -> Option<String> {
    if !line.starts_with("PING") {
        return None;
    }
    match line.split_whitespace().nth(1) {
        Some(token) => Some(format!("PONG {token}")),
        None => Some("PONG".to_string()),
    }
}
