#![forbid(unsafe_code)]

//! Incremental `text/event-stream` framing.
//!
//! The host pushes raw bytes as they arrive, split at arbitrary points, and
//! drains framed events. Framing rules:
//!
//! - lines end with LF, CR or CRLF (a CRLF split across chunks counts once);
//! - a leading UTF-8 byte-order mark is skipped;
//! - `field: value` lines set `event`, `data`, `id` or `retry`; one space after
//!   the colon is stripped; a line with no colon is a field with an empty value;
//! - lines starting with `:` are comments;
//! - `data` lines accumulate, joined with LF;
//! - a blank line dispatches the pending event, unless it has no data;
//! - `id` persists across events until changed; ids containing NUL are ignored;
//! - `retry` is accepted only when it is all ASCII digits.
//!
//! A line that is not valid UTF-8 yields a framing error for that line and
//! is otherwise skipped.

use std::collections::VecDeque;

use crate::error::BoardError;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// One dispatched server-sent event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamEvent {
    /// Event type, `None` for the default `message` type.
    pub event: Option<String>,
    /// Data payload, lines joined with LF.
    pub data: String,
    /// Last event id seen on the stream.
    pub id: Option<String>,
    /// Reconnection delay requested by the server, in milliseconds.
    pub retry: Option<u64>,
}

impl StreamEvent {
    /// Event type, defaulting to `message`.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.event.as_deref().unwrap_or("message")
    }
}

/// Host-fed event-stream decoder.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buf: Vec<u8>,
    skip_lf: bool,
    bom_checked: bool,
    line_no: u64,
    data: String,
    has_data: bool,
    event: Option<String>,
    last_id: Option<String>,
    retry: Option<u64>,
    ready: VecDeque<Result<StreamEvent, BoardError>>,
}

impl EventStreamDecoder {
    /// Create a decoder at the start of a stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        let mut chunk = chunk;
        if self.skip_lf && !chunk.is_empty() {
            self.skip_lf = false;
            if chunk[0] == b'\n' {
                chunk = &chunk[1..];
            }
        }
        self.buf.extend_from_slice(chunk);
        if !self.bom_checked {
            if self.buf.len() < BOM.len() && BOM.starts_with(&self.buf) {
                return;
            }
            if self.buf.starts_with(BOM) {
                self.buf.drain(..BOM.len());
            }
            self.bom_checked = true;
        }
        self.process_lines();
    }

    /// Whether framed events are waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.ready.is_empty()
    }

    /// Take framed events and framing errors, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Result<StreamEvent, BoardError>> + '_ {
        self.ready.drain(..)
    }

    /// Last event id seen, for reconnection.
    #[must_use]
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    /// Reconnection delay last requested by the server.
    #[must_use]
    pub const fn retry_ms(&self) -> Option<u64> {
        self.retry
    }

    /// Forget partial input (e.g. after the connection drops).
    ///
    /// The last event id and retry delay survive, as a reconnecting client
    /// needs them.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.skip_lf = false;
        self.bom_checked = false;
        self.data.clear();
        self.has_data = false;
        self.event = None;
    }

    fn process_lines(&mut self) {
        let mut start = 0;
        let mut i = 0;
        while i < self.buf.len() {
            let byte = self.buf[i];
            if byte != b'\n' && byte != b'\r' {
                i += 1;
                continue;
            }
            let line = self.buf[start..i].to_vec();
            let mut next = i + 1;
            if byte == b'\r' {
                match self.buf.get(next) {
                    Some(b'\n') => next += 1,
                    Some(_) => {}
                    None => self.skip_lf = true,
                }
            }
            self.process_line(&line);
            start = next;
            i = next;
        }
        self.buf.drain(..start);
    }

    fn process_line(&mut self, raw: &[u8]) {
        self.line_no += 1;
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(err) => {
                self.ready.push_back(Err(BoardError::Framing {
                    line: self.line_no,
                    reason: err.to_string(),
                }));
                return;
            }
        };

        if line.is_empty() {
            self.dispatch();
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
                self.has_data = true;
            }
            "event" => self.event = Some(value.to_string()),
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            "retry" if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
                self.retry = value.parse().ok();
            }
            _ => {}
        }
    }

    fn dispatch(&mut self) {
        let event = self.event.take();
        if !self.has_data {
            return;
        }
        self.has_data = false;
        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }
        self.ready.push_back(Ok(StreamEvent {
            event: event.filter(|e| !e.is_empty()),
            data,
            id: self.last_id.clone(),
            retry: self.retry,
        }));
    }
}
