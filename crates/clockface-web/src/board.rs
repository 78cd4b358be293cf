#![forbid(unsafe_code)]

//! Host-driven glue between the push stream and the reconciler.
//!
//! [`ClockBoard`] never blocks and owns no connection. The host (browser
//! `EventSource`, HTTP client, test) controls the loop:
//!
//! 1. Push raw stream bytes via [`ClockBoard::feed`], or already-framed
//!    payloads via [`ClockBoard::apply_message`].
//! 2. Forward navigation clicks via [`ClockBoard::click`].
//! 3. Report connection failures via [`ClockBoard::report_transport_error`].
//! 4. Read the display tree via [`ClockBoard::document`].
//!
//! A payload that fails to decode is logged and dropped; the display keeps
//! whatever the last good snapshot produced.
//!
//! # Example
//!
//! ```
//! use clockface_web::board::ClockBoard;
//! use clockface_web::config::BoardConfig;
//!
//! let mut board = ClockBoard::new(&BoardConfig::default());
//! let outcome = board.feed(
//!     b"data: {\"clockGroups\":[{\"id\":\"g1\",\"title\":\"Site A\",\"clocks\":[]}]}\n\n",
//! );
//! assert_eq!(outcome.applied, 1);
//! assert_eq!(board.reconciler().active_group(), Some("g1"));
//! ```

use clockface_core::dom::{Document, NodeId};
use clockface_core::model::SiteClocks;

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::event_stream::EventStreamDecoder;
use crate::reconcile::{ReconcileReport, Reconciler};

/// Event type carrying snapshots.
const MESSAGE_EVENT: &str = "message";

/// Result of one [`ClockBoard::feed`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedOutcome {
    /// Snapshots applied.
    pub applied: u32,
    /// Messages or lines rejected (framing or decode errors).
    pub rejected: u32,
    /// Events of other types, ignored.
    pub ignored: u32,
}

/// Site identity from the latest applied snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteInfo {
    /// Site id.
    pub id: String,
    /// Site name or URL.
    pub name: String,
}

/// Push-stream consumer driving a [`Reconciler`].
#[derive(Debug)]
pub struct ClockBoard {
    reconciler: Reconciler,
    decoder: EventStreamDecoder,
    site: Option<SiteInfo>,
    last_report: Option<ReconcileReport>,
    errors: u64,
}

impl ClockBoard {
    /// Board with a fresh document and standard mounts.
    #[must_use]
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_reconciler(Reconciler::with_default_mounts(config.renderer()))
    }

    /// Board around an existing reconciler.
    #[must_use]
    pub fn with_reconciler(reconciler: Reconciler) -> Self {
        Self {
            reconciler,
            decoder: EventStreamDecoder::new(),
            site: None,
            last_report: None,
            errors: 0,
        }
    }

    /// Feed raw `text/event-stream` bytes and apply every complete message.
    pub fn feed(&mut self, chunk: &[u8]) -> FeedOutcome {
        self.decoder.push(chunk);
        let framed: Vec<_> = self.decoder.drain().collect();

        let mut outcome = FeedOutcome::default();
        for item in framed {
            match item {
                Ok(event) if event.kind() == MESSAGE_EVENT => {
                    match self.apply_message(&event.data) {
                        Ok(_) => outcome.applied += 1,
                        Err(_) => outcome.rejected += 1,
                    }
                }
                Ok(event) => {
                    tracing::debug!(kind = event.kind(), "ignoring non-message event");
                    outcome.ignored += 1;
                }
                Err(err) => {
                    self.record_error(&err);
                    outcome.rejected += 1;
                }
            }
        }
        outcome
    }

    /// Decode one JSON payload and apply it.
    ///
    /// On error nothing changes and the error is logged as well as returned.
    pub fn apply_message(&mut self, payload: &str) -> BoardResult<ReconcileReport> {
        match serde_json::from_str::<SiteClocks>(payload) {
            Ok(snapshot) => Ok(self.apply_snapshot(&snapshot)),
            Err(err) => {
                let err = BoardError::from(err);
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Apply an already-decoded snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &SiteClocks) -> ReconcileReport {
        let report = self.reconciler.update(snapshot);
        self.site = Some(SiteInfo {
            id: snapshot.id.clone(),
            name: snapshot.name.clone(),
        });
        self.last_report = Some(report);
        report
    }

    /// Log a transport failure and drop any partially framed input.
    ///
    /// The display is left untouched.
    pub fn report_transport_error(&mut self, message: &str) {
        self.record_error(&BoardError::Transport(message.to_string()));
        self.decoder.reset();
    }

    /// Forward a click on a navigation node.
    pub fn click(&mut self, node: NodeId) -> bool {
        self.reconciler.click(node)
    }

    /// Select a group by id.
    pub fn select(&mut self, group_id: &str) -> bool {
        self.reconciler.select(group_id)
    }

    /// The reconciler.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// The display tree.
    #[must_use]
    pub fn document(&self) -> &Document {
        self.reconciler.document()
    }

    /// Site identity of the latest applied snapshot.
    #[must_use]
    pub fn site(&self) -> Option<&SiteInfo> {
        self.site.as_ref()
    }

    /// Report of the latest applied snapshot.
    #[must_use]
    pub const fn last_report(&self) -> Option<ReconcileReport> {
        self.last_report
    }

    /// Errors seen since creation.
    #[must_use]
    pub const fn error_count(&self) -> u64 {
        self.errors
    }

    /// Last event id seen on the stream, for reconnecting.
    #[must_use]
    pub fn last_event_id(&self) -> Option<&str> {
        self.decoder.last_event_id()
    }

    /// Reconnection delay the server asked for.
    #[must_use]
    pub const fn retry_ms(&self) -> Option<u64> {
        self.decoder.retry_ms()
    }

    fn record_error(&mut self, err: &BoardError) {
        self.errors += 1;
        tracing::warn!(error = %err, "clock stream error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> ClockBoard {
        ClockBoard::new(&BoardConfig {
            canvas_size: Some(20),
            circle_radius: Some(8),
            ..BoardConfig::default()
        })
    }

    const ONE_GROUP: &str = r#"{"id":"s1","name":"example.org","clockGroups":[
        {"id":"g1","title":"Site A","clocks":[
            {"id":"c1","title":"Task","totalSegments":4,"filledSegments":2}]}]}"#;

    #[test]
    fn apply_message_records_site() {
        let mut b = board();
        let report = b.apply_message(ONE_GROUP).unwrap();
        assert_eq!(report.clocks_added, 1);
        assert_eq!(b.site().unwrap().name, "example.org");
        assert_eq!(b.last_report(), Some(report));
    }

    #[test]
    fn malformed_payload_leaves_display_unchanged() {
        let mut b = board();
        b.apply_message(ONE_GROUP).unwrap();
        let before = b.document().to_markup(b.reconciler().mounts().clocks);

        assert!(matches!(b.apply_message("{not json"), Err(BoardError::Decode(_))));
        assert!(b.apply_message(r#"{"clockGroups":[{"title":"no id"}]}"#).is_err());
        assert_eq!(b.document().to_markup(b.reconciler().mounts().clocks), before);
        assert_eq!(b.error_count(), 2);
    }

    #[test]
    fn feed_counts_applied_ignored_and_rejected() {
        let mut b = board();
        let mut stream = String::new();
        for line in ONE_GROUP.lines() {
            stream.push_str("data: ");
            stream.push_str(line);
            stream.push('\n');
        }
        stream.push_str("\nevent: heartbeat\ndata: {}\n\ndata: oops\n\n");

        let outcome = b.feed(stream.as_bytes());
        assert_eq!(
            outcome,
            FeedOutcome {
                applied: 1,
                rejected: 1,
                ignored: 1
            }
        );
        assert_eq!(b.reconciler().active_group(), Some("g1"));
    }

    #[test]
    fn transport_error_drops_partial_frame() {
        let mut b = board();
        b.feed(b"data: {\"clockGroups\":");
        b.report_transport_error("connection reset");
        let outcome = b.feed(b"data: {}\n\n");
        assert_eq!(outcome.applied, 1);
        assert_eq!(b.error_count(), 1);
    }
}
