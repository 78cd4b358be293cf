#![forbid(unsafe_code)]

//! Clockface board: turns a stream of clock snapshots into a navigation bar
//! and a row of rendered clock cards.
//!
//! The crate is host-driven. It owns no socket and no event loop; the host
//! feeds it bytes or payloads and reads back a [`Document`].
//!
//! - [`event_stream`] frames `text/event-stream` bytes into events.
//! - [`reconcile`] applies snapshots to the display tree with minimal edits.
//! - [`navigation`] tracks the active group and queues selection events.
//! - [`board`] glues the three together.
//! - [`config`] and [`logging`] cover settings and diagnostics.
//!
//! [`Document`]: clockface_core::Document

pub mod board;
pub mod config;
pub mod error;
pub mod event_stream;
pub mod logging;
pub mod navigation;
pub mod reconcile;

pub use board::{ClockBoard, FeedOutcome, SiteInfo};
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult};
pub use event_stream::{EventStreamDecoder, StreamEvent};
pub use navigation::{NavigationController, SelectionCause, SelectionChanged};
pub use reconcile::{ClockView, Mounts, ReconcileReport, Reconciler};
