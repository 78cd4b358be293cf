#![forbid(unsafe_code)]

//! Core: the clock snapshot model and the headless display tree the
//! reconciler writes into.

pub mod dom;
pub mod model;

pub use dom::{Document, DomStats, NodeId};
pub use model::{Clock, ClockGroup, SiteClocks};
