#![forbid(unsafe_code)]

//! Snapshot model delivered by the push stream.
//!
//! A [`SiteClocks`] snapshot is a full, self-consistent description of every
//! group and clock at one point in time. It replaces prior state wholesale;
//! there are no partial updates.
//!
//! Field names follow the wire format (camelCase):
//!
//! ```
//! use clockface_core::model::SiteClocks;
//!
//! let json = r#"{"id":"s1","name":"example.org","clockGroups":[
//!     {"id":"g1","title":"Site A","clocks":[
//!         {"id":"c1","title":"Task","totalSegments":4,"filledSegments":2}
//!     ]}
//! ]}"#;
//! let snapshot: SiteClocks = serde_json::from_str(json).unwrap();
//! assert_eq!(snapshot.clock_groups[0].clocks[0].fraction_label(), "2/4");
//! ```

use serde::{Deserialize, Serialize};

/// Snapshot root: one site and its ordered clock groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteClocks {
    /// Site identifier.
    #[serde(default)]
    pub id: String,
    /// Site name or URL.
    #[serde(default)]
    pub name: String,
    /// Groups in display order.
    #[serde(default)]
    pub clock_groups: Vec<ClockGroup>,
}

impl SiteClocks {
    /// Create a snapshot with the given groups.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, groups: Vec<ClockGroup>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            clock_groups: groups,
        }
    }

    /// Group ids in snapshot order.
    pub fn group_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.clock_groups.iter().map(|g| g.id.as_str())
    }

    /// Every clock id across all groups, in group then clock order.
    pub fn clock_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.clock_groups
            .iter()
            .flat_map(|g| g.clocks.iter().map(|c| c.id.as_str()))
    }

    /// Total number of clocks across all groups.
    #[must_use]
    pub fn clock_count(&self) -> usize {
        self.clock_groups.iter().map(|g| g.clocks.len()).sum()
    }
}

/// A titled group of related clocks (one navigation entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockGroup {
    /// Unique group key.
    pub id: String,
    /// Display title shown in the navigation bar.
    pub title: String,
    /// Clocks in display order.
    #[serde(default)]
    pub clocks: Vec<Clock>,
}

impl ClockGroup {
    /// Create a group.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, clocks: Vec<Clock>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            clocks,
        }
    }
}

/// One segmented progress clock.
///
/// `id` is unique across the whole snapshot, not just within its group.
/// Well-formed input keeps `filled_segments <= total_segments`; nothing here
/// enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clock {
    /// Unique clock key.
    pub id: String,
    /// Card title.
    pub title: String,
    /// Number of slices in the circle.
    pub total_segments: u32,
    /// Number of slices drawn as filled.
    pub filled_segments: u32,
}

impl Clock {
    /// Create a clock.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, total: u32, filled: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            total_segments: total,
            filled_segments: filled,
        }
    }

    /// Progress text shown on the card, e.g. `2/4`.
    #[must_use]
    pub fn fraction_label(&self) -> String {
        format!("{}/{}", self.filled_segments, self.total_segments)
    }
}
