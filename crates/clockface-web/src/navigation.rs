#![forbid(unsafe_code)]

//! Navigation bar selection.
//!
//! [`NavigationController`] keeps the id of the active group in an explicit
//! field and mirrors it onto the display tree as the `active` class of the
//! entry's link. Selection changes are not delivered through callbacks; they
//! are queued as [`SelectionChanged`] events which the owner drains after each
//! operation.
//!
//! Invariants after every call except [`NavigationController::set_active`]:
//! - at most one registered link carries the `active` class;
//! - when any entry is registered, exactly one is active.
//!
//! `set_active` keeps only the first of these. It is the low-level mark
//! mover and may leave nothing active.

use std::collections::VecDeque;

use clockface_core::dom::{Document, NodeId};

/// Class marking the active navigation link.
pub const ACTIVE_CLASS: &str = "active";

/// Why the selection moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCause {
    /// The first entry registered while nothing was active.
    FirstEntry,
    /// The user activated an entry.
    Activated,
    /// The active entry was removed and another took over.
    Fallback,
    /// The active entry was removed and none remain.
    Cleared,
}

/// The active group changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Newly active group, `None` once no groups remain.
    pub group_id: Option<String>,
    /// What triggered the change.
    pub cause: SelectionCause,
}

#[derive(Debug, Clone)]
struct NavEntry {
    group_id: String,
    item: NodeId,
    link: NodeId,
}

/// Tracks the active navigation entry.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    entries: Vec<NavEntry>,
    active: Option<String>,
    events: VecDeque<SelectionChanged>,
}

impl NavigationController {
    /// Create an empty controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active group id.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered group ids in insertion order.
    pub fn group_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.group_id.as_str())
    }

    /// Register an entry. `item` is the list item, `link` its clickable child.
    ///
    /// If nothing is active, the new entry becomes active.
    pub fn add(&mut self, doc: &mut Document, group_id: &str, item: NodeId, link: NodeId) {
        self.entries.push(NavEntry {
            group_id: group_id.to_string(),
            item,
            link,
        });
        if self.active.is_none() {
            self.set_active(doc, Some(group_id));
            self.push_event(SelectionCause::FirstEntry);
        }
    }

    /// User activation of an entry. Unknown ids are ignored.
    ///
    /// Returns `true` if the entry exists. Re-activating the active entry
    /// still queues an event so the owner refreshes its display.
    pub fn select(&mut self, doc: &mut Document, group_id: &str) -> bool {
        if self.entry(group_id).is_none() {
            return false;
        }
        self.set_active(doc, Some(group_id));
        self.push_event(SelectionCause::Activated);
        true
    }

    /// Move the active mark without queueing an event.
    ///
    /// Unmarks the current entry (if any) and marks `group_id`. Passing `None`
    /// or an unknown id leaves nothing active even while entries remain
    /// registered; callers doing so own restoring a selection.
    pub fn set_active(&mut self, doc: &mut Document, group_id: Option<&str>) {
        if let Some(link) = self.active.as_deref().and_then(|id| self.entry(id)).map(|e| e.link) {
            doc.remove_class(link, ACTIVE_CLASS);
        }
        let next = group_id.and_then(|id| self.entry(id)).map(|e| (e.group_id.clone(), e.link));
        self.active = match next {
            Some((id, link)) => {
                doc.add_class(link, ACTIVE_CLASS);
                Some(id)
            }
            None => None,
        };
    }

    /// Unregister an entry. The caller owns and destroys its nodes.
    ///
    /// Removing the active entry activates the first remaining one, or clears
    /// the selection if none remain.
    pub fn remove(&mut self, doc: &mut Document, group_id: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.group_id == group_id) else {
            return false;
        };
        let was_active = self.active.as_deref() == Some(group_id);
        if was_active {
            self.set_active(doc, None);
        }
        self.entries.remove(pos);
        if was_active {
            let fallback = self.entries.first().map(|e| e.group_id.clone());
            match fallback {
                Some(id) => {
                    self.set_active(doc, Some(&id));
                    self.push_event(SelectionCause::Fallback);
                }
                None => self.push_event(SelectionCause::Cleared),
            }
        }
        true
    }

    /// Group owning `node`, which may be an entry's item or its link.
    #[must_use]
    pub fn entry_for_node(&self, node: NodeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.item == node || e.link == node)
            .map(|e| e.group_id.as_str())
    }

    /// Link node of a registered entry.
    #[must_use]
    pub fn link_for(&self, group_id: &str) -> Option<NodeId> {
        self.entry(group_id).map(|e| e.link)
    }

    /// Take all queued selection events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SelectionChanged> + '_ {
        self.events.drain(..)
    }

    fn entry(&self, group_id: &str) -> Option<&NavEntry> {
        self.entries.iter().find(|e| e.group_id == group_id)
    }

    fn push_event(&mut self, cause: SelectionCause) {
        tracing::debug!(active = ?self.active, ?cause, "selection changed");
        self.events.push_back(SelectionChanged {
            group_id: self.active.clone(),
            cause,
        });
    }
}
