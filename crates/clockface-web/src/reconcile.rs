#![forbid(unsafe_code)]

//! Snapshot reconciliation.
//!
//! The [`Reconciler`] owns one element per live group and per live clock and
//! brings them in line with each incoming [`SiteClocks`] snapshot with as few
//! display-tree mutations as possible.
//!
//! # Algorithm
//!
//! 1. Groups: destroy elements whose id left the snapshot; retitle survivors
//!    only when the text changed; build and append new ones, registering them
//!    with the [`NavigationController`].
//! 2. Selection: adopt the last queued [`SelectionChanged`] event.
//! 3. Clocks: destroy elements whose id left the snapshot; re-render a
//!    survivor only when its total, filled count or title changed; build new
//!    ones detached; sort the live list into snapshot order.
//! 4. Display: clear the clocks container and append the active group's clocks
//!    in snapshot order, then a trailing filler column.
//!
//! Groups keep their creation order in the navigation bar. Clocks follow the
//! latest snapshot, so an inserted or reordered clock moves without being
//! rebuilt.
//!
//! Duplicate ids within one snapshot are undefined input. The first live
//! element with a given id is the one updated.

use std::collections::HashMap;

use clockface_core::dom::{Document, NodeId};
use clockface_core::model::{Clock, ClockGroup, SiteClocks};
use clockface_render::SegmentRenderer;

use crate::navigation::{NavigationController, SelectionChanged};

/// Cached attribute holding a clock's group id.
pub const ATTR_GROUP_ID: &str = "groupId";
/// Cached attribute holding a clock's total segment count.
pub const ATTR_SEGMENTS: &str = "segments";
/// Cached attribute holding a clock's filled segment count.
pub const ATTR_FILLED: &str = "filled";

/// Host-owned containers the reconciler writes under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mounts {
    /// Navigation list (`ul`).
    pub nav: NodeId,
    /// Clock card row.
    pub clocks: NodeId,
}

impl Mounts {
    /// Create the standard `ul#topnav` and `div#clocks` containers in `doc`.
    pub fn create(doc: &mut Document) -> Self {
        let nav = doc.create_element("ul");
        doc.add_class(nav, "nav");
        doc.set_attr(nav, "id", "topnav");
        let clocks = doc.create_element("div");
        doc.add_class(clocks, "row");
        doc.set_attr(clocks, "id", "clocks");
        Self { nav, clocks }
    }
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// New navigation entries.
    pub groups_added: u32,
    /// Navigation entries destroyed.
    pub groups_removed: u32,
    /// Navigation entries whose title text changed.
    pub groups_retitled: u32,
    /// New clock elements.
    pub clocks_added: u32,
    /// Clock elements destroyed.
    pub clocks_removed: u32,
    /// Existing clock elements re-rendered.
    pub clocks_rerendered: u32,
    /// Existing clock elements moved to another group without re-rendering.
    pub clocks_regrouped: u32,
    /// Renderer invocations (new plus re-rendered).
    pub renders: u32,
    /// Renderer invocations that failed.
    pub render_failures: u32,
    /// Clocks attached to the display after the pass.
    pub clocks_displayed: u32,
    /// Whether the active group changed.
    pub selection_changed: bool,
}

impl ReconcileReport {
    /// Whether the pass changed anything besides refreshing the display.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.groups_added == 0
            && self.groups_removed == 0
            && self.groups_retitled == 0
            && self.clocks_added == 0
            && self.clocks_removed == 0
            && self.clocks_rerendered == 0
            && self.clocks_regrouped == 0
            && !self.selection_changed
    }
}

/// A live navigation entry.
#[derive(Debug, Clone)]
struct GroupElement {
    id: String,
    item: NodeId,
    link: NodeId,
}

/// A live clock card.
#[derive(Debug, Clone)]
struct ClockElement {
    id: String,
    group_id: String,
    total: u32,
    filled: u32,
    title: String,
    root: NodeId,
    img: NodeId,
    heading: NodeId,
    fraction: NodeId,
}

/// Live view of a clock element, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockView<'a> {
    /// Clock id.
    pub id: &'a str,
    /// Owning group id.
    pub group_id: &'a str,
    /// Cached total segments.
    pub total: u32,
    /// Cached filled segments.
    pub filled: u32,
    /// Cached title.
    pub title: &'a str,
    /// Root `div.col` node.
    pub root: NodeId,
    /// Image node carrying the rendered `src`.
    pub img: NodeId,
}

/// Owns the live group and clock elements and the display tree.
#[derive(Debug)]
pub struct Reconciler {
    doc: Document,
    mounts: Mounts,
    nav: NavigationController,
    renderer: SegmentRenderer,
    groups: Vec<GroupElement>,
    clocks: Vec<ClockElement>,
    active_group: Option<String>,
    filler: Option<NodeId>,
}

impl Reconciler {
    /// Reconcile into `doc` under `mounts`, rendering with `renderer`.
    pub fn new(doc: Document, mounts: Mounts, renderer: SegmentRenderer) -> Self {
        Self {
            doc,
            mounts,
            nav: NavigationController::new(),
            renderer,
            groups: Vec::new(),
            clocks: Vec::new(),
            active_group: None,
            filler: None,
        }
    }

    /// Fresh document with standard mounts and the default renderer.
    #[must_use]
    pub fn with_default_mounts(renderer: SegmentRenderer) -> Self {
        let mut doc = Document::new();
        let mounts = Mounts::create(&mut doc);
        Self::new(doc, mounts, renderer)
    }

    /// The display tree.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for hosts that manage other parts of the tree.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// The mount points.
    #[must_use]
    pub const fn mounts(&self) -> Mounts {
        self.mounts
    }

    /// Navigation state.
    #[must_use]
    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    /// Currently displayed group.
    #[must_use]
    pub fn active_group(&self) -> Option<&str> {
        self.active_group.as_deref()
    }

    /// Live group ids in navigation order.
    pub fn group_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|g| g.id.as_str())
    }

    /// Live clocks in the latest snapshot's order.
    pub fn clocks(&self) -> impl Iterator<Item = ClockView<'_>> + '_ {
        self.clocks.iter().map(ClockElement::view)
    }

    /// Live clock by id.
    #[must_use]
    pub fn clock(&self, id: &str) -> Option<ClockView<'_>> {
        self.clocks.iter().find(|c| c.id == id).map(ClockElement::view)
    }

    /// Navigation item node of a live group.
    #[must_use]
    pub fn group_node(&self, id: &str) -> Option<NodeId> {
        self.groups.iter().find(|g| g.id == id).map(|g| g.item)
    }

    /// Navigation link node of a live group.
    #[must_use]
    pub fn group_link(&self, id: &str) -> Option<NodeId> {
        self.groups.iter().find(|g| g.id == id).map(|g| g.link)
    }

    /// Apply a snapshot.
    pub fn update(&mut self, snapshot: &SiteClocks) -> ReconcileReport {
        let span = tracing::debug_span!(
            "reconcile_update",
            site = %snapshot.id,
            groups = snapshot.clock_groups.len(),
            clocks = snapshot.clock_count()
        );
        let _guard = span.enter();

        let mut report = ReconcileReport::default();
        self.update_groups(&snapshot.clock_groups, &mut report);
        report.selection_changed = self.apply_selection_events();
        self.update_clocks(&snapshot.clock_groups, &mut report);
        report.clocks_displayed = self.show_clocks();

        tracing::debug!(?report, "reconcile done");
        report
    }

    /// Activate a group as if its navigation entry were clicked.
    ///
    /// Returns `false` for unknown ids.
    pub fn select(&mut self, group_id: &str) -> bool {
        if !self.nav.select(&mut self.doc, group_id) {
            return false;
        }
        self.apply_selection_events();
        self.show_clocks();
        true
    }

    /// Activate the group whose navigation item or link is `node`.
    pub fn click(&mut self, node: NodeId) -> bool {
        match self.nav.entry_for_node(node).map(str::to_string) {
            Some(group_id) => self.select(&group_id),
            None => false,
        }
    }

    fn update_groups(&mut self, groups: &[ClockGroup], report: &mut ReconcileReport) {
        let mut kept = Vec::with_capacity(self.groups.len());
        for element in std::mem::take(&mut self.groups) {
            if groups.iter().any(|g| g.id == element.id) {
                kept.push(element);
            } else {
                tracing::trace!(group = %element.id, "group removed");
                self.nav.remove(&mut self.doc, &element.id);
                self.doc.destroy(element.item);
                report.groups_removed += 1;
            }
        }
        self.groups = kept;

        for group in groups {
            if let Some(element) = self.groups.iter().find(|e| e.id == group.id) {
                if self.doc.text(element.link) != Some(group.title.as_str()) {
                    self.doc.set_text(element.link, &group.title);
                    report.groups_retitled += 1;
                }
                continue;
            }
            let element = build_group(&mut self.doc, group);
            self.doc.append_child(self.mounts.nav, element.item);
            self.nav
                .add(&mut self.doc, &element.id, element.item, element.link);
            tracing::trace!(group = %element.id, "group added");
            self.groups.push(element);
            report.groups_added += 1;
        }
    }

    /// Adopt the latest queued selection. Returns whether the active id changed.
    fn apply_selection_events(&mut self) -> bool {
        let latest: Option<SelectionChanged> = self.nav.drain_events().last();
        let Some(event) = latest else {
            return false;
        };
        let changed = event.group_id != self.active_group;
        self.active_group = event.group_id;
        changed
    }

    fn update_clocks(&mut self, groups: &[ClockGroup], report: &mut ReconcileReport) {
        let mut kept = Vec::with_capacity(self.clocks.len());
        for element in std::mem::take(&mut self.clocks) {
            let present = groups
                .iter()
                .any(|g| g.clocks.iter().any(|c| c.id == element.id));
            if present {
                kept.push(element);
            } else {
                tracing::trace!(clock = %element.id, "clock removed");
                self.doc.destroy(element.root);
                report.clocks_removed += 1;
            }
        }
        self.clocks = kept;

        for group in groups {
            for clock in &group.clocks {
                match self.clocks.iter().position(|e| e.id == clock.id) {
                    Some(idx) => self.refresh_clock(idx, &group.id, clock, report),
                    None => {
                        let src = self.render_src(clock, report);
                        let element =
                            build_clock(&mut self.doc, &group.id, clock, src.as_deref().unwrap_or(""));
                        tracing::trace!(clock = %element.id, group = %group.id, "clock added");
                        self.clocks.push(element);
                        report.clocks_added += 1;
                    }
                }
            }
        }

        self.order_clocks(groups);
    }

    /// Sort live clocks into snapshot order. Elements are moved, never rebuilt.
    fn order_clocks(&mut self, groups: &[ClockGroup]) {
        let mut rank: HashMap<&str, usize> = HashMap::new();
        for (pos, id) in groups
            .iter()
            .flat_map(|g| g.clocks.iter().map(|c| c.id.as_str()))
            .enumerate()
        {
            rank.entry(id).or_insert(pos);
        }
        self.clocks
            .sort_by_key(|c| rank.get(c.id.as_str()).copied().unwrap_or(usize::MAX));
    }

    fn refresh_clock(
        &mut self,
        idx: usize,
        group_id: &str,
        clock: &Clock,
        report: &mut ReconcileReport,
    ) {
        let element = &self.clocks[idx];
        let visual_changed = element.total != clock.total_segments
            || element.filled != clock.filled_segments
            || element.title != clock.title;
        let regrouped = element.group_id != group_id;

        if regrouped {
            let element = &mut self.clocks[idx];
            element.group_id = group_id.to_string();
            self.doc.set_attr(element.root, ATTR_GROUP_ID, group_id);
            if !visual_changed {
                report.clocks_regrouped += 1;
            }
        }
        if !visual_changed {
            return;
        }

        let src = self.render_src(clock, report);
        let element = &mut self.clocks[idx];
        element.total = clock.total_segments;
        element.filled = clock.filled_segments;
        element.title.clone_from(&clock.title);
        self.doc
            .set_attr(element.root, ATTR_SEGMENTS, &clock.total_segments.to_string());
        self.doc
            .set_attr(element.root, ATTR_FILLED, &clock.filled_segments.to_string());
        self.doc.set_text(element.heading, &clock.title);
        self.doc.set_text(element.fraction, &clock.fraction_label());
        if let Some(src) = src {
            self.doc.set_attr(element.img, "src", &src);
        }
        tracing::trace!(clock = %clock.id, "clock re-rendered");
        report.clocks_rerendered += 1;
    }

    /// Render a clock image. Failures are logged and yield `None`.
    fn render_src(&self, clock: &Clock, report: &mut ReconcileReport) -> Option<String> {
        report.renders += 1;
        match self
            .renderer
            .render_clock(clock.total_segments, clock.filled_segments)
        {
            Ok(image) => Some(image.data_uri()),
            Err(err) => {
                tracing::warn!(clock = %clock.id, error = %err, "clock render failed");
                report.render_failures += 1;
                None
            }
        }
    }

    /// Rebuild the clocks container for the active group.
    fn show_clocks(&mut self) -> u32 {
        self.doc.clear_children(self.mounts.clocks);
        if let Some(filler) = self.filler.take() {
            self.doc.destroy(filler);
        }

        let mut shown = 0;
        if let Some(active) = self.active_group.as_deref() {
            for element in self.clocks.iter().filter(|c| c.group_id == active) {
                self.doc.append_child(self.mounts.clocks, element.root);
                shown += 1;
            }
        }

        let filler = self.doc.create_element("div");
        self.doc.add_class(filler, "col");
        self.doc.append_child(self.mounts.clocks, filler);
        self.filler = Some(filler);
        shown
    }
}

impl ClockElement {
    fn view(&self) -> ClockView<'_> {
        ClockView {
            id: &self.id,
            group_id: &self.group_id,
            total: self.total,
            filled: self.filled,
            title: &self.title,
            root: self.root,
            img: self.img,
        }
    }
}

/// `li.nav-item#<id> > a.nav-link[href=#]{title}`
fn build_group(doc: &mut Document, group: &ClockGroup) -> GroupElement {
    let item = doc.create_element("li");
    doc.add_class(item, "nav-item");
    doc.set_attr(item, "id", &group.id);
    let link = doc.create_element("a");
    doc.add_class(link, "nav-link");
    doc.set_attr(link, "href", "#");
    doc.set_text(link, &group.title);
    doc.append_child(item, link);
    GroupElement {
        id: group.id.clone(),
        item,
        link,
    }
}

/// `div.col#<id>[groupId,segments,filled] > div.card > (img.card-img-top,
/// div.card-body > (h5.card-title, p.card-text))`
fn build_clock(doc: &mut Document, group_id: &str, clock: &Clock, src: &str) -> ClockElement {
    let root = doc.create_element("div");
    doc.add_class(root, "col");
    doc.set_attr(root, "id", &clock.id);
    doc.set_attr(root, ATTR_GROUP_ID, group_id);
    doc.set_attr(root, ATTR_SEGMENTS, &clock.total_segments.to_string());
    doc.set_attr(root, ATTR_FILLED, &clock.filled_segments.to_string());

    let card = doc.create_element("div");
    doc.add_class(card, "card");
    doc.append_child(root, card);

    let img = doc.create_element("img");
    doc.add_class(img, "card-img-top");
    doc.set_attr(img, "src", src);
    doc.append_child(card, img);

    let body = doc.create_element("div");
    doc.add_class(body, "card-body");
    doc.append_child(card, body);

    let heading = doc.create_element("h5");
    doc.add_class(heading, "card-title");
    doc.set_text(heading, &clock.title);
    doc.append_child(body, heading);

    let fraction = doc.create_element("p");
    doc.add_class(fraction, "card-text");
    doc.set_text(fraction, &clock.fraction_label());
    doc.append_child(body, fraction);

    ClockElement {
        id: clock.id.clone(),
        group_id: group_id.to_string(),
        total: clock.total_segments,
        filled: clock.filled_segments,
        title: clock.title.clone(),
        root,
        img,
        heading,
        fraction,
    }
}
