//! Property-based invariant tests for snapshot reconciliation.
//!
//! After any sequence of snapshots (and clicks in between):
//!
//! 1. Live group and clock ids equal the latest snapshot's ids.
//! 2. At most one navigation link is marked active, and exactly one when any
//!    group exists.
//! 3. Displayed cards are exactly the active group's clocks, in snapshot order.
//! 4. Cached counts on each card match the snapshot.

use std::collections::BTreeSet;

use clockface_core::model::{Clock, ClockGroup, SiteClocks};
use clockface_render::{SegmentConfig, SegmentRenderer};
use clockface_web::Reconciler;
use clockface_web::navigation::ACTIVE_CLASS;
use clockface_web::reconcile::{ATTR_FILLED, ATTR_SEGMENTS};
use proptest::prelude::*;

const GROUPS: usize = 4;
const CLOCKS: usize = 8;

#[derive(Debug, Clone)]
struct ClockSpec {
    group: usize,
    total: u32,
    filled: u32,
    title: u8,
}

#[derive(Debug, Clone)]
struct SnapshotSpec {
    present: [bool; GROUPS],
    titles: [u8; GROUPS],
    clocks: Vec<Option<ClockSpec>>,
    rotate: usize,
    reverse: bool,
    click: usize,
}

fn clock_strategy() -> impl Strategy<Value = Option<ClockSpec>> {
    proptest::option::of((0..GROUPS, 0u32..6, 0u32..7, 0u8..2).prop_map(
        |(group, total, filled, title)| ClockSpec {
            group,
            total,
            filled,
            title,
        },
    ))
}

fn snapshot_strategy() -> impl Strategy<Value = SnapshotSpec> {
    (
        proptest::array::uniform4(any::<bool>()),
        proptest::array::uniform4(0u8..2),
        proptest::collection::vec(clock_strategy(), CLOCKS),
        0..CLOCKS,
        any::<bool>(),
        0..GROUPS,
    )
        .prop_map(|(present, titles, clocks, rotate, reverse, click)| SnapshotSpec {
            present,
            titles,
            clocks,
            rotate,
            reverse,
            click,
        })
}

fn build(spec: &SnapshotSpec) -> SiteClocks {
    let mut order: Vec<usize> = (0..CLOCKS).collect();
    order.rotate_left(spec.rotate);
    if spec.reverse {
        order.reverse();
    }
    let groups = (0..GROUPS)
        .filter(|&g| spec.present[g])
        .map(|g| {
            let clocks = order
                .iter()
                .filter_map(|&i| spec.clocks[i].as_ref().filter(|c| c.group == g).map(|c| (i, c)))
                .map(|(i, c)| Clock::new(format!("c{i}"), format!("t{}", c.title), c.total, c.filled))
                .collect();
            ClockGroup::new(format!("g{g}"), format!("title{}", spec.titles[g]), clocks)
        })
        .collect();
    SiteClocks::new("site", "example", groups)
}

fn check(r: &Reconciler, snap: &SiteClocks) -> Result<(), TestCaseError> {
    let doc = r.document();

    let live_groups: BTreeSet<&str> = r.group_ids().collect();
    let want_groups: BTreeSet<&str> = snap.group_ids().collect();
    prop_assert_eq!(&live_groups, &want_groups);
    prop_assert_eq!(doc.children(r.mounts().nav).len(), want_groups.len());

    let live_clocks: BTreeSet<&str> = r.clocks().map(|c| c.id).collect();
    let want_clocks: BTreeSet<&str> = snap.clock_ids().collect();
    prop_assert_eq!(&live_clocks, &want_clocks);

    let marked: Vec<&str> = r
        .group_ids()
        .filter(|id| r.group_link(id).is_some_and(|l| doc.has_class(l, ACTIVE_CLASS)))
        .collect();
    prop_assert!(marked.len() <= 1, "multiple active links: {marked:?}");
    if want_groups.is_empty() {
        prop_assert_eq!(r.active_group(), None);
    } else {
        prop_assert_eq!(marked.len(), 1);
        prop_assert_eq!(r.active_group(), Some(marked[0]));
    }

    let displayed: Vec<&str> = doc
        .children(r.mounts().clocks)
        .iter()
        .filter_map(|&n| doc.attr(n, "id"))
        .collect();
    let expected: Vec<&str> = match r.active_group() {
        Some(active) => snap
            .clock_groups
            .iter()
            .filter(|g| g.id == active)
            .flat_map(|g| g.clocks.iter().map(|c| c.id.as_str()))
            .collect(),
        None => Vec::new(),
    };
    prop_assert_eq!(displayed, expected);

    for group in &snap.clock_groups {
        for clock in &group.clocks {
            let view = r.clock(&clock.id).ok_or_else(|| TestCaseError::fail("missing clock"))?;
            prop_assert_eq!(view.group_id, group.id.as_str());
            let total = clock.total_segments.to_string();
            let filled = clock.filled_segments.to_string();
            prop_assert_eq!(doc.attr(view.root, ATTR_SEGMENTS), Some(total.as_str()));
            prop_assert_eq!(doc.attr(view.root, ATTR_FILLED), Some(filled.as_str()));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn display_tracks_every_snapshot(specs in proptest::collection::vec(snapshot_strategy(), 1..8)) {
        let renderer =
            SegmentRenderer::with_base(SegmentConfig::new().canvas_size(8).circle_radius(3));
        let mut r = Reconciler::with_default_mounts(renderer);

        for spec in &specs {
            let snap = build(spec);
            r.update(&snap);
            check(&r, &snap)?;

            r.select(&format!("g{}", spec.click));
            check(&r, &snap)?;
        }
    }

    #[test]
    fn second_identical_update_renders_nothing(spec in snapshot_strategy()) {
        let renderer =
            SegmentRenderer::with_base(SegmentConfig::new().canvas_size(8).circle_radius(3));
        let mut r = Reconciler::with_default_mounts(renderer);
        let snap = build(&spec);
        r.update(&snap);
        r.document_mut().reset_stats();

        let report = r.update(&snap);
        prop_assert!(report.is_noop());
        prop_assert_eq!(report.renders, 0);
        prop_assert_eq!(r.document().stats().text_writes, 0);
        prop_assert_eq!(r.document().stats().attr_writes, 0);
    }
}
