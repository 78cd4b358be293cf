//! Snapshot-to-display scenarios driven through the public board API.

use clockface_core::model::{Clock, ClockGroup, SiteClocks};
use clockface_render::encode::decode_data_uri;
use clockface_render::raster::WedgeGeometry;
use clockface_render::{PackedRgba, Palette, SegmentConfig};
use clockface_web::navigation::ACTIVE_CLASS;
use clockface_web::{BoardConfig, ClockBoard};
use pretty_assertions::assert_eq;

const CANVAS: u32 = 120;
const RADIUS: u32 = 56;

fn board() -> ClockBoard {
    ClockBoard::new(&BoardConfig {
        canvas_size: Some(CANVAS),
        circle_radius: Some(RADIUS),
        ..BoardConfig::default()
    })
}

fn site(groups: Vec<ClockGroup>) -> SiteClocks {
    SiteClocks::new("s1", "example.org", groups)
}

fn displayed(board: &ClockBoard) -> Vec<String> {
    let doc = board.document();
    doc.children(board.reconciler().mounts().clocks)
        .iter()
        .filter_map(|&n| doc.attr(n, "id").map(str::to_string))
        .collect()
}

fn active_links(board: &ClockBoard) -> Vec<String> {
    let r = board.reconciler();
    r.group_ids()
        .filter(|id| {
            r.group_link(id)
                .is_some_and(|link| board.document().has_class(link, ACTIVE_CLASS))
        })
        .map(str::to_string)
        .collect()
}

#[test]
fn single_clock_snapshot_builds_nav_and_card() {
    let mut b = board();
    let payload = r#"{"id":"s1","name":"example.org","clockGroups":[
        {"id":"g1","title":"Site A","clocks":[
            {"id":"c1","title":"Task","totalSegments":4,"filledSegments":2}]}]}"#;
    b.apply_message(payload).unwrap();

    let doc = b.document();
    let mounts = b.reconciler().mounts();
    assert_eq!(
        doc.to_markup(mounts.nav),
        concat!(
            r#"<ul class="nav" id="topnav">"#,
            r##"<li class="nav-item" id="g1"><a class="nav-link active" href="#">Site A</a></li>"##,
            "</ul>"
        )
    );
    assert_eq!(
        doc.to_markup(mounts.clocks),
        concat!(
            r#"<div class="row" id="clocks">"#,
            r#"<div class="col" filled="2" groupId="g1" id="c1" segments="4">"#,
            r#"<div class="card">"#,
            r#"<img class="card-img-top" src="data:image/png;base64,…"></img>"#,
            r#"<div class="card-body">"#,
            r#"<h5 class="card-title">Task</h5><p class="card-text">2/4</p>"#,
            "</div></div></div>",
            r#"<div class="col"></div>"#,
            "</div>"
        )
    );

    let img = b.reconciler().clock("c1").unwrap().img;
    let pixels = decode_data_uri(doc.attr(img, "src").unwrap()).expect("png data uri");
    assert_eq!(pixels.dimensions(), (CANVAS, CANVAS));

    let resolved = SegmentConfig::new()
        .canvas_size(CANVAS)
        .circle_radius(RADIUS)
        .segments(4)
        .resolve();
    let geometry = WedgeGeometry::new(&resolved).unwrap();
    let colors = Palette::Green.colors();
    let sampled: Vec<PackedRgba> = (0..4)
        .map(|i| {
            let (x, y) = geometry.sample_point(i, 0.5);
            PackedRgba::from(*pixels.get_pixel(x, y))
        })
        .collect();
    assert_eq!(
        sampled,
        vec![colors.segment, colors.segment, colors.empty, colors.empty]
    );
}

#[test]
fn removing_a_group_removes_only_its_clocks() {
    let mut b = board();
    b.apply_snapshot(&site(vec![
        ClockGroup::new("g1", "A", vec![Clock::new("a1", "A1", 4, 1), Clock::new("a2", "A2", 4, 2)]),
        ClockGroup::new("g2", "B", vec![Clock::new("b1", "B1", 6, 3)]),
    ]));
    b.select("g2");

    let report = b.apply_snapshot(&site(vec![ClockGroup::new(
        "g2",
        "B",
        vec![Clock::new("b1", "B1", 6, 3)],
    )]));

    assert_eq!(report.groups_removed, 1);
    assert_eq!(report.clocks_removed, 2);
    assert_eq!(report.renders, 0);
    assert!(!report.selection_changed);
    assert_eq!(b.reconciler().group_ids().collect::<Vec<_>>(), ["g2"]);
    assert!(b.reconciler().clock("a1").is_none());
    assert!(b.reconciler().clock("a2").is_none());
    assert_eq!(displayed(&b), ["b1"]);
}

#[test]
fn clicking_moves_one_mark_and_swaps_displayed_clocks() {
    let mut b = board();
    b.apply_snapshot(&site(vec![
        ClockGroup::new("g1", "A", vec![Clock::new("a1", "A1", 4, 1)]),
        ClockGroup::new(
            "g2",
            "B",
            vec![
                Clock::new("b1", "B1", 4, 1),
                Clock::new("b2", "B2", 4, 2),
                Clock::new("b3", "B3", 4, 3),
            ],
        ),
    ]));
    assert_eq!(active_links(&b), ["g1"]);
    assert_eq!(displayed(&b), ["a1"]);

    let link = b.reconciler().group_link("g2").unwrap();
    assert!(b.click(link));
    assert_eq!(active_links(&b), ["g2"]);
    assert_eq!(displayed(&b), ["b1", "b2", "b3"]);

    // The list item works as well as the link.
    let item = b.reconciler().group_node("g1").unwrap();
    assert!(b.click(item));
    assert_eq!(active_links(&b), ["g1"]);
    assert_eq!(displayed(&b), ["a1"]);
}

#[test]
fn repeating_a_snapshot_writes_no_content() {
    let mut b = board();
    let snap = site(vec![
        ClockGroup::new("g1", "A", vec![Clock::new("a1", "A1", 4, 1)]),
        ClockGroup::new("g2", "B", vec![Clock::new("b1", "B1", 4, 2)]),
    ]);
    b.apply_snapshot(&snap);

    let markup_before = b.document().to_markup(b.reconciler().mounts().nav);
    let report = b.apply_snapshot(&snap);

    assert!(report.is_noop());
    assert_eq!(report.renders, 0);
    assert_eq!(b.document().to_markup(b.reconciler().mounts().nav), markup_before);
    assert_eq!(displayed(&b), ["a1"]);
}

#[test]
fn repeated_snapshot_leaves_text_and_attributes_untouched() {
    let snap = site(vec![ClockGroup::new(
        "g1",
        "A",
        vec![Clock::new("a1", "A1", 4, 1), Clock::new("a2", "A2", 8, 5)],
    )]);
    let mut r = clockface_web::Reconciler::with_default_mounts(
        BoardConfig {
            canvas_size: Some(CANVAS),
            circle_radius: Some(RADIUS),
            ..BoardConfig::default()
        }
        .renderer(),
    );
    r.update(&snap);
    r.document_mut().reset_stats();

    r.update(&snap);
    let stats = r.document().stats();
    assert_eq!(stats.text_writes, 0);
    assert_eq!(stats.attr_writes, 0);
}

#[test]
fn event_stream_drives_the_board() {
    let mut b = board();
    let first = concat!(
        "retry: 3000\n",
        "id: 1\n",
        r#"data: {"id":"s1","name":"example.org","clockGroups":["#,
        "\n",
        r#"data: {"id":"g1","title":"Site A","clocks":[{"id":"c1","title":"Task","totalSegments":4,"filledSegments":1}]}]}"#,
        "\n\n",
    );
    // Split mid-line to exercise incremental framing.
    let (head, tail) = first.as_bytes().split_at(40);
    assert_eq!(b.feed(head).applied, 0);
    assert_eq!(b.feed(tail).applied, 1);
    assert_eq!(b.reconciler().clock("c1").unwrap().filled, 1);

    let second = concat!(
        "id: 2\n",
        r#"data: {"clockGroups":[{"id":"g1","title":"Site A","clocks":[{"id":"c1","title":"Task","totalSegments":4,"filledSegments":3}]}]}"#,
        "\n\n",
    );
    let outcome = b.feed(second.as_bytes());
    assert_eq!(outcome.applied, 1);
    assert_eq!(b.last_report().unwrap().clocks_rerendered, 1);
    assert_eq!(b.reconciler().clock("c1").unwrap().filled, 3);
    assert_eq!(b.last_event_id(), Some("2"));
    assert_eq!(b.retry_ms(), Some(3000));

    let text = b.document().text_content(b.reconciler().mounts().clocks);
    assert!(text.contains("3/4"), "got {text:?}");
}

#[test]
fn bad_message_between_good_ones_is_skipped() {
    let mut b = board();
    let stream = concat!(
        r#"data: {"clockGroups":[{"id":"g1","title":"A","clocks":[]}]}"#,
        "\n\n",
        "data: {\"clockGroups\": 5}\n\n",
        r#"data: {"clockGroups":[{"id":"g1","title":"A2","clocks":[]}]}"#,
        "\n\n",
    );
    let outcome = b.feed(stream.as_bytes());
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.rejected, 1);
    assert_eq!(b.error_count(), 1);

    let link = b.reconciler().group_link("g1").unwrap();
    assert_eq!(b.document().text(link), Some("A2"));
}
