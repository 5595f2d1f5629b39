use std::path::Path;

use nenpyo_renderer::layout::{TimelineLayout, year_range};
use nenpyo_renderer::{
    LayoutConfig, RenderConfig, Theme, TimelineData, calculate_timeline_height,
    calculate_timeline_width, compute_layout, parse_timeline, render_svg,
};

fn load_fixture(rel: &str) -> TimelineData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_timeline(&input).expect("parse failed")
}

fn layout_fixture(rel: &str, scale: f32) -> (TimelineData, TimelineLayout) {
    let data = load_fixture(rel);
    let layout = compute_layout(&data, scale, &LayoutConfig::default());
    (data, layout)
}

fn assert_lane_collision_free(layout: &TimelineLayout, scale: f32, fixture: &str) {
    let spacing = LayoutConfig::default().slot_spacing(scale);
    for lane in &layout.positioned_events {
        for (i, a) in lane.iter().enumerate() {
            for b in lane.iter().skip(i + 1) {
                let overlap = a.start() <= b.end_or_start() && b.start() <= a.end_or_start();
                if overlap {
                    assert!(
                        (a.y - b.y).abs() >= spacing - 1e-3,
                        "{fixture}: '{}' and '{}' too close ({} vs {})",
                        a.label(),
                        b.label(),
                        a.y,
                        b.y
                    );
                }
            }
        }
    }
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "single_lane_points.json",
        "overlapping_spans.json",
        "three_lanes.json",
        "sheet_rows.json5",
        "dense_year.json",
    ];

    let theme = Theme::nenpyo_default();
    let layout_config = LayoutConfig::default();
    for rel in candidates {
        let (data, layout) = layout_fixture(rel, 1.0);
        let svg = render_svg(&layout, &data, &theme, &layout_config, &RenderConfig::default());
        assert!(svg.contains("<svg"), "{rel}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{rel}: missing </svg tag");
        assert_eq!(
            svg.matches("data-event-id").count(),
            data.event_count(),
            "{rel}: one group per event"
        );
        assert_lane_collision_free(&layout, 1.0, rel);
    }
}

#[test]
fn single_lane_point_events() {
    let (_, layout) = layout_fixture("single_lane_points.json", 1.0);
    assert_eq!(layout.positioned_events.len(), 1);
    let lane = &layout.positioned_events[0];
    assert_eq!(lane.len(), 2);
    assert!(lane.iter().all(|event| event.height == 12.0));
    let e1 = lane.iter().find(|e| e.start() == 2000).unwrap();
    let e2 = lane.iter().find(|e| e.start() == 2010).unwrap();
    assert!(e2.y > e1.y);
    assert_eq!(layout.layout_config.timeline_height, Some(800.0));
}

#[test]
fn overlapping_spans_are_separated_and_unchanged() {
    let (data, layout) = layout_fixture("overlapping_spans.json", 1.0);
    let lane = &layout.positioned_events[0];
    assert!((lane[0].y - lane[1].y).abs() >= 16.0);
    for (source, positioned) in data.lanes[0].events.iter().zip(lane) {
        assert_eq!(&positioned.event, source);
    }
}

#[test]
fn three_lanes_offset_by_preceding_widths() {
    let (_, layout) = layout_fixture("three_lanes.json", 1.0);
    let widths = &layout.layout_config.lane_widths;
    assert_eq!(widths.len(), 3);
    assert!(layout.positioned_events[1].iter().all(|e| e.x >= widths[0]));
    assert!(
        layout.positioned_events[2]
            .iter()
            .all(|e| e.x >= widths[0] + widths[1])
    );
    // The long economic caption widens its lane.
    assert!(widths[1] > widths[0]);
    let config = &layout.layout_config;
    assert_eq!(config.total_width, config.year_axis_width + widths.iter().sum::<f32>());
}

#[test]
fn sheet_rows_skip_header_and_invalid_rows() {
    let data = load_fixture("sheet_rows.json5");
    assert_eq!(data.lane_names(), vec!["オリンピック".to_string()]);
    let events = &data.lanes[0].events;
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].end, Some(2021));
    assert_eq!(events[2].end, None);
    let years = year_range(&data, &LayoutConfig::default()).unwrap();
    assert_eq!((years.min, years.max), (1960, 2030));
}

#[test]
fn dense_year_grows_with_scale() {
    let data = load_fixture("dense_year.json");
    let config = LayoutConfig::default();
    let mut previous = 0.0;
    for scale in [0.5, 1.0, 2.0, 4.0, 8.0] {
        let height = calculate_timeline_height(&data, scale, &config);
        assert!(height >= previous, "height shrank at scale {scale}");
        previous = height;
        let layout = compute_layout(&data, scale, &config);
        assert_eq!(layout.layout_config.timeline_height, Some(height));
        assert_lane_collision_free(&layout, scale, "dense_year.json");
    }
    assert_eq!(
        compute_layout(&data, 1.0, &config).layout_config.total_width,
        calculate_timeline_width(&data, &config)
    );
}

#[test]
fn layout_is_deterministic() {
    let (data, first) = layout_fixture("dense_year.json", 1.5);
    let second = compute_layout(&data, 1.5, &LayoutConfig::default());
    assert_eq!(first, second);
}

#[test]
fn events_stay_within_content_height() {
    for rel in ["single_lane_points.json", "three_lanes.json", "dense_year.json"] {
        let (_, layout) = layout_fixture(rel, 1.0);
        let height = layout.layout_config.timeline_height.unwrap();
        assert_eq!(layout.content_height, height - 60.0);
        for event in layout.positioned_events.iter().flatten() {
            assert!(event.y >= 0.0 && event.y <= layout.content_height, "{rel}: y {}", event.y);
        }
    }
}

#[test]
fn empty_dataset_layout_shape() {
    let layout = compute_layout(&TimelineData::default(), 1.0, &LayoutConfig::default());
    assert!(layout.positioned_events.is_empty());
    assert!(layout.layout_config.lane_widths.is_empty());
    assert_eq!(layout.layout_config.year_axis_width, 120.0);
    assert_eq!(layout.layout_config.total_width, 120.0);
    assert!(layout.layout_config.timeline_height.is_none());
}

#[test]
fn years_near_i32_max_lay_out() {
    let data = parse_timeline(r#"[{"name": "A", "events": [{"start": 2147483645, "label": "far"}]}]"#)
        .expect("parse failed");
    let config = LayoutConfig::default();
    let layout = compute_layout(&data, 1.0, &config);
    assert_eq!(layout.year_range.max, i32::MAX);
    assert_eq!(
        layout.layout_config.timeline_height,
        Some(calculate_timeline_height(&data, 1.0, &config))
    );
    let svg = render_svg(&layout, &data, &Theme::nenpyo_default(), &config, &RenderConfig::default());
    assert!(svg.contains("2147483645年：far"));
}
