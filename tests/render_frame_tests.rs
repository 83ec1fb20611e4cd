use interval_summary::api::{AttributeConfig, Dashboard, SummaryConfig};
use interval_summary::core::{AttributeId, Viewport};
use interval_summary::render::{NullRenderer, Renderer};

struct Fixture {
    dashboard: Dashboard,
    price: AttributeId,
    year: AttributeId,
}

/// Six records; record 5 has no price.
fn fixture() -> Fixture {
    let mut dashboard = Dashboard::new(SummaryConfig::default(), 6).expect("dashboard");
    let price = dashboard
        .add_numeric_attribute(
            AttributeConfig::new("price"),
            vec![Some(3.0), Some(97.0), Some(50.0), Some(10.0), Some(100.0), None],
        )
        .expect("price");
    let year = dashboard
        .add_numeric_attribute(
            AttributeConfig::new("year"),
            vec![
                Some(2001.0),
                Some(2005.0),
                Some(2003.0),
                Some(2001.0),
                Some(2010.0),
                Some(2002.0),
            ],
        )
        .expect("year");
    Fixture {
        dashboard,
        price,
        year,
    }
}

#[test]
fn price_frame_scales_bars_to_the_tallest_aggregate() {
    let fixture = fixture();
    let frame = fixture.dashboard.build_frame(fixture.price).expect("frame");
    assert_eq!(frame.viewport, Viewport::new(280, 120));
    assert_eq!(frame.bars.len(), 5);
    assert_eq!(frame.ticks.len(), 6);
    frame.validate().expect("valid frame");

    let lowest = frame.bars.last().expect("lowest bar");
    assert_eq!(lowest.x_left, 0.0);
    assert_eq!(lowest.x_right, 56.0);
    assert_eq!(lowest.heights.total, 120.0);
    assert_eq!(lowest.label, "Up to 20");

    let top = frame.bars.first().expect("top bar");
    assert_eq!(top.label, "Min 80");
    assert_eq!(top.x_right, 280.0);

    let labels: Vec<&str> = frame.ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["0", "20", "40", "60", "80", "100"]);

    let missing = frame.missing.expect("missing bar");
    assert_eq!(missing.heights.total, 60.0);
    assert!(frame.filter_span.is_none());
}

#[test]
fn filtered_bins_are_selected_and_active_heights_shrink() {
    let mut fixture = fixture();
    fixture
        .dashboard
        .set_range_filter(fixture.price, 20.0, 60.0)
        .expect("filter");
    let frame = fixture.dashboard.build_frame(fixture.price).expect("frame");

    let selected: Vec<&str> = frame
        .bars
        .iter()
        .filter(|bar| bar.selected)
        .map(|bar| bar.label.as_str())
        .collect();
    assert_eq!(selected.len(), 2);
    assert_eq!(frame.filter_span, Some((56.0, 168.0)));

    let lowest = frame.bars.last().expect("lowest bar");
    assert_eq!(lowest.heights.total, 120.0);
    assert_eq!(lowest.heights.active, 0.0);
}

#[test]
fn null_renderer_counts_validated_frames() {
    let fixture = fixture();
    let mut renderer = NullRenderer::default();
    fixture
        .dashboard
        .render(fixture.price, &mut renderer)
        .expect("render price");
    assert_eq!(renderer.last_bar_count, 5);
    assert_eq!(renderer.last_tick_count, 6);

    fixture
        .dashboard
        .render(fixture.year, &mut renderer)
        .expect("render year");
    assert_eq!(renderer.frames_rendered, 2);
}

#[test]
fn attribute_without_values_renders_only_the_missing_bar() {
    let mut dashboard = Dashboard::new(SummaryConfig::default(), 2).expect("dashboard");
    let id = dashboard
        .add_numeric_attribute(AttributeConfig::new("empty"), vec![None, None])
        .expect("attribute");
    let frame = dashboard.build_frame(id).expect("frame");
    assert!(frame.bars.is_empty());
    assert!(frame.ticks.is_empty());
    assert_eq!(frame.missing.map(|bar| bar.heights.total), Some(120.0));

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.frames_rendered, 1);
}
