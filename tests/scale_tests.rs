use approx::assert_relative_eq;
use interval_summary::core::{
    DomainExtent, IntervalRange, LabelContext, ScaleType, TickPolicy, ValueKind, ValueScale,
    range_label,
};

#[test]
fn log_scale_pixel_round_trip() {
    let scale = ValueScale::new(ScaleType::Log, (1.0, 10_000.0), 400.0).expect("scale");
    assert_relative_eq!(scale.value_to_pixel(100.0).expect("pixel"), 200.0, epsilon = 1e-9);
    for value in [1.0, 3.7, 42.0, 999.0, 10_000.0] {
        let pixel = scale.value_to_pixel(value).expect("pixel");
        let back = scale.pixel_to_value(pixel).expect("value");
        assert_relative_eq!(back, value, max_relative = 1e-12);
    }
}

#[test]
fn log_scale_falls_back_to_linear_on_non_positive_domain() {
    let scale = ValueScale::new(ScaleType::Log, (0.0, 10.0), 400.0).expect("scale");
    assert_eq!(scale.scale_type(), ScaleType::Linear);
    assert!(ValueScale::new(ScaleType::Log, (1.0, 10.0), 0.0).is_err());
}

#[test]
fn auto_scale_resolves_from_extent_ratio() {
    let wide = DomainExtent::new(1.0, 5_000.0).ok();
    let narrow = DomainExtent::new(1.0, 50.0).ok();
    let numeric = ValueKind::Numeric { integer: false };
    assert_eq!(ScaleType::Auto.resolve(numeric, wide, 1000.0), ScaleType::Log);
    assert_eq!(ScaleType::Auto.resolve(numeric, narrow, 1000.0), ScaleType::Linear);
    assert_eq!(ScaleType::Linear.resolve(ValueKind::Time, wide, 1000.0), ScaleType::Time);
}

#[test]
fn nice_linear_ticks_enclose_the_domain() {
    let scale = ValueScale::new(ScaleType::Linear, (0.3, 9.2), 300.0).expect("scale");
    let (niced, ticks) = scale
        .nice(TickPolicy {
            count: 9,
            integer: false,
            resolution: None,
        })
        .expect("ticks");
    assert_eq!(niced.domain(), (0.0, 10.0));
    assert_relative_eq!(ticks.step, 1.0);
    assert_relative_eq!(niced.value_to_pixel(5.0).expect("pixel"), 150.0);
}

#[test]
fn integer_labels_match_bound_positions() {
    let context = LabelContext::Numeric {
        extent: DomainExtent::new(0.0, 100.0).expect("extent"),
        integer: true,
        precision: 0,
    };
    assert_eq!(range_label(&IntervalRange::new(10.0, 11.0), context), "10");
    assert_eq!(
        range_label(&IntervalRange::inclusive(10.0, 30.0), context),
        "10 — 30"
    );
    assert_eq!(range_label(&IntervalRange::new(0.0, 30.0), context), "Up to 30");
}
