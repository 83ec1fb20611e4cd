use chrono::{DateTime, TimeZone, Utc};
use interval_summary::api::{AttributeConfig, Dashboard, FilterSpec, SpecValue, SummaryConfig};
use interval_summary::core::{AggregateHandle, ScaleType, TimeResolution, TimeUnit};

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn monthly_dashboard(width_px: f64) -> (Dashboard, interval_summary::core::AttributeId) {
    let mut dashboard = Dashboard::new(SummaryConfig::default(), 4).expect("dashboard");
    let id = dashboard
        .add_time_attribute(
            AttributeConfig::new("opened").with_width_px(width_px),
            vec![
                Some(day(2021, 1, 1)),
                Some(day(2021, 3, 1)),
                Some(day(2021, 6, 1)),
                None,
            ],
        )
        .expect("attribute");
    (dashboard, id)
}

#[test]
fn day_resolution_data_gets_whole_day_boundaries() {
    let mut dashboard = Dashboard::new(SummaryConfig::default(), 2).expect("dashboard");
    let id = dashboard
        .add_time_attribute(
            AttributeConfig::new("created"),
            vec![Some(day(2021, 1, 1)), Some(day(2021, 1, 3))],
        )
        .expect("attribute");
    let attribute = dashboard.attribute(id).expect("attribute");
    assert_eq!(attribute.scale_type(), ScaleType::Time);
    assert_eq!(attribute.resolution(), Some(TimeResolution::Day));

    let ticks = attribute.ticks().expect("ticks");
    assert!(ticks.values.iter().all(|tick| tick.rem_euclid(86_400.0) == 0.0));
    assert_eq!(ticks.interval.map(|interval| interval.unit), Some(TimeUnit::Day));
    assert_eq!(attribute.aggregates().len(), 2);
}

#[test]
fn monthly_data_bins_by_calendar_month() {
    let (dashboard, id) = monthly_dashboard(600.0);
    let attribute = dashboard.attribute(id).expect("attribute");
    assert_eq!(attribute.resolution(), Some(TimeResolution::Month));
    assert_eq!(attribute.aggregates().len(), 5);

    let march = day(2021, 3, 1).timestamp() as f64;
    let bin = attribute
        .aggregates()
        .iter()
        .find(|aggregate| aggregate.contains(march))
        .expect("march bin");
    let label = dashboard
        .aggregate_label(AggregateHandle::new(id, bin.id()))
        .expect("label");
    assert_eq!(label, "Mar 2021");
    assert_eq!(bin.records(), &[1]);
    assert_eq!(attribute.missing_aggregate().records(), &[3]);
}

#[test]
fn time_filters_export_as_instants() {
    let (mut dashboard, id) = monthly_dashboard(280.0);
    dashboard
        .set_range_filter(
            id,
            day(2021, 1, 1).timestamp() as f64,
            day(2021, 3, 1).timestamp() as f64,
        )
        .expect("filter");
    assert!(dashboard.is_record_active(0));
    assert!(!dashboard.is_record_active(1));

    let spec = dashboard.export_filter(id).expect("export").expect("filter");
    assert_eq!(
        spec,
        FilterSpec::Range {
            min: SpecValue::Instant(day(2021, 1, 1)),
            max: SpecValue::Instant(day(2021, 3, 1)),
        }
    );
    let json = dashboard.export_filters_json().expect("json");
    assert!(json.contains("2021-01-01T00:00:00Z"));
}

#[test]
fn day_resolution_ticks_stay_on_midnight_across_months() {
    let mut dashboard = Dashboard::new(SummaryConfig::default(), 3).expect("dashboard");
    let id = dashboard
        .add_time_attribute(
            AttributeConfig::new("shipped"),
            vec![Some(day(2021, 1, 5)), Some(day(2021, 2, 20)), Some(day(2021, 4, 17))],
        )
        .expect("attribute");
    let ticks = dashboard
        .attribute(id)
        .expect("attribute")
        .ticks()
        .expect("ticks");
    assert!(ticks.values.len() >= 2);
    assert!(ticks.values.iter().all(|tick| tick.rem_euclid(86_400.0) == 0.0));
}
