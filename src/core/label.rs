use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::core::primitives::{format_number, unix_seconds_to_datetime};
use crate::core::range::{DomainExtent, IntervalRange};
use crate::core::time_ticks::TimeResolution;

const RANGE_SEPARATOR: &str = " — ";
const OPEN_SEPARATOR: &str = " ... ";
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Everything needed to phrase a range for its attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelContext {
    Numeric {
        extent: DomainExtent,
        integer: bool,
        precision: u32,
    },
    Time {
        extent: DomainExtent,
        resolution: TimeResolution,
    },
}

#[must_use]
pub fn range_label(range: &IntervalRange, context: LabelContext) -> String {
    match context {
        LabelContext::Numeric {
            extent,
            integer,
            precision,
        } => numeric_label(range, extent, integer, precision),
        LabelContext::Time { extent, resolution } => time_label(range, extent, resolution),
    }
}

fn numeric_label(
    range: &IntervalRange,
    extent: DomainExtent,
    integer: bool,
    precision: u32,
) -> String {
    let precision = if integer { 0 } else { precision };
    let min = format_number(range.min, precision);
    let max = format_number(range.max, precision);

    if integer && (range.is_degenerate() || (range.width() == 1.0 && !range.max_included)) {
        return min;
    }

    let touches_min = !range.is_min_larger(extent);
    let touches_max = !range.is_max_smaller(extent);
    match (touches_min, touches_max) {
        (true, true) => format!("{min}{RANGE_SEPARATOR}{max}"),
        (true, false) if range.max_included => format!("Max {max}"),
        (true, false) => format!("Up to {max}"),
        (false, true) => format!("Min {min}"),
        (false, false) if range.max_included => format!("{min}{RANGE_SEPARATOR}{max}"),
        (false, false) => format!("{min} up to {max}"),
    }
}

fn time_label(range: &IntervalRange, extent: DomainExtent, resolution: TimeResolution) -> String {
    let (Some(min), Some(max)) = (
        unix_seconds_to_datetime(range.min),
        unix_seconds_to_datetime(range.max),
    ) else {
        return format!("{}{OPEN_SEPARATOR}{}", range.min, range.max);
    };

    let days = range.width() / SECONDS_PER_DAY;
    if (363.0..=367.0).contains(&days) && is_new_year(max) {
        return min.year().to_string();
    }
    if (27.0..=33.0).contains(&days) && min.day() == 1 && max.day() == 1 {
        return min.format("%b %Y").to_string();
    }

    let touches_min = !range.is_min_larger(extent);
    let touches_max = !range.is_max_smaller(extent);
    let min_text = format_instant(min, resolution);
    let max_text = format_instant(max, resolution);
    match (touches_min, touches_max) {
        (true, false) => format!("{OPEN_SEPARATOR}{max_text}").trim_start().to_owned(),
        (false, true) => format!("{min_text}{OPEN_SEPARATOR}").trim_end().to_owned(),
        _ => format!("{min_text}{OPEN_SEPARATOR}{max_text}"),
    }
}

fn is_new_year(instant: DateTime<Utc>) -> bool {
    instant.month() == 1
        && instant.day() == 1
        && instant.hour() == 0
        && instant.minute() == 0
        && instant.second() == 0
}

/// Formats one instant at the precision its attribute carries.
#[must_use]
pub fn format_instant(instant: DateTime<Utc>, resolution: TimeResolution) -> String {
    let pattern = match resolution {
        TimeResolution::Year => "%Y",
        TimeResolution::Month => "%b %Y",
        TimeResolution::Day => "%Y-%m-%d",
        TimeResolution::Hour | TimeResolution::Minute => "%Y-%m-%d %H:%M",
        TimeResolution::Second => "%Y-%m-%d %H:%M:%S",
    };
    instant.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{LabelContext, range_label};
    use crate::core::primitives::datetime_to_unix_seconds;
    use crate::core::range::{DomainExtent, IntervalRange};
    use crate::core::time_ticks::TimeResolution;

    fn numeric(integer: bool) -> LabelContext {
        LabelContext::Numeric {
            extent: DomainExtent::new(0.0, 100.0).expect("extent"),
            integer,
            precision: 1,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> f64 {
        datetime_to_unix_seconds(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    #[test]
    fn numeric_labels_follow_bound_position() {
        assert_eq!(range_label(&IntervalRange::new(10.0, 11.0), numeric(true)), "10");
        assert_eq!(
            range_label(&IntervalRange::inclusive(10.0, 30.0), numeric(true)),
            "10 — 30"
        );
        assert_eq!(
            range_label(&IntervalRange::new(0.0, 30.0), numeric(true)),
            "Up to 30"
        );
        assert_eq!(
            range_label(&IntervalRange::inclusive(0.0, 30.0), numeric(true)),
            "Max 30"
        );
        assert_eq!(
            range_label(&IntervalRange::new(70.0, 100.0), numeric(true)),
            "Min 70"
        );
        assert_eq!(
            range_label(&IntervalRange::new(10.5, 20.25), numeric(false)),
            "10.5 up to 20.3"
        );
    }

    #[test]
    fn time_labels_collapse_whole_years_and_months() {
        let context = LabelContext::Time {
            extent: DomainExtent::new(at(2000, 1, 1), at(2010, 1, 1)).expect("extent"),
            resolution: TimeResolution::Day,
        };
        let year = IntervalRange::new(at(2004, 1, 1), at(2005, 1, 1));
        assert_eq!(range_label(&year, context), "2004");

        let month = IntervalRange::new(at(2004, 2, 1), at(2004, 3, 1));
        assert_eq!(range_label(&month, context), "Feb 2004");

        let open = IntervalRange::new(at(2000, 1, 1), at(2000, 1, 15));
        assert_eq!(range_label(&open, context), "... 2000-01-15");

        let tail = IntervalRange::new(at(2009, 6, 3), at(2010, 1, 1));
        assert_eq!(range_label(&tail, context), "2009-06-03 ...");
    }
}
