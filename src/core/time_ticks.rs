//! Calendar-aware tick generation for time domains.
//!
//! Instants travel as Unix seconds; calendar math happens on UTC `DateTime`s.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, unix_seconds_to_datetime};

const MAX_TICKS: usize = 10_000;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Finest calendar component that varies across an attribute's instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeResolution {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl TimeResolution {
    #[must_use]
    pub fn of_instant(instant: DateTime<Utc>) -> Self {
        if instant.nanosecond() != 0 || instant.second() != 0 {
            Self::Second
        } else if instant.minute() != 0 {
            Self::Minute
        } else if instant.hour() != 0 {
            Self::Hour
        } else if instant.day() != 1 {
            Self::Day
        } else if instant.month() != 1 {
            Self::Month
        } else {
            Self::Year
        }
    }

    /// Scans Unix-second values once; `None` when none of them is a valid instant.
    pub fn detect(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut finest: Option<Self> = None;
        for value in values {
            let Some(instant) = unix_seconds_to_datetime(value) else {
                continue;
            };
            let resolution = Self::of_instant(instant);
            finest = Some(finest.map_or(resolution, |current| current.min(resolution)));
            if finest == Some(Self::Second) {
                break;
            }
        }
        finest
    }

    #[must_use]
    pub fn unit(self) -> TimeUnit {
        match self {
            Self::Second => TimeUnit::Second,
            Self::Minute => TimeUnit::Minute,
            Self::Hour => TimeUnit::Hour,
            Self::Day => TimeUnit::Day,
            Self::Month => TimeUnit::Month,
            Self::Year => TimeUnit::Year,
        }
    }

    /// True when `seconds` lies exactly on a boundary of this resolution.
    #[must_use]
    pub fn is_aligned(self, seconds: f64) -> bool {
        let Some(instant) = unix_seconds_to_datetime(seconds) else {
            return false;
        };
        TimeInterval::new(self.unit(), 1).floor(instant) == Some(instant)
    }

    /// Interval of this resolution's unit spaced to give roughly `count` ticks.
    #[must_use]
    pub fn interval_for_span(self, span_seconds: f64, count: usize) -> TimeInterval {
        let unit = self.unit();
        let unit_seconds = TimeInterval::new(unit, 1).approx_seconds();
        let raw = span_seconds / (unit_seconds * count.max(1) as f64);
        let step = if raw.is_finite() && raw > 1.0 {
            raw.ceil().min(f64::from(u32::MAX)) as u32
        } else {
            1
        };
        TimeInterval::new(unit, step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Coarsest resolution that still tells this unit's boundaries apart.
    #[must_use]
    pub fn resolution(self) -> TimeResolution {
        match self {
            Self::Second => TimeResolution::Second,
            Self::Minute => TimeResolution::Minute,
            Self::Hour => TimeResolution::Hour,
            Self::Day | Self::Week => TimeResolution::Day,
            Self::Month => TimeResolution::Month,
            Self::Year => TimeResolution::Year,
        }
    }
}

/// `step` repetitions of a calendar unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

const INTERVAL_HIERARCHY: &[TimeInterval] = &[
    TimeInterval::new(TimeUnit::Second, 1),
    TimeInterval::new(TimeUnit::Second, 5),
    TimeInterval::new(TimeUnit::Second, 15),
    TimeInterval::new(TimeUnit::Second, 30),
    TimeInterval::new(TimeUnit::Minute, 1),
    TimeInterval::new(TimeUnit::Minute, 5),
    TimeInterval::new(TimeUnit::Minute, 15),
    TimeInterval::new(TimeUnit::Minute, 30),
    TimeInterval::new(TimeUnit::Hour, 1),
    TimeInterval::new(TimeUnit::Hour, 3),
    TimeInterval::new(TimeUnit::Hour, 6),
    TimeInterval::new(TimeUnit::Hour, 12),
    TimeInterval::new(TimeUnit::Day, 1),
    TimeInterval::new(TimeUnit::Day, 2),
    TimeInterval::new(TimeUnit::Week, 1),
    TimeInterval::new(TimeUnit::Month, 1),
    TimeInterval::new(TimeUnit::Month, 3),
    TimeInterval::new(TimeUnit::Year, 1),
    TimeInterval::new(TimeUnit::Year, 2),
    TimeInterval::new(TimeUnit::Year, 5),
    TimeInterval::new(TimeUnit::Year, 10),
    TimeInterval::new(TimeUnit::Year, 20),
    TimeInterval::new(TimeUnit::Year, 50),
    TimeInterval::new(TimeUnit::Year, 100),
];

impl TimeInterval {
    #[must_use]
    pub const fn new(unit: TimeUnit, step: u32) -> Self {
        Self {
            unit,
            step: if step == 0 { 1 } else { step },
        }
    }

    /// Duration in seconds; months and years are approximated.
    #[must_use]
    pub fn approx_seconds(self) -> f64 {
        let unit = match self.unit {
            TimeUnit::Second => 1,
            TimeUnit::Minute => SECONDS_PER_MINUTE,
            TimeUnit::Hour => SECONDS_PER_HOUR,
            TimeUnit::Day => SECONDS_PER_DAY,
            TimeUnit::Week => 7 * SECONDS_PER_DAY,
            TimeUnit::Month => 30 * SECONDS_PER_DAY,
            TimeUnit::Year => 365 * SECONDS_PER_DAY,
        };
        (unit * i64::from(self.step)) as f64
    }

    /// Hierarchy entry whose tick count over `span_seconds` is closest to `count`.
    #[must_use]
    pub fn for_span(span_seconds: f64, count: usize) -> Self {
        let mut best = INTERVAL_HIERARCHY[0];
        let mut best_diff = f64::INFINITY;
        for &interval in INTERVAL_HIERARCHY {
            let ticks = span_seconds / interval.approx_seconds();
            let diff = (ticks - count as f64).abs();
            if diff < best_diff {
                best_diff = diff;
                best = interval;
            }
        }
        best
    }

    /// Rounds down to the nearest boundary of this interval.
    #[must_use]
    pub fn floor(self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let step = i64::from(self.step);
        match self.unit {
            TimeUnit::Second => floor_epoch(instant, step),
            TimeUnit::Minute => floor_epoch(instant, step * SECONDS_PER_MINUTE),
            TimeUnit::Hour => floor_epoch(instant, step * SECONDS_PER_HOUR),
            TimeUnit::Day => floor_epoch(instant, step * SECONDS_PER_DAY),
            TimeUnit::Week => {
                let midnight = floor_epoch(instant, SECONDS_PER_DAY)?;
                let back = i64::from(midnight.weekday().num_days_from_sunday());
                Some(midnight - Duration::days(back))
            }
            TimeUnit::Month => {
                let index = month_index(instant).div_euclid(step) * step;
                from_month_index(index)
            }
            TimeUnit::Year => {
                let year = i64::from(instant.year()).div_euclid(step) * step;
                from_month_index(year * 12)
            }
        }
    }

    #[must_use]
    pub fn ceil(self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let floored = self.floor(instant)?;
        if floored == instant {
            Some(instant)
        } else {
            self.offset(floored, 1)
        }
    }

    /// Moves `count` intervals forward from a floored instant.
    #[must_use]
    pub fn offset(self, instant: DateTime<Utc>, count: i64) -> Option<DateTime<Utc>> {
        let amount = i64::from(self.step).checked_mul(count)?;
        match self.unit {
            TimeUnit::Second => instant.checked_add_signed(Duration::seconds(amount)),
            TimeUnit::Minute => instant.checked_add_signed(Duration::minutes(amount)),
            TimeUnit::Hour => instant.checked_add_signed(Duration::hours(amount)),
            TimeUnit::Day => instant.checked_add_signed(Duration::days(amount)),
            TimeUnit::Week => instant.checked_add_signed(Duration::weeks(amount)),
            TimeUnit::Month => from_month_index(month_index(instant) + amount),
            TimeUnit::Year => from_month_index(month_index(instant) + amount * 12),
        }
    }
}

/// Calendar ticks plus the interval that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTicks {
    pub values: Vec<f64>,
    pub interval: TimeInterval,
}

/// Ticks on calendar boundaries enclosing `[start, stop]` (Unix seconds).
///
/// When `resolution` is known and a tick lands off its boundaries, ticks are
/// regenerated with the resolution's own unit.
#[must_use]
pub fn time_ticks(
    start: f64,
    stop: f64,
    count: usize,
    resolution: Option<TimeResolution>,
) -> Option<TimeTicks> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return None;
    }
    let lo = start.min(stop);
    let hi = start.max(stop);
    let span = hi - lo;

    let interval = TimeInterval::for_span(span, count);
    let values = calendar_ticks(lo, hi, interval)?;
    let Some(resolution) = resolution else {
        return Some(TimeTicks { values, interval });
    };
    if values.iter().all(|&tick| resolution.is_aligned(tick)) {
        return Some(TimeTicks { values, interval });
    }

    let refined = resolution.interval_for_span(span, count);
    let values = calendar_ticks(lo, hi, refined)?;
    Some(TimeTicks {
        values,
        interval: refined,
    })
}

fn calendar_ticks(lo: f64, hi: f64, interval: TimeInterval) -> Option<Vec<f64>> {
    let start = interval.floor(unix_seconds_to_datetime(lo)?)?;
    let mut end = interval.ceil(unix_seconds_to_datetime(hi)?)?;
    if end <= start {
        end = interval.offset(start, 1)?;
    }

    let mut values = Vec::new();
    let mut current = start;
    while current <= end {
        if values.len() >= MAX_TICKS {
            return None;
        }
        values.push(datetime_to_unix_seconds(current));
        current = interval.offset(current, 1)?;
    }
    if values.len() < 2 {
        return None;
    }
    Some(values)
}

fn floor_epoch(instant: DateTime<Utc>, seconds: i64) -> Option<DateTime<Utc>> {
    let floored = instant.timestamp().div_euclid(seconds) * seconds;
    DateTime::<Utc>::from_timestamp(floored, 0)
}

fn month_index(instant: DateTime<Utc>) -> i64 {
    i64::from(instant.year()) * 12 + i64::from(instant.month0())
}

fn from_month_index(index: i64) -> Option<DateTime<Utc>> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{TimeInterval, TimeResolution, TimeUnit, time_ticks};
    use crate::core::primitives::datetime_to_unix_seconds;

    fn seconds(y: i32, m: u32, d: u32, h: u32) -> f64 {
        datetime_to_unix_seconds(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn resolution_tracks_finest_component() {
        let days = [seconds(2020, 1, 5, 0), seconds(2020, 3, 1, 0)];
        assert_eq!(TimeResolution::detect(days), Some(TimeResolution::Day));

        let hours = [seconds(2020, 1, 1, 0), seconds(2020, 1, 1, 7)];
        assert_eq!(TimeResolution::detect(hours), Some(TimeResolution::Hour));

        let years = [seconds(2001, 1, 1, 0), seconds(2009, 1, 1, 0)];
        assert_eq!(TimeResolution::detect(years), Some(TimeResolution::Year));
    }

    #[test]
    fn month_floor_and_offset_cross_year_boundaries() {
        let interval = TimeInterval::new(TimeUnit::Month, 3);
        let instant = Utc.with_ymd_and_hms(2021, 11, 17, 5, 0, 0).unwrap();
        let floored = interval.floor(instant).expect("floor");
        assert_eq!(floored, Utc.with_ymd_and_hms(2021, 10, 1, 0, 0, 0).unwrap());
        let next = interval.offset(floored, 1).expect("offset");
        assert_eq!(next, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn year_resolution_refines_sub_year_ticks() {
        let ticks = time_ticks(
            seconds(2000, 1, 1, 0),
            seconds(2003, 1, 1, 0),
            12,
            Some(TimeResolution::Year),
        )
        .expect("ticks");
        assert_eq!(ticks.interval.unit, TimeUnit::Year);
        assert_eq!(ticks.values.len(), 4);
    }
}
