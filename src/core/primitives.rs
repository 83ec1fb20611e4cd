use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::FromPrimitive;

use crate::error::{SummaryError, SummaryResult};

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Converts Unix seconds back to a UTC instant with millisecond precision.
#[must_use]
pub fn unix_seconds_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis > (i64::MAX as f64) || millis < (i64::MIN as f64) {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
}

/// Time values are kept at millisecond precision, the precision of persisted bounds.
#[must_use]
pub fn round_to_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

pub fn require_finite(value: f64, field_name: &str) -> SummaryResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SummaryError::InvalidData(format!(
            "{field_name} must be finite"
        )))
    }
}

/// Formats a number rounded to `precision` decimals with trailing zeros trimmed.
///
/// Goes through `Decimal` so binary float noise (`0.30000000000000004`)
/// never leaks into labels.
#[must_use]
pub fn format_number(value: f64, precision: u32) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }
    match Decimal::from_f64(value) {
        Some(decimal) => {
            let rounded = decimal
                .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            if rounded.is_zero() {
                "0".to_owned()
            } else {
                rounded.to_string()
            }
        }
        None => format!("{value}"),
    }
}

/// Decimal places needed to tell apart values `step` apart.
#[must_use]
pub fn precision_for_step(step: f64, max_precision: u32) -> u32 {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    let digits = (-step.log10()).ceil();
    (digits.max(0.0) as u32).min(max_precision)
}

#[cfg(test)]
mod tests {
    use super::{
        datetime_to_unix_seconds, format_number, precision_for_step, round_to_millis,
        unix_seconds_to_datetime,
    };

    #[test]
    fn format_number_trims_float_noise() {
        assert_eq!(format_number(0.1 + 0.2, 2), "0.3");
        assert_eq!(format_number(10.0, 0), "10");
        assert_eq!(format_number(-0.0, 3), "0");
        assert_eq!(format_number(2.5, 2), "2.5");
    }

    #[test]
    fn millisecond_rounding_matches_instant_conversion() {
        let seconds = 1_609_459_200.000_4;
        let rounded = round_to_millis(seconds);
        assert_eq!(rounded, 1_609_459_200.0);
        let instant = unix_seconds_to_datetime(seconds).expect("instant");
        assert_eq!(datetime_to_unix_seconds(instant), rounded);
        assert_eq!(round_to_millis(12.345_6), 12.346);
    }

    #[test]
    fn precision_follows_step_magnitude() {
        assert_eq!(precision_for_step(5.0, 6), 0);
        assert_eq!(precision_for_step(0.5, 6), 1);
        assert_eq!(precision_for_step(0.02, 6), 2);
        assert_eq!(precision_for_step(1e-9, 6), 6);
    }

    #[test]
    fn non_finite_seconds_have_no_instant() {
        assert!(unix_seconds_to_datetime(f64::NAN).is_none());
        let instant = unix_seconds_to_datetime(86_400.0).expect("valid instant");
        assert_eq!(instant.timestamp(), 86_400);
    }
}
