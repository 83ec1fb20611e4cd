//! Nice tick generation for numeric domains.
//!
//! Ticks double as bin boundaries, so the first and last tick always enclose
//! the requested domain.

use serde::{Deserialize, Serialize};

const E10: f64 = 7.071_067_811_865_476;
const E5: f64 = 3.162_277_660_168_379_5;
const E2: f64 = 1.414_213_562_373_095_1;

const MAX_NICE_ITERATIONS: usize = 10;
const MAX_TICKS: usize = 10_000;

/// Boundary ticks plus the step that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NiceTicks {
    pub values: Vec<f64>,
    /// Smallest distance between two adjacent ticks.
    pub step: f64,
}

impl NiceTicks {
    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((*self.values.first()?, *self.values.last()?))
    }

    fn from_values(values: Vec<f64>) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let step = values
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .fold(f64::INFINITY, f64::min);
        Some(Self { values, step })
    }
}

/// Step of 1, 2 or 5 times a power of ten giving roughly `count` intervals.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> Option<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() || stop <= start {
        return None;
    }

    let step = (stop - start) / count as f64;
    let power = step.log10().floor() as i32;
    let error = step / pow10(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    Some(factor * pow10(power))
}

/// Linear ticks on a nice step enclosing `[start, stop]`.
///
/// `min_step` bounds the step from below; integer attributes pass `1.0`.
#[must_use]
pub fn linear_ticks(start: f64, stop: f64, count: usize, min_step: Option<f64>) -> Option<NiceTicks> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return None;
    }

    let mut lo = start.min(stop);
    let mut hi = start.max(stop);
    if lo == hi {
        hi = lo + min_step.unwrap_or(1.0);
    }

    let mut step = 0.0;
    for _ in 0..MAX_NICE_ITERATIONS {
        let mut next = tick_increment(lo, hi, count)?;
        if let Some(min_step) = min_step {
            next = next.max(min_step);
        }
        if next == step {
            break;
        }
        lo = index_value(floor_index(lo, next), next);
        hi = index_value(ceil_index(hi, next), next);
        step = next;
    }

    let first = floor_index(lo, step);
    let last = ceil_index(hi, step);
    let count = (last - first) as usize + 1;
    if count > MAX_TICKS {
        return None;
    }
    let values = (first..=last).map(|index| index_value(index, step)).collect();
    NiceTicks::from_values(values)
}

/// Log-10 ticks enclosing `[start, stop]`; `None` unless the domain is positive.
#[must_use]
pub fn log_ticks(start: f64, stop: f64, count: usize) -> Option<NiceTicks> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return None;
    }
    let lo = start.min(stop);
    let hi = start.max(stop);
    if lo <= 0.0 {
        return None;
    }

    let lo_exp = snap(lo.log10()).floor() as i32;
    let mut hi_exp = snap(hi.log10()).ceil() as i32;
    if hi_exp <= lo_exp {
        hi_exp = lo_exp + 1;
    }
    let decades = (hi_exp - lo_exp) as usize;

    let mut values = Vec::new();
    if decades * 3 <= count {
        for exp in lo_exp..hi_exp {
            for multiple in [1.0, 2.0, 5.0] {
                let value = scaled_pow10(multiple, exp);
                if value < lo && scaled_pow10(1.0, exp + 1) <= lo {
                    continue;
                }
                values.push(value);
            }
        }
        values.push(pow10(hi_exp));
        // Drop leading multiples that sit wholly below the domain start.
        while values.len() > 2 && values[1] <= lo {
            values.remove(0);
        }
        while values.len() > 2 && values[values.len() - 2] >= hi {
            values.pop();
        }
    } else {
        let every = decades.div_ceil(count.max(1)).max(1) as i32;
        let mut exp = lo_exp;
        while exp < hi_exp {
            values.push(pow10(exp));
            exp += every;
        }
        values.push(pow10(exp));
    }

    NiceTicks::from_values(values)
}

fn pow10(exp: i32) -> f64 {
    scaled_pow10(1.0, exp)
}

// Division keeps negative powers identical to their decimal literals.
fn scaled_pow10(multiple: f64, exp: i32) -> f64 {
    if exp >= 0 {
        multiple * 10f64.powi(exp)
    } else {
        multiple / 10f64.powi(-exp)
    }
}

fn snap(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() <= 1e-9 * value.abs().max(1.0) {
        rounded
    } else {
        value
    }
}

fn scaled_index(value: f64, step: f64) -> f64 {
    if step < 1.0 {
        value * (1.0 / step).round()
    } else {
        value / step
    }
}

fn floor_index(value: f64, step: f64) -> i64 {
    snap(scaled_index(value, step)).floor() as i64
}

fn ceil_index(value: f64, step: f64) -> i64 {
    snap(scaled_index(value, step)).ceil() as i64
}

fn index_value(index: i64, step: f64) -> f64 {
    if step < 1.0 {
        index as f64 / (1.0 / step).round()
    } else {
        index as f64 * step
    }
}
